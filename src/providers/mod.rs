pub mod decapi;
pub mod streamelements;

#[cfg(test)]
pub(crate) mod mock;
