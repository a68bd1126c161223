use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const UNKNOWN_USERNAME: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
  pub username: String,
  pub amount: u64,
}

fn non_empty_str<'a>(user: &'a Value, key: &str) -> Option<&'a str> {
  user.get(key).and_then(|v| v.as_str()).filter(|s| !s.is_empty())
}

fn positive_amount(value: Option<&Value>) -> Option<u64> {
  let value = value?;
  if let Some(n) = value.as_u64() {
    return (n > 0).then_some(n);
  }
  // Negative integers and fractions land here.
  let n = value.as_f64()?;
  if !(n.is_finite() && n > 0.0) {
    return None;
  }
  let truncated = n as u64;
  (truncated > 0).then_some(truncated)
}

/// Turns raw contributor records into a ranking, highest amount first.
///
/// The username comes from `name`, then `username`, then falls back to
/// `"Unknown"`. Records whose amount under `amount_key` is missing,
/// non-numeric or not strictly positive are dropped; fractional amounts are
/// truncated, and an amount that truncates to zero is dropped as well.
/// Equal amounts keep their input order.
pub fn format_leaderboard(users: &[Value], amount_key: &str) -> Vec<LeaderboardEntry> {
  let mut out: Vec<LeaderboardEntry> = users
    .iter()
    .filter_map(|user| {
      let amount = positive_amount(user.get(amount_key))?;
      let username = non_empty_str(user, "name")
        .or_else(|| non_empty_str(user, "username"))
        .unwrap_or(UNKNOWN_USERNAME);
      Some(LeaderboardEntry {
        username: username.to_string(),
        amount,
      })
    })
    .collect();

  out.sort_by(|a, b| b.amount.cmp(&a.amount));
  out
}
