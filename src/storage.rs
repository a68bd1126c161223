use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Reads a JSON document; a missing file is `None`.
pub fn load_document(path: &Path) -> Result<Option<Value>> {
  let raw = match std::fs::read(path) {
    Ok(raw) => raw,
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
    Err(e) => return Err(Error::Io(e)),
  };
  Ok(Some(serde_json::from_slice::<Value>(&raw)?))
}

fn is_blank(doc: &Value) -> bool {
  match doc {
    Value::Null => true,
    Value::Bool(b) => !b,
    Value::Number(n) => n.as_f64() == Some(0.0),
    Value::String(s) => s.is_empty(),
    Value::Array(items) => items.is_empty(),
    Value::Object(map) => map.is_empty(),
  }
}

/// Like [`load_document`], but the top level must be a JSON object. Blank
/// documents (`null`, `[]`, `{}`, `""`, `0`, `false`) count as absent.
pub fn load_object(path: &Path) -> Result<Option<Value>> {
  match load_document(path)? {
    Some(doc) if is_blank(&doc) => Ok(None),
    Some(doc) if !doc.is_object() => Err(Error::NotAnObject(path.display().to_string())),
    other => Ok(other),
  }
}

/// Writes `value` pretty-printed (2-space indent), replacing the file in one
/// rename. Creates the parent directory when needed.
pub fn save_document<T: Serialize>(path: &Path, value: &T) -> Result<()> {
  let dir = match path.parent() {
    Some(dir) if !dir.as_os_str().is_empty() => dir,
    _ => Path::new("."),
  };
  std::fs::create_dir_all(dir)?;

  let body = serde_json::to_vec_pretty(value)?;
  let mut tmp = NamedTempFile::new_in(dir)?;
  tmp.write_all(&body)?;
  tmp.flush()?;
  tmp.persist(path).map_err(|e| Error::Io(e.error))?;

  tracing::debug!(path = %path.display(), bytes = body.len(), "saved document");
  Ok(())
}
