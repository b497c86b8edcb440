use serde_json::Value;

use super::store::{DbError, Document, FieldTransform, Result, SetMode};

/// Resolve a dotted path (`affiliation.department`) inside a document.
pub fn lookup_path<'a>(doc: &'a Document, path: &str) -> Option<&'a Value> {
  let mut parts = path.split('.');
  let mut current = doc.get(parts.next()?)?;
  for part in parts {
    current = current.as_object()?.get(part)?;
  }
  Some(current)
}

/// String value at a dotted path, if present and a string.
pub fn string_at<'a>(doc: &'a Document, path: &str) -> Option<&'a str> {
  lookup_path(doc, path).and_then(Value::as_str)
}

/// Combine `fields` into `existing` according to `mode`.
pub(crate) fn apply_set(existing: Option<Document>, fields: Document, mode: SetMode) -> Document {
  match (mode, existing) {
    (SetMode::Merge, Some(mut doc)) => {
      for (key, value) in fields {
        doc.insert(key, value);
      }
      doc
    }
    _ => fields,
  }
}

/// Apply an array transform to `field`. A missing field is treated as an
/// empty array; a present non-array field is rejected.
pub(crate) fn apply_transform(doc: &mut Document, field: &str, transform: &FieldTransform) -> Result<()> {
  let slot = doc.entry(field.to_string()).or_insert_with(|| Value::Array(Vec::new()));
  if slot.is_null() {
    *slot = Value::Array(Vec::new());
  }
  let Some(items) = slot.as_array_mut() else {
    return Err(DbError::InvalidInput(format!("field '{field}' is not an array")));
  };

  match transform {
    FieldTransform::ArrayUnion(values) => {
      for value in values {
        if !items.contains(value) {
          items.push(value.clone());
        }
      }
    }
    FieldTransform::ArrayRemove(values) => items.retain(|item| !values.contains(item)),
  }
  Ok(())
}
