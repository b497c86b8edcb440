//! Handle grammar.
//!
//! - Length: 3-30 characters
//! - First char: lowercase letter (a-z)
//! - Rest: lowercase letters, digits, `.` or `_`
//! - No two separators in a row, no trailing separator
//! - Examples: ann, a.b_c2, user_annie42

use crate::service::util::ServiceError;

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 30;

/// Trim and lowercase. Every registry operation works on this form.
pub fn normalize(input: &str) -> String {
  input.trim().to_lowercase()
}

/// Check an already-normalized handle against the grammar.
pub fn validate(handle: &str) -> Result<(), ServiceError> {
  let invalid = |reason| Err(ServiceError::invalid_username(handle, reason));

  let len = handle.chars().count();
  if len < MIN_USERNAME_LENGTH {
    return invalid("must be at least 3 characters");
  }
  if len > MAX_USERNAME_LENGTH {
    return invalid("must be at most 30 characters");
  }

  let mut chars = handle.chars();
  if !chars.next().is_some_and(|c| c.is_ascii_lowercase()) {
    return invalid("must start with a lowercase letter");
  }

  let mut previous_separator = false;
  for c in chars {
    let separator = is_separator(c);
    if !separator && !c.is_ascii_lowercase() && !c.is_ascii_digit() {
      return invalid("may only contain a-z, 0-9, '.' and '_'");
    }
    if separator && previous_separator {
      return invalid("must not contain consecutive separators");
    }
    previous_separator = separator;
  }

  if previous_separator {
    return invalid("must not end with a separator");
  }
  Ok(())
}

/// Normalize then validate, returning the normalized handle.
pub fn parse(input: &str) -> Result<String, ServiceError> {
  let handle = normalize(input);
  validate(&handle)?;
  Ok(handle)
}

#[inline]
pub(super) fn is_separator(c: char) -> bool {
  c == '.' || c == '_'
}
