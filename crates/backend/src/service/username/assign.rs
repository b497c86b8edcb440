//! Deterministic candidate handles for automatic assignment.

use super::validation::{MAX_USERNAME_LENGTH, is_separator, normalize, validate};
use crate::domain::actor::ActorId;

/// Characters of the actor id used when no email is known.
const UID_HEAD_LEN: usize = 8;

/// Head of the handle: the email local part, or the start of the actor id.
///
/// The result only contains `[a-z0-9._]`, has no separator runs or trailing
/// separator, starts with a letter and fits after `prefix`.
pub fn derive_head(email: Option<&str>, actor: &ActorId, prefix: &str) -> String {
  let raw = match email.map(str::trim).filter(|e| !e.is_empty()) {
    Some(email) => email.split('@').next().unwrap_or_default().to_string(),
    None => actor.as_str().chars().take(UID_HEAD_LEN).collect(),
  };

  let mut head = String::new();
  for c in normalize(&raw).chars() {
    let c = if c.is_ascii_lowercase() || c.is_ascii_digit() || is_separator(c) {
      c
    } else {
      '_'
    };
    if is_separator(c) && head.chars().last().is_some_and(is_separator) {
      continue;
    }
    head.push(c);
  }

  let room = MAX_USERNAME_LENGTH.saturating_sub(prefix.len());
  if !head.starts_with(|c: char| c.is_ascii_lowercase()) {
    head.insert(0, 'u');
  }
  truncate_head(&head, room)
}

/// Candidate for `attempt`: `prefix + head` first, then `prefix + head + n`,
/// cutting the head so the whole handle stays within the length limit.
pub fn candidate(prefix: &str, head: &str, attempt: usize) -> String {
  let suffix = if attempt == 0 { String::new() } else { attempt.to_string() };
  let room = MAX_USERNAME_LENGTH.saturating_sub(prefix.len() + suffix.len());
  let head: String = head.chars().take(room).collect();
  normalize(&format!("{prefix}{head}{suffix}"))
}

/// Every valid candidate in attempt order, `0..=max_suffix_tries`.
pub fn candidates(prefix: &str, head: &str, max_suffix_tries: usize) -> Vec<String> {
  (0..=max_suffix_tries)
    .map(|attempt| candidate(prefix, head, attempt))
    .filter(|c| validate(c).is_ok())
    .collect()
}

fn truncate_head(head: &str, room: usize) -> String {
  let cut: String = head.chars().take(room).collect();
  cut.trim_end_matches(is_separator).to_string()
}
