//! Human-readable output helpers

use branchit::domain::{profile::UserProfile, relationship::RelationshipStatus};

/// One line per profile: handle, display name, affiliation.
pub fn print_profiles(profiles: &[UserProfile]) {
  if profiles.is_empty() {
    println!("No results.");
    return;
  }

  for profile in profiles {
    let handle = if profile.username.is_empty() {
      "-".to_string()
    } else {
      format!("@{}", profile.username)
    };
    let affiliation = [profile.affiliation.department.as_str(), profile.affiliation.batch.as_str()]
      .into_iter()
      .filter(|s| !s.is_empty())
      .collect::<Vec<_>>()
      .join(" / ");

    println!("{:<12} {:<24} {:<28} {}", profile.uid.as_str(), handle, profile.display_name, affiliation);
  }
}

pub fn print_status(status: &RelationshipStatus) {
  if status.is_self {
    println!("This is you.");
    return;
  }
  let flag = |b: bool| if b { "yes" } else { "no" };
  println!("following:        {}", flag(status.is_following));
  println!("follower:         {}", flag(status.is_follower));
  println!("connected:        {}", flag(status.is_connected));
  println!("request sent:     {}", flag(status.request_sent));
  println!("request received: {}", flag(status.request_received));
}
