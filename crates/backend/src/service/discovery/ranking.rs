//! Relationship-aware filtering and ordering of search results.

use std::cmp::Ordering;

use crate::domain::{profile::UserProfile, relationship::SearchFilter};

/// Whether `candidate` passes `filter` from the point of view of `me`.
pub fn matches_filter(filter: SearchFilter, me: &UserProfile, candidate: &UserProfile) -> bool {
  match filter {
    SearchFilter::All => true,
    SearchFilter::Connections => me.connections.contains(&candidate.uid),
    SearchFilter::Department => candidate.affiliation.department == me.affiliation.department,
    SearchFilter::Batch => candidate.affiliation.batch == me.affiliation.batch,
    SearchFilter::MutualConnections => !me.connections.is_disjoint(&candidate.connections),
    SearchFilter::Skills => !me.skill_set().is_disjoint(&candidate.skill_set()),
  }
}

/// Connections first, then profiles the actor follows, then by display name.
pub fn rank(me: &UserProfile, results: &mut [UserProfile]) {
  results.sort_by(|a, b| compare(me, a, b));
}

fn compare(me: &UserProfile, a: &UserProfile, b: &UserProfile) -> Ordering {
  let connected = |p: &UserProfile| me.connections.contains(&p.uid);
  let followed = |p: &UserProfile| me.following.contains(&p.uid);

  connected(b)
    .cmp(&connected(a))
    .then_with(|| followed(b).cmp(&followed(a)))
    .then_with(|| a.display_name.cmp(&b.display_name))
}
