//! Votes on reports and their aggregation.
//!
//! A vote is deduplicated per (report, identity) pair, where the identity is
//! either an authenticated user or the anonymous request's IP address. The
//! two identity classes are independent dedup domains: the same person may
//! vote once authenticated and once anonymously, which is accepted.

use std::{collections::BTreeMap, net::IpAddr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who cast a vote — the dedup key for the matching ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum VoterIdentity {
  /// An authenticated user, keyed by user id.
  Identified(i64),
  /// An unauthenticated request, keyed by originating address.
  Anonymous(IpAddr),
}

/// A recorded vote. `vote_type` is an open string (e.g. "up" / "down").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
  pub id:         i64,
  pub crime_id:   i64,
  pub voter:      VoterIdentity,
  pub vote_type:  String,
  pub created_at: DateTime<Utc>,
}

/// Aggregated vote counts for one report, keyed by vote type and split by
/// identity class, plus the combined total.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoteTally {
  pub authenticated: BTreeMap<String, u64>,
  pub anonymous:     BTreeMap<String, u64>,
  pub total:         BTreeMap<String, u64>,
}

impl VoteTally {
  /// Combine the two per-ledger group-by results, summing into `total`.
  pub fn from_counts(
    authenticated: BTreeMap<String, u64>,
    anonymous: BTreeMap<String, u64>,
  ) -> Self {
    let mut total = authenticated.clone();
    for (vote_type, count) in &anonymous {
      *total.entry(vote_type.clone()).or_default() += count;
    }
    Self { authenticated, anonymous, total }
  }
}
