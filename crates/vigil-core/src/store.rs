//! The `CrimeStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `vigil-store-sqlite`).
//! The HTTP layer depends on this abstraction, not on any concrete backend.
//!
//! Domain outcomes (entity absent, vote already cast, identity taken) are
//! encoded in the `Ok` type so callers can branch on them without knowing the
//! backend's error type; `Self::Error` is reserved for infrastructure
//! failures.

use std::future::Future;

use crate::{
  moderation::{Flag, NewFlag, Statistics},
  report::{NewReport, Report, ReportPatch},
  sos::{NewSosAlert, SosAlert},
  subscription::{Subscription, SubscriptionInput},
  user::{NewUser, User, UserPatch},
  vote::{Vote, VoteTally, VoterIdentity},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`CrimeStore::list_reports`].
///
/// Deliberately carries only the attribute filter: radius filtering happens
/// in memory over the returned candidates, so a spatial pre-filter can later
/// move behind this interface without changing the distance utility.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
  /// Case-insensitive substring match on the crime type.
  pub crime_type: Option<String>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a vigil storage backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait CrimeStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Create an account. Returns `None` if the email or username is already
  /// taken (checked as an OR, backed by the email uniqueness constraint).
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Resolve a username to an account. Returns `None` if no such user.
  fn user_by_username<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Apply a partial profile update. Returns the updated account, or `None`
  /// if the user id does not exist.
  fn update_user(
    &self,
    id: i64,
    patch: UserPatch,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  // ── Reports ───────────────────────────────────────────────────────────

  fn create_report(
    &self,
    input: NewReport,
  ) -> impl Future<Output = Result<Report, Self::Error>> + Send + '_;

  /// Retrieve a report by id. Returns `None` if not found.
  fn report(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Report>, Self::Error>> + Send + '_;

  /// List reports matching `filter`, oldest first.
  fn list_reports<'a>(
    &'a self,
    filter: &'a ReportFilter,
  ) -> impl Future<Output = Result<Vec<Report>, Self::Error>> + Send + 'a;

  /// Apply a partial update and refresh `updated_at`. Returns `None` if the
  /// report does not exist. Ownership is the caller's concern.
  fn update_report(
    &self,
    id: i64,
    patch: ReportPatch,
  ) -> impl Future<Output = Result<Option<Report>, Self::Error>> + Send + '_;

  /// Delete a report, cascading to its votes and flags. Returns `false` if
  /// the report did not exist.
  fn delete_report(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Votes ─────────────────────────────────────────────────────────────

  /// Record a vote for `(crime_id, voter)` in the ledger matching the
  /// identity class. Returns `None` if that pair has already voted — both
  /// when the pre-check finds an existing row and when the uniqueness
  /// constraint rejects a racing insert.
  fn cast_vote<'a>(
    &'a self,
    crime_id: i64,
    voter: VoterIdentity,
    vote_type: &'a str,
  ) -> impl Future<Output = Result<Option<Vote>, Self::Error>> + Send + 'a;

  /// Aggregate both ledgers for a report. A report with no votes (or an
  /// unknown report id) yields empty maps, not an error.
  fn tally(
    &self,
    crime_id: i64,
  ) -> impl Future<Output = Result<VoteTally, Self::Error>> + Send + '_;

  // ── Subscriptions ─────────────────────────────────────────────────────

  /// Create or update the user's single subscription. Input bounds are the
  /// caller's concern; the one-row-per-user invariant is this method's.
  fn upsert_subscription(
    &self,
    user_id: i64,
    input: SubscriptionInput,
  ) -> impl Future<Output = Result<Subscription, Self::Error>> + Send + '_;

  fn subscription_for_user(
    &self,
    user_id: i64,
  ) -> impl Future<Output = Result<Option<Subscription>, Self::Error>> + Send + '_;

  // ── SOS ───────────────────────────────────────────────────────────────

  fn create_sos_alert(
    &self,
    input: NewSosAlert,
  ) -> impl Future<Output = Result<SosAlert, Self::Error>> + Send + '_;

  /// All alerts, newest first.
  fn list_sos_alerts(
    &self,
  ) -> impl Future<Output = Result<Vec<SosAlert>, Self::Error>> + Send + '_;

  // ── Moderation ────────────────────────────────────────────────────────

  /// Record a flag. Returns `None` if the report does not exist.
  fn flag_report(
    &self,
    input: NewFlag,
  ) -> impl Future<Output = Result<Option<Flag>, Self::Error>> + Send + '_;

  fn flagged_reports(
    &self,
  ) -> impl Future<Output = Result<Vec<Flag>, Self::Error>> + Send + '_;

  /// Aggregate counts for the admin dashboard.
  fn statistics(
    &self,
  ) -> impl Future<Output = Result<Statistics, Self::Error>> + Send + '_;
}
