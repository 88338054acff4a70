//! [`SqliteStore`] — the SQLite implementation of [`CrimeStore`].

use std::{collections::BTreeMap, path::Path};

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use vigil_core::{
  moderation::{CrimeTypeCount, Flag, Hotspot, Location, NewFlag, Statistics},
  report::{NewReport, Report, ReportPatch},
  sos::{NewSosAlert, SosAlert},
  store::{CrimeStore, ReportFilter},
  subscription::{Subscription, SubscriptionInput},
  user::{NewUser, User, UserPatch},
  vote::{Vote, VoteTally, VoterIdentity},
};

use crate::{
  Error, Result,
  encode::{
    RawFlag, RawReport, RawSosAlert, RawSubscription, RawUser, decode_dt,
    encode_dt, encode_role,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A vigil store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All calls
/// run on the connection's dedicated thread, so the steps of a multi-step
/// method (pre-check then insert) cannot interleave with another request's.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// The insert raced a concurrent writer into the same uniqueness domain.
/// Foreign-key and NOT NULL violations are deliberately not matched; those
/// stay infrastructure errors.
fn is_unique_violation(err: &rusqlite::Error) -> bool {
  matches!(err, rusqlite::Error::SqliteFailure(e, _)
    if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE)
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn report_row(&self, id: i64) -> Result<Option<Report>> {
    let raw: Option<RawReport> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT crime_id, user_id, crime_type, description, latitude,
                      longitude, media_url, created_at, updated_at
               FROM crimes WHERE crime_id = ?1",
              rusqlite::params![id],
              |row| {
                Ok(RawReport {
                  crime_id:    row.get(0)?,
                  user_id:     row.get(1)?,
                  crime_type:  row.get(2)?,
                  description: row.get(3)?,
                  latitude:    row.get(4)?,
                  longitude:   row.get(5)?,
                  media_url:   row.get(6)?,
                  created_at:  row.get(7)?,
                  updated_at:  row.get(8)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawReport::into_report).transpose()
  }

  async fn user_row(&self, id: i64) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, fullname, username, email, role, password_hash,
                      created_at
               FROM users WHERE user_id = ?1",
              rusqlite::params![id],
              |row| {
                Ok(RawUser {
                  user_id:       row.get(0)?,
                  fullname:      row.get(1)?,
                  username:      row.get(2)?,
                  email:         row.get(3)?,
                  role:          row.get(4)?,
                  password_hash: row.get(5)?,
                  created_at:    row.get(6)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  /// Group one vote ledger by vote type.
  async fn count_ledger(&self, sql: &'static str, crime_id: i64) -> Result<BTreeMap<String, u64>> {
    let rows: Vec<(String, u64)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
          .query_map(rusqlite::params![crime_id], |row| {
            Ok((row.get(0)?, row.get(1)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(rows.into_iter().collect())
  }
}

// ─── CrimeStore impl ─────────────────────────────────────────────────────────

impl CrimeStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<Option<User>> {
    let created_at = Utc::now();
    let at_str     = encode_dt(created_at);
    let role_str   = encode_role(input.role).to_owned();

    let fullname      = input.fullname.clone();
    let username      = input.username.clone();
    let email         = input.email.clone();
    let password_hash = input.password_hash.clone();

    let id: Option<i64> = self
      .conn
      .call(move |conn| {
        // Pre-check covers the non-unique username half of the OR; the email
        // UNIQUE constraint remains the guard against racing inserts.
        let taken: bool = conn
          .query_row(
            "SELECT 1 FROM users WHERE email = ?1 OR username = ?2",
            rusqlite::params![email, username],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if taken {
          return Ok(None);
        }

        let inserted = conn.execute(
          "INSERT INTO users (fullname, username, email, role, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![fullname, username, email, role_str, password_hash, at_str],
        );

        match inserted {
          Ok(_) => Ok(Some(conn.last_insert_rowid())),
          Err(e) if is_unique_violation(&e) => Ok(None),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    Ok(id.map(|id| User {
      id,
      fullname: input.fullname,
      username: input.username,
      email: input.email,
      role: input.role,
      password_hash: input.password_hash,
      created_at,
    }))
  }

  async fn user_by_username<'a>(&'a self, username: &'a str) -> Result<Option<User>> {
    let username = username.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, fullname, username, email, role, password_hash,
                      created_at
               FROM users WHERE username = ?1
               ORDER BY user_id LIMIT 1",
              rusqlite::params![username],
              |row| {
                Ok(RawUser {
                  user_id:       row.get(0)?,
                  fullname:      row.get(1)?,
                  username:      row.get(2)?,
                  email:         row.get(3)?,
                  role:          row.get(4)?,
                  password_hash: row.get(5)?,
                  created_at:    row.get(6)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn update_user(&self, id: i64, patch: UserPatch) -> Result<Option<User>> {
    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE users
           SET fullname      = COALESCE(?2, fullname),
               username      = COALESCE(?3, username),
               password_hash = COALESCE(?4, password_hash)
           WHERE user_id = ?1",
          rusqlite::params![id, patch.fullname, patch.username, patch.password_hash],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.user_row(id).await
  }

  // ── Reports ───────────────────────────────────────────────────────────────

  async fn create_report(&self, input: NewReport) -> Result<Report> {
    let now    = Utc::now();
    let at_str = encode_dt(now);

    let crime_type  = input.crime_type.clone();
    let description = input.description.clone();
    let media_url   = input.media_url.clone();
    let (user_id, latitude, longitude) = (input.user_id, input.latitude, input.longitude);

    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO crimes (user_id, crime_type, description, latitude,
                               longitude, media_url, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
          rusqlite::params![
            user_id, crime_type, description, latitude, longitude, media_url, at_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Report {
      id,
      user_id:     input.user_id,
      crime_type:  input.crime_type,
      description: input.description,
      latitude:    input.latitude,
      longitude:   input.longitude,
      media_url:   input.media_url,
      created_at:  now,
      updated_at:  now,
    })
  }

  async fn report(&self, id: i64) -> Result<Option<Report>> {
    self.report_row(id).await
  }

  async fn list_reports<'a>(&'a self, filter: &'a ReportFilter) -> Result<Vec<Report>> {
    let crime_type = filter.crime_type.clone();

    let raws: Vec<RawReport> = self
      .conn
      .call(move |conn| {
        // LIKE is case-insensitive for ASCII, matching the original
        // surface's substring semantics.
        let sql = if crime_type.is_some() {
          "SELECT crime_id, user_id, crime_type, description, latitude,
                  longitude, media_url, created_at, updated_at
           FROM crimes WHERE crime_type LIKE '%' || ?1 || '%'
           ORDER BY crime_id"
        } else {
          "SELECT crime_id, user_id, crime_type, description, latitude,
                  longitude, media_url, created_at, updated_at
           FROM crimes
           ORDER BY crime_id"
        };

        let mut stmt = conn.prepare(sql)?;
        let map_row = |row: &rusqlite::Row<'_>| {
          Ok(RawReport {
            crime_id:    row.get(0)?,
            user_id:     row.get(1)?,
            crime_type:  row.get(2)?,
            description: row.get(3)?,
            latitude:    row.get(4)?,
            longitude:   row.get(5)?,
            media_url:   row.get(6)?,
            created_at:  row.get(7)?,
            updated_at:  row.get(8)?,
          })
        };

        let rows = if let Some(ct) = crime_type {
          stmt
            .query_map(rusqlite::params![ct], map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          stmt
            .query_map([], map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawReport::into_report).collect()
  }

  async fn update_report(&self, id: i64, patch: ReportPatch) -> Result<Option<Report>> {
    let at_str = encode_dt(Utc::now());

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE crimes
           SET crime_type  = COALESCE(?2, crime_type),
               description = COALESCE(?3, description),
               latitude    = COALESCE(?4, latitude),
               longitude   = COALESCE(?5, longitude),
               media_url   = COALESCE(?6, media_url),
               updated_at  = ?7
           WHERE crime_id = ?1",
          rusqlite::params![
            id,
            patch.crime_type,
            patch.description,
            patch.latitude,
            patch.longitude,
            patch.media_url,
            at_str,
          ],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.report_row(id).await
  }

  async fn delete_report(&self, id: i64) -> Result<bool> {
    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM crimes WHERE crime_id = ?1",
          rusqlite::params![id],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  // ── Votes ─────────────────────────────────────────────────────────────────

  async fn cast_vote<'a>(
    &'a self,
    crime_id: i64,
    voter: VoterIdentity,
    vote_type: &'a str,
  ) -> Result<Option<Vote>> {
    let created_at = Utc::now();
    let at_str     = encode_dt(created_at);
    let vt         = vote_type.to_owned();

    let id: Option<i64> = self
      .conn
      .call(move |conn| {
        let (check_sql, insert_sql, identity) = match voter {
          VoterIdentity::Identified(user_id) => (
            "SELECT vote_id FROM votes WHERE crime_id = ?1 AND user_id = ?2",
            "INSERT INTO votes (crime_id, user_id, vote_type, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            user_id.to_string(),
          ),
          VoterIdentity::Anonymous(ip) => (
            "SELECT vote_id FROM anonymous_votes WHERE crime_id = ?1 AND ip_address = ?2",
            "INSERT INTO anonymous_votes (crime_id, ip_address, vote_type, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            ip.to_string(),
          ),
        };

        let existing: Option<i64> = conn
          .query_row(check_sql, rusqlite::params![crime_id, identity], |row| {
            row.get(0)
          })
          .optional()?;

        if existing.is_some() {
          return Ok(None);
        }

        // The UNIQUE constraint, not the pre-check above, is what holds
        // under a race; a violation here means "already voted" too.
        let inserted =
          conn.execute(insert_sql, rusqlite::params![crime_id, identity, vt, at_str]);

        match inserted {
          Ok(_) => Ok(Some(conn.last_insert_rowid())),
          Err(e) if is_unique_violation(&e) => Ok(None),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    Ok(id.map(|id| Vote {
      id,
      crime_id,
      voter,
      vote_type: vote_type.to_owned(),
      created_at,
    }))
  }

  async fn tally(&self, crime_id: i64) -> Result<VoteTally> {
    let authenticated = self
      .count_ledger(
        "SELECT vote_type, COUNT(vote_id) FROM votes
         WHERE crime_id = ?1 GROUP BY vote_type",
        crime_id,
      )
      .await?;

    let anonymous = self
      .count_ledger(
        "SELECT vote_type, COUNT(vote_id) FROM anonymous_votes
         WHERE crime_id = ?1 GROUP BY vote_type",
        crime_id,
      )
      .await?;

    Ok(VoteTally::from_counts(authenticated, anonymous))
  }

  // ── Subscriptions ─────────────────────────────────────────────────────────

  async fn upsert_subscription(
    &self,
    user_id: i64,
    input: SubscriptionInput,
  ) -> Result<Subscription> {
    let now    = Utc::now();
    let at_str = encode_dt(now);

    let (latitude, longitude, radius) = (input.latitude, input.longitude, input.radius);
    let requested_active = input.is_active;

    // Read-modify-write in one call closure: serialised on the connection
    // thread, with UNIQUE(user_id) backstopping any other writer.
    let (id, is_active, created_at_str): (i64, bool, String) = self
      .conn
      .call(move |conn| {
        let existing: Option<(i64, bool, String)> = conn
          .query_row(
            "SELECT id, is_active, created_at FROM subscriptions WHERE user_id = ?1",
            rusqlite::params![user_id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
          )
          .optional()?;

        match existing {
          Some((id, prev_active, created_at)) => {
            // Overwrite in place, retaining the prior active flag when the
            // new value is unspecified.
            let active = requested_active.unwrap_or(prev_active);
            conn.execute(
              "UPDATE subscriptions
               SET latitude = ?2, longitude = ?3, radius = ?4, is_active = ?5
               WHERE id = ?1",
              rusqlite::params![id, latitude, longitude, radius, active],
            )?;
            Ok((id, active, created_at))
          }
          None => {
            let active = requested_active.unwrap_or(true);
            conn.execute(
              "INSERT INTO subscriptions (user_id, latitude, longitude, radius,
                                          is_active, created_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
              rusqlite::params![user_id, latitude, longitude, radius, active, at_str],
            )?;
            Ok((conn.last_insert_rowid(), active, at_str))
          }
        }
      })
      .await?;

    Ok(Subscription {
      id,
      user_id,
      latitude:   input.latitude,
      longitude:  input.longitude,
      radius:     input.radius,
      is_active,
      created_at: decode_dt(&created_at_str)?,
    })
  }

  async fn subscription_for_user(&self, user_id: i64) -> Result<Option<Subscription>> {
    let raw: Option<RawSubscription> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, user_id, latitude, longitude, radius, is_active,
                      created_at
               FROM subscriptions WHERE user_id = ?1",
              rusqlite::params![user_id],
              |row| {
                Ok(RawSubscription {
                  id:         row.get(0)?,
                  user_id:    row.get(1)?,
                  latitude:   row.get(2)?,
                  longitude:  row.get(3)?,
                  radius:     row.get(4)?,
                  is_active:  row.get(5)?,
                  created_at: row.get(6)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSubscription::into_subscription).transpose()
  }

  // ── SOS ───────────────────────────────────────────────────────────────────

  async fn create_sos_alert(&self, input: NewSosAlert) -> Result<SosAlert> {
    let created_at = Utc::now();
    let at_str     = encode_dt(created_at);

    let message = input.message.clone();
    let (user_id, latitude, longitude) = (input.user_id, input.latitude, input.longitude);

    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sos_alerts (user_id, message, latitude, longitude, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![user_id, message, latitude, longitude, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(SosAlert {
      id,
      user_id:    input.user_id,
      message:    input.message,
      latitude:   input.latitude,
      longitude:  input.longitude,
      created_at,
    })
  }

  async fn list_sos_alerts(&self) -> Result<Vec<SosAlert>> {
    let raws: Vec<RawSosAlert> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT sos_id, user_id, message, latitude, longitude, created_at
           FROM sos_alerts ORDER BY sos_id DESC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawSosAlert {
              sos_id:     row.get(0)?,
              user_id:    row.get(1)?,
              message:    row.get(2)?,
              latitude:   row.get(3)?,
              longitude:  row.get(4)?,
              created_at: row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSosAlert::into_alert).collect()
  }

  // ── Moderation ────────────────────────────────────────────────────────────

  async fn flag_report(&self, input: NewFlag) -> Result<Option<Flag>> {
    let created_at = Utc::now();
    let at_str     = encode_dt(created_at);
    let reason     = input.reason.clone();

    let id: Option<i64> = self
      .conn
      .call(move |conn| {
        let exists: bool = conn
          .query_row(
            "SELECT 1 FROM crimes WHERE crime_id = ?1",
            rusqlite::params![input.crime_id],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if !exists {
          return Ok(None);
        }

        conn.execute(
          "INSERT INTO flags (crime_id, flagged_by, reason, is_flagged, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            input.crime_id, input.flagged_by, reason, input.is_flagged, at_str,
          ],
        )?;
        Ok(Some(conn.last_insert_rowid()))
      })
      .await?;

    Ok(id.map(|id| Flag {
      id,
      crime_id:   input.crime_id,
      flagged_by: input.flagged_by,
      reason:     input.reason,
      is_flagged: input.is_flagged,
      created_at,
    }))
  }

  async fn flagged_reports(&self) -> Result<Vec<Flag>> {
    let raws: Vec<RawFlag> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT flag_id, crime_id, flagged_by, reason, is_flagged, created_at
           FROM flags ORDER BY flag_id",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawFlag {
              flag_id:    row.get(0)?,
              crime_id:   row.get(1)?,
              flagged_by: row.get(2)?,
              reason:     row.get(3)?,
              is_flagged: row.get(4)?,
              created_at: row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawFlag::into_flag).collect()
  }

  async fn statistics(&self) -> Result<Statistics> {
    self
      .conn
      .call(|conn| {
        let total_reports: u64 =
          conn.query_row("SELECT COUNT(crime_id) FROM crimes", [], |row| row.get(0))?;

        // Ties broken by the grouped column for a stable top five.
        let mut stmt = conn.prepare(
          "SELECT crime_type, COUNT(crime_id) AS n FROM crimes
           GROUP BY crime_type
           ORDER BY n DESC, crime_type ASC
           LIMIT 5",
        )?;
        let top_crime_types = stmt
          .query_map([], |row| {
            Ok(CrimeTypeCount { crime_type: row.get(0)?, count: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        // Exact-coordinate grouping, not spatial clustering.
        let mut stmt = conn.prepare(
          "SELECT latitude, longitude, COUNT(crime_id) AS n FROM crimes
           GROUP BY latitude, longitude
           ORDER BY n DESC, latitude ASC, longitude ASC
           LIMIT 5",
        )?;
        let hotspots = stmt
          .query_map([], |row| {
            Ok(Hotspot {
              location:    Location { latitude: row.get(0)?, longitude: row.get(1)? },
              crime_count: row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Statistics { total_reports, top_crime_types, hotspots })
      })
      .await
      .map_err(Error::from)
  }
}
