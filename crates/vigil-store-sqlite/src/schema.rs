//! SQL schema for the vigil SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.
//!
//! The UNIQUE constraints on `users.email`, `votes`, `anonymous_votes`, and
//! `subscriptions.user_id` are the authoritative guards for the matching
//! business invariants; application-level pre-checks are optimisations only.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       INTEGER PRIMARY KEY AUTOINCREMENT,
    fullname      TEXT NOT NULL,
    username      TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE,
    role          TEXT NOT NULL,   -- 'user' | 'admin'
    password_hash TEXT NOT NULL,   -- argon2 PHC string
    created_at    TEXT NOT NULL    -- ISO 8601 UTC; server-assigned
);

CREATE TABLE IF NOT EXISTS crimes (
    crime_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL REFERENCES users(user_id),
    crime_type  TEXT NOT NULL,
    description TEXT NOT NULL,
    latitude    REAL NOT NULL,
    longitude   REAL NOT NULL,
    media_url   TEXT,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

-- One vote per (report, user). Deleting a report takes its votes with it.
CREATE TABLE IF NOT EXISTS votes (
    vote_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    crime_id   INTEGER NOT NULL REFERENCES crimes(crime_id) ON DELETE CASCADE,
    user_id    INTEGER NOT NULL REFERENCES users(user_id),
    vote_type  TEXT NOT NULL,
    created_at TEXT NOT NULL,
    UNIQUE (crime_id, user_id)
);

-- One vote per (report, address); a dedup domain independent of `votes`.
CREATE TABLE IF NOT EXISTS anonymous_votes (
    vote_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    crime_id   INTEGER NOT NULL REFERENCES crimes(crime_id) ON DELETE CASCADE,
    ip_address TEXT NOT NULL,
    vote_type  TEXT NOT NULL,
    created_at TEXT NOT NULL,
    UNIQUE (crime_id, ip_address)
);

-- One subscription per user; upserts overwrite the row in place.
CREATE TABLE IF NOT EXISTS subscriptions (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id    INTEGER NOT NULL UNIQUE REFERENCES users(user_id),
    latitude   REAL NOT NULL,
    longitude  REAL NOT NULL,
    radius     REAL NOT NULL,   -- kilometres
    is_active  INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS flags (
    flag_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    crime_id   INTEGER NOT NULL REFERENCES crimes(crime_id) ON DELETE CASCADE,
    flagged_by INTEGER NOT NULL REFERENCES users(user_id),
    reason     TEXT NOT NULL DEFAULT 'No reason provided',
    is_flagged INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sos_alerts (
    sos_id     INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id    INTEGER REFERENCES users(user_id),   -- NULL for anonymous
    message    TEXT NOT NULL,
    latitude   REAL NOT NULL,
    longitude  REAL NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS crimes_user_idx          ON crimes(user_id);
CREATE INDEX IF NOT EXISTS crimes_type_idx          ON crimes(crime_type);
CREATE INDEX IF NOT EXISTS votes_crime_idx          ON votes(crime_id);
CREATE INDEX IF NOT EXISTS anonymous_votes_crime_idx ON anonymous_votes(crime_id);
CREATE INDEX IF NOT EXISTS flags_crime_idx          ON flags(crime_id);

PRAGMA user_version = 1;
";
