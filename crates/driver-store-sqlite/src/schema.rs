//! SQL schema for the driver SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// `seq` fixes the natural order of `find_all` and is the keyset for its
/// paging. The record itself lives in `body` as JSON; `id`, `email` and `nachname`
/// are copied out for lookups.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS drivers (
    seq       INTEGER PRIMARY KEY AUTOINCREMENT,
    id        TEXT NOT NULL UNIQUE,
    email     TEXT NOT NULL,
    nachname  TEXT NOT NULL,
    body      TEXT NOT NULL    -- JSON-encoded Driver
);

CREATE INDEX IF NOT EXISTS drivers_email_idx    ON drivers(email);
CREATE INDEX IF NOT EXISTS drivers_nachname_idx ON drivers(nachname);

PRAGMA user_version = 1;
";
