//! SQL schema for the Stackr SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! layout. Version 2 replaced the plain email index with a unique one.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS creators (
    creator_id    TEXT PRIMARY KEY,      -- CR-xxxxxx
    name          TEXT NOT NULL,
    username      TEXT NOT NULL UNIQUE,
    avatar        TEXT NOT NULL,
    expertise     TEXT NOT NULL,
    bio           TEXT NOT NULL,
    github        TEXT,
    twitter       TEXT,
    subject       TEXT NOT NULL UNIQUE,  -- identity provider `sub`
    email         TEXT NOT NULL,
    identity_json TEXT NOT NULL,         -- full verified identity payload
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL
);

-- No uniqueness: the registry accepts duplicates.
CREATE TABLE IF NOT EXISTS technologies (
    seq         INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    category    TEXT NOT NULL,
    tag         TEXT NOT NULL DEFAULT '',
    website     TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT ''
);

-- One row per stack document. `seq` gives listings a stable natural order.
-- `creator_id` duplicates the id inside `creator_json` for filtering.
CREATE TABLE IF NOT EXISTS stacks (
    seq               INTEGER PRIMARY KEY AUTOINCREMENT,
    stack_id          TEXT NOT NULL UNIQUE,   -- SR-xxxxxx
    title             TEXT NOT NULL,
    description       TEXT NOT NULL,
    category          TEXT NOT NULL,          -- programming | design | marketing | business
    technologies_json TEXT NOT NULL DEFAULT '[]',
    tags_json         TEXT NOT NULL DEFAULT '[]',
    creator_id        TEXT NOT NULL,
    creator_json      TEXT NOT NULL,          -- frozen creator snapshot
    reviews_json      TEXT NOT NULL DEFAULT '[]',  -- append-only review log
    rating            REAL NOT NULL DEFAULT 0,
    created_at        TEXT NOT NULL,
    updated_at        TEXT NOT NULL
);

-- Empty emails are allowed on any number of creators.
DROP INDEX IF EXISTS creators_email_idx;
CREATE UNIQUE INDEX IF NOT EXISTS creators_email_uq ON creators(email) WHERE email <> '';
CREATE INDEX IF NOT EXISTS stacks_category_idx  ON stacks(category);
CREATE INDEX IF NOT EXISTS stacks_creator_idx   ON stacks(creator_id);
CREATE INDEX IF NOT EXISTS stacks_rating_idx    ON stacks(rating);

PRAGMA user_version = 2;
";
