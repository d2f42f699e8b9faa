//! SQL schema for the Moodmap store.

/// Schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
CREATE EXTENSION IF NOT EXISTS postgis;

CREATE TABLE IF NOT EXISTS moods (
    id          SERIAL PRIMARY KEY,
    location    geometry(Point, 4326) NOT NULL,
    rating      SMALLINT NOT NULL CHECK (rating BETWEEN 1 AND 5),
    description VARCHAR(75),
    submitter   TEXT,
    -- now() is fixed per transaction, so both stamps match on insert.
    created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
    edited_at   TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

/// Maintenance only: removes every stored mood.
pub const DROP_SCHEMA: &str = "DROP TABLE IF EXISTS moods";
