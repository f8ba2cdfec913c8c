//! SQL schema for the INE SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- One row per canonical date; month and quarter are mutually exclusive.
CREATE TABLE IF NOT EXISTS periods (
    period_id      INTEGER PRIMARY KEY,
    year           INTEGER NOT NULL,
    month          INTEGER,            -- NULL unless monthly
    quarter        INTEGER,            -- 1..4; NULL unless quarterly
    canonical_date TEXT    NOT NULL UNIQUE,  -- YYYY-MM-01
    CHECK (month IS NULL OR quarter IS NULL)
);

CREATE TABLE IF NOT EXISTS geographies (
    geography_id INTEGER PRIMARY KEY,
    name         TEXT    NOT NULL UNIQUE CHECK (length(trim(name)) > 0)
);

CREATE TABLE IF NOT EXISTS indicators (
    indicator_id INTEGER PRIMARY KEY,
    name         TEXT    NOT NULL UNIQUE CHECK (length(trim(name)) > 0),
    unit         TEXT
);

-- Fact tables are write-once: rows are inserted with INSERT OR IGNORE and
-- never updated. Optional attributes hold 'N/A' instead of NULL so that the
-- UNIQUE keys deduplicate.
CREATE TABLE IF NOT EXISTS price_facts (
    price_fact_id INTEGER PRIMARY KEY,
    period_id     INTEGER NOT NULL REFERENCES periods(period_id),
    indicator_id  INTEGER NOT NULL REFERENCES indicators(indicator_id),
    geography_id  INTEGER NOT NULL REFERENCES geographies(geography_id),
    category      TEXT    NOT NULL,
    value         REAL    NOT NULL,
    UNIQUE (period_id, indicator_id, geography_id, category)
);

CREATE TABLE IF NOT EXISTS wage_facts (
    wage_fact_id  INTEGER PRIMARY KEY,
    period_id     INTEGER NOT NULL REFERENCES periods(period_id),
    indicator_id  INTEGER NOT NULL REFERENCES indicators(indicator_id),
    geography_id  INTEGER NOT NULL REFERENCES geographies(geography_id),
    sex           TEXT    NOT NULL,
    sector        TEXT    NOT NULL,
    occupation    TEXT    NOT NULL,
    value         REAL    NOT NULL,
    UNIQUE (period_id, indicator_id, geography_id, sex, sector, occupation)
);

CREATE TABLE IF NOT EXISTS employment_facts (
    employment_fact_id INTEGER PRIMARY KEY,
    period_id          INTEGER NOT NULL REFERENCES periods(period_id),
    indicator_id       INTEGER NOT NULL REFERENCES indicators(indicator_id),
    geography_id       INTEGER NOT NULL REFERENCES geographies(geography_id),
    sex                TEXT    NOT NULL,
    age_group          TEXT    NOT NULL,
    working_time       TEXT    NOT NULL,
    contract_type      TEXT    NOT NULL,
    value              REAL    NOT NULL,
    UNIQUE (period_id, indicator_id, geography_id, sex,
            age_group, working_time, contract_type)
);

CREATE INDEX IF NOT EXISTS price_facts_period_idx      ON price_facts(period_id);
CREATE INDEX IF NOT EXISTS wage_facts_period_idx       ON wage_facts(period_id);
CREATE INDEX IF NOT EXISTS employment_facts_period_idx ON employment_facts(period_id);

PRAGMA user_version = 1;
";
