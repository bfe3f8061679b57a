//! Database schema for the document store.

pub const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS status_checks (
    id          TEXT PRIMARY KEY,
    client_name TEXT NOT NULL,
    timestamp   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS therapy_analyses (
    id         TEXT PRIMARY KEY,
    doc        TEXT NOT NULL,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_analyses_created
    ON therapy_analyses (created_at DESC);

CREATE TABLE IF NOT EXISTS patient_flow_funnels (
    id          TEXT PRIMARY KEY,
    analysis_id TEXT NOT NULL,
    doc         TEXT NOT NULL,
    created_at  INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_funnels_analysis
    ON patient_flow_funnels (analysis_id);
";
