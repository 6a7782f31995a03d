//! Initial schema. Timestamps are Unix milliseconds.

pub(super) const SQL: &str = "
CREATE TABLE IF NOT EXISTS clients (
    client_id INTEGER PRIMARY KEY,
    name      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS parts (
    part_id     INTEGER PRIMARY KEY,
    part_code   TEXT NOT NULL,
    client_id   INTEGER,
    description TEXT
);

CREATE TABLE IF NOT EXISTS putaway_events (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    part_id     INTEGER NOT NULL,
    slot_code   TEXT NOT NULL,
    client_id   INTEGER,
    actor       TEXT NOT NULL DEFAULT '',
    occurred_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_putaway_events_part
    ON putaway_events (part_id, occurred_at);

CREATE TABLE IF NOT EXISTS locations (
    code       TEXT PRIMARY KEY,
    client_id  INTEGER,
    updated_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS part_patterns (
    part_id    INTEGER PRIMARY KEY,
    payload    TEXT NOT NULL,
    confidence REAL,
    strength   TEXT,
    rebuilt_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS audit_log (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    event_type  TEXT NOT NULL,
    part_id     INTEGER,
    payload     TEXT NOT NULL,
    recorded_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_audit_log_part ON audit_log (part_id);
";
