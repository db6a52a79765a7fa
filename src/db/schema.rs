pub const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS alerts (
    id TEXT PRIMARY KEY,
    time TEXT NOT NULL,
    file_name TEXT NOT NULL,
    server_ip TEXT NOT NULL,
    risk INTEGER NOT NULL DEFAULT 0,
    verdict TEXT NOT NULL DEFAULT 'Unknown',
    process_status TEXT NOT NULL DEFAULT 'pending',
    exception TEXT NOT NULL DEFAULT 'none',
    memo TEXT,
    processed_by TEXT,
    processed_at TEXT
);

CREATE TABLE IF NOT EXISTS file_policies (
    alert_id TEXT PRIMARY KEY REFERENCES alerts(id) ON DELETE CASCADE,
    policy TEXT NOT NULL,
    list_status TEXT NOT NULL DEFAULT 'enabled',
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS servers (
    id TEXT PRIMARY KEY,
    server_ip TEXT NOT NULL,
    hostname TEXT NOT NULL,
    cluster TEXT,
    manager TEXT
);

CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_alerts_status ON alerts(process_status);
CREATE INDEX IF NOT EXISTS idx_alerts_time ON alerts(time);
CREATE INDEX IF NOT EXISTS idx_file_policies_policy ON file_policies(policy);
";
