pub const SCHEMA: &str = r#"
-- Sites scope which templates a run considers
CREATE TABLE IF NOT EXISTS sites (
    id INTEGER PRIMARY KEY,
    domain TEXT NOT NULL,
    name TEXT NOT NULL
);

-- Templates are keyed by their logical name (path relative to a template directory)
CREATE TABLE IF NOT EXISTS templates (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    content TEXT NOT NULL DEFAULT '',
    created_at TEXT DEFAULT (datetime('now')),
    last_changed TEXT DEFAULT (datetime('now'))
);

-- Many-to-many relationship between templates and sites
CREATE TABLE IF NOT EXISTS template_sites (
    template_id INTEGER REFERENCES templates(id) ON DELETE CASCADE,
    site_id INTEGER REFERENCES sites(id) ON DELETE CASCADE,
    PRIMARY KEY (template_id, site_id)
);

CREATE INDEX IF NOT EXISTS idx_template_sites_site ON template_sites(site_id);
"#;
