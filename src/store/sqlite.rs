use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::Store;
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn template_from_row(row: &Row<'_>) -> rusqlite::Result<Template> {
    Ok(Template {
        id: row.get(0)?,
        name: row.get(1)?,
        content: row.get(2)?,
        created_at: parse_datetime(&row.get::<_, String>(3)?),
        last_changed: parse_datetime(&row.get::<_, String>(4)?),
    })
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    fn is_initialized(&self) -> Result<bool> {
        let conn = self.conn();
        let count: i32 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'templates'",
            [],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    // Site operations

    fn create_site(&self, site: &Site) -> Result<()> {
        let result = self.conn().execute(
            "INSERT INTO sites (id, domain, name) VALUES (?1, ?2, ?3)",
            params![site.id, site.domain, site.name],
        );

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_constraint_violation(&e) => Err(Error::AlreadyExists),
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_site(&self, id: i64) -> Result<Option<Site>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, domain, name FROM sites WHERE id = ?1",
            params![id],
            |row| {
                Ok(Site {
                    id: row.get(0)?,
                    domain: row.get(1)?,
                    name: row.get(2)?,
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    // Template operations

    fn create_template(&self, template: &NewTemplate, site_id: i64) -> Result<Template> {
        let now = Utc::now();
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let inserted = tx.execute(
            "INSERT INTO templates (name, content, created_at, last_changed)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                template.name,
                template.content,
                format_datetime(&now),
                format_datetime(&now),
            ],
        );
        match inserted {
            Ok(_) => {}
            Err(e) if is_constraint_violation(&e) => return Err(Error::AlreadyExists),
            Err(e) => return Err(Error::from(e)),
        }
        let id = tx.last_insert_rowid();

        tx.execute(
            "INSERT OR IGNORE INTO template_sites (template_id, site_id) VALUES (?1, ?2)",
            params![id, site_id],
        )?;

        tx.commit()?;

        Ok(Template {
            id,
            name: template.name.clone(),
            content: template.content.clone(),
            created_at: now,
            last_changed: now,
        })
    }

    fn find_by_name(&self, name: &str, site_id: i64) -> Result<Option<Template>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT t.id, t.name, t.content, t.created_at, t.last_changed
             FROM templates t
             JOIN template_sites ts ON ts.template_id = t.id
             WHERE t.name = ?1 AND ts.site_id = ?2",
            params![name, site_id],
            template_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn update_template(&self, template: &Template, site_id: i64) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let rows = tx.execute(
            "UPDATE templates SET name = ?1, content = ?2, last_changed = ?3 WHERE id = ?4",
            params![
                template.name,
                template.content,
                format_datetime(&template.last_changed),
                template.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }

        tx.execute(
            "INSERT OR IGNORE INTO template_sites (template_id, site_id) VALUES (?1, ?2)",
            params![template.id, site_id],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn delete_template(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM templates WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn list_templates(&self, site_id: i64) -> Result<Vec<Template>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT t.id, t.name, t.content, t.created_at, t.last_changed
             FROM templates t
             JOIN template_sites ts ON ts.template_id = t.id
             WHERE ts.site_id = ?1
             ORDER BY t.name",
        )?;

        let rows = stmt.query_map(params![site_id], template_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_unmatched(&self, handled: &[String], extension: &str) -> Result<Vec<Template>> {
        let handled: HashSet<&str> = handled.iter().map(String::as_str).collect();

        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, name, content, created_at, last_changed FROM templates ORDER BY name",
        )?;

        let rows = stmt.query_map([], template_from_row)?;

        let mut unmatched = Vec::new();
        for row in rows {
            let template = row?;
            if template.name.ends_with(extension) && !handled.contains(template.name.as_str()) {
                unmatched.push(template);
            }
        }
        Ok(unmatched)
    }

    // Template-Site M2M operations

    fn list_template_sites(&self, template_id: i64) -> Result<Vec<Site>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT s.id, s.domain, s.name FROM sites s
             JOIN template_sites ts ON ts.site_id = s.id
             WHERE ts.template_id = ?1
             ORDER BY s.id",
        )?;

        let rows = stmt.query_map(params![template_id], |row| {
            Ok(Site {
                id: row.get(0)?,
                domain: row.get(1)?,
                name: row.get(2)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, SqliteStore) {
        let temp = TempDir::new().unwrap();
        let store = SqliteStore::new(temp.path().join("test.db")).unwrap();
        store.initialize().unwrap();
        store
            .create_site(&Site {
                id: 1,
                domain: "example.com".to_string(),
                name: "example.com".to_string(),
            })
            .unwrap();
        (temp, store)
    }

    fn new_template(name: &str, content: &str) -> NewTemplate {
        NewTemplate {
            name: name.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_initialize_creates_tables() {
        let temp = TempDir::new().unwrap();
        let store = SqliteStore::new(temp.path().join("test.db")).unwrap();
        assert!(!store.is_initialized().unwrap());
        store.initialize().unwrap();
        assert!(store.is_initialized().unwrap());

        let conn = store.conn();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();

        assert!(tables.contains(&"sites".to_string()));
        assert!(tables.contains(&"templates".to_string()));
        assert!(tables.contains(&"template_sites".to_string()));
    }

    #[test]
    fn test_template_crud() {
        let (_temp, store) = setup();

        let created = store
            .create_template(&new_template("base.html", "<html></html>"), 1)
            .unwrap();

        let fetched = store.find_by_name("base.html", 1).unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.content, "<html></html>");

        let sites = store.list_template_sites(created.id).unwrap();
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].domain, "example.com");

        let mut updated = fetched.clone();
        updated.content = "<html>new</html>".to_string();
        updated.last_changed = Utc::now();
        store.update_template(&updated, 1).unwrap();
        assert_eq!(
            store.find_by_name("base.html", 1).unwrap().unwrap().content,
            "<html>new</html>"
        );

        assert!(store.delete_template(created.id).unwrap());
        assert!(store.find_by_name("base.html", 1).unwrap().is_none());
        assert!(store.list_template_sites(created.id).unwrap().is_empty());
        assert!(!store.delete_template(created.id).unwrap());
    }

    #[test]
    fn test_find_by_name_is_site_scoped() {
        let (_temp, store) = setup();
        store
            .create_site(&Site {
                id: 2,
                domain: "other.example.com".to_string(),
                name: "other".to_string(),
            })
            .unwrap();

        store
            .create_template(&new_template("base.html", "x"), 2)
            .unwrap();

        assert!(store.find_by_name("base.html", 1).unwrap().is_none());
        assert!(store.find_by_name("base.html", 2).unwrap().is_some());
    }

    #[test]
    fn test_update_adds_site_association() {
        let (_temp, store) = setup();
        store
            .create_site(&Site {
                id: 2,
                domain: "other.example.com".to_string(),
                name: "other".to_string(),
            })
            .unwrap();

        let tpl = store
            .create_template(&new_template("base.html", "x"), 1)
            .unwrap();
        store.update_template(&tpl, 2).unwrap();
        // Updating twice must not duplicate the association
        store.update_template(&tpl, 2).unwrap();

        let site_ids: Vec<i64> = store
            .list_template_sites(tpl.id)
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(site_ids, vec![1, 2]);
    }

    #[test]
    fn test_update_missing_template() {
        let (_temp, store) = setup();
        let tpl = Template {
            id: 42,
            name: "gone.html".to_string(),
            content: String::new(),
            created_at: Utc::now(),
            last_changed: Utc::now(),
        };
        assert!(matches!(store.update_template(&tpl, 1), Err(Error::NotFound)));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let (_temp, store) = setup();
        store
            .create_template(&new_template("base.html", "a"), 1)
            .unwrap();

        let result = store.create_template(&new_template("base.html", "b"), 1);
        assert!(matches!(result, Err(Error::AlreadyExists)));
    }

    #[test]
    fn test_duplicate_site_rejected() {
        let (_temp, store) = setup();
        let result = store.create_site(&Site {
            id: 1,
            domain: "again.example.com".to_string(),
            name: "again".to_string(),
        });
        assert!(matches!(result, Err(Error::AlreadyExists)));
    }

    #[test]
    fn test_list_unmatched_spans_all_sites() {
        let (_temp, store) = setup();
        store
            .create_site(&Site {
                id: 2,
                domain: "other.example.com".to_string(),
                name: "other".to_string(),
            })
            .unwrap();
        store
            .create_template(&new_template("home.html", "1"), 1)
            .unwrap();
        store
            .create_template(&new_template("other.html", "2"), 2)
            .unwrap();

        let names: Vec<String> = store
            .list_unmatched(&["home.html".to_string()], ".html")
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["other.html"]);
    }

    #[test]
    fn test_list_unmatched_filters_handled_and_extension() {
        let (_temp, store) = setup();
        for name in ["a.html", "b.html", "c.txt", "nested/d.html"] {
            store.create_template(&new_template(name, name), 1).unwrap();
        }

        let unmatched = store
            .list_unmatched(&["a.html".to_string()], ".html")
            .unwrap();
        let names: Vec<&str> = unmatched.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["b.html", "nested/d.html"]);
    }
}
