mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Store defines the template database interface.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;
    fn is_initialized(&self) -> Result<bool>;

    // Site operations
    fn create_site(&self, site: &Site) -> Result<()>;
    fn get_site(&self, id: i64) -> Result<Option<Site>>;

    // Template operations, scoped to a site where a site id is taken
    fn create_template(&self, template: &NewTemplate, site_id: i64) -> Result<Template>;
    fn find_by_name(&self, name: &str, site_id: i64) -> Result<Option<Template>>;
    fn update_template(&self, template: &Template, site_id: i64) -> Result<()>;
    fn delete_template(&self, id: i64) -> Result<bool>;
    fn list_templates(&self, site_id: i64) -> Result<Vec<Template>>;

    /// Templates on any site whose name ends with `extension` and is not in `handled`.
    fn list_unmatched(&self, handled: &[String], extension: &str) -> Result<Vec<Template>>;

    // Template-Site M2M operations
    fn list_template_sites(&self, template_id: i64) -> Result<Vec<Site>>;
}
