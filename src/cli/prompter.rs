use std::io::{self, Write};
use std::path::Path;

use inquire::{Confirm, Text};

use crate::error::{Error, Result};
use crate::sync::Prompter;
use crate::types::Template;

/// Asks the operator on the terminal. Everything it prints goes to stderr,
/// next to the inquire prompts, so stdout stays clean for `--json`.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm_create(&mut self, name: &str, path: &Path) -> Result<bool> {
        eprintln!();
        Confirm::new(&format!(
            "A '{name}' template doesn't exist in the database. Create it with '{}'?",
            path.display()
        ))
        .with_default(false)
        .prompt()
        .map_err(|e| Error::Prompt(e.to_string()))
    }

    fn ask_overwrite(&mut self, template: &Template, path: &Path) -> Result<String> {
        write_overwrite_menu(&mut io::stderr().lock(), template, path)?;
        Text::new("Type 1 or 2 or press <Enter> to skip:")
            .prompt()
            .map_err(|e| Error::Prompt(e.to_string()))
    }
}

fn write_overwrite_menu(out: &mut impl Write, template: &Template, path: &Path) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "'{}' exists in the database.", template.name)?;
    writeln!(out, "(1) Overwrite '{}' with '{}'", template.name, path.display())?;
    writeln!(out, "(2) Overwrite '{}' with '{}'", path.display(), template.name)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_overwrite_menu_lists_both_directions() {
        let template = Template {
            id: 1,
            name: "page.html".to_string(),
            content: String::new(),
            created_at: Utc::now(),
            last_changed: Utc::now(),
        };
        let mut out = Vec::new();
        write_overwrite_menu(&mut out, &template, Path::new("/srv/templates/page.html")).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("'page.html' exists in the database."));
        assert!(text.contains("(1) Overwrite 'page.html' with '/srv/templates/page.html'"));
        assert!(text.contains("(2) Overwrite '/srv/templates/page.html' with 'page.html'"));
    }
}
