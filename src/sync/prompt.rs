use std::path::Path;
use std::str::FromStr;

use crate::error::Result;
use crate::types::Template;

/// How matched file/record pairs are reconciled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverwriteMode {
    /// Ask the operator for every matched pair.
    #[default]
    Ask,
    FilesToDatabase,
    DatabaseToFiles,
}

impl OverwriteMode {
    /// The direction applied without prompting, if the mode fixes one.
    pub fn fixed_choice(self) -> Option<OverwriteChoice> {
        match self {
            Self::Ask => None,
            Self::FilesToDatabase => Some(OverwriteChoice::FilesToDatabase),
            Self::DatabaseToFiles => Some(OverwriteChoice::DatabaseToFiles),
        }
    }
}

impl FromStr for OverwriteMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "0" | "ask" => Ok(Self::Ask),
            "1" | "files" => Ok(Self::FilesToDatabase),
            "2" | "database" => Ok(Self::DatabaseToFiles),
            other => Err(format!(
                "invalid overwrite mode '{other}': expected 0 (ask), 1 (files) or 2 (database)"
            )),
        }
    }
}

/// Decision for a single matched pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwriteChoice {
    FilesToDatabase,
    DatabaseToFiles,
    Skip,
}

impl OverwriteChoice {
    /// Parse an operator answer. Blank skips; anything unrecognized is `None`.
    pub fn parse(answer: &str) -> Option<Self> {
        match answer.trim() {
            "" => Some(Self::Skip),
            "1" => Some(Self::FilesToDatabase),
            "2" => Some(Self::DatabaseToFiles),
            _ => None,
        }
    }
}

/// Source of operator decisions during a sync run.
pub trait Prompter {
    /// Whether to create a database template from a file that has no record.
    fn confirm_create(&mut self, name: &str, path: &Path) -> Result<bool>;

    /// Raw answer for a file whose record already exists: `1` overwrites the
    /// record, `2` overwrites the file, blank skips. Other answers are asked again.
    fn ask_overwrite(&mut self, template: &Template, path: &Path) -> Result<String>;
}

impl<P: Prompter + ?Sized> Prompter for &mut P {
    fn confirm_create(&mut self, name: &str, path: &Path) -> Result<bool> {
        (**self).confirm_create(name, path)
    }

    fn ask_overwrite(&mut self, template: &Template, path: &Path) -> Result<String> {
        (**self).ask_overwrite(template, path)
    }
}
