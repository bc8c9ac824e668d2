//! The fixed animation category table.
//!
//! Every character mod is expected to provide one sprite sheet per category.
//! The table is ordered; the order drives default UI display only, not data
//! correctness.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The animation categories the pipeline looks for, in display order.
pub const CATEGORY_NAMES: [&str; 12] = [
    "Idle",
    "Idle-30-Happy",
    "Move-Back",
    "Move-Front",
    "Move-Side",
    "Sit-30-Happy",
    "Sit-30-Talk",
    "Sit-60-Talk",
    "Sit-Eat",
    "Sit-Idle",
    "Sit-Start",
    "Sit-Talk",
];

/// A named animation category. Identity is the name; the set is fixed for
/// the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Build the default category table from [`CATEGORY_NAMES`].
pub fn default_categories() -> Vec<Category> {
    CATEGORY_NAMES.iter().map(|n| Category::new(*n)).collect()
}

/// A category with an optionally bound source sheet.
///
/// Assignments are owned by the interactive session and handed to the
/// pipeline per invocation; the pipeline never retains them across runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetAssignment {
    pub category: Category,
    /// Path to the source sheet texture, if one has been bound.
    pub sheet: Option<PathBuf>,
}

impl SheetAssignment {
    pub fn unassigned(category: Category) -> Self {
        Self {
            category,
            sheet: None,
        }
    }

    pub fn assigned(category: Category, sheet: PathBuf) -> Self {
        Self {
            category,
            sheet: Some(sheet),
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.sheet.is_some()
    }
}
