//! Category model

use serde::{Deserialize, Serialize};

/// A category, related to articles through the `article_category` join table.
///
/// Read-only here; category names are aggregated into a single delimited
/// string per article for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}
