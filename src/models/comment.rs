//! Comment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A commentary row attached to an article.
///
/// Comments are read-only from this layer; they are fetched and nested
/// under their article by `ArticleRepository::list_all_with_comments`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub article_id: i64,
    pub content: String,
    pub date: DateTime<Utc>,
}
