//! Article model
//!
//! This module provides:
//! - `Article` entity representing a blog article row
//! - `NewArticle` and `ArticleUpdate` input value objects for writes
//! - Augmented read shapes (`ArticleWithAuthor`, `ArticleSummary`,
//!   `ArticleWithCategories`, `ArticleWithComments`) returned by the
//!   list queries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Comment;

/// Article entity as stored in the `article` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Unique identifier
    pub id: i64,
    /// Article title
    pub title: String,
    /// Article body
    pub content: String,
    /// Optional illustration path or URL
    pub image: Option<String>,
    /// Author user ID
    pub blog_user_id: i64,
    /// Creation timestamp, assigned by the database
    pub date: DateTime<Utc>,
}

/// Input for creating a new article.
///
/// `image` is always present as a field, possibly `None`; a missing image
/// is stored as NULL rather than rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub blog_user_id: i64,
}

impl NewArticle {
    pub fn new(title: String, content: String, blog_user_id: i64) -> Self {
        Self {
            title,
            content,
            image: None,
            blog_user_id,
        }
    }

    /// Set the image
    pub fn with_image(mut self, image: String) -> Self {
        self.image = Some(image);
        self
    }
}

/// Input for updating an existing article.
///
/// Title and content are always written. `image: None` means "leave the
/// stored image untouched"; the image column only enters the SET clause
/// when a value (including the empty string) is supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleUpdate {
    pub title: String,
    pub content: String,
    pub image: Option<String>,
}

impl ArticleUpdate {
    pub fn new(title: String, content: String) -> Self {
        Self {
            title,
            content,
            image: None,
        }
    }

    /// Set the image
    pub fn with_image(mut self, image: String) -> Self {
        self.image = Some(image);
        self
    }
}

/// Article joined with its author's display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleWithAuthor {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub blog_user_id: i64,
    pub date: DateTime<Utc>,
    /// Display name of the author
    pub author_name: String,
}

/// Article augmented for listing: author name, number of comments, and the
/// article's distinct category names joined with ", ".
///
/// `categories` is `None` for uncategorized articles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub blog_user_id: i64,
    pub date: DateTime<Utc>,
    pub author_name: String,
    pub comment_count: i64,
    pub categories: Option<String>,
}

/// Article with aggregated category names but no comment count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleWithCategories {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub blog_user_id: i64,
    pub date: DateTime<Utc>,
    pub categories: Option<String>,
}

/// Article summary carrying its full list of comment records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleWithComments {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub blog_user_id: i64,
    pub date: DateTime<Utc>,
    pub author_name: String,
    pub comment_count: i64,
    pub categories: Option<String>,
    /// All commentary rows for the article, empty when there are none
    pub comments: Vec<Comment>,
}

impl ArticleWithComments {
    /// Attach a list of comments to a summary row.
    pub fn attach(summary: ArticleSummary, comments: Vec<Comment>) -> Self {
        Self {
            id: summary.id,
            title: summary.title,
            content: summary.content,
            image: summary.image,
            blog_user_id: summary.blog_user_id,
            date: summary.date,
            author_name: summary.author_name,
            comment_count: summary.comment_count,
            categories: summary.categories,
            comments,
        }
    }
}
