//! Database repositories
//!
//! Repository pattern implementations for database access. Articles are
//! the only entity written from this crate; users, comments, and
//! categories are read through the article queries.

pub mod article;

pub use article::{ArticleRepository, SqlxArticleRepository};
