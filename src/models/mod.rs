//! Data models
//!
//! This module contains the data structures used throughout the blogstore
//! data-access layer. Models represent:
//! - Database entities (Article, BlogUser, Comment, Category)
//! - Input value objects for writes
//! - Augmented read shapes returned by the article repository

mod article;
mod category;
mod comment;
mod user;

pub use article::{
    Article, ArticleSummary, ArticleUpdate, ArticleWithAuthor, ArticleWithCategories,
    ArticleWithComments, NewArticle,
};
pub use category::Category;
pub use comment::Comment;
pub use user::BlogUser;
