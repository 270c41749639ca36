//! Article repository
//!
//! Database operations for articles. This module provides:
//! - `ArticleRepository` trait defining the interface for article data access
//! - `SqlxArticleRepository` implementing the trait for SQLite and MySQL
//!
//! Read operations augment articles with data from the related tables:
//! author display names from `blog_user`, comment counts from `commentary`,
//! and aggregated category names from `category` via the `article_category`
//! join table. Both backends compute the aggregates with correlated
//! subqueries so comment counts are never inflated by the category join and
//! category names appear once each.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{
    ArticleSummary, ArticleUpdate, ArticleWithAuthor, ArticleWithCategories, ArticleWithComments,
    Comment, NewArticle,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Article repository trait
///
/// All operations are stateless request-response units: each call issues
/// one or more statements and propagates the driver's error unmodified.
/// Absence of a requested row is an empty result, never an error.
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Insert a new article and return its assigned id.
    ///
    /// The creation date is assigned by the database; a missing image is
    /// stored as NULL.
    async fn create(&self, input: &NewArticle) -> Result<i64>;

    /// Update title and content, and the image only when one is supplied.
    ///
    /// No existence check is performed; updating an unknown id is silent.
    async fn update(&self, id: i64, input: &ArticleUpdate) -> Result<()>;

    /// Delete an article. Deleting an unknown id is silent.
    async fn delete(&self, id: i64) -> Result<()>;

    /// Get one article with its author's display name, or `None`.
    async fn get_by_id(&self, id: i64) -> Result<Option<ArticleWithAuthor>>;

    /// List every article with author name, comment count, and category
    /// names, newest first.
    async fn list_all(&self) -> Result<Vec<ArticleSummary>>;

    /// Same augmentation as `list_all`, filtered to one author.
    async fn list_by_author(&self, user_id: i64) -> Result<Vec<ArticleSummary>>;

    /// The result of `list_all` with each article carrying its full list
    /// of comment records.
    ///
    /// Issues one additional query per article. The loop is not atomic:
    /// if a later fetch fails the whole call fails, with no compensation.
    async fn list_all_with_comments(&self) -> Result<Vec<ArticleWithComments>>;

    /// List one author's articles with aggregated category names but no
    /// comment counts, newest first.
    async fn list_with_categories_by_author(
        &self,
        user_id: i64,
    ) -> Result<Vec<ArticleWithCategories>>;

    /// List articles linked to a category, or every article when no
    /// category is given. One row per article either way.
    async fn list_by_category(&self, category_id: Option<i64>) -> Result<Vec<ArticleWithAuthor>>;

    /// List articles whose category name contains the search term
    /// (case-insensitive, wildcards both sides), newest first, one row
    /// per article even when several of its categories match.
    async fn list_by_category_name(&self, term: &str) -> Result<Vec<ArticleWithAuthor>>;
}

/// SQLx-based article repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxArticleRepository {
    pool: DynDatabasePool,
}

impl SqlxArticleRepository {
    /// Create a new SQLx article repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ArticleRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ArticleRepository for SqlxArticleRepository {
    async fn create(&self, input: &NewArticle) -> Result<i64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_article_sqlite(self.pool.as_sqlite().unwrap(), input).await
            }
            DatabaseDriver::Mysql => {
                create_article_mysql(self.pool.as_mysql().unwrap(), input).await
            }
        }
    }

    async fn update(&self, id: i64, input: &ArticleUpdate) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                update_article_sqlite(self.pool.as_sqlite().unwrap(), id, input).await
            }
            DatabaseDriver::Mysql => {
                update_article_mysql(self.pool.as_mysql().unwrap(), id, input).await
            }
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                delete_article_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Mysql => delete_article_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<ArticleWithAuthor>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_article_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Mysql => {
                get_article_by_id_mysql(self.pool.as_mysql().unwrap(), id).await
            }
        }
    }

    async fn list_all(&self) -> Result<Vec<ArticleSummary>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_all_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => list_all_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }

    async fn list_by_author(&self, user_id: i64) -> Result<Vec<ArticleSummary>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_by_author_sqlite(self.pool.as_sqlite().unwrap(), user_id).await
            }
            DatabaseDriver::Mysql => {
                list_by_author_mysql(self.pool.as_mysql().unwrap(), user_id).await
            }
        }
    }

    async fn list_all_with_comments(&self) -> Result<Vec<ArticleWithComments>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_all_with_comments_sqlite(self.pool.as_sqlite().unwrap()).await
            }
            DatabaseDriver::Mysql => {
                list_all_with_comments_mysql(self.pool.as_mysql().unwrap()).await
            }
        }
    }

    async fn list_with_categories_by_author(
        &self,
        user_id: i64,
    ) -> Result<Vec<ArticleWithCategories>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_with_categories_by_author_sqlite(self.pool.as_sqlite().unwrap(), user_id).await
            }
            DatabaseDriver::Mysql => {
                list_with_categories_by_author_mysql(self.pool.as_mysql().unwrap(), user_id).await
            }
        }
    }

    async fn list_by_category(&self, category_id: Option<i64>) -> Result<Vec<ArticleWithAuthor>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_by_category_sqlite(self.pool.as_sqlite().unwrap(), category_id).await
            }
            DatabaseDriver::Mysql => {
                list_by_category_mysql(self.pool.as_mysql().unwrap(), category_id).await
            }
        }
    }

    async fn list_by_category_name(&self, term: &str) -> Result<Vec<ArticleWithAuthor>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_by_category_name_sqlite(self.pool.as_sqlite().unwrap(), term).await
            }
            DatabaseDriver::Mysql => {
                list_by_category_name_mysql(self.pool.as_mysql().unwrap(), term).await
            }
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_article_sqlite(pool: &SqlitePool, input: &NewArticle) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO article (title, content, image, blog_user_id)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&input.title)
    .bind(&input.content)
    .bind(input.image.as_deref())
    .bind(input.blog_user_id)
    .execute(pool)
    .await
    .context("Failed to create article")?;

    Ok(result.last_insert_rowid())
}

async fn update_article_sqlite(pool: &SqlitePool, id: i64, input: &ArticleUpdate) -> Result<()> {
    // The image column only enters the SET clause when a value is present,
    // so omitting it never overwrites a stored image with NULL
    let query = if input.image.is_some() {
        "UPDATE article SET title = ?, content = ?, image = ? WHERE id = ?"
    } else {
        "UPDATE article SET title = ?, content = ? WHERE id = ?"
    };

    let mut q = sqlx::query(query).bind(&input.title).bind(&input.content);
    if let Some(image) = &input.image {
        q = q.bind(image);
    }
    q.bind(id)
        .execute(pool)
        .await
        .context("Failed to update article")?;

    Ok(())
}

async fn delete_article_sqlite(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM article WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete article")?;

    Ok(())
}

async fn get_article_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<ArticleWithAuthor>> {
    let row = sqlx::query(
        r#"
        SELECT a.id, a.title, a.content, a.image, a.blog_user_id, a.date,
               u.name AS author_name
        FROM article a
        INNER JOIN blog_user u ON a.blog_user_id = u.id
        WHERE a.id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get article by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_article_with_author_sqlite(&row))),
        None => Ok(None),
    }
}

async fn list_all_sqlite(pool: &SqlitePool) -> Result<Vec<ArticleSummary>> {
    let rows = sqlx::query(
        r#"
        SELECT a.id, a.title, a.content, a.image, a.blog_user_id, a.date,
               u.name AS author_name,
               (SELECT COUNT(*) FROM commentary c WHERE c.article_id = a.id) AS comment_count,
               (SELECT GROUP_CONCAT(cat.name, ', ')
                  FROM article_category ac
                  INNER JOIN category cat ON ac.category_id = cat.id
                 WHERE ac.article_id = a.id) AS categories
        FROM article a
        INNER JOIN blog_user u ON a.blog_user_id = u.id
        ORDER BY a.date DESC
        "#,
    )
    .fetch_all(pool)
    .await
    .context("Failed to list articles")?;

    Ok(rows.iter().map(row_to_summary_sqlite).collect())
}

async fn list_by_author_sqlite(pool: &SqlitePool, user_id: i64) -> Result<Vec<ArticleSummary>> {
    let rows = sqlx::query(
        r#"
        SELECT a.id, a.title, a.content, a.image, a.blog_user_id, a.date,
               u.name AS author_name,
               (SELECT COUNT(*) FROM commentary c WHERE c.article_id = a.id) AS comment_count,
               (SELECT GROUP_CONCAT(cat.name, ', ')
                  FROM article_category ac
                  INNER JOIN category cat ON ac.category_id = cat.id
                 WHERE ac.article_id = a.id) AS categories
        FROM article a
        INNER JOIN blog_user u ON a.blog_user_id = u.id
        WHERE a.blog_user_id = ?
        ORDER BY a.date DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("Failed to list articles by author")?;

    Ok(rows.iter().map(row_to_summary_sqlite).collect())
}

async fn list_all_with_comments_sqlite(pool: &SqlitePool) -> Result<Vec<ArticleWithComments>> {
    let articles = list_all_sqlite(pool).await?;

    // One extra query per article; articles already augmented stay
    // augmented if a later fetch fails
    let mut result = Vec::with_capacity(articles.len());
    for article in articles {
        let comments = comments_for_article_sqlite(pool, article.id).await?;
        result.push(ArticleWithComments::attach(article, comments));
    }

    Ok(result)
}

async fn comments_for_article_sqlite(pool: &SqlitePool, article_id: i64) -> Result<Vec<Comment>> {
    let rows = sqlx::query(
        r#"
        SELECT id, article_id, content, date
        FROM commentary
        WHERE article_id = ?
        ORDER BY id
        "#,
    )
    .bind(article_id)
    .fetch_all(pool)
    .await
    .with_context(|| format!("Failed to fetch comments for article {}", article_id))?;

    Ok(rows.iter().map(row_to_comment_sqlite).collect())
}

async fn list_with_categories_by_author_sqlite(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<ArticleWithCategories>> {
    let rows = sqlx::query(
        r#"
        SELECT a.id, a.title, a.content, a.image, a.blog_user_id, a.date,
               (SELECT GROUP_CONCAT(cat.name, ', ')
                  FROM article_category ac
                  INNER JOIN category cat ON ac.category_id = cat.id
                 WHERE ac.article_id = a.id) AS categories
        FROM article a
        WHERE a.blog_user_id = ?
        ORDER BY a.date DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("Failed to list articles with categories by author")?;

    Ok(rows.iter().map(row_to_with_categories_sqlite).collect())
}

async fn list_by_category_sqlite(
    pool: &SqlitePool,
    category_id: Option<i64>,
) -> Result<Vec<ArticleWithAuthor>> {
    let mut query = String::from(
        "SELECT a.id, a.title, a.content, a.image, a.blog_user_id, a.date, \
         u.name AS author_name \
         FROM article a \
         INNER JOIN blog_user u ON a.blog_user_id = u.id",
    );

    if category_id.is_some() {
        query.push_str(
            " INNER JOIN article_category ac ON a.id = ac.article_id \
             WHERE ac.category_id = ?",
        );
    }

    query.push_str(" GROUP BY a.id, u.name");

    let mut q = sqlx::query(&query);
    if let Some(category_id) = category_id {
        q = q.bind(category_id);
    }

    let rows = q
        .fetch_all(pool)
        .await
        .context("Failed to list articles by category")?;

    Ok(rows.iter().map(row_to_article_with_author_sqlite).collect())
}

async fn list_by_category_name_sqlite(
    pool: &SqlitePool,
    term: &str,
) -> Result<Vec<ArticleWithAuthor>> {
    let pattern = format!("%{}%", term.to_lowercase());

    let rows = sqlx::query(
        r#"
        SELECT a.id, a.title, a.content, a.image, a.blog_user_id, a.date,
               u.name AS author_name
        FROM article a
        INNER JOIN blog_user u ON a.blog_user_id = u.id
        INNER JOIN article_category ac ON a.id = ac.article_id
        INNER JOIN category c ON ac.category_id = c.id
        WHERE LOWER(c.name) LIKE ?
        GROUP BY a.id, u.name
        ORDER BY a.date DESC
        "#,
    )
    .bind(&pattern)
    .fetch_all(pool)
    .await
    .context("Failed to list articles by category name")?;

    Ok(rows.iter().map(row_to_article_with_author_sqlite).collect())
}

fn row_to_article_with_author_sqlite(row: &sqlx::sqlite::SqliteRow) -> ArticleWithAuthor {
    ArticleWithAuthor {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        image: row.get("image"),
        blog_user_id: row.get("blog_user_id"),
        date: row.get("date"),
        author_name: row.get("author_name"),
    }
}

fn row_to_summary_sqlite(row: &sqlx::sqlite::SqliteRow) -> ArticleSummary {
    ArticleSummary {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        image: row.get("image"),
        blog_user_id: row.get("blog_user_id"),
        date: row.get("date"),
        author_name: row.get("author_name"),
        comment_count: row.get("comment_count"),
        categories: row.get("categories"),
    }
}

fn row_to_with_categories_sqlite(row: &sqlx::sqlite::SqliteRow) -> ArticleWithCategories {
    ArticleWithCategories {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        image: row.get("image"),
        blog_user_id: row.get("blog_user_id"),
        date: row.get("date"),
        categories: row.get("categories"),
    }
}

fn row_to_comment_sqlite(row: &sqlx::sqlite::SqliteRow) -> Comment {
    Comment {
        id: row.get("id"),
        article_id: row.get("article_id"),
        content: row.get("content"),
        date: row.get("date"),
    }
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_article_mysql(pool: &MySqlPool, input: &NewArticle) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO article (title, content, image, blog_user_id)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&input.title)
    .bind(&input.content)
    .bind(input.image.as_deref())
    .bind(input.blog_user_id)
    .execute(pool)
    .await
    .context("Failed to create article")?;

    Ok(result.last_insert_id() as i64)
}

async fn update_article_mysql(pool: &MySqlPool, id: i64, input: &ArticleUpdate) -> Result<()> {
    // Same conditional SET clause as the SQLite variant
    let query = if input.image.is_some() {
        "UPDATE article SET title = ?, content = ?, image = ? WHERE id = ?"
    } else {
        "UPDATE article SET title = ?, content = ? WHERE id = ?"
    };

    let mut q = sqlx::query(query).bind(&input.title).bind(&input.content);
    if let Some(image) = &input.image {
        q = q.bind(image);
    }
    q.bind(id)
        .execute(pool)
        .await
        .context("Failed to update article")?;

    Ok(())
}

async fn delete_article_mysql(pool: &MySqlPool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM article WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete article")?;

    Ok(())
}

async fn get_article_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<ArticleWithAuthor>> {
    let row = sqlx::query(
        r#"
        SELECT a.id, a.title, a.content, a.image, a.blog_user_id, a.date,
               u.name AS author_name
        FROM article a
        INNER JOIN blog_user u ON a.blog_user_id = u.id
        WHERE a.id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get article by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_article_with_author_mysql(&row))),
        None => Ok(None),
    }
}

async fn list_all_mysql(pool: &MySqlPool) -> Result<Vec<ArticleSummary>> {
    let rows = sqlx::query(
        r#"
        SELECT a.id, a.title, a.content, a.image, a.blog_user_id, a.date,
               u.name AS author_name,
               (SELECT COUNT(*) FROM commentary c WHERE c.article_id = a.id) AS comment_count,
               (SELECT GROUP_CONCAT(cat.name SEPARATOR ', ')
                  FROM article_category ac
                  INNER JOIN category cat ON ac.category_id = cat.id
                 WHERE ac.article_id = a.id) AS categories
        FROM article a
        INNER JOIN blog_user u ON a.blog_user_id = u.id
        ORDER BY a.date DESC
        "#,
    )
    .fetch_all(pool)
    .await
    .context("Failed to list articles")?;

    Ok(rows.iter().map(row_to_summary_mysql).collect())
}

async fn list_by_author_mysql(pool: &MySqlPool, user_id: i64) -> Result<Vec<ArticleSummary>> {
    let rows = sqlx::query(
        r#"
        SELECT a.id, a.title, a.content, a.image, a.blog_user_id, a.date,
               u.name AS author_name,
               (SELECT COUNT(*) FROM commentary c WHERE c.article_id = a.id) AS comment_count,
               (SELECT GROUP_CONCAT(cat.name SEPARATOR ', ')
                  FROM article_category ac
                  INNER JOIN category cat ON ac.category_id = cat.id
                 WHERE ac.article_id = a.id) AS categories
        FROM article a
        INNER JOIN blog_user u ON a.blog_user_id = u.id
        WHERE a.blog_user_id = ?
        ORDER BY a.date DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("Failed to list articles by author")?;

    Ok(rows.iter().map(row_to_summary_mysql).collect())
}

async fn list_all_with_comments_mysql(pool: &MySqlPool) -> Result<Vec<ArticleWithComments>> {
    let articles = list_all_mysql(pool).await?;

    let mut result = Vec::with_capacity(articles.len());
    for article in articles {
        let comments = comments_for_article_mysql(pool, article.id).await?;
        result.push(ArticleWithComments::attach(article, comments));
    }

    Ok(result)
}

async fn comments_for_article_mysql(pool: &MySqlPool, article_id: i64) -> Result<Vec<Comment>> {
    let rows = sqlx::query(
        r#"
        SELECT id, article_id, content, date
        FROM commentary
        WHERE article_id = ?
        ORDER BY id
        "#,
    )
    .bind(article_id)
    .fetch_all(pool)
    .await
    .with_context(|| format!("Failed to fetch comments for article {}", article_id))?;

    Ok(rows.iter().map(row_to_comment_mysql).collect())
}

async fn list_with_categories_by_author_mysql(
    pool: &MySqlPool,
    user_id: i64,
) -> Result<Vec<ArticleWithCategories>> {
    let rows = sqlx::query(
        r#"
        SELECT a.id, a.title, a.content, a.image, a.blog_user_id, a.date,
               (SELECT GROUP_CONCAT(cat.name SEPARATOR ', ')
                  FROM article_category ac
                  INNER JOIN category cat ON ac.category_id = cat.id
                 WHERE ac.article_id = a.id) AS categories
        FROM article a
        WHERE a.blog_user_id = ?
        ORDER BY a.date DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("Failed to list articles with categories by author")?;

    Ok(rows.iter().map(row_to_with_categories_mysql).collect())
}

async fn list_by_category_mysql(
    pool: &MySqlPool,
    category_id: Option<i64>,
) -> Result<Vec<ArticleWithAuthor>> {
    let mut query = String::from(
        "SELECT a.id, a.title, a.content, a.image, a.blog_user_id, a.date, \
         u.name AS author_name \
         FROM article a \
         INNER JOIN blog_user u ON a.blog_user_id = u.id",
    );

    if category_id.is_some() {
        query.push_str(
            " INNER JOIN article_category ac ON a.id = ac.article_id \
             WHERE ac.category_id = ?",
        );
    }

    query.push_str(" GROUP BY a.id, u.name");

    let mut q = sqlx::query(&query);
    if let Some(category_id) = category_id {
        q = q.bind(category_id);
    }

    let rows = q
        .fetch_all(pool)
        .await
        .context("Failed to list articles by category")?;

    Ok(rows.iter().map(row_to_article_with_author_mysql).collect())
}

async fn list_by_category_name_mysql(
    pool: &MySqlPool,
    term: &str,
) -> Result<Vec<ArticleWithAuthor>> {
    let pattern = format!("%{}%", term.to_lowercase());

    let rows = sqlx::query(
        r#"
        SELECT a.id, a.title, a.content, a.image, a.blog_user_id, a.date,
               u.name AS author_name
        FROM article a
        INNER JOIN blog_user u ON a.blog_user_id = u.id
        INNER JOIN article_category ac ON a.id = ac.article_id
        INNER JOIN category c ON ac.category_id = c.id
        WHERE LOWER(c.name) LIKE ?
        GROUP BY a.id, u.name
        ORDER BY a.date DESC
        "#,
    )
    .bind(&pattern)
    .fetch_all(pool)
    .await
    .context("Failed to list articles by category name")?;

    Ok(rows.iter().map(row_to_article_with_author_mysql).collect())
}

fn row_to_article_with_author_mysql(row: &sqlx::mysql::MySqlRow) -> ArticleWithAuthor {
    ArticleWithAuthor {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        image: row.get("image"),
        blog_user_id: row.get("blog_user_id"),
        date: row.get("date"),
        author_name: row.get("author_name"),
    }
}

fn row_to_summary_mysql(row: &sqlx::mysql::MySqlRow) -> ArticleSummary {
    ArticleSummary {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        image: row.get("image"),
        blog_user_id: row.get("blog_user_id"),
        date: row.get("date"),
        author_name: row.get("author_name"),
        comment_count: row.get("comment_count"),
        categories: row.get("categories"),
    }
}

fn row_to_with_categories_mysql(row: &sqlx::mysql::MySqlRow) -> ArticleWithCategories {
    ArticleWithCategories {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        image: row.get("image"),
        blog_user_id: row.get("blog_user_id"),
        date: row.get("date"),
        categories: row.get("categories"),
    }
}

fn row_to_comment_mysql(row: &sqlx::mysql::MySqlRow) -> Comment {
    Comment {
        id: row.get("id"),
        article_id: row.get("article_id"),
        content: row.get("content"),
        date: row.get("date"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> (DynDatabasePool, SqlxArticleRepository) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let repo = SqlxArticleRepository::new(pool.clone());
        (pool, repo)
    }

    /// Helper to create an author for article tests
    async fn create_test_user(pool: &SqlitePool, name: &str) -> i64 {
        let result = sqlx::query("INSERT INTO blog_user (name) VALUES (?)")
            .bind(name)
            .execute(pool)
            .await
            .expect("Failed to create test user");
        result.last_insert_rowid()
    }

    /// Helper to create a category for article tests
    async fn create_test_category(pool: &SqlitePool, name: &str) -> i64 {
        let result = sqlx::query("INSERT INTO category (name) VALUES (?)")
            .bind(name)
            .execute(pool)
            .await
            .expect("Failed to create test category");
        result.last_insert_rowid()
    }

    /// Helper to link an article to a category
    async fn link_category(pool: &SqlitePool, article_id: i64, category_id: i64) {
        sqlx::query("INSERT INTO article_category (article_id, category_id) VALUES (?, ?)")
            .bind(article_id)
            .bind(category_id)
            .execute(pool)
            .await
            .expect("Failed to link category");
    }

    /// Helper to attach a comment to an article
    async fn create_test_comment(pool: &SqlitePool, article_id: i64, content: &str) -> i64 {
        let result = sqlx::query("INSERT INTO commentary (article_id, content) VALUES (?, ?)")
            .bind(article_id)
            .bind(content)
            .execute(pool)
            .await
            .expect("Failed to create test comment");
        result.last_insert_rowid()
    }

    /// Helper to push an article's date into the past so ordering is
    /// observable despite CURRENT_TIMESTAMP's one-second resolution
    async fn age_article(pool: &SqlitePool, article_id: i64, days: i64) {
        sqlx::query("UPDATE article SET date = datetime('now', ?) WHERE id = ?")
            .bind(format!("-{} days", days))
            .bind(article_id)
            .execute(pool)
            .await
            .expect("Failed to age article");
    }

    fn test_input(title: &str, user_id: i64) -> NewArticle {
        NewArticle::new(title.to_string(), format!("Content for {}", title), user_id)
    }

    #[tokio::test]
    async fn test_create_returns_positive_id_and_round_trips() {
        let (pool, repo) = setup_test_repo().await;
        let sqlite_pool = pool.as_sqlite().unwrap();
        let user_id = create_test_user(sqlite_pool, "alice").await;

        let input = NewArticle::new("A".to_string(), "B".to_string(), user_id);
        let id = repo.create(&input).await.expect("Failed to create article");
        assert!(id > 0);

        let found = repo
            .get_by_id(id)
            .await
            .expect("Failed to get article")
            .expect("Article not found");

        assert_eq!(found.id, id);
        assert_eq!(found.title, "A");
        assert_eq!(found.content, "B");
        assert_eq!(found.image, None);
        assert_eq!(found.blog_user_id, user_id);
        assert_eq!(found.author_name, "alice");
    }

    #[tokio::test]
    async fn test_create_with_image() {
        let (pool, repo) = setup_test_repo().await;
        let sqlite_pool = pool.as_sqlite().unwrap();
        let user_id = create_test_user(sqlite_pool, "alice").await;

        let input = test_input("With image", user_id).with_image("cover.png".to_string());
        let id = repo.create(&input).await.expect("Failed to create article");

        let found = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.image.as_deref(), Some("cover.png"));
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let (_pool, repo) = setup_test_repo().await;

        let found = repo.get_by_id(99999).await.expect("Failed to get article");

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_update_without_image_preserves_stored_image() {
        let (pool, repo) = setup_test_repo().await;
        let sqlite_pool = pool.as_sqlite().unwrap();
        let user_id = create_test_user(sqlite_pool, "alice").await;

        let input = test_input("Original", user_id).with_image("original.png".to_string());
        let id = repo.create(&input).await.expect("Failed to create article");

        let update = ArticleUpdate::new("Updated".to_string(), "New content".to_string());
        repo.update(id, &update).await.expect("Failed to update");

        let found = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.title, "Updated");
        assert_eq!(found.content, "New content");
        assert_eq!(found.image.as_deref(), Some("original.png"));
    }

    #[tokio::test]
    async fn test_update_with_image_overwrites() {
        let (pool, repo) = setup_test_repo().await;
        let sqlite_pool = pool.as_sqlite().unwrap();
        let user_id = create_test_user(sqlite_pool, "alice").await;

        let input = test_input("Original", user_id).with_image("original.png".to_string());
        let id = repo.create(&input).await.expect("Failed to create article");

        let update = ArticleUpdate::new("Updated".to_string(), "New content".to_string())
            .with_image("replacement.png".to_string());
        repo.update(id, &update).await.expect("Failed to update");

        let found = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.image.as_deref(), Some("replacement.png"));

        // An empty string counts as a present value and overwrites too
        let update = ArticleUpdate::new("Updated".to_string(), "New content".to_string())
            .with_image(String::new());
        repo.update(id, &update).await.expect("Failed to update");

        let found = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.image.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_update_nonexistent_is_silent() {
        let (_pool, repo) = setup_test_repo().await;

        let update = ArticleUpdate::new("T".to_string(), "C".to_string());
        repo.update(99999, &update)
            .await
            .expect("Zero-row update should not error");
    }

    #[tokio::test]
    async fn test_delete_removes_article() {
        let (pool, repo) = setup_test_repo().await;
        let sqlite_pool = pool.as_sqlite().unwrap();
        let user_id = create_test_user(sqlite_pool, "alice").await;

        let id = repo
            .create(&test_input("To delete", user_id))
            .await
            .expect("Failed to create article");

        repo.delete(id).await.expect("Failed to delete article");

        let found = repo.get_by_id(id).await.expect("Failed to get article");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_delete_nonexistent_is_silent() {
        let (pool, repo) = setup_test_repo().await;
        let sqlite_pool = pool.as_sqlite().unwrap();
        let user_id = create_test_user(sqlite_pool, "alice").await;

        let id = repo
            .create(&test_input("Survivor", user_id))
            .await
            .expect("Failed to create article");

        repo.delete(99999)
            .await
            .expect("Zero-row delete should not error");

        // The store is unchanged
        let articles = repo.list_all().await.expect("Failed to list articles");
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].id, id);
    }

    #[tokio::test]
    async fn test_list_all_augments_and_orders() {
        let (pool, repo) = setup_test_repo().await;
        let sqlite_pool = pool.as_sqlite().unwrap();
        let alice = create_test_user(sqlite_pool, "alice").await;
        let bob = create_test_user(sqlite_pool, "bob").await;

        let oldest = repo.create(&test_input("Oldest", alice)).await.unwrap();
        let middle = repo.create(&test_input("Middle", bob)).await.unwrap();
        let newest = repo.create(&test_input("Newest", alice)).await.unwrap();
        age_article(sqlite_pool, oldest, 2).await;
        age_article(sqlite_pool, middle, 1).await;

        let tech = create_test_category(sqlite_pool, "Technology").await;
        link_category(sqlite_pool, newest, tech).await;
        create_test_comment(sqlite_pool, newest, "First!").await;
        create_test_comment(sqlite_pool, newest, "Second!").await;

        let articles = repo.list_all().await.expect("Failed to list articles");
        assert_eq!(articles.len(), 3);

        // Newest first
        assert_eq!(articles[0].id, newest);
        assert_eq!(articles[1].id, middle);
        assert_eq!(articles[2].id, oldest);
        for pair in articles.windows(2) {
            assert!(pair[0].date >= pair[1].date);
        }

        assert_eq!(articles[0].author_name, "alice");
        assert_eq!(articles[0].comment_count, 2);
        assert_eq!(articles[0].categories.as_deref(), Some("Technology"));

        assert_eq!(articles[1].author_name, "bob");
        assert_eq!(articles[1].comment_count, 0);
        assert_eq!(articles[1].categories, None);
    }

    #[tokio::test]
    async fn test_categories_aggregated_comma_separated() {
        let (pool, repo) = setup_test_repo().await;
        let sqlite_pool = pool.as_sqlite().unwrap();
        let user_id = create_test_user(sqlite_pool, "alice").await;

        let id = repo.create(&test_input("Tagged", user_id)).await.unwrap();
        let tech = create_test_category(sqlite_pool, "Technology").await;
        let art = create_test_category(sqlite_pool, "Art").await;
        link_category(sqlite_pool, id, tech).await;
        link_category(sqlite_pool, id, art).await;

        let articles = repo.list_all().await.expect("Failed to list articles");
        assert_eq!(articles.len(), 1);

        let categories = articles[0]
            .categories
            .as_deref()
            .expect("Missing categories");
        let mut names: Vec<&str> = categories.split(", ").collect();
        names.sort_unstable();
        assert_eq!(names, vec!["Art", "Technology"]);
    }

    #[tokio::test]
    async fn test_comment_count_not_inflated_by_categories() {
        let (pool, repo) = setup_test_repo().await;
        let sqlite_pool = pool.as_sqlite().unwrap();
        let user_id = create_test_user(sqlite_pool, "alice").await;

        let id = repo.create(&test_input("Busy", user_id)).await.unwrap();
        for name in ["Technology", "Art", "Science"] {
            let cat = create_test_category(sqlite_pool, name).await;
            link_category(sqlite_pool, id, cat).await;
        }
        create_test_comment(sqlite_pool, id, "One").await;
        create_test_comment(sqlite_pool, id, "Two").await;

        let articles = repo.list_all().await.unwrap();
        assert_eq!(articles[0].comment_count, 2);

        let categories = articles[0].categories.as_deref().unwrap();
        assert_eq!(categories.split(", ").count(), 3);
    }

    #[tokio::test]
    async fn test_list_by_author_filters() {
        let (pool, repo) = setup_test_repo().await;
        let sqlite_pool = pool.as_sqlite().unwrap();
        let alice = create_test_user(sqlite_pool, "alice").await;
        let bob = create_test_user(sqlite_pool, "bob").await;

        repo.create(&test_input("Alice 1", alice)).await.unwrap();
        repo.create(&test_input("Alice 2", alice)).await.unwrap();
        repo.create(&test_input("Bob 1", bob)).await.unwrap();

        let articles = repo
            .list_by_author(alice)
            .await
            .expect("Failed to list articles by author");
        assert_eq!(articles.len(), 2);
        for article in &articles {
            assert_eq!(article.blog_user_id, alice);
            assert_eq!(article.author_name, "alice");
        }
    }

    #[tokio::test]
    async fn test_list_all_with_comments_attaches_rows() {
        let (pool, repo) = setup_test_repo().await;
        let sqlite_pool = pool.as_sqlite().unwrap();
        let user_id = create_test_user(sqlite_pool, "alice").await;

        let commented = repo
            .create(&test_input("Commented", user_id))
            .await
            .unwrap();
        let quiet = repo.create(&test_input("Quiet", user_id)).await.unwrap();
        create_test_comment(sqlite_pool, commented, "Nice!").await;
        create_test_comment(sqlite_pool, commented, "Agreed.").await;

        let articles = repo
            .list_all_with_comments()
            .await
            .expect("Failed to list articles with comments");
        assert_eq!(articles.len(), 2);

        let with = articles.iter().find(|a| a.id == commented).unwrap();
        assert_eq!(with.comment_count, 2);
        assert_eq!(with.comments.len(), 2);
        assert_eq!(with.comments[0].content, "Nice!");
        assert_eq!(with.comments[1].content, "Agreed.");
        for comment in &with.comments {
            assert_eq!(comment.article_id, commented);
        }

        // Zero comments yields an empty Vec, not an absent field
        let without = articles.iter().find(|a| a.id == quiet).unwrap();
        assert_eq!(without.comment_count, 0);
        assert!(without.comments.is_empty());
    }

    #[tokio::test]
    async fn test_list_with_categories_by_author() {
        let (pool, repo) = setup_test_repo().await;
        let sqlite_pool = pool.as_sqlite().unwrap();
        let alice = create_test_user(sqlite_pool, "alice").await;
        let bob = create_test_user(sqlite_pool, "bob").await;

        let tagged = repo.create(&test_input("Tagged", alice)).await.unwrap();
        let untagged = repo.create(&test_input("Untagged", alice)).await.unwrap();
        repo.create(&test_input("Bob's", bob)).await.unwrap();

        let tech = create_test_category(sqlite_pool, "Technology").await;
        link_category(sqlite_pool, tagged, tech).await;

        let articles = repo
            .list_with_categories_by_author(alice)
            .await
            .expect("Failed to list articles with categories");
        assert_eq!(articles.len(), 2);

        let with = articles.iter().find(|a| a.id == tagged).unwrap();
        assert_eq!(with.categories.as_deref(), Some("Technology"));

        let without = articles.iter().find(|a| a.id == untagged).unwrap();
        assert_eq!(without.categories, None);
    }

    #[tokio::test]
    async fn test_list_by_category_filters() {
        let (pool, repo) = setup_test_repo().await;
        let sqlite_pool = pool.as_sqlite().unwrap();
        let user_id = create_test_user(sqlite_pool, "alice").await;

        let in_tech = repo.create(&test_input("In tech", user_id)).await.unwrap();
        let in_art = repo.create(&test_input("In art", user_id)).await.unwrap();
        repo.create(&test_input("Uncategorized", user_id))
            .await
            .unwrap();

        let tech = create_test_category(sqlite_pool, "Technology").await;
        let art = create_test_category(sqlite_pool, "Art").await;
        link_category(sqlite_pool, in_tech, tech).await;
        link_category(sqlite_pool, in_art, art).await;

        let articles = repo
            .list_by_category(Some(tech))
            .await
            .expect("Failed to list articles by category");
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].id, in_tech);
        assert_eq!(articles[0].author_name, "alice");
    }

    #[tokio::test]
    async fn test_list_by_category_none_returns_all_once() {
        let (pool, repo) = setup_test_repo().await;
        let sqlite_pool = pool.as_sqlite().unwrap();
        let user_id = create_test_user(sqlite_pool, "alice").await;

        let multi = repo.create(&test_input("Multi", user_id)).await.unwrap();
        let plain = repo.create(&test_input("Plain", user_id)).await.unwrap();

        // Two category links must not duplicate the article in the result
        let tech = create_test_category(sqlite_pool, "Technology").await;
        let art = create_test_category(sqlite_pool, "Art").await;
        link_category(sqlite_pool, multi, tech).await;
        link_category(sqlite_pool, multi, art).await;

        let articles = repo
            .list_by_category(None)
            .await
            .expect("Failed to list articles");
        assert_eq!(articles.len(), 2);
        let mut ids: Vec<i64> = articles.iter().map(|a| a.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![multi, plain]);
    }

    #[tokio::test]
    async fn test_list_by_category_name_substring_case_insensitive() {
        let (pool, repo) = setup_test_repo().await;
        let sqlite_pool = pool.as_sqlite().unwrap();
        let user_id = create_test_user(sqlite_pool, "alice").await;

        let in_technology = repo
            .create(&test_input("Tech piece", user_id))
            .await
            .unwrap();
        let in_biotech = repo
            .create(&test_input("Bio piece", user_id))
            .await
            .unwrap();
        let in_art = repo.create(&test_input("Art piece", user_id)).await.unwrap();

        let technology = create_test_category(sqlite_pool, "Technology").await;
        let biotech = create_test_category(sqlite_pool, "Biotech").await;
        let art = create_test_category(sqlite_pool, "Art").await;
        link_category(sqlite_pool, in_technology, technology).await;
        link_category(sqlite_pool, in_biotech, biotech).await;
        link_category(sqlite_pool, in_art, art).await;

        let articles = repo
            .list_by_category_name("tech")
            .await
            .expect("Failed to search by category name");
        let mut ids: Vec<i64> = articles.iter().map(|a| a.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![in_technology, in_biotech]);
    }

    #[tokio::test]
    async fn test_list_by_category_name_groups_matches_per_article() {
        let (pool, repo) = setup_test_repo().await;
        let sqlite_pool = pool.as_sqlite().unwrap();
        let user_id = create_test_user(sqlite_pool, "alice").await;

        let id = repo
            .create(&test_input("Doubly matched", user_id))
            .await
            .unwrap();

        // Both categories match the term; the article still appears once
        let technology = create_test_category(sqlite_pool, "Technology").await;
        let biotech = create_test_category(sqlite_pool, "Biotech").await;
        link_category(sqlite_pool, id, technology).await;
        link_category(sqlite_pool, id, biotech).await;

        let articles = repo
            .list_by_category_name("tech")
            .await
            .expect("Failed to search by category name");
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].id, id);
    }

    #[tokio::test]
    async fn test_list_by_category_name_no_match() {
        let (pool, repo) = setup_test_repo().await;
        let sqlite_pool = pool.as_sqlite().unwrap();
        let user_id = create_test_user(sqlite_pool, "alice").await;

        let id = repo.create(&test_input("Art piece", user_id)).await.unwrap();
        let art = create_test_category(sqlite_pool, "Art").await;
        link_category(sqlite_pool, id, art).await;

        let articles = repo
            .list_by_category_name("tech")
            .await
            .expect("Failed to search by category name");
        assert!(articles.is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_author() {
        let (_pool, repo) = setup_test_repo().await;

        // FK violation propagates as an error, uninterpreted
        let input = NewArticle::new("Orphan".to_string(), "C".to_string(), 999);
        let result = repo.create(&input).await;
        assert!(result.is_err());
    }
}
