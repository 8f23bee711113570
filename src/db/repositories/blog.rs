//! Blog repository

use crate::db::{Backend, DynDatabasePool};
use crate::models::{Blog, BlogTag};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, MySqlPool, SqlitePool};
use std::sync::Arc;

#[async_trait]
pub trait BlogRepository: Send + Sync {
    async fn create(&self, blog: &Blog) -> Result<Blog>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Blog>>;
    /// All posts, newest first
    async fn list(&self) -> Result<Vec<Blog>>;
    /// Overwrite every column of `blog.id`; `None` if the row is gone
    async fn update(&self, blog: &Blog) -> Result<Option<Blog>>;
    /// Returns whether a row was deleted
    async fn delete(&self, id: i64) -> Result<bool>;
}

pub struct SqlxBlogRepository {
    pool: DynDatabasePool,
}

impl SqlxBlogRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn BlogRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl BlogRepository for SqlxBlogRepository {
    async fn create(&self, blog: &Blog) -> Result<Blog> {
        match self.pool.backend()? {
            Backend::Sqlite(p) => create_sqlite(p, blog).await,
            Backend::Mysql(p) => create_mysql(p, blog).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Blog>> {
        match self.pool.backend()? {
            Backend::Sqlite(p) => get_by_id_sqlite(p, id).await,
            Backend::Mysql(p) => get_by_id_mysql(p, id).await,
        }
    }

    async fn list(&self) -> Result<Vec<Blog>> {
        match self.pool.backend()? {
            Backend::Sqlite(p) => list_sqlite(p).await,
            Backend::Mysql(p) => list_mysql(p).await,
        }
    }

    async fn update(&self, blog: &Blog) -> Result<Option<Blog>> {
        match self.pool.backend()? {
            Backend::Sqlite(p) => update_sqlite(p, blog).await,
            Backend::Mysql(p) => update_mysql(p, blog).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let affected = match self.pool.backend()? {
            Backend::Sqlite(p) => sqlx::query(DELETE).bind(id).execute(p).await?.rows_affected(),
            Backend::Mysql(p) => sqlx::query(DELETE).bind(id).execute(p).await?.rows_affected(),
        };
        Ok(affected > 0)
    }
}

const COLUMNS: &str = "id, title, text, image, image_file_path, image_file_name, link_tags, tags, created_at";
const INSERT: &str = "INSERT INTO blogs (title, text, image, image_file_path, image_file_name, link_tags, tags, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)";
const UPDATE: &str = "UPDATE blogs SET title = ?, text = ?, image = ?, image_file_path = ?, image_file_name = ?, link_tags = ?, tags = ? WHERE id = ?";
const DELETE: &str = "DELETE FROM blogs WHERE id = ?";

fn select_by_id() -> String {
    format!("SELECT {} FROM blogs WHERE id = ?", COLUMNS)
}

fn select_all() -> String {
    format!("SELECT {} FROM blogs ORDER BY created_at DESC, id DESC", COLUMNS)
}

/// Row shape of the `blogs` table
#[derive(Debug, FromRow)]
struct DbBlog {
    id: i64,
    title: String,
    text: String,
    image: Option<String>,
    image_file_path: Option<String>,
    image_file_name: Option<String>,
    link_tags: Json<Vec<BlogTag>>,
    tags: Option<Json<Vec<String>>>,
    created_at: DateTime<Utc>,
}

impl From<DbBlog> for Blog {
    fn from(row: DbBlog) -> Self {
        Blog {
            id: row.id,
            title: row.title,
            text: row.text,
            image: row.image,
            image_file_path: row.image_file_path,
            image_file_name: row.image_file_name,
            link_tags: row.link_tags.0,
            tags: row.tags.map(|t| t.0),
            created_at: row.created_at,
        }
    }
}

// SQLite implementations
async fn create_sqlite(pool: &SqlitePool, blog: &Blog) -> Result<Blog> {
    let result = sqlx::query(INSERT)
        .bind(&blog.title)
        .bind(&blog.text)
        .bind(&blog.image)
        .bind(&blog.image_file_path)
        .bind(&blog.image_file_name)
        .bind(Json(&blog.link_tags))
        .bind(blog.tags.as_ref().map(Json))
        .bind(Utc::now())
        .execute(pool)
        .await
        .context("Failed to create blog")?;

    get_by_id_sqlite(pool, result.last_insert_rowid())
        .await?
        .context("Blog not found after insert")
}

async fn get_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Blog>> {
    let row = sqlx::query_as::<_, DbBlog>(&select_by_id())
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get blog")?;
    Ok(row.map(Blog::from))
}

async fn list_sqlite(pool: &SqlitePool) -> Result<Vec<Blog>> {
    let rows = sqlx::query_as::<_, DbBlog>(&select_all())
        .fetch_all(pool)
        .await
        .context("Failed to list blogs")?;
    Ok(rows.into_iter().map(Blog::from).collect())
}

async fn update_sqlite(pool: &SqlitePool, blog: &Blog) -> Result<Option<Blog>> {
    sqlx::query(UPDATE)
        .bind(&blog.title)
        .bind(&blog.text)
        .bind(&blog.image)
        .bind(&blog.image_file_path)
        .bind(&blog.image_file_name)
        .bind(Json(&blog.link_tags))
        .bind(blog.tags.as_ref().map(Json))
        .bind(blog.id)
        .execute(pool)
        .await
        .context("Failed to update blog")?;
    get_by_id_sqlite(pool, blog.id).await
}

// MySQL implementations
async fn create_mysql(pool: &MySqlPool, blog: &Blog) -> Result<Blog> {
    let result = sqlx::query(INSERT)
        .bind(&blog.title)
        .bind(&blog.text)
        .bind(&blog.image)
        .bind(&blog.image_file_path)
        .bind(&blog.image_file_name)
        .bind(Json(&blog.link_tags))
        .bind(blog.tags.as_ref().map(Json))
        .bind(Utc::now())
        .execute(pool)
        .await
        .context("Failed to create blog")?;

    get_by_id_mysql(pool, result.last_insert_id() as i64)
        .await?
        .context("Blog not found after insert")
}

async fn get_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Blog>> {
    let row = sqlx::query_as::<_, DbBlog>(&select_by_id())
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get blog")?;
    Ok(row.map(Blog::from))
}

async fn list_mysql(pool: &MySqlPool) -> Result<Vec<Blog>> {
    let rows = sqlx::query_as::<_, DbBlog>(&select_all())
        .fetch_all(pool)
        .await
        .context("Failed to list blogs")?;
    Ok(rows.into_iter().map(Blog::from).collect())
}

async fn update_mysql(pool: &MySqlPool, blog: &Blog) -> Result<Option<Blog>> {
    sqlx::query(UPDATE)
        .bind(&blog.title)
        .bind(&blog.text)
        .bind(&blog.image)
        .bind(&blog.image_file_path)
        .bind(&blog.image_file_name)
        .bind(Json(&blog.link_tags))
        .bind(blog.tags.as_ref().map(Json))
        .bind(blog.id)
        .execute(pool)
        .await
        .context("Failed to update blog")?;
    get_by_id_mysql(pool, blog.id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations::run_migrations};
    use crate::models::LinkFollow;

    async fn setup() -> Arc<dyn BlogRepository> {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        run_migrations(&pool).await.expect("Failed to run migrations");
        SqlxBlogRepository::boxed(pool)
    }

    fn draft(title: &str) -> Blog {
        Blog {
            id: 0,
            title: title.to_string(),
            text: "body".to_string(),
            image: None,
            image_file_path: None,
            image_file_name: None,
            link_tags: vec![],
            tags: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_round_trips_tags() {
        let repo = setup().await;
        let mut blog = draft("Tags");
        blog.link_tags = vec![BlogTag {
            name: "rust".into(),
            url: Some("https://rust-lang.org".into()),
            follow: Some(LinkFollow::Nofollow),
        }];
        blog.tags = Some(vec!["rust".into()]);

        let created = repo.create(&blog).await.unwrap();
        assert!(created.id > 0);

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.link_tags, blog.link_tags);
        assert_eq!(fetched.tags, Some(vec!["rust".to_string()]));
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let repo = setup().await;
        let first = repo.create(&draft("first")).await.unwrap();
        let second = repo.create(&draft("second")).await.unwrap();

        let ids: Vec<i64> = repo.list().await.unwrap().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_update_missing_row_returns_none() {
        let repo = setup().await;
        let mut ghost = draft("ghost");
        ghost.id = 404;
        assert!(repo.update(&ghost).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_clears_nullable_columns() {
        let repo = setup().await;
        let mut blog = draft("img");
        blog.image = Some("a.png".into());
        blog.tags = Some(vec!["x".into()]);
        let mut created = repo.create(&blog).await.unwrap();

        created.image = None;
        created.tags = None;
        let updated = repo.update(&created).await.unwrap().unwrap();
        assert_eq!(updated.image, None);
        assert_eq!(updated.tags, None);
    }

    #[tokio::test]
    async fn test_delete_reports_whether_row_existed() {
        let repo = setup().await;
        let created = repo.create(&draft("bye")).await.unwrap();

        assert!(repo.delete(created.id).await.unwrap());
        assert!(!repo.delete(created.id).await.unwrap());
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
    }
}
