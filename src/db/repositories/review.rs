//! Review repository

use crate::db::{Backend, DynDatabasePool};
use crate::models::Review;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn create(&self, review: &Review) -> Result<Review>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Review>>;
    async fn list(&self) -> Result<Vec<Review>>;
    /// Also refreshes `updated_at`
    async fn update(&self, review: &Review) -> Result<Option<Review>>;
    async fn delete(&self, id: i64) -> Result<bool>;
}

pub struct SqlxReviewRepository {
    pool: DynDatabasePool,
}

impl SqlxReviewRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ReviewRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ReviewRepository for SqlxReviewRepository {
    async fn create(&self, review: &Review) -> Result<Review> {
        match self.pool.backend()? {
            Backend::Sqlite(p) => create_sqlite(p, review).await,
            Backend::Mysql(p) => create_mysql(p, review).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Review>> {
        match self.pool.backend()? {
            Backend::Sqlite(p) => get_by_id_sqlite(p, id).await,
            Backend::Mysql(p) => get_by_id_mysql(p, id).await,
        }
    }

    async fn list(&self) -> Result<Vec<Review>> {
        match self.pool.backend()? {
            Backend::Sqlite(p) => {
                let rows = sqlx::query(SELECT_ALL)
                    .fetch_all(p)
                    .await
                    .context("Failed to list reviews")?;
                Ok(rows.iter().map(row_to_review_sqlite).collect())
            }
            Backend::Mysql(p) => {
                let rows = sqlx::query(SELECT_ALL)
                    .fetch_all(p)
                    .await
                    .context("Failed to list reviews")?;
                Ok(rows.iter().map(row_to_review_mysql).collect())
            }
        }
    }

    async fn update(&self, review: &Review) -> Result<Option<Review>> {
        match self.pool.backend()? {
            Backend::Sqlite(p) => update_sqlite(p, review).await,
            Backend::Mysql(p) => update_mysql(p, review).await,
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

const SELECT_BY_ID: &str = "SELECT id, text, full_name, course, course_link, student_picture, created_at, updated_at FROM review WHERE id = ?";
const SELECT_ALL: &str = "SELECT id, text, full_name, course, course_link, student_picture, created_at, updated_at FROM review ORDER BY created_at DESC, id DESC";
const INSERT: &str = "INSERT INTO review (text, full_name, course, course_link, student_picture, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)";
const UPDATE: &str = "UPDATE review SET text = ?, full_name = ?, course = ?, course_link = ?, student_picture = ?, updated_at = ? WHERE id = ?";
const DELETE: &str = "DELETE FROM review WHERE id = ?";

// SQLite implementations
async fn create_sqlite(pool: &SqlitePool, review: &Review) -> Result<Review> {
    let now = Utc::now();
    let result = sqlx::query(INSERT)
        .bind(&review.text)
        .bind(&review.full_name)
        .bind(&review.course)
        .bind(&review.course_link)
        .bind(&review.student_picture)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to create review")?;

    Ok(Review {
        id: result.last_insert_rowid(),
        created_at: now,
        updated_at: now,
        ..review.clone()
    })
}

async fn get_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Review>> {
    let row = sqlx::query(SELECT_BY_ID)
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get review")?;
    Ok(row.as_ref().map(row_to_review_sqlite))
}

async fn update_sqlite(pool: &SqlitePool, review: &Review) -> Result<Option<Review>> {
    sqlx::query(UPDATE)
        .bind(&review.text)
        .bind(&review.full_name)
        .bind(&review.course)
        .bind(&review.course_link)
        .bind(&review.student_picture)
        .bind(Utc::now())
        .bind(review.id)
        .execute(pool)
        .await
        .context("Failed to update review")?;
    get_by_id_sqlite(pool, review.id).await
}

fn row_to_review_sqlite(row: &sqlx::sqlite::SqliteRow) -> Review {
    Review {
        id: row.get("id"),
        text: row.get("text"),
        full_name: row.get("full_name"),
        course: row.get("course"),
        course_link: row.get("course_link"),
        student_picture: row.get("student_picture"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

// MySQL implementations
async fn create_mysql(pool: &MySqlPool, review: &Review) -> Result<Review> {
    let now = Utc::now();
    let result = sqlx::query(INSERT)
        .bind(&review.text)
        .bind(&review.full_name)
        .bind(&review.course)
        .bind(&review.course_link)
        .bind(&review.student_picture)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to create review")?;

    get_by_id_mysql(pool, result.last_insert_id() as i64)
        .await?
        .context("Review not found after insert")
}

async fn get_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Review>> {
    let row = sqlx::query(SELECT_BY_ID)
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get review")?;
    Ok(row.as_ref().map(row_to_review_mysql))
}

async fn update_mysql(pool: &MySqlPool, review: &Review) -> Result<Option<Review>> {
    sqlx::query(UPDATE)
        .bind(&review.text)
        .bind(&review.full_name)
        .bind(&review.course)
        .bind(&review.course_link)
        .bind(&review.student_picture)
        .bind(Utc::now())
        .bind(review.id)
        .execute(pool)
        .await
        .context("Failed to update review")?;
    get_by_id_mysql(pool, review.id).await
}

fn row_to_review_mysql(row: &sqlx::mysql::MySqlRow) -> Review {
    Review {
        id: row.get("id"),
        text: row.get("text"),
        full_name: row.get("full_name"),
        course: row.get("course"),
        course_link: row.get("course_link"),
        student_picture: row.get("student_picture"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
