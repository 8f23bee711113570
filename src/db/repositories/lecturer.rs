//! Lecturer repository

use crate::db::{Backend, DynDatabasePool};
use crate::models::Lecturer;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::sync::Arc;

#[async_trait]
pub trait LecturerRepository: Send + Sync {
    async fn create(&self, lecturer: &Lecturer) -> Result<Lecturer>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Lecturer>>;
    async fn list(&self) -> Result<Vec<Lecturer>>;
    /// Also refreshes `updated_at`
    async fn update(&self, lecturer: &Lecturer) -> Result<Option<Lecturer>>;
    async fn delete(&self, id: i64) -> Result<bool>;
}

pub struct SqlxLecturerRepository {
    pool: DynDatabasePool,
}

impl SqlxLecturerRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn LecturerRepository> {
        Arc::new(Self::new(pool))
    }
}

const SELECT_BY_ID: &str =
    "SELECT id, full_name, field, lecturer_image, created_at, updated_at FROM lecturers WHERE id = ?";
const SELECT_ALL: &str = "SELECT id, full_name, field, lecturer_image, created_at, updated_at FROM lecturers ORDER BY created_at DESC, id DESC";
const INSERT: &str =
    "INSERT INTO lecturers (full_name, field, lecturer_image, created_at, updated_at) VALUES (?, ?, ?, ?, ?)";
const UPDATE: &str =
    "UPDATE lecturers SET full_name = ?, field = ?, lecturer_image = ?, updated_at = ? WHERE id = ?";
const DELETE: &str = "DELETE FROM lecturers WHERE id = ?";

#[derive(Debug, FromRow)]
struct DbLecturer {
    id: i64,
    full_name: String,
    field: String,
    lecturer_image: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DbLecturer> for Lecturer {
    fn from(row: DbLecturer) -> Self {
        Lecturer {
            id: row.id,
            full_name: row.full_name,
            field: row.field,
            lecturer_image: row.lecturer_image,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl LecturerRepository for SqlxLecturerRepository {
    async fn create(&self, lecturer: &Lecturer) -> Result<Lecturer> {
        let now = Utc::now();
        let id = match self.pool.backend()? {
            Backend::Sqlite(p) => sqlx::query(INSERT)
                .bind(&lecturer.full_name)
                .bind(&lecturer.field)
                .bind(&lecturer.lecturer_image)
                .bind(now)
                .bind(now)
                .execute(p)
                .await
                .map(|r| r.last_insert_rowid()),
            Backend::Mysql(p) => sqlx::query(INSERT)
                .bind(&lecturer.full_name)
                .bind(&lecturer.field)
                .bind(&lecturer.lecturer_image)
                .bind(now)
                .bind(now)
                .execute(p)
                .await
                .map(|r| r.last_insert_id() as i64),
        }
        .context("Failed to create lecturer")?;

        self.get_by_id(id)
            .await?
            .context("Lecturer not found after insert")
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Lecturer>> {
        let row = match self.pool.backend()? {
            Backend::Sqlite(p) => sqlx::query_as::<_, DbLecturer>(SELECT_BY_ID).bind(id).fetch_optional(p).await,
            Backend::Mysql(p) => sqlx::query_as::<_, DbLecturer>(SELECT_BY_ID).bind(id).fetch_optional(p).await,
        }
        .context("Failed to get lecturer")?;
        Ok(row.map(Lecturer::from))
    }

    async fn list(&self) -> Result<Vec<Lecturer>> {
        let rows = match self.pool.backend()? {
            Backend::Sqlite(p) => sqlx::query_as::<_, DbLecturer>(SELECT_ALL).fetch_all(p).await,
            Backend::Mysql(p) => sqlx::query_as::<_, DbLecturer>(SELECT_ALL).fetch_all(p).await,
        }
        .context("Failed to list lecturers")?;
        Ok(rows.into_iter().map(Lecturer::from).collect())
    }

    async fn update(&self, lecturer: &Lecturer) -> Result<Option<Lecturer>> {
        let now = Utc::now();
        match self.pool.backend()? {
            Backend::Sqlite(p) => sqlx::query(UPDATE)
                .bind(&lecturer.full_name)
                .bind(&lecturer.field)
                .bind(&lecturer.lecturer_image)
                .bind(now)
                .bind(lecturer.id)
                .execute(p)
                .await
                .map(|_| ()),
            Backend::Mysql(p) => sqlx::query(UPDATE)
                .bind(&lecturer.full_name)
                .bind(&lecturer.field)
                .bind(&lecturer.lecturer_image)
                .bind(now)
                .bind(lecturer.id)
                .execute(p)
                .await
                .map(|_| ()),
        }
        .context("Failed to update lecturer")?;

        self.get_by_id(lecturer.id).await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let affected = match self.pool.backend()? {
            Backend::Sqlite(p) => sqlx::query(DELETE).bind(id).execute(p).await?.rows_affected(),
            Backend::Mysql(p) => sqlx::query(DELETE).bind(id).execute(p).await?.rows_affected(),
        };
        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations::run_migrations};

    async fn setup() -> Arc<dyn LecturerRepository> {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        run_migrations(&pool).await.expect("Failed to run migrations");
        SqlxLecturerRepository::boxed(pool)
    }

    fn draft(name: &str) -> Lecturer {
        Lecturer {
            id: 0,
            full_name: name.into(),
            field: "Data".into(),
            lecturer_image: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_crud_cycle() {
        let repo = setup().await;
        let mut lecturer = repo.create(&draft("Tamar")).await.unwrap();
        assert!(lecturer.id > 0);

        lecturer.field = "Machine Learning".into();
        let updated = repo.update(&lecturer).await.unwrap().unwrap();
        assert_eq!(updated.field, "Machine Learning");

        assert_eq!(repo.list().await.unwrap().len(), 1);
        assert!(repo.delete(lecturer.id).await.unwrap());
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_moves_updated_at_forward() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        run_migrations(&pool).await.expect("Failed to run migrations");
        let repo = SqlxLecturerRepository::boxed(pool.clone());
        let lecturer = repo.create(&draft("Tamar")).await.unwrap();

        let long_ago = Utc::now() - chrono::Duration::days(30);
        sqlx::query("UPDATE lecturers SET updated_at = ? WHERE id = ?")
            .bind(long_ago)
            .bind(lecturer.id)
            .execute(pool.as_sqlite().unwrap())
            .await
            .unwrap();
        let stale = repo.get_by_id(lecturer.id).await.unwrap().unwrap();
        assert!(stale.updated_at < Utc::now() - chrono::Duration::days(29));

        let updated = repo.update(&stale).await.unwrap().unwrap();
        assert!(updated.updated_at > long_ago + chrono::Duration::days(29));
    }
}
