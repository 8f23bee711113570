//! Slider repository

use crate::db::{Backend, DynDatabasePool};
use crate::models::{course_id_from_link, Slider};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, MySqlPool, SqlitePool};
use std::sync::Arc;

#[async_trait]
pub trait SliderRepository: Send + Sync {
    /// Insert a row and return its id
    async fn insert(&self, slider: &Slider) -> Result<i64>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Slider>>;
    async fn list(&self) -> Result<Vec<Slider>>;
    async fn update(&self, slider: &Slider) -> Result<Option<Slider>>;
    /// Write only the image column of an existing row
    async fn attach_image(&self, id: i64, image: &str) -> Result<()>;
    async fn delete(&self, id: i64) -> Result<bool>;
}

pub struct SqlxSliderRepository {
    pool: DynDatabasePool,
}

impl SqlxSliderRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn SliderRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl SliderRepository for SqlxSliderRepository {
    async fn insert(&self, slider: &Slider) -> Result<i64> {
        match self.pool.backend()? {
            Backend::Sqlite(p) => insert_sqlite(p, slider).await,
            Backend::Mysql(p) => insert_mysql(p, slider).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Slider>> {
        let row = match self.pool.backend()? {
            Backend::Sqlite(p) => sqlx::query_as::<_, DbSlider>(SELECT_BY_ID).bind(id).fetch_optional(p).await,
            Backend::Mysql(p) => sqlx::query_as::<_, DbSlider>(SELECT_BY_ID).bind(id).fetch_optional(p).await,
        }
        .context("Failed to get slider")?;
        Ok(row.map(Slider::from))
    }

    async fn list(&self) -> Result<Vec<Slider>> {
        let rows = match self.pool.backend()? {
            Backend::Sqlite(p) => sqlx::query_as::<_, DbSlider>(SELECT_ALL).fetch_all(p).await,
            Backend::Mysql(p) => sqlx::query_as::<_, DbSlider>(SELECT_ALL).fetch_all(p).await,
        }
        .context("Failed to list sliders")?;
        Ok(rows.into_iter().map(Slider::from).collect())
    }

    async fn update(&self, slider: &Slider) -> Result<Option<Slider>> {
        match self.pool.backend()? {
            Backend::Sqlite(p) => update_sqlite(p, slider).await?,
            Backend::Mysql(p) => update_mysql(p, slider).await?,
        }
        self.get_by_id(slider.id).await
    }

    async fn attach_image(&self, id: i64, image: &str) -> Result<()> {
        match self.pool.backend()? {
            Backend::Sqlite(p) => sqlx::query(ATTACH_IMAGE).bind(image).bind(id).execute(p).await.map(|_| ()),
            Backend::Mysql(p) => sqlx::query(ATTACH_IMAGE).bind(image).bind(id).execute(p).await.map(|_| ()),
        }
        .context("Failed to attach slider image")
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let affected = match self.pool.backend()? {
            Backend::Sqlite(p) => sqlx::query(DELETE).bind(id).execute(p).await?.rows_affected(),
            Backend::Mysql(p) => sqlx::query(DELETE).bind(id).execute(p).await?.rows_affected(),
        };
        Ok(affected > 0)
    }
}

const SELECT_BY_ID: &str = "SELECT id, title, text, image, button_link, created_at FROM slider WHERE id = ?";
const SELECT_ALL: &str =
    "SELECT id, title, text, image, button_link, created_at FROM slider ORDER BY created_at DESC, id DESC";
const INSERT: &str = "INSERT INTO slider (title, text, image, button_link, created_at) VALUES (?, ?, ?, ?, ?)";
const UPDATE: &str = "UPDATE slider SET title = ?, text = ?, image = ?, button_link = ? WHERE id = ?";
const ATTACH_IMAGE: &str = "UPDATE slider SET image = ? WHERE id = ?";
const DELETE: &str = "DELETE FROM slider WHERE id = ?";

#[derive(Debug, FromRow)]
struct DbSlider {
    id: i64,
    title: Option<String>,
    text: Option<String>,
    image: Option<String>,
    button_link: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<DbSlider> for Slider {
    fn from(row: DbSlider) -> Self {
        let course_id = row.button_link.as_deref().and_then(course_id_from_link);
        Slider {
            id: row.id,
            title: row.title,
            text: row.text,
            image: row.image,
            button_link: row.button_link,
            course_id,
            created_at: row.created_at,
        }
    }
}

async fn insert_sqlite(pool: &SqlitePool, s: &Slider) -> Result<i64> {
    let result = sqlx::query(INSERT)
        .bind(&s.title)
        .bind(&s.text)
        .bind(&s.image)
        .bind(&s.button_link)
        .bind(Utc::now())
        .execute(pool)
        .await
        .context("Failed to create slider")?;
    Ok(result.last_insert_rowid())
}

async fn update_sqlite(pool: &SqlitePool, s: &Slider) -> Result<()> {
    sqlx::query(UPDATE)
        .bind(&s.title)
        .bind(&s.text)
        .bind(&s.image)
        .bind(&s.button_link)
        .bind(s.id)
        .execute(pool)
        .await
        .context("Failed to update slider")?;
    Ok(())
}

async fn insert_mysql(pool: &MySqlPool, s: &Slider) -> Result<i64> {
    let result = sqlx::query(INSERT)
        .bind(&s.title)
        .bind(&s.text)
        .bind(&s.image)
        .bind(&s.button_link)
        .bind(Utc::now())
        .execute(pool)
        .await
        .context("Failed to create slider")?;
    Ok(result.last_insert_id() as i64)
}

async fn update_mysql(pool: &MySqlPool, s: &Slider) -> Result<()> {
    sqlx::query(UPDATE)
        .bind(&s.title)
        .bind(&s.text)
        .bind(&s.image)
        .bind(&s.button_link)
        .bind(s.id)
        .execute(pool)
        .await
        .context("Failed to update slider")?;
    Ok(())
}
