//! Offered course repository

use crate::db::{Backend, DynDatabasePool};
use crate::models::OfferedCourse;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, MySqlPool, SqlitePool};
use std::sync::Arc;

#[async_trait]
pub trait OfferedCourseRepository: Send + Sync {
    async fn create(&self, course: &OfferedCourse) -> Result<OfferedCourse>;
    async fn get_by_id(&self, id: i64) -> Result<Option<OfferedCourse>>;
    async fn list(&self, limit: Option<i64>) -> Result<Vec<OfferedCourse>>;
    async fn update(&self, course: &OfferedCourse) -> Result<Option<OfferedCourse>>;
    async fn delete(&self, id: i64) -> Result<bool>;
}

pub struct SqlxOfferedCourseRepository {
    pool: DynDatabasePool,
}

impl SqlxOfferedCourseRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn OfferedCourseRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl OfferedCourseRepository for SqlxOfferedCourseRepository {
    async fn create(&self, course: &OfferedCourse) -> Result<OfferedCourse> {
        match self.pool.backend()? {
            Backend::Sqlite(p) => create_sqlite(p, course).await,
            Backend::Mysql(p) => create_mysql(p, course).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<OfferedCourse>> {
        let row = match self.pool.backend()? {
            Backend::Sqlite(p) => fetch_sqlite(p, id).await,
            Backend::Mysql(p) => fetch_mysql(p, id).await,
        }?;
        Ok(row.map(OfferedCourse::from))
    }

    async fn list(&self, limit: Option<i64>) -> Result<Vec<OfferedCourse>> {
        let limit = limit.unwrap_or(i64::MAX);
        let rows = match self.pool.backend()? {
            Backend::Sqlite(p) => sqlx::query_as::<_, DbOfferedCourse>(&select_all()).bind(limit).fetch_all(p).await,
            Backend::Mysql(p) => sqlx::query_as::<_, DbOfferedCourse>(&select_all()).bind(limit).fetch_all(p).await,
        }
        .context("Failed to list offered courses")?;
        Ok(rows.into_iter().map(OfferedCourse::from).collect())
    }

    async fn update(&self, course: &OfferedCourse) -> Result<Option<OfferedCourse>> {
        match self.pool.backend()? {
            Backend::Sqlite(p) => update_sqlite(p, course).await,
            Backend::Mysql(p) => update_mysql(p, course).await,
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

const COLUMNS: &str = "id, title, image, lecturers, lecturers_details, course_details, quantity_of_lessons, \
    quantity_of_students, price, old_price, syllabus_title, syllabus_content, course_icon, text, \
    course_category, discount_percentage, lesson_time, start_course, section_image, created_at";

const INSERT: &str = "INSERT INTO offered_course (title, image, lecturers, lecturers_details, course_details, \
    quantity_of_lessons, quantity_of_students, price, old_price, syllabus_title, syllabus_content, course_icon, \
    text, course_category, discount_percentage, lesson_time, start_course, section_image, created_at) \
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

const UPDATE: &str = "UPDATE offered_course SET title = ?, image = ?, lecturers = ?, lecturers_details = ?, \
    course_details = ?, quantity_of_lessons = ?, quantity_of_students = ?, price = ?, old_price = ?, \
    syllabus_title = ?, syllabus_content = ?, course_icon = ?, text = ?, course_category = ?, \
    discount_percentage = ?, lesson_time = ?, start_course = ?, section_image = ? WHERE id = ?";

const DELETE: &str = "DELETE FROM offered_course WHERE id = ?";

fn select_by_id() -> String {
    format!("SELECT {} FROM offered_course WHERE id = ?", COLUMNS)
}

fn select_all() -> String {
    format!(
        "SELECT {} FROM offered_course ORDER BY created_at DESC, id DESC LIMIT ?",
        COLUMNS
    )
}

#[derive(Debug, FromRow)]
struct DbOfferedCourse {
    id: i64,
    title: String,
    image: Option<String>,
    lecturers: Json<Vec<String>>,
    lecturers_details: Json<Vec<String>>,
    course_details: Json<Vec<String>>,
    quantity_of_lessons: String,
    quantity_of_students: Option<String>,
    price: f64,
    old_price: Option<f64>,
    syllabus_title: Json<Vec<String>>,
    syllabus_content: Json<Vec<Vec<String>>>,
    course_icon: Option<String>,
    text: Option<String>,
    course_category: Json<Vec<String>>,
    discount_percentage: Option<String>,
    lesson_time: Option<String>,
    start_course: Option<String>,
    section_image: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<DbOfferedCourse> for OfferedCourse {
    fn from(row: DbOfferedCourse) -> Self {
        OfferedCourse {
            id: row.id,
            title: row.title,
            image: row.image,
            lecturers: row.lecturers.0,
            lecturers_details: row.lecturers_details.0,
            course_details: row.course_details.0,
            quantity_of_lessons: row.quantity_of_lessons,
            quantity_of_students: row.quantity_of_students,
            price: row.price,
            old_price: row.old_price,
            syllabus_title: row.syllabus_title.0,
            syllabus_content: row.syllabus_content.0,
            course_icon: row.course_icon,
            text: row.text,
            course_category: row.course_category.0,
            discount_percentage: row.discount_percentage,
            lesson_time: row.lesson_time,
            start_course: row.start_course,
            section_image: row.section_image,
            created_at: row.created_at,
        }
    }
}

// SQLite implementations
async fn create_sqlite(pool: &SqlitePool, c: &OfferedCourse) -> Result<OfferedCourse> {
    let result = sqlx::query(INSERT)
        .bind(&c.title)
        .bind(&c.image)
        .bind(Json(&c.lecturers))
        .bind(Json(&c.lecturers_details))
        .bind(Json(&c.course_details))
        .bind(&c.quantity_of_lessons)
        .bind(&c.quantity_of_students)
        .bind(c.price)
        .bind(c.old_price)
        .bind(Json(&c.syllabus_title))
        .bind(Json(&c.syllabus_content))
        .bind(&c.course_icon)
        .bind(&c.text)
        .bind(Json(&c.course_category))
        .bind(&c.discount_percentage)
        .bind(&c.lesson_time)
        .bind(&c.start_course)
        .bind(&c.section_image)
        .bind(Utc::now())
        .execute(pool)
        .await
        .context("Failed to create offered course")?;

    fetch_sqlite(pool, result.last_insert_rowid())
        .await?
        .map(OfferedCourse::from)
        .context("Offered course not found after insert")
}

async fn fetch_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<DbOfferedCourse>> {
    sqlx::query_as::<_, DbOfferedCourse>(&select_by_id())
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get offered course")
}

async fn update_sqlite(pool: &SqlitePool, c: &OfferedCourse) -> Result<Option<OfferedCourse>> {
    sqlx::query(UPDATE)
        .bind(&c.title)
        .bind(&c.image)
        .bind(Json(&c.lecturers))
        .bind(Json(&c.lecturers_details))
        .bind(Json(&c.course_details))
        .bind(&c.quantity_of_lessons)
        .bind(&c.quantity_of_students)
        .bind(c.price)
        .bind(c.old_price)
        .bind(Json(&c.syllabus_title))
        .bind(Json(&c.syllabus_content))
        .bind(&c.course_icon)
        .bind(&c.text)
        .bind(Json(&c.course_category))
        .bind(&c.discount_percentage)
        .bind(&c.lesson_time)
        .bind(&c.start_course)
        .bind(&c.section_image)
        .bind(c.id)
        .execute(pool)
        .await
        .context("Failed to update offered course")?;
    Ok(fetch_sqlite(pool, c.id).await?.map(OfferedCourse::from))
}

// MySQL implementations
async fn create_mysql(pool: &MySqlPool, c: &OfferedCourse) -> Result<OfferedCourse> {
    let result = sqlx::query(INSERT)
        .bind(&c.title)
        .bind(&c.image)
        .bind(Json(&c.lecturers))
        .bind(Json(&c.lecturers_details))
        .bind(Json(&c.course_details))
        .bind(&c.quantity_of_lessons)
        .bind(&c.quantity_of_students)
        .bind(c.price)
        .bind(c.old_price)
        .bind(Json(&c.syllabus_title))
        .bind(Json(&c.syllabus_content))
        .bind(&c.course_icon)
        .bind(&c.text)
        .bind(Json(&c.course_category))
        .bind(&c.discount_percentage)
        .bind(&c.lesson_time)
        .bind(&c.start_course)
        .bind(&c.section_image)
        .bind(Utc::now())
        .execute(pool)
        .await
        .context("Failed to create offered course")?;

    fetch_mysql(pool, result.last_insert_id() as i64)
        .await?
        .map(OfferedCourse::from)
        .context("Offered course not found after insert")
}

async fn fetch_mysql(pool: &MySqlPool, id: i64) -> Result<Option<DbOfferedCourse>> {
    sqlx::query_as::<_, DbOfferedCourse>(&select_by_id())
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get offered course")
}

async fn update_mysql(pool: &MySqlPool, c: &OfferedCourse) -> Result<Option<OfferedCourse>> {
    sqlx::query(UPDATE)
        .bind(&c.title)
        .bind(&c.image)
        .bind(Json(&c.lecturers))
        .bind(Json(&c.lecturers_details))
        .bind(Json(&c.course_details))
        .bind(&c.quantity_of_lessons)
        .bind(&c.quantity_of_students)
        .bind(c.price)
        .bind(c.old_price)
        .bind(Json(&c.syllabus_title))
        .bind(Json(&c.syllabus_content))
        .bind(&c.course_icon)
        .bind(&c.text)
        .bind(Json(&c.course_category))
        .bind(&c.discount_percentage)
        .bind(&c.lesson_time)
        .bind(&c.start_course)
        .bind(&c.section_image)
        .bind(c.id)
        .execute(pool)
        .await
        .context("Failed to update offered course")?;
    Ok(fetch_mysql(pool, c.id).await?.map(OfferedCourse::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations::run_migrations};

    async fn setup() -> Arc<dyn OfferedCourseRepository> {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        run_migrations(&pool).await.expect("Failed to run migrations");
        SqlxOfferedCourseRepository::boxed(pool)
    }

    fn draft(title: &str) -> OfferedCourse {
        OfferedCourse {
            id: 0,
            title: title.to_string(),
            image: None,
            lecturers: vec!["Nino".into()],
            lecturers_details: vec![String::new()],
            course_details: vec![String::new()],
            quantity_of_lessons: "8".into(),
            quantity_of_students: None,
            price: 200.0,
            old_price: Some(250.0),
            syllabus_title: vec![String::new()],
            syllabus_content: vec![vec![String::new()]],
            course_icon: None,
            text: None,
            course_category: vec!["design".into()],
            discount_percentage: Some("20".into()),
            lesson_time: None,
            start_course: None,
            section_image: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_get_list() {
        let repo = setup().await;
        let created = repo.create(&draft("Figma")).await.unwrap();
        repo.create(&draft("Webflow")).await.unwrap();

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.lecturers, vec!["Nino".to_string()]);
        assert_eq!(fetched.syllabus_content, vec![vec![String::new()]]);
        assert_eq!(fetched.discount_percentage.as_deref(), Some("20"));

        let listed = repo.list(Some(1)).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Webflow");
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = setup().await;
        let mut course = repo.create(&draft("Figma")).await.unwrap();
        course.price = 150.0;
        course.course_category = vec![];

        let updated = repo.update(&course).await.unwrap().unwrap();
        assert_eq!(updated.price, 150.0);
        assert!(updated.course_category.is_empty());

        assert!(repo.delete(course.id).await.unwrap());
        assert!(repo.get_by_id(course.id).await.unwrap().is_none());
    }
}
