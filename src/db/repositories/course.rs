//! Course repository

use crate::db::{Backend, DynDatabasePool};
use crate::models::Course;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, MySqlPool, SqlitePool};
use std::sync::Arc;

#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn create(&self, course: &Course) -> Result<Course>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Course>>;
    /// Newest first, at most `limit` rows when given
    async fn list(&self, limit: Option<i64>) -> Result<Vec<Course>>;
    async fn update(&self, course: &Course) -> Result<Option<Course>>;
    async fn delete(&self, id: i64) -> Result<bool>;
}

pub struct SqlxCourseRepository {
    pool: DynDatabasePool,
}

impl SqlxCourseRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn CourseRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl CourseRepository for SqlxCourseRepository {
    async fn create(&self, course: &Course) -> Result<Course> {
        match self.pool.backend()? {
            Backend::Sqlite(p) => create_sqlite(p, course).await,
            Backend::Mysql(p) => create_mysql(p, course).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Course>> {
        match self.pool.backend()? {
            Backend::Sqlite(p) => get_by_id_sqlite(p, id).await,
            Backend::Mysql(p) => get_by_id_mysql(p, id).await,
        }
    }

    async fn list(&self, limit: Option<i64>) -> Result<Vec<Course>> {
        let limit = limit.unwrap_or(i64::MAX);
        let rows = match self.pool.backend()? {
            Backend::Sqlite(p) => sqlx::query_as::<_, DbCourse>(&select_all()).bind(limit).fetch_all(p).await,
            Backend::Mysql(p) => sqlx::query_as::<_, DbCourse>(&select_all()).bind(limit).fetch_all(p).await,
        }
        .context("Failed to list courses")?;
        Ok(rows.into_iter().map(Course::from).collect())
    }

    async fn update(&self, course: &Course) -> Result<Option<Course>> {
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

const COLUMNS: &str = "id, title, course_details, image, image_file_path, course_icon, start_course, \
    quantity_lessons, quantity_of_students, lesson_time, lecturer, lecturer_details, price, oldprice, \
    syllabus_title, syllabus_content, section_image, created_at";

const INSERT: &str = "INSERT INTO courses (title, course_details, image, image_file_path, course_icon, \
    start_course, quantity_lessons, quantity_of_students, lesson_time, lecturer, lecturer_details, price, \
    oldprice, syllabus_title, syllabus_content, section_image, created_at) \
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

const UPDATE: &str = "UPDATE courses SET title = ?, course_details = ?, image = ?, image_file_path = ?, \
    course_icon = ?, start_course = ?, quantity_lessons = ?, quantity_of_students = ?, lesson_time = ?, \
    lecturer = ?, lecturer_details = ?, price = ?, oldprice = ?, syllabus_title = ?, syllabus_content = ?, \
    section_image = ? WHERE id = ?";

const DELETE: &str = "DELETE FROM courses WHERE id = ?";

fn select_by_id() -> String {
    format!("SELECT {} FROM courses WHERE id = ?", COLUMNS)
}

fn select_all() -> String {
    format!("SELECT {} FROM courses ORDER BY created_at DESC, id DESC LIMIT ?", COLUMNS)
}

/// Row shape of the `courses` table
#[derive(Debug, FromRow)]
struct DbCourse {
    id: i64,
    title: String,
    course_details: Option<Json<Vec<String>>>,
    image: Option<String>,
    image_file_path: Option<String>,
    course_icon: Option<String>,
    start_course: Option<String>,
    quantity_lessons: Option<i64>,
    quantity_of_students: Option<String>,
    lesson_time: Option<i64>,
    lecturer: Option<String>,
    lecturer_details: Option<String>,
    price: Option<f64>,
    oldprice: Option<f64>,
    syllabus_title: Option<Json<Vec<String>>>,
    syllabus_content: Option<Json<Vec<Vec<String>>>>,
    section_image: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<DbCourse> for Course {
    fn from(row: DbCourse) -> Self {
        Course {
            id: row.id,
            title: row.title,
            course_details: row.course_details.map(|j| j.0),
            image: row.image,
            image_file_path: row.image_file_path,
            course_icon: row.course_icon,
            start_course: row.start_course,
            quantity_lessons: row.quantity_lessons,
            quantity_of_students: row.quantity_of_students,
            lesson_time: row.lesson_time,
            lecturer: row.lecturer,
            lecturer_details: row.lecturer_details,
            price: row.price,
            oldprice: row.oldprice,
            syllabus_title: row.syllabus_title.map(|j| j.0),
            syllabus_content: row.syllabus_content.map(|j| j.0),
            section_image: row.section_image,
            created_at: row.created_at,
        }
    }
}

// SQLite implementations
async fn create_sqlite(pool: &SqlitePool, c: &Course) -> Result<Course> {
    let result = sqlx::query(INSERT)
        .bind(&c.title)
        .bind(c.course_details.as_ref().map(Json))
        .bind(&c.image)
        .bind(&c.image_file_path)
        .bind(&c.course_icon)
        .bind(&c.start_course)
        .bind(c.quantity_lessons)
        .bind(&c.quantity_of_students)
        .bind(c.lesson_time)
        .bind(&c.lecturer)
        .bind(&c.lecturer_details)
        .bind(c.price)
        .bind(c.oldprice)
        .bind(c.syllabus_title.as_ref().map(Json))
        .bind(c.syllabus_content.as_ref().map(Json))
        .bind(&c.section_image)
        .bind(Utc::now())
        .execute(pool)
        .await
        .context("Failed to create course")?;

    get_by_id_sqlite(pool, result.last_insert_rowid())
        .await?
        .context("Course not found after insert")
}

async fn get_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Course>> {
    let row = sqlx::query_as::<_, DbCourse>(&select_by_id())
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get course")?;
    Ok(row.map(Course::from))
}

async fn update_sqlite(pool: &SqlitePool, c: &Course) -> Result<Option<Course>> {
    sqlx::query(UPDATE)
        .bind(&c.title)
        .bind(c.course_details.as_ref().map(Json))
        .bind(&c.image)
        .bind(&c.image_file_path)
        .bind(&c.course_icon)
        .bind(&c.start_course)
        .bind(c.quantity_lessons)
        .bind(&c.quantity_of_students)
        .bind(c.lesson_time)
        .bind(&c.lecturer)
        .bind(&c.lecturer_details)
        .bind(c.price)
        .bind(c.oldprice)
        .bind(c.syllabus_title.as_ref().map(Json))
        .bind(c.syllabus_content.as_ref().map(Json))
        .bind(&c.section_image)
        .bind(c.id)
        .execute(pool)
        .await
        .context("Failed to update course")?;
    get_by_id_sqlite(pool, c.id).await
}

// MySQL implementations
async fn create_mysql(pool: &MySqlPool, c: &Course) -> Result<Course> {
    let result = sqlx::query(INSERT)
        .bind(&c.title)
        .bind(c.course_details.as_ref().map(Json))
        .bind(&c.image)
        .bind(&c.image_file_path)
        .bind(&c.course_icon)
        .bind(&c.start_course)
        .bind(c.quantity_lessons)
        .bind(&c.quantity_of_students)
        .bind(c.lesson_time)
        .bind(&c.lecturer)
        .bind(&c.lecturer_details)
        .bind(c.price)
        .bind(c.oldprice)
        .bind(c.syllabus_title.as_ref().map(Json))
        .bind(c.syllabus_content.as_ref().map(Json))
        .bind(&c.section_image)
        .bind(Utc::now())
        .execute(pool)
        .await
        .context("Failed to create course")?;

    get_by_id_mysql(pool, result.last_insert_id() as i64)
        .await?
        .context("Course not found after insert")
}

async fn get_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Course>> {
    let row = sqlx::query_as::<_, DbCourse>(&select_by_id())
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get course")?;
    Ok(row.map(Course::from))
}

async fn update_mysql(pool: &MySqlPool, c: &Course) -> Result<Option<Course>> {
    sqlx::query(UPDATE)
        .bind(&c.title)
        .bind(c.course_details.as_ref().map(Json))
        .bind(&c.image)
        .bind(&c.image_file_path)
        .bind(&c.course_icon)
        .bind(&c.start_course)
        .bind(c.quantity_lessons)
        .bind(&c.quantity_of_students)
        .bind(c.lesson_time)
        .bind(&c.lecturer)
        .bind(&c.lecturer_details)
        .bind(c.price)
        .bind(c.oldprice)
        .bind(c.syllabus_title.as_ref().map(Json))
        .bind(c.syllabus_content.as_ref().map(Json))
        .bind(&c.section_image)
        .bind(c.id)
        .execute(pool)
        .await
        .context("Failed to update course")?;
    get_by_id_mysql(pool, c.id).await
}
