//! Database migrations
//!
//! The schema is embedded in the binary as SQL strings, one pair (SQLite and
//! MySQL) per migration. Applied versions are recorded in `_migrations`.
//!
//! Array-valued fields (blog tags, course details, syllabus) are JSON columns:
//! `TEXT` on SQLite, `JSON` on MySQL.

use anyhow::{Context, Result};
use sqlx::{MySqlPool, Row, SqlitePool};

use super::{Backend, DynDatabasePool};
use crate::config::DatabaseDriver;

/// A database migration with SQL for both SQLite and MySQL
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration version number (must be unique and sequential)
    pub version: i32,
    pub name: &'static str,
    pub up_sqlite: &'static str,
    pub up_mysql: &'static str,
}

pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_blogs",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS blogs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                text TEXT NOT NULL,
                image TEXT,
                image_file_path TEXT,
                image_file_name TEXT,
                link_tags TEXT NOT NULL DEFAULT '[]',
                tags TEXT,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_blogs_created_at ON blogs(created_at);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS blogs (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                title TEXT NOT NULL,
                text LONGTEXT NOT NULL,
                image LONGTEXT,
                image_file_path TEXT,
                image_file_name TEXT,
                link_tags JSON NOT NULL,
                tags JSON,
                created_at TIMESTAMP(6) NOT NULL DEFAULT CURRENT_TIMESTAMP(6)
            );
            CREATE INDEX idx_blogs_created_at ON blogs(created_at);
        "#,
    },
    Migration {
        version: 2,
        name: "create_courses",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS courses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                course_details TEXT,
                image TEXT,
                image_file_path TEXT,
                course_icon TEXT,
                start_course TEXT,
                quantity_lessons INTEGER,
                quantity_of_students TEXT,
                lesson_time INTEGER,
                lecturer TEXT,
                lecturer_details TEXT,
                price REAL,
                oldprice REAL,
                syllabus_title TEXT,
                syllabus_content TEXT,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_courses_created_at ON courses(created_at);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS courses (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                title TEXT NOT NULL,
                course_details JSON,
                image LONGTEXT,
                image_file_path TEXT,
                course_icon LONGTEXT,
                start_course TEXT,
                quantity_lessons BIGINT,
                quantity_of_students TEXT,
                lesson_time BIGINT,
                lecturer TEXT,
                lecturer_details TEXT,
                price DOUBLE,
                oldprice DOUBLE,
                syllabus_title JSON,
                syllabus_content JSON,
                created_at TIMESTAMP(6) NOT NULL DEFAULT CURRENT_TIMESTAMP(6)
            );
            CREATE INDEX idx_courses_created_at ON courses(created_at);
        "#,
    },
    Migration {
        version: 3,
        name: "create_offered_course",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS offered_course (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                image TEXT,
                lecturers TEXT NOT NULL DEFAULT '[]',
                lecturers_details TEXT NOT NULL DEFAULT '[]',
                course_details TEXT NOT NULL DEFAULT '[]',
                quantity_of_lessons TEXT NOT NULL DEFAULT '',
                quantity_of_students TEXT,
                price REAL NOT NULL DEFAULT 0,
                old_price REAL,
                syllabus_title TEXT NOT NULL DEFAULT '[]',
                syllabus_content TEXT NOT NULL DEFAULT '[]',
                course_icon TEXT,
                text TEXT,
                course_category TEXT NOT NULL DEFAULT '[]',
                discount_percentage TEXT,
                lesson_time TEXT,
                start_course TEXT,
                section_image TEXT,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_offered_course_created_at ON offered_course(created_at);
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS offered_course (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                title TEXT NOT NULL,
                image LONGTEXT,
                lecturers JSON NOT NULL,
                lecturers_details JSON NOT NULL,
                course_details JSON NOT NULL,
                quantity_of_lessons VARCHAR(255) NOT NULL DEFAULT '',
                quantity_of_students VARCHAR(255),
                price DOUBLE NOT NULL DEFAULT 0,
                old_price DOUBLE,
                syllabus_title JSON NOT NULL,
                syllabus_content JSON NOT NULL,
                course_icon LONGTEXT,
                text LONGTEXT,
                course_category JSON NOT NULL,
                discount_percentage VARCHAR(16),
                lesson_time VARCHAR(255),
                start_course VARCHAR(255),
                section_image LONGTEXT,
                created_at TIMESTAMP(6) NOT NULL DEFAULT CURRENT_TIMESTAMP(6)
            );
            CREATE INDEX idx_offered_course_created_at ON offered_course(created_at);
        "#,
    },
    Migration {
        version: 4,
        name: "create_slider",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS slider (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT,
                text TEXT,
                image TEXT,
                button_link TEXT,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS slider (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                title TEXT,
                text TEXT,
                image LONGTEXT,
                button_link VARCHAR(512),
                created_at TIMESTAMP(6) NOT NULL DEFAULT CURRENT_TIMESTAMP(6)
            );
        "#,
    },
    Migration {
        version: 5,
        name: "create_review",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS review (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                text TEXT NOT NULL,
                full_name TEXT NOT NULL,
                course TEXT NOT NULL,
                course_link TEXT NOT NULL DEFAULT '',
                student_picture TEXT NOT NULL DEFAULT '',
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS review (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                text LONGTEXT NOT NULL,
                full_name VARCHAR(255) NOT NULL,
                course VARCHAR(255) NOT NULL,
                course_link VARCHAR(512) NOT NULL DEFAULT '',
                student_picture LONGTEXT NOT NULL,
                created_at TIMESTAMP(6) NOT NULL DEFAULT CURRENT_TIMESTAMP(6),
                updated_at TIMESTAMP(6) NOT NULL DEFAULT CURRENT_TIMESTAMP(6)
            );
        "#,
    },
    Migration {
        version: 6,
        name: "create_lecturers",
        up_sqlite: r#"
            CREATE TABLE IF NOT EXISTS lecturers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                full_name TEXT NOT NULL,
                field TEXT NOT NULL DEFAULT '',
                lecturer_image TEXT NOT NULL DEFAULT '',
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
        "#,
        up_mysql: r#"
            CREATE TABLE IF NOT EXISTS lecturers (
                id BIGINT PRIMARY KEY AUTO_INCREMENT,
                full_name VARCHAR(255) NOT NULL,
                field VARCHAR(255) NOT NULL DEFAULT '',
                lecturer_image LONGTEXT NOT NULL,
                created_at TIMESTAMP(6) NOT NULL DEFAULT CURRENT_TIMESTAMP(6),
                updated_at TIMESTAMP(6) NOT NULL DEFAULT CURRENT_TIMESTAMP(6)
            );
        "#,
    },
    // Listing image shown in the "other courses" sections of the public site
    Migration {
        version: 7,
        name: "add_courses_section_image",
        up_sqlite: r#"
            ALTER TABLE courses ADD COLUMN section_image TEXT;
        "#,
        up_mysql: r#"
            ALTER TABLE courses ADD COLUMN section_image LONGTEXT;
        "#,
    },
];

/// Run all pending migrations and return how many were applied
pub async fn run_migrations(pool: &DynDatabasePool) -> Result<usize> {
    create_migrations_table(pool).await?;

    let applied_versions = get_applied_versions(pool).await?;

    let mut count = 0;

    for migration in MIGRATIONS {
        if !applied_versions.contains(&migration.version) {
            tracing::info!(
                "Applying migration {}: {}",
                migration.version,
                migration.name
            );
            apply_migration(pool, migration)
                .await
                .with_context(|| format!("Failed to apply migration: {}", migration.name))?;
            count += 1;
        }
    }

    if count > 0 {
        tracing::info!("Applied {} migration(s)", count);
    } else {
        tracing::debug!("No pending migrations");
    }

    Ok(count)
}

async fn create_migrations_table(pool: &DynDatabasePool) -> Result<()> {
    let sql = match pool.driver() {
        DatabaseDriver::Sqlite => {
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                name VARCHAR(255) NOT NULL UNIQUE,
                applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#
        }
        DatabaseDriver::Mysql => {
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version INT PRIMARY KEY,
                name VARCHAR(255) NOT NULL UNIQUE,
                applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#
        }
    };

    pool.execute(sql).await?;
    Ok(())
}

async fn get_applied_versions(pool: &DynDatabasePool) -> Result<Vec<i32>> {
    let versions = match pool.backend()? {
        Backend::Sqlite(p) => applied_versions_sqlite(p).await?,
        Backend::Mysql(p) => applied_versions_mysql(p).await?,
    };
    Ok(versions)
}

async fn applied_versions_sqlite(pool: &SqlitePool) -> Result<Vec<i32>> {
    let rows = sqlx::query("SELECT version FROM _migrations ORDER BY version")
        .fetch_all(pool)
        .await
        .context("Failed to read applied migrations")?;
    Ok(rows.iter().map(|row| row.get::<i64, _>("version") as i32).collect())
}

async fn applied_versions_mysql(pool: &MySqlPool) -> Result<Vec<i32>> {
    let rows = sqlx::query("SELECT version FROM _migrations ORDER BY version")
        .fetch_all(pool)
        .await
        .context("Failed to read applied migrations")?;
    Ok(rows.iter().map(|row| row.get::<i32, _>("version")).collect())
}

async fn apply_migration(pool: &DynDatabasePool, migration: &Migration) -> Result<()> {
    let sql = match pool.driver() {
        DatabaseDriver::Sqlite => migration.up_sqlite,
        DatabaseDriver::Mysql => migration.up_mysql,
    };

    for statement in split_sql_statements(sql) {
        pool.execute(statement)
            .await
            .with_context(|| format!("Failed to execute: {}", truncate_sql(statement)))?;
    }

    match pool.backend()? {
        Backend::Sqlite(p) => {
            sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
                .bind(migration.version)
                .bind(migration.name)
                .execute(p)
                .await?;
        }
        Backend::Mysql(p) => {
            sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
                .bind(migration.version)
                .bind(migration.name)
                .execute(p)
                .await?;
        }
    }

    Ok(())
}

fn truncate_sql(sql: &str) -> String {
    match sql.char_indices().nth(100) {
        Some((idx, _)) => format!("{}...", &sql[..idx]),
        None => sql.to_string(),
    }
}

/// Split SQL into individual statements, skipping comment-only fragments
fn split_sql_statements(sql: &str) -> Vec<&str> {
    sql.split(';')
        .map(str::trim)
        .filter(|stmt| !stmt.is_empty() && !is_comment_only(stmt))
        .collect()
}

fn is_comment_only(s: &str) -> bool {
    s.lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with("--"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;

    #[tokio::test]
    async fn test_run_migrations_is_idempotent() {
        let pool = create_test_pool().await.expect("Failed to create test pool");

        let count = run_migrations(&pool).await.expect("Failed to run migrations");
        assert_eq!(count, MIGRATIONS.len());

        let count = run_migrations(&pool).await.expect("Failed to run migrations");
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_courses_has_section_image_column() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        run_migrations(&pool).await.expect("Failed to run migrations");

        let sqlite_pool = pool.as_sqlite().unwrap();
        let result = sqlx::query("INSERT INTO courses (title, section_image) VALUES (?, ?)")
            .bind("Rust")
            .bind("https://cdn.example.com/rust.png")
            .execute(sqlite_pool)
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_every_table_created() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        run_migrations(&pool).await.expect("Failed to run migrations");

        let sqlite_pool = pool.as_sqlite().unwrap();
        for table in ["blogs", "courses", "offered_course", "slider", "review", "lecturers"] {
            let row = sqlx::query(
                "SELECT COUNT(*) AS count FROM sqlite_master WHERE type = 'table' AND name = ?",
            )
            .bind(table)
            .fetch_one(sqlite_pool)
            .await
            .expect("Failed to query sqlite_master");
            let count: i64 = row.get("count");
            assert_eq!(count, 1, "table {} missing", table);
        }
    }

    #[test]
    fn test_split_sql_statements() {
        let sql = "CREATE TABLE a (id INT);\n-- just a comment\n;\nCREATE INDEX i ON a(id);";
        let statements = split_sql_statements(sql);
        assert_eq!(statements, vec!["CREATE TABLE a (id INT)", "CREATE INDEX i ON a(id)"]);
    }

    #[test]
    fn test_truncate_sql_multibyte_safe() {
        let long = "ა".repeat(150);
        let truncated = truncate_sql(&long);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 103);
    }
}
