//! Database layer
//!
//! SQLite (default) or MySQL behind the `DatabasePool` trait, code-embedded
//! migrations, and one repository per back-office entity.

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{
    create_pool, create_test_pool, Backend, DatabasePool, DynDatabasePool, MysqlDatabase,
    SqliteDatabase,
};
