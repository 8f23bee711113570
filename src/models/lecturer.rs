//! Lecturer model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lecturer {
    pub id: i64,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub field: String,
    pub lecturer_image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateLecturerInput {
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
    pub field: Option<String>,
    pub lecturer_image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLecturerInput {
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
    pub field: Option<String>,
    pub lecturer_image: Option<String>,
}
