//! Student review model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub text: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub course: String,
    #[serde(rename = "courseLink")]
    pub course_link: String,
    pub student_picture: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateReviewInput {
    pub text: Option<String>,
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
    pub course: Option<String>,
    #[serde(rename = "courseLink")]
    pub course_link: Option<String>,
    pub student_picture: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateReviewInput {
    pub text: Option<String>,
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
    pub course: Option<String>,
    #[serde(rename = "courseLink")]
    pub course_link: Option<String>,
    pub student_picture: Option<String>,
}
