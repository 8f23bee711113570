//! Offered (promotional) course model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::double_option;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferedCourse {
    pub id: i64,
    pub title: String,
    pub image: Option<String>,
    pub lecturers: Vec<String>,
    pub lecturers_details: Vec<String>,
    pub course_details: Vec<String>,
    pub quantity_of_lessons: String,
    pub quantity_of_students: Option<String>,
    pub price: f64,
    pub old_price: Option<f64>,
    pub syllabus_title: Vec<String>,
    pub syllabus_content: Vec<Vec<String>>,
    #[serde(rename = "courseIcon")]
    pub course_icon: Option<String>,
    pub text: Option<String>,
    pub course_category: Vec<String>,
    pub discount_percentage: Option<String>,
    pub lesson_time: Option<String>,
    pub start_course: Option<String>,
    pub section_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create or update payload for an offered course
///
/// The list fields stay raw JSON because the admin form sends them in several
/// shapes (array, single string, nothing); the service coerces them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfferedCourseInput {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub image: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub lecturers: Option<Value>,
    #[serde(default, deserialize_with = "double_option")]
    pub lecturers_details: Option<Value>,
    #[serde(default, deserialize_with = "double_option")]
    pub course_details: Option<Value>,
    pub quantity_of_lessons: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub quantity_of_students: Option<Option<String>>,
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "double_option")]
    pub old_price: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub syllabus_title: Option<Value>,
    #[serde(default, deserialize_with = "double_option")]
    pub syllabus_content: Option<Value>,
    #[serde(rename = "courseIcon", default, deserialize_with = "double_option")]
    pub course_icon: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub text: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub course_category: Option<Value>,
    #[serde(default, deserialize_with = "double_option")]
    pub discount_percentage: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub lesson_time: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub start_course: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub section_image: Option<Option<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_keeps_raw_list_shapes() {
        let input: OfferedCourseInput = serde_json::from_str(
            r#"{"title": "UX", "lecturers": "Nino", "course_category": null, "courseIcon": "i.svg"}"#,
        )
        .unwrap();

        assert_eq!(input.lecturers, Some(Value::String("Nino".into())));
        assert_eq!(input.course_category, Some(Value::Null));
        assert!(input.course_details.is_none());
        assert_eq!(input.course_icon, Some(Some("i.svg".to_string())));
    }
}
