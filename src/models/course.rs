//! Course model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::double_option;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub course_details: Option<Vec<String>>,
    pub image: Option<String>,
    pub image_file_path: Option<String>,
    #[serde(rename = "courseIcon")]
    pub course_icon: Option<String>,
    pub start_course: Option<String>,
    pub quantity_lessons: Option<i64>,
    pub quantity_of_students: Option<String>,
    pub lesson_time: Option<i64>,
    pub lecturer: Option<String>,
    pub lecturer_details: Option<String>,
    pub price: Option<f64>,
    pub oldprice: Option<f64>,
    pub syllabus_title: Option<Vec<String>>,
    pub syllabus_content: Option<Vec<Vec<String>>>,
    /// Listing image for the "other courses" sections
    pub section_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCourseInput {
    pub title: Option<String>,
    pub course_details: Option<Vec<String>>,
    pub image: Option<String>,
    pub image_file_path: Option<String>,
    #[serde(rename = "courseIcon")]
    pub course_icon: Option<String>,
    pub start_course: Option<String>,
    pub quantity_lessons: Option<i64>,
    pub quantity_of_students: Option<String>,
    pub lesson_time: Option<i64>,
    pub lecturer: Option<String>,
    pub lecturer_details: Option<String>,
    pub price: Option<f64>,
    pub oldprice: Option<f64>,
    pub syllabus_title: Option<Vec<String>>,
    pub syllabus_content: Option<Vec<Vec<String>>>,
    pub section_image: Option<String>,
}

/// Partial course update
///
/// `title` only applies when non-empty. Every other present field is written
/// as-is, so an explicit `null` clears the column.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCourseInput {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub course_details: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_file_path: Option<Option<String>>,
    #[serde(rename = "courseIcon", default, deserialize_with = "double_option")]
    pub course_icon: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub start_course: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub quantity_lessons: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub quantity_of_students: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub lesson_time: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub lecturer: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub lecturer_details: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub price: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub oldprice: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub syllabus_title: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub syllabus_content: Option<Option<Vec<Vec<String>>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub section_image: Option<Option<String>>,
}

impl UpdateCourseInput {
    /// Whether the update carries anything worth writing
    ///
    /// Prices count as soon as they are present, even when zero or null.
    pub fn has_updates(&self) -> bool {
        fn text(v: &Option<Option<String>>) -> bool {
            matches!(v, Some(Some(s)) if !s.is_empty())
        }
        fn number(v: &Option<Option<i64>>) -> bool {
            matches!(v, Some(Some(n)) if *n != 0)
        }

        self.title.as_deref().is_some_and(|t| !t.is_empty())
            || matches!(self.course_details, Some(Some(_)))
            || text(&self.image)
            || text(&self.image_file_path)
            || text(&self.course_icon)
            || text(&self.start_course)
            || number(&self.quantity_lessons)
            || text(&self.quantity_of_students)
            || number(&self.lesson_time)
            || text(&self.lecturer)
            || text(&self.lecturer_details)
            || self.price.is_some()
            || self.oldprice.is_some()
            || matches!(self.syllabus_title, Some(Some(_)))
            || matches!(self.syllabus_content, Some(Some(_)))
            || text(&self.section_image)
    }

    /// Merge the present fields into `course`
    pub fn apply_to(self, course: &mut Course) {
        if let Some(title) = self.title.filter(|t| !t.is_empty()) {
            course.title = title;
        }
        if let Some(v) = self.course_details {
            course.course_details = v;
        }
        if let Some(v) = self.image {
            course.image = v;
        }
        if let Some(v) = self.image_file_path {
            course.image_file_path = v;
        }
        if let Some(v) = self.course_icon {
            course.course_icon = v;
        }
        if let Some(v) = self.start_course {
            course.start_course = v;
        }
        if let Some(v) = self.quantity_lessons {
            course.quantity_lessons = v;
        }
        if let Some(v) = self.quantity_of_students {
            course.quantity_of_students = v;
        }
        if let Some(v) = self.lesson_time {
            course.lesson_time = v;
        }
        if let Some(v) = self.lecturer {
            course.lecturer = v;
        }
        if let Some(v) = self.lecturer_details {
            course.lecturer_details = v;
        }
        if let Some(v) = self.price {
            course.price = v;
        }
        if let Some(v) = self.oldprice {
            course.oldprice = v;
        }
        if let Some(v) = self.syllabus_title {
            course.syllabus_title = v;
        }
        if let Some(v) = self.syllabus_content {
            course.syllabus_content = v;
        }
        if let Some(v) = self.section_image {
            course.section_image = v;
        }
    }
}
