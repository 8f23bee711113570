//! Data models
//!
//! Entity structs mirror their tables one to one. JSON field names follow the
//! public site's contract, which mixes snake_case with a few camelCase keys
//! (`linkTag`, `courseIcon`, `fullName`, `courseLink`).
//!
//! Update inputs wrap nullable columns in `Option<Option<T>>`: the outer
//! `None` means the field was absent, `Some(None)` is an explicit null.

mod blog;
mod course;
mod lecturer;
mod offered_course;
mod review;
mod slider;

pub use blog::{Blog, BlogTag, CreateBlogInput, LinkFollow, UpdateBlogInput};
pub use course::{Course, CreateCourseInput, UpdateCourseInput};
pub use lecturer::{CreateLecturerInput, Lecturer, UpdateLecturerInput};
pub use offered_course::{OfferedCourse, OfferedCourseInput};
pub use review::{CreateReviewInput, Review, UpdateReviewInput};
pub use slider::{course_id_from_link, CreateSliderInput, Slider, UpdateSliderInput};

use serde::{Deserialize, Deserializer};

/// Marks a field as present even when its value is `null`
///
/// Use with `#[serde(default, deserialize_with = "double_option")]` on an
/// `Option<T>` field: absent stays `None`, anything else (null included)
/// becomes `Some(..)`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "double_option")]
        image: Option<Option<String>>,
    }

    #[test]
    fn test_double_option_distinguishes_absent_and_null() {
        let absent: Probe = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.image, None);

        let null: Probe = serde_json::from_str(r#"{"image": null}"#).unwrap();
        assert_eq!(null.image, Some(None));

        let set: Probe = serde_json::from_str(r#"{"image": "a.png"}"#).unwrap();
        assert_eq!(set.image, Some(Some("a.png".to_string())));
    }
}
