//! Homepage slider model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slider {
    pub id: i64,
    pub title: Option<String>,
    pub text: Option<String>,
    pub image: Option<String>,
    pub button_link: Option<String>,
    /// Course id parsed out of `button_link`, if it points at one
    #[serde(default)]
    pub course_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Slider {
    /// Unsaved slider; `id` and `created_at` are assigned by the repository
    pub fn draft(
        title: Option<String>,
        text: Option<String>,
        image: Option<String>,
        button_link: Option<String>,
    ) -> Self {
        let course_id = button_link.as_deref().and_then(course_id_from_link);
        Self {
            id: 0,
            title,
            text,
            image,
            button_link,
            course_id,
            created_at: Utc::now(),
        }
    }
}

/// Extract the numeric id from `/courses/{id}`, `/offers/{id}` or `/offer/{id}`
///
/// Absolute URLs and trailing slashes or query strings are tolerated.
pub fn course_id_from_link(link: &str) -> Option<i64> {
    let path = link
        .split(['?', '#'])
        .next()
        .unwrap_or(link)
        .trim_end_matches('/');

    let mut segments = path.rsplit('/');
    let id = segments.next()?;
    let section = segments.next()?;

    if !matches!(section, "courses" | "offers" | "offer") {
        return None;
    }

    id.parse::<i64>().ok().filter(|n| *n > 0)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSliderInput {
    pub title: Option<String>,
    pub text: Option<String>,
    pub image: Option<String>,
    pub button_link: Option<String>,
}

/// Slider edit form
///
/// `button_link` is derived: `custom_url` wins, then `course_id` (number or
/// numeric string).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSliderInput {
    pub title: Option<String>,
    pub text: Option<String>,
    pub image: Option<String>,
    #[serde(default)]
    pub course_id: Value,
    pub custom_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_id_from_link() {
        assert_eq!(course_id_from_link("/courses/12"), Some(12));
        assert_eq!(course_id_from_link("/offers/4"), Some(4));
        assert_eq!(course_id_from_link("/offer/4/"), Some(4));
        assert_eq!(
            course_id_from_link("https://academy.idearoom.ge/courses/7?ref=home"),
            Some(7)
        );
        assert_eq!(course_id_from_link("/courses/abc"), None);
        assert_eq!(course_id_from_link("/courses/0"), None);
        assert_eq!(course_id_from_link("/blog/12"), None);
        assert_eq!(course_id_from_link("12"), None);
        assert_eq!(course_id_from_link(""), None);
    }

    #[test]
    fn test_draft_derives_course_id() {
        let slider = Slider::draft(Some("Hi".into()), None, None, Some("/courses/9".into()));
        assert_eq!(slider.course_id, Some(9));

        let slider = Slider::draft(Some("Hi".into()), None, None, Some("https://x.y".into()));
        assert_eq!(slider.course_id, None);
    }
}
