//! Slider title to course matching
//!
//! Slider titles are typed by hand and rarely match a course title exactly.
//! Matching runs through increasingly loose comparisons and stops at the
//! first step that finds something.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

pub use crate::models::course_id_from_link;

/// Separators ignored by the normalized comparison
static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\-_,.]+").unwrap());

/// The fields of a course that matching needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseRef {
    pub id: i64,
    pub title: String,
}

impl CourseRef {
    /// Slider button link pointing at this course
    pub fn link(&self) -> String {
        course_link(self.id)
    }
}

pub fn course_link(id: i64) -> String {
    format!("/courses/{}", id)
}

/// Outcome of matching a title against the course list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseMatch {
    Exact(CourseRef),
    Normalized(CourseRef),
    Contains(CourseRef),
    /// Several courses contain (or are contained in) the title
    Ambiguous(Vec<CourseRef>),
    NoMatch,
}

impl CourseMatch {
    /// The single matched course, if matching was conclusive
    pub fn course(&self) -> Option<&CourseRef> {
        match self {
            Self::Exact(c) | Self::Normalized(c) | Self::Contains(c) => Some(c),
            Self::Ambiguous(_) | Self::NoMatch => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Exact(_) => "exact",
            Self::Normalized(_) => "normalized",
            Self::Contains(_) => "contains",
            Self::Ambiguous(_) => "ambiguous",
            Self::NoMatch => "none",
        }
    }
}

/// Lowercase, drop separators and strip combining diacritics
pub fn normalize_title(title: &str) -> String {
    let lowered = title.to_lowercase();
    SEPARATORS
        .replace_all(&lowered, "")
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036F}').contains(c))
        .collect()
}

/// Find the course a slider title refers to
pub fn match_course(title: &str, courses: &[CourseRef]) -> CourseMatch {
    let wanted = title.trim();
    if wanted.is_empty() {
        return CourseMatch::NoMatch;
    }

    let wanted_lower = wanted.to_lowercase();
    if let Some(course) = courses
        .iter()
        .find(|c| c.title.trim().to_lowercase() == wanted_lower)
    {
        return CourseMatch::Exact(course.clone());
    }

    let wanted_norm = normalize_title(wanted);
    if !wanted_norm.is_empty() {
        if let Some(course) = courses
            .iter()
            .find(|c| normalize_title(&c.title) == wanted_norm)
        {
            return CourseMatch::Normalized(course.clone());
        }
    }

    let mut hits: Vec<CourseRef> = courses
        .iter()
        .filter(|c| {
            let candidate = c.title.trim().to_lowercase();
            !candidate.is_empty()
                && (candidate.contains(&wanted_lower) || wanted_lower.contains(&candidate))
        })
        .cloned()
        .collect();

    match hits.len() {
        0 => CourseMatch::NoMatch,
        1 => CourseMatch::Contains(hits.remove(0)),
        _ => CourseMatch::Ambiguous(hits),
    }
}
