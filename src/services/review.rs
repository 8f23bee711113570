//! Student review service
//!
//! A review without a course link gets one pointing at the public page of the
//! course whose title matches the review's course name.

use crate::cache::SharedCache;
use crate::db::repositories::{CourseRepository, ReviewRepository};
use crate::models::{CreateReviewInput, Review, UpdateReviewInput};
use crate::services::error::{ServiceError, ServiceResult};
use chrono::Utc;
use std::sync::Arc;

const CACHE_PATTERN: &str = "reviews:*";
const CACHE_KEY_LIST: &str = "reviews:list";

/// Trimmed value, or a validation error with `message` when blank
fn required(value: Option<String>, message: &str) -> ServiceResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ServiceError::validation(message))
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub struct ReviewService {
    repo: Arc<dyn ReviewRepository>,
    courses: Arc<dyn CourseRepository>,
    cache: SharedCache,
    site_url: String,
}

impl ReviewService {
    /// `site_url` is the public site base that generated course links point to
    pub fn new(
        repo: Arc<dyn ReviewRepository>,
        courses: Arc<dyn CourseRepository>,
        cache: SharedCache,
        site_url: impl Into<String>,
    ) -> Self {
        Self {
            repo,
            courses,
            cache,
            site_url: site_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Public URL of the course titled `course`, compared case-insensitively
    async fn course_link_for(&self, course: &str) -> Option<String> {
        let courses = match self.courses.list(None).await {
            Ok(courses) => courses,
            Err(e) => {
                tracing::warn!("Could not look up course {:?} for review: {:#}", course, e);
                return None;
            }
        };

        let wanted = course.to_lowercase();
        match courses.iter().find(|c| c.title.to_lowercase() == wanted) {
            Some(c) => Some(format!("{}/courses/{}", self.site_url, c.id)),
            None => {
                tracing::debug!("No course titled {:?}, leaving review link as given", course);
                None
            }
        }
    }

    pub async fn create(&self, input: CreateReviewInput) -> ServiceResult<Review> {
        let text = required(input.text, "Review text is required")?;
        let full_name = required(input.full_name, "Student name is required")?;
        let course = required(input.course, "Course name is required")?;

        let course_link = match trimmed(input.course_link) {
            Some(link) => link,
            None => self.course_link_for(&course).await.unwrap_or_default(),
        };

        let now = Utc::now();
        let review = Review {
            id: 0,
            text,
            full_name,
            course,
            course_link,
            student_picture: input.student_picture.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        let created = self.repo.create(&review).await?;
        tracing::info!("Created review {} by {}", created.id, created.full_name);

        self.cache.delete_pattern(CACHE_PATTERN).await;
        Ok(created)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Review> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Review not found"))
    }

    pub async fn list(&self) -> ServiceResult<Vec<Review>> {
        if let Some(reviews) = self.cache.get::<Vec<Review>>(CACHE_KEY_LIST).await.ok().flatten() {
            return Ok(reviews);
        }

        let generation = self.cache.generation();
        let reviews = self.repo.list().await?;
        let _ = self.cache.set_fresh(CACHE_KEY_LIST, &reviews, generation).await;
        Ok(reviews)
    }

    /// Required fields change only to non-blank values; the rest apply as given
    pub async fn update(&self, id: i64, input: UpdateReviewInput) -> ServiceResult<Review> {
        let mut review = self.get(id).await?;

        if let Some(text) = trimmed(input.text) {
            review.text = text;
        }
        if let Some(name) = trimmed(input.full_name) {
            review.full_name = name;
        }
        if let Some(course) = trimmed(input.course) {
            review.course = course;
        }
        if let Some(link) = input.course_link {
            review.course_link = link;
        }
        if review.course_link.trim().is_empty() {
            if let Some(link) = self.course_link_for(&review.course).await {
                review.course_link = link;
            }
        }
        if let Some(picture) = input.student_picture {
            review.student_picture = picture;
        }

        let updated = self
            .repo
            .update(&review)
            .await?
            .ok_or_else(|| ServiceError::not_found("Review not found"))?;

        self.cache.delete_pattern(CACHE_PATTERN).await;
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("Review not found"));
        }
        self.cache.delete_pattern(CACHE_PATTERN).await;
        Ok(())
    }
}
