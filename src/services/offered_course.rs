//! Offered course service
//!
//! Offered courses are not cached by the public site, so writes only drop
//! the local cache.

use crate::cache::SharedCache;
use crate::db::repositories::OfferedCourseRepository;
use crate::models::{OfferedCourse, OfferedCourseInput};
use crate::services::error::{ServiceError, ServiceResult};
use crate::services::normalize::{lenient_string_list, lenient_syllabus_content};
use crate::services::pricing::discount_percentage;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;

const CACHE_PATTERN: &str = "offered_courses:*";

fn cache_key_id(id: i64) -> String {
    format!("offered_courses:id:{}", id)
}

fn cache_key_list(limit: Option<i64>) -> String {
    match limit {
        Some(n) => format!("offered_courses:list:{}", n),
        None => "offered_courses:list:all".to_string(),
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    lenient_string_list(value.unwrap_or(&Value::Null))
}

/// Recompute the stored discount from the current prices
fn apply_discount(course: &mut OfferedCourse) {
    if let Some(discount) = discount_percentage(course.price, course.old_price.unwrap_or(0.0)) {
        course.discount_percentage = Some(discount);
    }
}

pub struct OfferedCourseService {
    repo: Arc<dyn OfferedCourseRepository>,
    cache: SharedCache,
}

impl OfferedCourseService {
    pub fn new(repo: Arc<dyn OfferedCourseRepository>, cache: SharedCache) -> Self {
        Self { repo, cache }
    }

    pub async fn create(&self, input: OfferedCourseInput) -> ServiceResult<OfferedCourse> {
        let title = input
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ServiceError::validation("Title is required"))?;

        let mut course = OfferedCourse {
            id: 0,
            title,
            image: input.image.flatten(),
            lecturers: string_list(input.lecturers.as_ref()),
            lecturers_details: string_list(input.lecturers_details.as_ref()),
            course_details: string_list(input.course_details.as_ref()),
            quantity_of_lessons: input.quantity_of_lessons.unwrap_or_default(),
            quantity_of_students: input.quantity_of_students.flatten(),
            price: input.price.unwrap_or(0.0),
            old_price: input.old_price.flatten(),
            syllabus_title: string_list(input.syllabus_title.as_ref()),
            syllabus_content: lenient_syllabus_content(
                input.syllabus_content.as_ref().unwrap_or(&Value::Null),
            ),
            course_icon: input.course_icon.flatten(),
            text: input.text.flatten(),
            course_category: string_list(input.course_category.as_ref()),
            discount_percentage: input.discount_percentage.flatten(),
            lesson_time: input.lesson_time.flatten(),
            start_course: input.start_course.flatten(),
            section_image: input.section_image.flatten(),
            created_at: Utc::now(),
        };
        apply_discount(&mut course);

        let created = self.repo.create(&course).await?;
        tracing::info!("Created offered course {}: {}", created.id, created.title);

        self.cache.delete_pattern(CACHE_PATTERN).await;
        Ok(created)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<OfferedCourse> {
        let key = cache_key_id(id);
        if let Some(course) = self.cache.get::<OfferedCourse>(&key).await.ok().flatten() {
            return Ok(course);
        }

        let generation = self.cache.generation();
        let course = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Offered course not found"))?;

        let _ = self.cache.set_fresh(&key, &course, generation).await;
        Ok(course)
    }

    /// Newest first; `limit` is ignored unless positive
    pub async fn list(&self, limit: Option<i64>) -> ServiceResult<Vec<OfferedCourse>> {
        let limit = limit.filter(|n| *n > 0);
        let key = cache_key_list(limit);
        if let Some(courses) = self.cache.get::<Vec<OfferedCourse>>(&key).await.ok().flatten() {
            return Ok(courses);
        }

        let generation = self.cache.generation();
        let courses = self.repo.list(limit).await?;
        let _ = self.cache.set_fresh(&key, &courses, generation).await;
        Ok(courses)
    }

    /// Merge the present fields into the stored record
    pub async fn update(&self, id: i64, input: OfferedCourseInput) -> ServiceResult<OfferedCourse> {
        let mut course = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Offered course not found"))?;

        if let Some(title) = input.title.filter(|t| !t.trim().is_empty()) {
            course.title = title;
        }
        if let Some(image) = input.image {
            course.image = image;
        }
        if let Some(v) = input.lecturers {
            course.lecturers = lenient_string_list(&v);
        }
        if let Some(v) = input.lecturers_details {
            course.lecturers_details = lenient_string_list(&v);
        }
        if let Some(v) = input.course_details {
            course.course_details = lenient_string_list(&v);
        }
        if let Some(n) = input.quantity_of_lessons {
            course.quantity_of_lessons = n;
        }
        if let Some(n) = input.quantity_of_students {
            course.quantity_of_students = n;
        }
        if let Some(price) = input.price {
            course.price = price;
        }
        if let Some(old) = input.old_price {
            course.old_price = old;
        }
        if let Some(v) = input.syllabus_title {
            course.syllabus_title = lenient_string_list(&v);
        }
        if let Some(v) = input.syllabus_content {
            course.syllabus_content = lenient_syllabus_content(&v);
        }
        if let Some(icon) = input.course_icon {
            course.course_icon = icon;
        }
        if let Some(text) = input.text {
            course.text = text;
        }
        if let Some(v) = input.course_category {
            course.course_category = lenient_string_list(&v);
        }
        if let Some(d) = input.discount_percentage {
            course.discount_percentage = d;
        }
        if let Some(t) = input.lesson_time {
            course.lesson_time = t;
        }
        if let Some(s) = input.start_course {
            course.start_course = s;
        }
        if let Some(img) = input.section_image {
            course.section_image = img;
        }
        apply_discount(&mut course);

        let updated = self
            .repo
            .update(&course)
            .await?
            .ok_or_else(|| ServiceError::not_found("Offered course not found"))?;

        self.cache.delete_pattern(CACHE_PATTERN).await;
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("Offered course not found"));
        }
        self.cache.delete_pattern(CACHE_PATTERN).await;
        Ok(())
    }
}
