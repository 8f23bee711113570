//! Course service

use crate::cache::SharedCache;
use crate::db::repositories::CourseRepository;
use crate::models::{Course, CreateCourseInput, UpdateCourseInput};
use crate::services::error::{ServiceError, ServiceResult};
use crate::services::site_cache::SharedSiteCache;
use chrono::Utc;
use std::sync::Arc;

const CACHE_PATTERN: &str = "courses:*";

fn cache_key_id(id: i64) -> String {
    format!("courses:id:{}", id)
}

fn cache_key_list(limit: Option<i64>) -> String {
    match limit {
        Some(n) => format!("courses:list:{}", n),
        None => "courses:list:all".to_string(),
    }
}

pub struct CourseService {
    repo: Arc<dyn CourseRepository>,
    cache: SharedCache,
    site: SharedSiteCache,
}

impl CourseService {
    pub fn new(repo: Arc<dyn CourseRepository>, cache: SharedCache, site: SharedSiteCache) -> Self {
        Self { repo, cache, site }
    }

    pub async fn create(&self, input: CreateCourseInput) -> ServiceResult<Course> {
        let title = input
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ServiceError::validation("Title is required"))?;

        let course = Course {
            id: 0,
            title,
            course_details: input.course_details,
            image: input.image,
            image_file_path: input.image_file_path,
            course_icon: input.course_icon,
            start_course: input.start_course,
            quantity_lessons: input.quantity_lessons,
            quantity_of_students: input.quantity_of_students,
            lesson_time: input.lesson_time,
            lecturer: input.lecturer,
            lecturer_details: input.lecturer_details,
            price: input.price,
            oldprice: input.oldprice,
            syllabus_title: input.syllabus_title,
            syllabus_content: input.syllabus_content,
            section_image: input.section_image,
            created_at: Utc::now(),
        };

        let created = self.repo.create(&course).await?;
        tracing::info!("Created course {}: {}", created.id, created.title);

        self.cache.delete_pattern(CACHE_PATTERN).await;
        self.site.clear_courses(Some(&created.id.to_string())).await;
        Ok(created)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Course> {
        let key = cache_key_id(id);
        if let Some(course) = self.cache.get::<Course>(&key).await.ok().flatten() {
            return Ok(course);
        }

        let generation = self.cache.generation();
        let course = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Course not found"))?;

        let _ = self.cache.set_fresh(&key, &course, generation).await;
        Ok(course)
    }

    /// Newest first; `limit` is ignored unless positive
    pub async fn list(&self, limit: Option<i64>) -> ServiceResult<Vec<Course>> {
        let limit = limit.filter(|n| *n > 0);
        let key = cache_key_list(limit);
        if let Some(courses) = self.cache.get::<Vec<Course>>(&key).await.ok().flatten() {
            return Ok(courses);
        }

        let generation = self.cache.generation();
        let courses = self.repo.list(limit).await?;
        let _ = self.cache.set_fresh(&key, &courses, generation).await;
        Ok(courses)
    }

    pub async fn update(&self, id: i64, input: UpdateCourseInput) -> ServiceResult<Course> {
        if !input.has_updates() {
            return Err(ServiceError::validation("No fields to update"));
        }

        let mut course = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Course not found"))?;

        input.apply_to(&mut course);

        let updated = self
            .repo
            .update(&course)
            .await?
            .ok_or_else(|| ServiceError::not_found("Course not found"))?;

        self.after_change(id).await;
        Ok(updated)
    }

    /// Delete a course; deleting a missing course is not an error
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        self.repo.delete(id).await?;
        self.after_change(id).await;
        Ok(())
    }

    /// Listing pages and the course page itself both go stale
    async fn after_change(&self, id: i64) {
        self.cache.delete_pattern(CACHE_PATTERN).await;
        self.site.clear_courses(None).await;
        self.site.clear_courses(Some(&id.to_string())).await;
    }
}
