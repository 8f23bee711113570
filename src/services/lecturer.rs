//! Lecturer service

use crate::cache::SharedCache;
use crate::db::repositories::LecturerRepository;
use crate::models::{CreateLecturerInput, Lecturer, UpdateLecturerInput};
use crate::services::error::{ServiceError, ServiceResult};
use chrono::Utc;
use std::sync::Arc;

const CACHE_PATTERN: &str = "lecturers:*";
const CACHE_KEY_LIST: &str = "lecturers:list";

pub struct LecturerService {
    repo: Arc<dyn LecturerRepository>,
    cache: SharedCache,
}

impl LecturerService {
    pub fn new(repo: Arc<dyn LecturerRepository>, cache: SharedCache) -> Self {
        Self { repo, cache }
    }

    pub async fn create(&self, input: CreateLecturerInput) -> ServiceResult<Lecturer> {
        let full_name = input
            .full_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ServiceError::validation("Full name is required"))?;

        let now = Utc::now();
        let lecturer = Lecturer {
            id: 0,
            full_name,
            field: input.field.unwrap_or_default(),
            lecturer_image: input.lecturer_image.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        let created = self.repo.create(&lecturer).await?;
        tracing::info!("Created lecturer {}: {}", created.id, created.full_name);

        self.cache.delete_pattern(CACHE_PATTERN).await;
        Ok(created)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Lecturer> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Lecturer not found"))
    }

    pub async fn list(&self) -> ServiceResult<Vec<Lecturer>> {
        if let Some(lecturers) = self.cache.get::<Vec<Lecturer>>(CACHE_KEY_LIST).await.ok().flatten() {
            return Ok(lecturers);
        }

        let generation = self.cache.generation();
        let lecturers = self.repo.list().await?;
        let _ = self.cache.set_fresh(CACHE_KEY_LIST, &lecturers, generation).await;
        Ok(lecturers)
    }

    pub async fn update(&self, id: i64, input: UpdateLecturerInput) -> ServiceResult<Lecturer> {
        let mut lecturer = self.get(id).await?;

        if let Some(name) = input.full_name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()) {
            lecturer.full_name = name;
        }
        if let Some(field) = input.field {
            lecturer.field = field;
        }
        if let Some(image) = input.lecturer_image {
            lecturer.lecturer_image = image;
        }

        let updated = self
            .repo
            .update(&lecturer)
            .await?
            .ok_or_else(|| ServiceError::not_found("Lecturer not found"))?;

        self.cache.delete_pattern(CACHE_PATTERN).await;
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("Lecturer not found"));
        }
        self.cache.delete_pattern(CACHE_PATTERN).await;
        Ok(())
    }
}
