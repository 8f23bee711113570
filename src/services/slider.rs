//! Slider service
//!
//! Creating a slider with an image is done in two steps when the single
//! insert is rejected: the row is saved first and the image attached after.
//! If only the second step fails the caller still gets the saved row back,
//! flagged as a partial success.

use crate::cache::SharedCache;
use crate::db::repositories::{CourseRepository, SliderRepository};
use crate::models::{CreateSliderInput, Slider, UpdateSliderInput};
use crate::services::course_match::{course_link, match_course, CourseMatch, CourseRef};
use crate::services::error::{ServiceError, ServiceResult};
use serde_json::Value;
use std::sync::Arc;

const CACHE_PATTERN: &str = "sliders:*";
const CACHE_KEY_LIST: &str = "sliders:list";

pub const PARTIAL_IMAGE_MESSAGE: &str = "Slider created but image couldn't be added";

fn cache_key_id(id: i64) -> String {
    format!("sliders:id:{}", id)
}

/// Empty strings count as missing
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Course id from a number or a numeric string; only positive ids count
fn parse_course_id(value: &Value) -> Option<i64> {
    let id = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    id.filter(|n| *n > 0)
}

/// Result of a slider create
#[derive(Debug, Clone, PartialEq)]
pub enum SliderCreateOutcome {
    Created(Slider),
    /// The row exists but the image could not be attached
    Partial { slider: Slider, error: String },
}

impl SliderCreateOutcome {
    pub fn slider(&self) -> &Slider {
        match self {
            Self::Created(s) | Self::Partial { slider: s, .. } => s,
        }
    }
}

pub struct SliderService {
    repo: Arc<dyn SliderRepository>,
    courses: Arc<dyn CourseRepository>,
    cache: SharedCache,
}

impl SliderService {
    pub fn new(
        repo: Arc<dyn SliderRepository>,
        courses: Arc<dyn CourseRepository>,
        cache: SharedCache,
    ) -> Self {
        Self { repo, courses, cache }
    }

    pub async fn create(&self, input: CreateSliderInput) -> ServiceResult<SliderCreateOutcome> {
        let title = non_empty(input.title);
        let text = non_empty(input.text);
        let image = non_empty(input.image);
        let button_link = non_empty(input.button_link);

        if title.is_none() && text.is_none() && image.is_none() && button_link.is_none() {
            return Err(ServiceError::validation("At least one field must be filled"));
        }

        let outcome = match image {
            None => {
                let draft = Slider::draft(title, text, None, button_link);
                let id = self.repo.insert(&draft).await?;
                SliderCreateOutcome::Created(self.saved(id, draft).await?)
            }
            Some(image) => {
                let draft = Slider::draft(title, text, Some(image.clone()), button_link);
                match self.repo.insert(&draft).await {
                    Ok(id) => SliderCreateOutcome::Created(self.saved(id, draft).await?),
                    Err(e) => {
                        tracing::warn!("Slider insert with image failed, retrying without: {:#}", e);
                        self.create_then_attach(draft, image).await?
                    }
                }
            }
        };

        tracing::info!("Created slider {}", outcome.slider().id);
        self.cache.delete_pattern(CACHE_PATTERN).await;
        Ok(outcome)
    }

    async fn create_then_attach(
        &self,
        mut draft: Slider,
        image: String,
    ) -> ServiceResult<SliderCreateOutcome> {
        draft.image = None;
        let id = self.repo.insert(&draft).await?;

        if let Err(e) = self.repo.attach_image(id, &image).await {
            tracing::error!("Failed to attach image to slider {}: {:#}", id, e);
            return Ok(SliderCreateOutcome::Partial {
                slider: self.saved(id, draft).await?,
                error: PARTIAL_IMAGE_MESSAGE.to_string(),
            });
        }

        draft.image = Some(image);
        Ok(SliderCreateOutcome::Created(self.saved(id, draft).await?))
    }

    /// Read back an inserted row, falling back to the draft it was made from
    async fn saved(&self, id: i64, mut draft: Slider) -> ServiceResult<Slider> {
        match self.repo.get_by_id(id).await? {
            Some(slider) => Ok(slider),
            None => {
                draft.id = id;
                Ok(draft)
            }
        }
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Slider> {
        let key = cache_key_id(id);
        if let Some(slider) = self.cache.get::<Slider>(&key).await.ok().flatten() {
            return Ok(slider);
        }

        let generation = self.cache.generation();
        let slider = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Slider not found"))?;

        let _ = self.cache.set_fresh(&key, &slider, generation).await;
        Ok(slider)
    }

    pub async fn list(&self) -> ServiceResult<Vec<Slider>> {
        if let Some(sliders) = self.cache.get::<Vec<Slider>>(CACHE_KEY_LIST).await.ok().flatten() {
            return Ok(sliders);
        }

        let generation = self.cache.generation();
        let sliders = self.repo.list().await?;
        let _ = self.cache.set_fresh(CACHE_KEY_LIST, &sliders, generation).await;
        Ok(sliders)
    }

    /// Replace a slider; the button link is rebuilt from `custom_url` or `course_id`
    pub async fn update(&self, id: i64, input: UpdateSliderInput) -> ServiceResult<Slider> {
        let title = non_empty(input.title);
        let text = non_empty(input.text);
        let image = non_empty(input.image);

        let custom_url = input
            .custom_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty());

        let button_link = match (custom_url, parse_course_id(&input.course_id)) {
            (Some(url), _) => Some(format!("/courses/{}", url)),
            (None, Some(course_id)) => {
                match self.courses.get_by_id(course_id).await {
                    Ok(Some(_)) => {}
                    Ok(None) => tracing::warn!("Slider {} links to missing course {}", id, course_id),
                    Err(e) => tracing::warn!("Could not check course {} for slider {}: {:#}", course_id, id, e),
                }
                Some(course_link(course_id))
            }
            (None, None) => None,
        };

        if title.is_none() && text.is_none() && image.is_none() {
            return Err(ServiceError::validation("At least one field must be filled"));
        }

        let mut slider = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Slider not found"))?;

        slider.title = title;
        slider.text = text;
        slider.image = image;
        slider.button_link = button_link;

        let updated = self
            .repo
            .update(&slider)
            .await?
            .ok_or_else(|| ServiceError::not_found("Slider not found"))?;

        self.cache.delete_pattern(CACHE_PATTERN).await;
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("Slider not found"));
        }
        self.cache.delete_pattern(CACHE_PATTERN).await;
        Ok(())
    }

    /// Find the course a slider title most likely refers to
    pub async fn course_match(&self, title: &str) -> ServiceResult<CourseMatch> {
        let courses: Vec<CourseRef> = self
            .courses
            .list(None)
            .await?
            .into_iter()
            .map(|c| CourseRef {
                id: c.id,
                title: c.title,
            })
            .collect();

        let found = match_course(title, &courses);
        tracing::debug!("Course match for {:?}: {}", title, found.kind());
        Ok(found)
    }
}
