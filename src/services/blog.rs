//! Blog service
//!
//! Tags arrive in whatever shape the form produced and are normalized before
//! storage. The legacy `tags` column is kept in sync with `linkTag` because the
//! public site still reads it.

use crate::cache::SharedCache;
use crate::db::repositories::BlogRepository;
use crate::models::{Blog, CreateBlogInput, UpdateBlogInput};
use crate::services::error::{ServiceError, ServiceResult};
use crate::services::normalize::{legacy_tag_names, normalize_tags};
use crate::services::site_cache::SharedSiteCache;
use chrono::Utc;
use std::sync::Arc;

const CACHE_PATTERN: &str = "blogs:*";
const CACHE_KEY_LIST: &str = "blogs:list";

fn cache_key_id(id: i64) -> String {
    format!("blogs:id:{}", id)
}

pub struct BlogService {
    repo: Arc<dyn BlogRepository>,
    cache: SharedCache,
    site: SharedSiteCache,
}

impl BlogService {
    pub fn new(repo: Arc<dyn BlogRepository>, cache: SharedCache, site: SharedSiteCache) -> Self {
        Self { repo, cache, site }
    }

    pub async fn create(&self, input: CreateBlogInput) -> ServiceResult<Blog> {
        let title = input.title.filter(|t| !t.trim().is_empty());
        let text = input.text.filter(|t| !t.trim().is_empty());
        let (Some(title), Some(text)) = (title, text) else {
            return Err(ServiceError::validation("Title and text are required"));
        };

        let link_tags = normalize_tags(&input.link_tag);
        let tags = legacy_tag_names(&link_tags);

        let blog = Blog {
            id: 0,
            title,
            text,
            image: input.image,
            image_file_path: input.image_file_path,
            image_file_name: input.image_file_name,
            link_tags,
            tags,
            created_at: Utc::now(),
        };

        let created = self.repo.create(&blog).await?;
        tracing::info!("Created blog {} ({} tags)", created.id, created.link_tags.len());

        self.after_write(created.id).await;
        Ok(created)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Blog> {
        let key = cache_key_id(id);
        if let Some(blog) = self.cache.get::<Blog>(&key).await.ok().flatten() {
            return Ok(blog);
        }

        let generation = self.cache.generation();
        let blog = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Blog not found"))?;

        let _ = self.cache.set_fresh(&key, &blog, generation).await;
        Ok(blog)
    }

    /// All posts, newest first
    pub async fn list(&self) -> ServiceResult<Vec<Blog>> {
        if let Some(blogs) = self.cache.get::<Vec<Blog>>(CACHE_KEY_LIST).await.ok().flatten() {
            return Ok(blogs);
        }

        let generation = self.cache.generation();
        let blogs = self.repo.list().await?;
        let _ = self.cache.set_fresh(CACHE_KEY_LIST, &blogs, generation).await;
        Ok(blogs)
    }

    pub async fn update(&self, id: i64, input: UpdateBlogInput) -> ServiceResult<Blog> {
        if !input.has_updates() {
            return Err(ServiceError::validation("No fields to update"));
        }

        let mut blog = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Blog not found"))?;

        if let Some(title) = input.title.filter(|t| !t.is_empty()) {
            blog.title = title;
        }
        if let Some(text) = input.text.filter(|t| !t.is_empty()) {
            blog.text = text;
        }
        if let Some(image) = input.image {
            blog.image = image;
        }
        if let Some(path) = input.image_file_path {
            blog.image_file_path = path;
        }
        if let Some(name) = input.image_file_name {
            blog.image_file_name = name;
        }
        if let Some(raw) = input.link_tag {
            blog.link_tags = normalize_tags(&raw);
            blog.tags = legacy_tag_names(&blog.link_tags);
        }

        let updated = self
            .repo
            .update(&blog)
            .await?
            .ok_or_else(|| ServiceError::not_found("Blog not found"))?;

        self.after_write(id).await;
        Ok(updated)
    }

    /// Delete a post; deleting a missing post is not an error
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        if !self.repo.delete(id).await? {
            tracing::debug!("Blog {} was already gone", id);
        }
        self.after_write(id).await;
        Ok(())
    }

    async fn after_write(&self, id: i64) {
        self.cache.delete_pattern(CACHE_PATTERN).await;
        self.site.clear_blogs(Some(&id.to_string())).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::config::MainSiteConfig;
    use crate::db::repositories::SqlxBlogRepository;
    use crate::db::{create_test_pool, migrations::run_migrations};
    use crate::services::site_cache::test_support::{spawn_main_site, Recorded};
    use crate::services::site_cache::SiteCacheClient;
    use axum::http::StatusCode;
    use serde_json::json;

    async fn setup() -> (BlogService, Recorded) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        run_migrations(&pool).await.expect("Failed to run migrations");

        let (url, recorded) = spawn_main_site(StatusCode::OK).await;
        let site = SiteCacheClient::new(&MainSiteConfig {
            url,
            enabled: true,
            timeout_secs: 2,
        })
        .unwrap();

        let service = BlogService::new(
            SqlxBlogRepository::boxed(pool),
            Arc::new(MemoryCache::new()),
            Arc::new(site),
        );
        (service, recorded)
    }

    fn create_input(value: serde_json::Value) -> CreateBlogInput {
        serde_json::from_value(value).unwrap()
    }

    fn update_input(value: serde_json::Value) -> UpdateBlogInput {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_create_normalizes_tags_and_mirrors_names() {
        let (service, recorded) = setup().await;

        let blog = service
            .create(create_input(json!({
                "title": "Hello",
                "text": "World",
                "linkTag": ["rust:::https://rust-lang.org", {"name": " axum ", "follow": "follow"}, 7]
            })))
            .await
            .unwrap();

        assert_eq!(blog.link_tags.len(), 2);
        assert_eq!(blog.link_tags[0].url.as_deref(), Some("https://rust-lang.org"));
        assert_eq!(blog.link_tags[1].name, "axum");
        assert_eq!(blog.tags, Some(vec!["rust".to_string(), "axum".to_string()]));

        assert_eq!(
            recorded.bodies(),
            vec![json!({"type": "blogs", "key": blog.id.to_string()})]
        );
    }

    #[tokio::test]
    async fn test_create_requires_title_and_text() {
        let (service, recorded) = setup().await;

        let err = service
            .create(create_input(json!({"title": "Only title"})))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m == "Title and text are required"));
        assert!(recorded.bodies().is_empty());
    }

    #[tokio::test]
    async fn test_create_without_tags_stores_null_legacy_tags() {
        let (service, _) = setup().await;
        let blog = service
            .create(create_input(json!({"title": "t", "text": "x"})))
            .await
            .unwrap();
        assert!(blog.link_tags.is_empty());
        assert_eq!(blog.tags, None);
    }

    #[tokio::test]
    async fn test_update_no_fields() {
        let (service, _) = setup().await;
        let blog = service
            .create(create_input(json!({"title": "t", "text": "x"})))
            .await
            .unwrap();

        let err = service
            .update(blog.id, update_input(json!({"title": "", "image": null})))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m == "No fields to update"));
    }

    #[tokio::test]
    async fn test_update_null_link_tag_clears_tags() {
        let (service, _) = setup().await;
        let blog = service
            .create(create_input(json!({
                "title": "t", "text": "x", "image": "a.png", "linkTag": ["one"]
            })))
            .await
            .unwrap();

        let updated = service
            .update(
                blog.id,
                update_input(json!({"title": "New", "linkTag": null, "image": null})),
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "New");
        assert_eq!(updated.text, "x");
        assert_eq!(updated.image, None);
        assert!(updated.link_tags.is_empty());
        assert_eq!(updated.tags, None);
    }

    #[tokio::test]
    async fn test_update_missing_blog() {
        let (service, _) = setup().await;
        let err = service
            .update(999, update_input(json!({"title": "x"})))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Blog not found"));
    }

    #[tokio::test]
    async fn test_list_cache_is_invalidated_by_writes() {
        let (service, _) = setup().await;
        assert!(service.list().await.unwrap().is_empty());

        let blog = service
            .create(create_input(json!({"title": "t", "text": "x"})))
            .await
            .unwrap();
        assert_eq!(service.list().await.unwrap().len(), 1);

        // Warm the per-id cache, then delete
        service.get(blog.id).await.unwrap();
        service.delete(blog.id).await.unwrap();

        assert!(service.list().await.unwrap().is_empty());
        assert!(matches!(service.get(blog.id).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_clears_public_cache() {
        let (service, recorded) = setup().await;
        service.delete(41).await.unwrap();
        assert_eq!(recorded.bodies(), vec![json!({"type": "blogs", "key": "41"})]);
    }
}
