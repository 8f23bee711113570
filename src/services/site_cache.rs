//! Public-site cache invalidation
//!
//! After content changes the public academy site is asked to drop its cached
//! pages. The call is best effort: failures are logged and reported as
//! `false`, never as errors.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::config::MainSiteConfig;

/// Which family of public pages to invalidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheKind {
    Courses,
    Blogs,
}

impl std::fmt::Display for CacheKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Courses => write!(f, "courses"),
            Self::Blogs => write!(f, "blogs"),
        }
    }
}

#[derive(Debug, Serialize)]
struct ClearRequest<'a> {
    #[serde(rename = "type")]
    kind: CacheKind,
    key: Option<&'a str>,
}

/// Client for the public site's `/api/cache/clear` endpoint
#[derive(Debug, Clone)]
pub struct SiteCacheClient {
    http: reqwest::Client,
    endpoint: String,
    enabled: bool,
}

pub type SharedSiteCache = Arc<SiteCacheClient>;

impl SiteCacheClient {
    pub fn new(config: &MainSiteConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            endpoint: config.cache_clear_endpoint(),
            enabled: config.enabled,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Ask the public site to drop cached `kind` pages, optionally just `key`
    ///
    /// Returns `true` only on a 2xx answer.
    pub async fn invalidate(&self, kind: CacheKind, key: Option<&str>) -> bool {
        if !self.enabled {
            tracing::debug!("Main site cache invalidation disabled, skipping {}", kind);
            return false;
        }

        tracing::debug!("Clearing main site cache: type={} key={:?}", kind, key);

        let response = self
            .http
            .post(&self.endpoint)
            .json(&ClearRequest { kind, key })
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                tracing::info!("Main site cache cleared: type={} key={:?}", kind, key);
                true
            }
            Ok(resp) => {
                tracing::warn!(
                    "Failed to clear main site cache: type={} key={:?} status={}",
                    kind,
                    key,
                    resp.status()
                );
                false
            }
            Err(e) => {
                tracing::error!("Error clearing main site cache: type={} key={:?}: {}", kind, key, e);
                false
            }
        }
    }

    pub async fn clear_courses(&self, key: Option<&str>) -> bool {
        self.invalidate(CacheKind::Courses, key).await
    }

    pub async fn clear_blogs(&self, key: Option<&str>) -> bool {
        self.invalidate(CacheKind::Blogs, key).await
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::spawn_main_site;
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    fn client_for(url: &str, enabled: bool) -> SiteCacheClient {
        SiteCacheClient::new(&MainSiteConfig {
            url: url.to_string(),
            enabled,
            timeout_secs: 2,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_success_posts_type_and_key() {
        let (url, recorded) = spawn_main_site(StatusCode::OK).await;
        let client = client_for(&url, true);

        assert!(client.clear_blogs(Some("12")).await);
        assert!(client.clear_courses(None).await);

        assert_eq!(
            recorded.bodies(),
            vec![
                json!({"type": "blogs", "key": "12"}),
                json!({"type": "courses", "key": null}),
            ]
        );
    }

    #[tokio::test]
    async fn test_non_2xx_returns_false() {
        let (url, recorded) = spawn_main_site(StatusCode::INTERNAL_SERVER_ERROR).await;
        let client = client_for(&url, true);

        assert!(!client.clear_courses(Some("1")).await);
        assert_eq!(recorded.bodies().len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_site_returns_false() {
        // Bind then drop so the port is very likely closed
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(&format!("http://{}", addr), true);
        assert!(!client.clear_blogs(None).await);
    }

    #[tokio::test]
    async fn test_disabled_makes_no_call() {
        let (url, recorded) = spawn_main_site(StatusCode::OK).await;
        let client = client_for(&url, false);

        assert!(!client.clear_courses(Some("1")).await);
        assert!(recorded.bodies().is_empty());
    }

    #[tokio::test]
    async fn test_endpoint_from_config() {
        let client = client_for("https://academy.example/", true);
        assert_eq!(client.endpoint(), "https://academy.example/api/cache/clear");
        assert!(client.is_enabled());
    }
}
