//! Blog post model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::double_option;

/// `rel` hint for a tag link on the public site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkFollow {
    Follow,
    Nofollow,
}

impl std::str::FromStr for LinkFollow {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "follow" => Ok(Self::Follow),
            "nofollow" => Ok(Self::Nofollow),
            _ => Err(anyhow::anyhow!("Invalid link follow value: {}", s)),
        }
    }
}

/// A blog tag, optionally linking somewhere
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogTag {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow: Option<LinkFollow>,
}

impl BlogTag {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: None,
            follow: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blog {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub image: Option<String>,
    pub image_file_path: Option<String>,
    pub image_file_name: Option<String>,
    #[serde(rename = "linkTag", default)]
    pub link_tags: Vec<BlogTag>,
    /// Tag names mirrored for the public site, `None` when there are no tags
    pub tags: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a blog post
///
/// `linkTag` is kept raw; the service normalizes whatever shape the client sent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBlogInput {
    pub title: Option<String>,
    pub text: Option<String>,
    pub image: Option<String>,
    pub image_file_path: Option<String>,
    pub image_file_name: Option<String>,
    #[serde(rename = "linkTag", default)]
    pub link_tag: Value,
}

/// Input for updating a blog post
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBlogInput {
    pub title: Option<String>,
    pub text: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub image: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_file_path: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_file_name: Option<Option<String>>,
    #[serde(rename = "linkTag", default, deserialize_with = "double_option")]
    pub link_tag: Option<Value>,
}

impl UpdateBlogInput {
    /// Whether any field carries a non-empty value
    pub fn has_updates(&self) -> bool {
        fn filled(v: &Option<String>) -> bool {
            v.as_deref().is_some_and(|s| !s.is_empty())
        }

        filled(&self.title)
            || filled(&self.text)
            || self.image.as_ref().is_some_and(filled)
            || self.image_file_path.as_ref().is_some_and(filled)
            || self.image_file_name.as_ref().is_some_and(filled)
            || self
                .link_tag
                .as_ref()
                .is_some_and(crate::services::normalize::is_truthy)
    }
}
