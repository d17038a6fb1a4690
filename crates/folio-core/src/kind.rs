//! Upload kinds
//!
//! Each kind of upload the site accepts maps to an entity tag used in stored
//! file names. The transform policy for each kind is wired in the processing
//! crate so this enum stays a plain closed variant.

use serde::{Deserialize, Serialize};

/// Kind of upload, selected by the caller per entity being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadKind {
    ProjectGallery,
    ArticleInline,
    ProfileAvatar,
    CarouselSlide,
}

impl UploadKind {
    /// Entity tag used as the leading component of stored file names.
    pub fn tag(self) -> &'static str {
        match self {
            UploadKind::ProjectGallery => "project",
            UploadKind::ArticleInline => "article",
            UploadKind::ProfileAvatar => "profile",
            UploadKind::CarouselSlide => "carousel",
        }
    }

    pub fn parse(s: &str) -> Result<Self, anyhow::Error> {
        match s.to_lowercase().as_str() {
            "project" | "project_gallery" => Ok(UploadKind::ProjectGallery),
            "article" | "article_inline" => Ok(UploadKind::ArticleInline),
            "profile" | "profile_avatar" => Ok(UploadKind::ProfileAvatar),
            "carousel" | "carousel_slide" => Ok(UploadKind::CarouselSlide),
            _ => Err(anyhow::anyhow!("Invalid upload kind: {}", s)),
        }
    }
}
