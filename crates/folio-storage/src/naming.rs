//! Stored file name synthesis.
//!
//! Name format: `{tag}_{id}[_{slot}]_{timestamp}_{random}.{ext}`. The random
//! disambiguator guarantees uniqueness per call; the entity identifier alone
//! must not, since repeated uploads for one entity may race. Declared upload
//! file names never reach this module.

use chrono::Utc;
use folio_core::UploadKind;
use uuid::Uuid;

const RANDOM_LEN: usize = 8;
const MAX_ID_LEN: usize = 64;

/// Deterministic components of a stored file name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamingKey {
    pub kind: UploadKind,
    pub entity_id: String,
    pub slot: Option<u32>,
}

impl NamingKey {
    pub fn new(kind: UploadKind, entity_id: impl Into<String>) -> Self {
        NamingKey {
            kind,
            entity_id: sanitize_id(&entity_id.into()),
            slot: None,
        }
    }

    pub fn with_slot(kind: UploadKind, entity_id: impl Into<String>, slot: u32) -> Self {
        NamingKey {
            slot: Some(slot),
            ..Self::new(kind, entity_id)
        }
    }

    /// Build a unique base name for one upload call.
    ///
    /// Main and thumbnail names must come from the same base so the pair can
    /// be deleted together; call this once per upload and derive both.
    pub fn unique_base(&self) -> String {
        let timestamp = Utc::now().timestamp_millis();
        let random = Uuid::new_v4().simple().to_string();
        let random = &random[..RANDOM_LEN];

        match self.slot {
            Some(slot) => format!(
                "{}_{}_{}_{}_{}",
                self.kind.tag(),
                self.entity_id,
                slot,
                timestamp,
                random
            ),
            None => format!(
                "{}_{}_{}_{}",
                self.kind.tag(),
                self.entity_id,
                timestamp,
                random
            ),
        }
    }
}

/// File name for a main artifact.
pub fn main_file_name(base: &str, ext: &str) -> String {
    format!("{}.{}", base, ext)
}

/// File name for the companion thumbnail, sharing the main artifact's stem.
pub fn thumbnail_file_name(base: &str, ext: &str) -> String {
    format!("{}_thumb.{}", base, ext)
}

/// Reduce an entity identifier to file-system-safe characters.
fn sanitize_id(id: &str) -> String {
    let s: String = id
        .chars()
        .take(MAX_ID_LEN)
        .map(|c| {
            if c.is_alphanumeric() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if s.trim_matches('_').is_empty() {
        "entity".to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_name_components() {
        let key = NamingKey::new(UploadKind::ProfileAvatar, "42");
        let base = key.unique_base();
        assert!(base.starts_with("profile_42_"));
        // tag, id, timestamp, random
        assert_eq!(base.split('_').count(), 4);
    }

    #[test]
    fn test_base_name_with_slot() {
        let key = NamingKey::with_slot(UploadKind::ProjectGallery, "7", 2);
        let base = key.unique_base();
        assert!(base.starts_with("project_7_2_"));
        assert_eq!(base.split('_').count(), 5);
    }

    #[test]
    fn test_repeated_calls_never_collide() {
        let key = NamingKey::new(UploadKind::CarouselSlide, "9");
        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            assert!(seen.insert(key.unique_base()));
        }
    }

    #[test]
    fn test_main_and_thumbnail_share_stem() {
        let key = NamingKey::new(UploadKind::ArticleInline, "12");
        let base = key.unique_base();
        let main = main_file_name(&base, "jpg");
        let thumb = thumbnail_file_name(&base, "jpg");
        assert_eq!(main, format!("{}.jpg", base));
        assert_eq!(thumb, format!("{}_thumb.jpg", base));
    }

    #[test]
    fn test_sanitize_id_strips_traversal() {
        let key = NamingKey::new(UploadKind::ProfileAvatar, "../../etc/passwd");
        assert!(!key.entity_id.contains(".."));
        assert!(!key.entity_id.contains('/'));
    }

    #[test]
    fn test_sanitize_id_empty_fallback() {
        let key = NamingKey::new(UploadKind::ProfileAvatar, "///");
        assert_eq!(key.entity_id, "entity");
    }
}
