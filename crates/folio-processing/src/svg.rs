//! SVG sanitizer
//!
//! Deny-list scan over inline vector markup. Any match rejects the whole
//! upload; offending fragments are never stripped, because rewriting
//! untrusted markup is itself an injection-prone operation. Accepted
//! payloads are stored byte-for-byte.

use crate::validator::ValidationError;
use regex::Regex;

/// Vector markup scanner with pre-compiled deny-list patterns.
pub struct VectorSanitizer {
    script_element: Regex,
    event_handler: Regex,
    javascript_url: Regex,
}

impl VectorSanitizer {
    pub fn new() -> Result<Self, anyhow::Error> {
        Ok(VectorSanitizer {
            // <script> in any casing, with or without attributes
            script_element: Regex::new(r"(?i)<\s*script[\s>/]")?,
            // Inline event handlers: onload=, onerror=, onclick=, ...
            event_handler: Regex::new(r#"(?i)\bon[a-z]+\s*="#)?,
            // javascript: scheme anywhere an attribute could carry it
            javascript_url: Regex::new(r"(?i)javascript\s*:")?,
        })
    }

    /// Scan decoded markup for dangerous constructs.
    ///
    /// Runs after the shared validator and the structural signature check,
    /// so the payload is already known to be UTF-8 SVG-shaped text.
    pub fn scan(&self, data: &[u8]) -> Result<(), ValidationError> {
        let text = std::str::from_utf8(data).map_err(|_| ValidationError::NotSvg)?;

        if self.script_element.is_match(text) {
            return Err(ValidationError::DangerousContent(
                "embedded script element".to_string(),
            ));
        }
        if self.event_handler.is_match(text) {
            return Err(ValidationError::DangerousContent(
                "inline event handler attribute".to_string(),
            ));
        }
        if self.javascript_url.is_match(text) {
            return Err(ValidationError::DangerousContent(
                "javascript: URL".to_string(),
            ));
        }

        Ok(())
    }
}
