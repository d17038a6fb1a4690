//! File signature sniffing
//!
//! Extension and declared MIME type are attacker-controlled; the leading
//! bytes are the cheapest reliable discriminator. A signature match does not
//! guarantee the payload fully decodes, so the raster path still treats
//! decoding as fallible.

const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];
const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const RIFF_MAGIC: [u8; 4] = *b"RIFF";
const WEBP_FOURCC: [u8; 4] = *b"WEBP";

/// How far into an SVG payload the structural check will look for the root
/// element, so huge payloads are never scanned in full here.
const SVG_SCAN_LIMIT: usize = 1024;

/// Upload content kinds the pipeline accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Webp,
    Svg,
}

impl ImageKind {
    /// Map a lower-cased file extension to its expected kind.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "jpg" | "jpeg" => Some(ImageKind::Jpeg),
            "png" => Some(ImageKind::Png),
            "webp" => Some(ImageKind::Webp),
            "svg" => Some(ImageKind::Svg),
            _ => None,
        }
    }

    pub fn is_vector(self) -> bool {
        matches!(self, ImageKind::Svg)
    }
}

/// Detect a raster kind from leading bytes, independent of any declared
/// metadata.
pub fn detect(bytes: &[u8]) -> Option<ImageKind> {
    if bytes.len() >= 3 && bytes[..3] == JPEG_MAGIC {
        return Some(ImageKind::Jpeg);
    }
    if bytes.len() >= 8 && bytes[..8] == PNG_MAGIC {
        return Some(ImageKind::Png);
    }
    if bytes.len() >= 12 && bytes[..4] == RIFF_MAGIC && bytes[8..12] == WEBP_FOURCC {
        return Some(ImageKind::Webp);
    }
    None
}

/// Check whether the payload's actual bytes match the declared kind.
pub fn matches(bytes: &[u8], kind: ImageKind) -> bool {
    match kind {
        ImageKind::Svg => looks_like_svg(bytes),
        raster => detect(bytes) == Some(raster),
    }
}

/// Structural check for vector markup: the decoded text must carry an `<svg`
/// root element within the scan window.
pub fn looks_like_svg(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(SVG_SCAN_LIMIT)];
    let text = match std::str::from_utf8(window) {
        Ok(s) => s,
        // A root element cut mid-way by the window boundary can leave a
        // partial UTF-8 sequence at the end; retry without the tail.
        Err(e) if e.valid_up_to() > 0 => match std::str::from_utf8(&window[..e.valid_up_to()]) {
            Ok(s) => s,
            Err(_) => return false,
        },
        Err(_) => return false,
    };
    let trimmed = text.trim_start();
    trimmed.starts_with("<svg") || trimmed.contains("<svg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_jpeg() {
        let bytes = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
        assert_eq!(detect(&bytes), Some(ImageKind::Jpeg));
        assert!(matches(&bytes, ImageKind::Jpeg));
        assert!(!matches(&bytes, ImageKind::Png));
    }

    #[test]
    fn test_detect_png() {
        let bytes = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00];
        assert_eq!(detect(&bytes), Some(ImageKind::Png));
        assert!(matches(&bytes, ImageKind::Png));
    }

    #[test]
    fn test_detect_webp() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&[0x24, 0x00, 0x00, 0x00]);
        bytes.extend_from_slice(b"WEBP");
        bytes.extend_from_slice(b"VP8 ");
        assert_eq!(detect(&bytes), Some(ImageKind::Webp));
    }

    #[test]
    fn test_riff_without_webp_fourcc() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&[0x24, 0x00, 0x00, 0x00]);
        bytes.extend_from_slice(b"WAVE");
        assert_eq!(detect(&bytes), None);
    }

    #[test]
    fn test_detect_rejects_short_and_unknown() {
        assert_eq!(detect(&[0xFF, 0xD8]), None);
        assert_eq!(detect(b"not an image at all"), None);
        assert_eq!(detect(&[]), None);
    }

    #[test]
    fn test_looks_like_svg() {
        assert!(looks_like_svg(
            b"<?xml version=\"1.0\"?><svg xmlns=\"http://www.w3.org/2000/svg\"></svg>"
        ));
        assert!(looks_like_svg(b"<svg viewBox=\"0 0 10 10\"/>"));
        assert!(looks_like_svg(b"  \n  <svg></svg>"));
        assert!(!looks_like_svg(b"\x89PNG\r\n\x1a\n"));
        assert!(!looks_like_svg(b"<html><body>nope</body></html>"));
        assert!(!looks_like_svg(&[0xFF, 0xFE, 0x00, 0x00]));
    }

    #[test]
    fn test_svg_root_outside_scan_window() {
        let mut payload = vec![b' '; 2048];
        payload.extend_from_slice(b"<svg></svg>");
        assert!(!looks_like_svg(&payload));
    }

    #[test]
    fn test_from_extension() {
        assert_eq!(ImageKind::from_extension("jpg"), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_extension("jpeg"), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_extension("png"), Some(ImageKind::Png));
        assert_eq!(ImageKind::from_extension("webp"), Some(ImageKind::Webp));
        assert_eq!(ImageKind::from_extension("svg"), Some(ImageKind::Svg));
        assert_eq!(ImageKind::from_extension("gif"), None);
        assert_eq!(ImageKind::from_extension("exe"), None);
    }
}
