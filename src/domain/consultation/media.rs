//! Media classification and image normalization.
//!
//! Images bound for the provider are flattened to RGB, shrunk so the
//! longest side fits the configured limit, and re-encoded as JPEG. Inline
//! markers take the form `[MEDIA|<mime-type>|<base64-payload>]`.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{Rgb, RgbImage};
use once_cell::sync::Lazy;
use regex::Regex;

use super::message::MediaPart;
use crate::ports::MediaError;

/// MIME type of every normalized image.
pub const CANONICAL_IMAGE_MIME: &str = "image/jpeg";

const FALLBACK_MIME: &str = "application/octet-stream";

static MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[MEDIA\|([^|\]]+)\|([^\]]*)\]").expect("marker pattern is valid")
});

/// Coarse kind of an attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Text,
    Other,
}

/// Kind plus the MIME type the attachment is treated as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    pub kind: MediaKind,
    pub mime_type: String,
}

/// Resolves what an attachment is from its declared type and file name.
///
/// A declared MIME type wins. A coarse declaration ("image", "text") fixes
/// the kind and the name refines the MIME type. Anything else falls back to
/// inference from the name, then `application/octet-stream`.
pub fn resolve_type(declared: Option<&str>, name: &str) -> ResolvedType {
    let declared = declared
        .map(|d| d.trim().to_ascii_lowercase())
        .filter(|d| !d.is_empty());
    let guessed = mime_guess::from_path(name)
        .first()
        .map(|mime| mime.essence_str().to_string());

    match declared {
        Some(mime) if mime.contains('/') => ResolvedType {
            kind: kind_of_mime(&mime),
            mime_type: mime,
        },
        Some(coarse) if coarse == "image" || coarse == "text" => {
            let kind = if coarse == "image" {
                MediaKind::Image
            } else {
                MediaKind::Text
            };
            let mime_type = guessed
                .filter(|mime| kind_of_mime(mime) == kind)
                .unwrap_or_else(|| match kind {
                    MediaKind::Image => CANONICAL_IMAGE_MIME.to_string(),
                    _ => "text/plain".to_string(),
                });
            ResolvedType { kind, mime_type }
        }
        Some(_) => ResolvedType {
            kind: MediaKind::Other,
            mime_type: guessed.unwrap_or_else(|| FALLBACK_MIME.to_string()),
        },
        None => {
            let mime_type = guessed.unwrap_or_else(|| FALLBACK_MIME.to_string());
            ResolvedType {
                kind: kind_of_mime(&mime_type),
                mime_type,
            }
        }
    }
}

fn kind_of_mime(mime: &str) -> MediaKind {
    if mime.starts_with("image/") {
        MediaKind::Image
    } else if mime.starts_with("text/") {
        MediaKind::Text
    } else {
        MediaKind::Other
    }
}

/// A media marker lifted out of turn text, payload still encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineMarker {
    pub mime_type: String,
    pub payload: String,
}

impl InlineMarker {
    pub fn is_image(&self) -> bool {
        kind_of_mime(&self.mime_type) == MediaKind::Image
    }

    /// Decodes the base64 payload. Whitespace inside the payload is ignored.
    pub fn decode(&self) -> Result<Vec<u8>, MediaError> {
        let compact: String = self
            .payload
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        BASE64
            .decode(compact.as_bytes())
            .map_err(|e| MediaError::decode(format!("invalid base64 payload: {}", e)))
    }
}

pub fn contains_marker(text: &str) -> bool {
    MARKER.is_match(text)
}

/// Removes every marker from `text`.
///
/// Returns the remaining text with outer whitespace trimmed (inner
/// whitespace is left exactly as written) and the markers in order.
pub fn extract_markers(text: &str) -> (String, Vec<InlineMarker>) {
    let markers = MARKER
        .captures_iter(text)
        .map(|caps| InlineMarker {
            mime_type: caps[1].trim().to_ascii_lowercase(),
            payload: caps[2].to_string(),
        })
        .collect();
    let remainder = MARKER.replace_all(text, "").trim().to_string();
    (remainder, markers)
}

/// Limits applied when normalizing images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageLimits {
    /// Longest side after normalization, in pixels.
    pub max_dimension: u32,
    /// JPEG quality, 1-100.
    pub jpeg_quality: u8,
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self {
            max_dimension: 1024,
            jpeg_quality: 85,
        }
    }
}

/// Decodes an image, flattens it to RGB over white, bounds its longest side
/// and re-encodes it as JPEG.
pub fn normalize_image(bytes: &[u8], limits: &ImageLimits) -> Result<MediaPart, MediaError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| MediaError::decode(format!("unreadable image: {}", e)))?;

    let rgb = flatten_to_rgb(&decoded.to_rgba8());
    let bounded = bound_dimensions(rgb, limits.max_dimension);

    let mut encoded = Vec::new();
    JpegEncoder::new_with_quality(&mut encoded, limits.jpeg_quality.clamp(1, 100))
        .encode_image(&bounded)
        .map_err(|e| MediaError::encode(e.to_string()))?;

    Ok(MediaPart::new(CANONICAL_IMAGE_MIME, encoded))
}

fn flatten_to_rgb(rgba: &image::RgbaImage) -> RgbImage {
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let pixel = rgba.get_pixel(x, y);
        let alpha = u16::from(pixel[3]);
        let blend =
            |channel: u8| (((u16::from(channel) * alpha) + (255 * (255 - alpha))) / 255) as u8;
        Rgb([blend(pixel[0]), blend(pixel[1]), blend(pixel[2])])
    })
}

fn bound_dimensions(rgb: RgbImage, max_dimension: u32) -> RgbImage {
    let (width, height) = rgb.dimensions();
    let longest = width.max(height);
    if max_dimension == 0 || longest <= max_dimension {
        return rgb;
    }
    let (new_width, new_height) = scaled_dimensions(width, height, max_dimension);
    image::imageops::resize(&rgb, new_width, new_height, FilterType::Triangle)
}

/// Dimensions with the longest side equal to `max_dimension`, aspect ratio
/// preserved, never below one pixel.
fn scaled_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let scale = f64::from(max_dimension) / f64::from(width.max(height));
    let scale_side = |side: u32| ((f64::from(side) * scale).round() as u32).clamp(1, max_dimension);
    (scale_side(width), scale_side(height))
}


#[cfg(test)]
mod tests {
    use super::*;
    use test_images::png;

    mod resolve {
        use super::*;

        #[test]
        fn declared_mime_wins() {
            let resolved = resolve_type(Some("image/png"), "report.pdf");
            assert_eq!(resolved.kind, MediaKind::Image);
            assert_eq!(resolved.mime_type, "image/png");
        }

        #[test]
        fn coarse_image_refined_by_name() {
            let resolved = resolve_type(Some("image"), "paw.png");
            assert_eq!(resolved.kind, MediaKind::Image);
            assert_eq!(resolved.mime_type, "image/png");
        }

        #[test]
        fn coarse_image_without_useful_name() {
            let resolved = resolve_type(Some("Image"), "photo");
            assert_eq!(resolved.kind, MediaKind::Image);
            assert_eq!(resolved.mime_type, "image/jpeg");
        }

        #[test]
        fn coarse_text_defaults_to_plain() {
            let resolved = resolve_type(Some("text"), "symptoms");
            assert_eq!(resolved.kind, MediaKind::Text);
            assert_eq!(resolved.mime_type, "text/plain");
        }

        #[test]
        fn missing_type_inferred_from_name() {
            assert_eq!(resolve_type(None, "x.jpeg").kind, MediaKind::Image);
            assert_eq!(resolve_type(Some("  "), "notes.txt").kind, MediaKind::Text);
            let pdf = resolve_type(None, "bloodwork.pdf");
            assert_eq!(pdf.kind, MediaKind::Other);
            assert_eq!(pdf.mime_type, "application/pdf");
        }

        #[test]
        fn unknown_name_falls_back_to_octet_stream() {
            let resolved = resolve_type(None, "mystery");
            assert_eq!(resolved.kind, MediaKind::Other);
            assert_eq!(resolved.mime_type, "application/octet-stream");
        }

        #[test]
        fn other_coarse_kind_is_other() {
            let resolved = resolve_type(Some("file"), "scan.pdf");
            assert_eq!(resolved.kind, MediaKind::Other);
            assert_eq!(resolved.mime_type, "application/pdf");
        }
    }

    mod markers {
        use super::*;

        #[test]
        fn extracts_marker_and_keeps_inner_whitespace() {
            let (text, markers) = extract_markers("Hello [MEDIA|image/png|aGk=] world");
            assert_eq!(text, "Hello  world");
            assert_eq!(
                markers,
                vec![InlineMarker {
                    mime_type: "image/png".into(),
                    payload: "aGk=".into()
                }]
            );
        }

        #[test]
        fn extracts_multiple_markers_in_order() {
            let (text, markers) =
                extract_markers("[MEDIA|image/png|AAA=][MEDIA|application/pdf|BBB=]");
            assert_eq!(text, "");
            assert_eq!(markers.len(), 2);
            assert!(markers[0].is_image());
            assert!(!markers[1].is_image());
        }

        #[test]
        fn text_without_markers_is_trimmed_only() {
            let (text, markers) = extract_markers("  Max won't eat  ");
            assert_eq!(text, "Max won't eat");
            assert!(markers.is_empty());
            assert!(!contains_marker("Max won't eat"));
        }

        #[test]
        fn decode_rejects_invalid_base64() {
            let marker = InlineMarker {
                mime_type: "image/png".into(),
                payload: "!!not-base64!!".into(),
            };
            assert!(matches!(marker.decode(), Err(MediaError::Decode(_))));
        }

        #[test]
        fn decode_ignores_line_breaks() {
            let marker = InlineMarker {
                mime_type: "text/plain".into(),
                payload: "aG\nk=".into(),
            };
            assert_eq!(marker.decode().unwrap(), b"hi".to_vec());
        }
    }

    mod images {
        use super::*;

        #[test]
        fn small_image_keeps_dimensions() {
            let part = normalize_image(&png(40, 20, [10, 20, 30, 255]), &ImageLimits::default())
                .unwrap();
            assert_eq!(part.mime_type, "image/jpeg");
            let decoded = image::load_from_memory(&part.data).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (40, 20));
        }

        #[test]
        fn large_image_is_bounded_preserving_aspect() {
            let limits = ImageLimits {
                max_dimension: 100,
                jpeg_quality: 80,
            };
            let part = normalize_image(&png(400, 200, [200, 10, 10, 255]), &limits).unwrap();
            let decoded = image::load_from_memory(&part.data).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (100, 50));
        }

        #[test]
        fn transparent_pixels_flatten_to_white() {
            let part =
                normalize_image(&png(8, 8, [0, 0, 0, 0]), &ImageLimits::default()).unwrap();
            let decoded = image::load_from_memory(&part.data).unwrap().to_rgb8();
            let pixel = decoded.get_pixel(4, 4);
            assert!(pixel[0] > 240 && pixel[1] > 240 && pixel[2] > 240);
        }

        #[test]
        fn garbage_bytes_fail_to_decode() {
            let result = normalize_image(b"not an image", &ImageLimits::default());
            assert!(matches!(result, Err(MediaError::Decode(_))));
        }

        #[test]
        fn scaled_dimensions_never_reach_zero() {
            assert_eq!(scaled_dimensions(5000, 2, 1024), (1024, 1));
            assert_eq!(scaled_dimensions(768, 2048, 1024), (384, 1024));
        }
    }
}
