//! Turn normalization.
//!
//! Reconciles inline media markers, uploaded bytes and remote files into one
//! ordered list of text and inline-media parts. Normalization never fails:
//! every per-item problem is logged and degrades to a dropped marker or a
//! placeholder text part.

use std::time::Duration;

use tracing::{debug, warn};

use super::media::{self, ImageLimits, InlineMarker, MediaKind};
use super::message::{Part, RawTurn, Turn};
use crate::ports::{BinaryResource, MediaError};

/// Default bound on reading or fetching one attachment.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Default bound on the bytes of one attachment.
pub const DEFAULT_MAX_ATTACHMENT_BYTES: usize = 20 * 1024 * 1024;

/// Default bound on the characters embedded from one text attachment.
pub const DEFAULT_MAX_TEXT_CHARS: usize = 32_000;

const TRUNCATION_NOTE: &str = "[truncated]";

/// Settings for [`MessageNormalizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizerConfig {
    pub fetch_timeout: Duration,
    pub image_limits: ImageLimits,
    pub max_attachment_bytes: usize,
    pub max_text_chars: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            image_limits: ImageLimits::default(),
            max_attachment_bytes: DEFAULT_MAX_ATTACHMENT_BYTES,
            max_text_chars: DEFAULT_MAX_TEXT_CHARS,
        }
    }
}

/// Converts raw turns into canonical [`Turn`]s.
#[derive(Debug, Clone, Default)]
pub struct MessageNormalizer {
    config: NormalizerConfig,
}

impl MessageNormalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Normalizes one turn.
    ///
    /// Part order: the text left after stripping markers, then decoded
    /// markers in order, then attachments in order. A turn with nothing
    /// usable becomes a single empty text part.
    pub async fn normalize(&self, raw: &RawTurn) -> Turn {
        let (remainder, markers) = media::extract_markers(&raw.text);

        let mut parts = Vec::with_capacity(1 + markers.len() + raw.attachments.len());
        if !remainder.is_empty() {
            parts.push(Part::Text(remainder));
        }

        for marker in &markers {
            if let Some(part) = self.marker_part(marker) {
                parts.push(part);
            }
        }

        for attachment in &raw.attachments {
            parts.push(self.attachment_part(attachment.as_ref()).await);
        }

        if parts.is_empty() {
            parts.push(Part::text(""));
        }

        debug!(
            role = %raw.role,
            parts = parts.len(),
            markers = markers.len(),
            attachments = raw.attachments.len(),
            "normalized turn"
        );

        Turn::new(raw.role, parts)
    }

    fn marker_part(&self, marker: &InlineMarker) -> Option<Part> {
        let bytes = match marker.decode() {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(mime_type = %marker.mime_type, error = %err, "dropping inline media");
                return None;
            }
        };

        if !marker.is_image() {
            debug!(mime_type = %marker.mime_type, bytes = bytes.len(), "inline file replaced by placeholder");
            return Some(Part::Text(format!("[Attached file: inline ({})]", marker.mime_type)));
        }

        match media::normalize_image(&bytes, &self.config.image_limits) {
            Ok(part) => Some(Part::Media(part)),
            Err(err) => {
                warn!(mime_type = %marker.mime_type, error = %err, "dropping inline image");
                None
            }
        }
    }

    async fn attachment_part(&self, attachment: &dyn BinaryResource) -> Part {
        let name = display_name(attachment.name());
        let resolved = media::resolve_type(attachment.declared_type(), attachment.name());

        match resolved.kind {
            MediaKind::Image => {
                let result = self
                    .read(attachment)
                    .await
                    .and_then(|bytes| media::normalize_image(&bytes, &self.config.image_limits));
                match result {
                    Ok(part) => Part::Media(part),
                    Err(err) => {
                        warn!(file = %name, error = %err, "image attachment replaced by placeholder");
                        Part::Text(format!("[Image could not be processed: {}]", name))
                    }
                }
            }
            MediaKind::Text => {
                let result = self.read(attachment).await.and_then(|bytes| {
                    String::from_utf8(bytes)
                        .map_err(|e| MediaError::decode(format!("not UTF-8 text: {}", e)))
                });
                match result {
                    Ok(text) => Part::Text(format!(
                        "[{}]\n{}",
                        name,
                        truncate_chars(text.trim_end(), self.config.max_text_chars)
                    )),
                    Err(err) => {
                        warn!(file = %name, error = %err, "text attachment replaced by placeholder");
                        Part::Text(format!("[File could not be processed: {}]", name))
                    }
                }
            }
            MediaKind::Other => {
                let declared = attachment
                    .declared_type()
                    .map(str::trim)
                    .filter(|declared| !declared.is_empty())
                    .unwrap_or(&resolved.mime_type);
                Part::Text(format!("[Attached file: {} ({})]", name, declared))
            }
        }
    }

    async fn read(&self, attachment: &dyn BinaryResource) -> Result<Vec<u8>, MediaError> {
        let bytes = match tokio::time::timeout(self.config.fetch_timeout, attachment.read()).await
        {
            Ok(result) => result?,
            Err(_) => {
                return Err(MediaError::Timeout {
                    timeout_secs: self.config.fetch_timeout.as_secs(),
                })
            }
        };

        if bytes.len() > self.config.max_attachment_bytes {
            return Err(MediaError::TooLarge {
                limit_bytes: self.config.max_attachment_bytes as u64,
            });
        }
        Ok(bytes)
    }
}

/// Keeps at most `max_chars` characters, marking the cut.
fn truncate_chars(text: &str, max_chars: usize) -> std::borrow::Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}\n{}", &text[..cut], TRUNCATION_NOTE).into(),
        None => text.into(),
    }
}

fn display_name(name: &str) -> &str {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        "unnamed file"
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::consultation::media::test_images::png;
    use crate::domain::consultation::Role;
    use async_trait::async_trait;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine as _;
    use std::sync::Arc;

    #[derive(Debug)]
    enum Behavior {
        Bytes(Vec<u8>),
        Fail,
        Hang,
    }

    #[derive(Debug)]
    struct StubFile {
        name: &'static str,
        declared: Option<&'static str>,
        behavior: Behavior,
    }

    #[async_trait]
    impl BinaryResource for StubFile {
        fn name(&self) -> &str {
            self.name
        }

        fn declared_type(&self) -> Option<&str> {
            self.declared
        }

        async fn read(&self) -> Result<Vec<u8>, MediaError> {
            match &self.behavior {
                Behavior::Bytes(bytes) => Ok(bytes.clone()),
                Behavior::Fail => Err(MediaError::fetch("connection reset")),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(Vec::new())
                }
            }
        }
    }

    fn stub(
        name: &'static str,
        declared: Option<&'static str>,
        behavior: Behavior,
    ) -> Arc<dyn BinaryResource> {
        Arc::new(StubFile {
            name,
            declared,
            behavior,
        })
    }

    fn normalizer() -> MessageNormalizer {
        MessageNormalizer::default()
    }

    #[test]
    fn short_text_is_not_truncated() {
        assert_eq!(truncate_chars("abc", 3), "abc");
        assert_eq!(truncate_chars("abcd", 3), "abc\n[truncated]");
    }

    mod inline_markers {
        use super::*;

        #[tokio::test]
        async fn valid_image_marker_becomes_media_after_text() {
            let encoded = BASE64.encode(png(16, 16, [255, 0, 0, 255]));
            let raw = RawTurn::user(format!("Hello [MEDIA|image/png|{}] world", encoded));

            let turn = normalizer().normalize(&raw).await;

            assert_eq!(turn.role, Role::User);
            assert_eq!(turn.parts.len(), 2);
            assert_eq!(turn.parts[0], Part::text("Hello  world"));
            match &turn.parts[1] {
                Part::Media(media) => assert_eq!(media.mime_type, "image/jpeg"),
                other => panic!("expected media, got {:?}", other),
            }
        }

        #[tokio::test]
        async fn invalid_base64_is_dropped_silently() {
            let raw = RawTurn::user("Hello [MEDIA|image/png|%%%invalid%%%] world");
            let turn = normalizer().normalize(&raw).await;
            assert_eq!(turn.parts, vec![Part::text("Hello  world")]);
        }

        #[tokio::test]
        async fn undecodable_image_is_dropped() {
            let encoded = BASE64.encode(b"definitely not a png");
            let raw = RawTurn::user(format!("look [MEDIA|image/png|{}]", encoded));
            let turn = normalizer().normalize(&raw).await;
            assert_eq!(turn.parts, vec![Part::text("look")]);
        }

        #[tokio::test]
        async fn non_image_marker_becomes_placeholder() {
            let encoded = BASE64.encode(b"MZ\x90\x00\x03\x00");
            let raw = RawTurn::user(format!("see [MEDIA|application/x-msdownload|{}]", encoded));
            let turn = normalizer().normalize(&raw).await;
            assert_eq!(
                turn.parts,
                vec![
                    Part::text("see"),
                    Part::text("[Attached file: inline (application/x-msdownload)]"),
                ]
            );
            assert!(!turn.has_media());
        }
    }

    mod empty_turns {
        use super::*;

        #[tokio::test]
        async fn whitespace_only_yields_single_empty_text() {
            let turn = normalizer().normalize(&RawTurn::user("   \t\n")).await;
            assert_eq!(turn.parts, vec![Part::text("")]);
        }

        #[tokio::test]
        async fn only_broken_marker_yields_single_empty_text() {
            let turn = normalizer()
                .normalize(&RawTurn::user("[MEDIA|image/png|@@@]"))
                .await;
            assert_eq!(turn.parts, vec![Part::text("")]);
        }
    }

    mod attachments {
        use super::*;

        #[tokio::test]
        async fn image_upload_is_normalized() {
            let raw = RawTurn::user("see rash").with_attachment(stub(
                "rash.png",
                None,
                Behavior::Bytes(png(2048, 1024, [90, 60, 30, 255])),
            ));

            let turn = normalizer().normalize(&raw).await;

            assert_eq!(turn.parts.len(), 2);
            let Part::Media(media) = &turn.parts[1] else {
                panic!("expected media part");
            };
            let decoded = image::load_from_memory(&media.data).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (1024, 512));
        }

        #[tokio::test]
        async fn failed_image_read_becomes_placeholder() {
            let raw = RawTurn::user("")
                .with_attachment(stub("paw.jpg", Some("image"), Behavior::Fail));
            let turn = normalizer().normalize(&raw).await;
            assert_eq!(
                turn.parts,
                vec![Part::text("[Image could not be processed: paw.jpg]")]
            );
        }

        #[tokio::test]
        async fn corrupt_image_becomes_placeholder() {
            let raw = RawTurn::user("").with_attachment(stub(
                "paw.jpg",
                None,
                Behavior::Bytes(b"garbage".to_vec()),
            ));
            let turn = normalizer().normalize(&raw).await;
            assert_eq!(
                turn.parts,
                vec![Part::text("[Image could not be processed: paw.jpg]")]
            );
        }

        #[tokio::test]
        async fn slow_fetch_times_out_into_placeholder() {
            let normalizer = MessageNormalizer::new(NormalizerConfig {
                fetch_timeout: Duration::from_millis(50),
                ..NormalizerConfig::default()
            });
            let raw = RawTurn::user("")
                .with_attachment(stub("remote.png", Some("image/png"), Behavior::Hang));
            let turn = normalizer.normalize(&raw).await;
            assert_eq!(
                turn.parts,
                vec![Part::text("[Image could not be processed: remote.png]")]
            );
        }

        #[tokio::test]
        async fn text_file_is_embedded_with_name() {
            let raw = RawTurn::user("diet log attached").with_attachment(stub(
                "diet.txt",
                Some("text"),
                Behavior::Bytes(b"kibble twice a day\n".to_vec()),
            ));
            let turn = normalizer().normalize(&raw).await;
            assert_eq!(
                turn.parts,
                vec![
                    Part::text("diet log attached"),
                    Part::text("[diet.txt]\nkibble twice a day"),
                ]
            );
        }

        #[tokio::test]
        async fn long_text_file_is_truncated() {
            let normalizer = MessageNormalizer::new(NormalizerConfig {
                max_text_chars: 5,
                ..NormalizerConfig::default()
            });
            let raw = RawTurn::user("").with_attachment(stub(
                "log.txt",
                None,
                Behavior::Bytes("ééééééé".as_bytes().to_vec()),
            ));
            let turn = normalizer.normalize(&raw).await;
            assert_eq!(
                turn.parts,
                vec![Part::text("[log.txt]\nééééé\n[truncated]")]
            );
        }

        #[tokio::test]
        async fn oversized_attachment_becomes_placeholder() {
            let normalizer = MessageNormalizer::new(NormalizerConfig {
                max_attachment_bytes: 8,
                ..NormalizerConfig::default()
            });
            let raw = RawTurn::user("")
                .with_attachment(stub(
                    "huge.png",
                    None,
                    Behavior::Bytes(png(16, 16, [0, 0, 0, 255])),
                ))
                .with_attachment(stub(
                    "huge.txt",
                    None,
                    Behavior::Bytes(vec![b'a'; 64]),
                ));
            let turn = normalizer.normalize(&raw).await;
            assert_eq!(
                turn.parts,
                vec![
                    Part::text("[Image could not be processed: huge.png]"),
                    Part::text("[File could not be processed: huge.txt]"),
                ]
            );
        }

        #[tokio::test]
        async fn other_file_becomes_named_placeholder_without_reading() {
            let raw = RawTurn::user("")
                .with_attachment(stub("bloodwork.pdf", Some("file"), Behavior::Fail));
            let turn = normalizer().normalize(&raw).await;
            assert_eq!(
                turn.parts,
                vec![Part::text("[Attached file: bloodwork.pdf (file)]")]
            );
        }

        #[tokio::test]
        async fn order_is_text_markers_then_attachments() {
            let encoded = BASE64.encode(b"abc");
            let raw = RawTurn::user(format!("first [MEDIA|audio/ogg|{}]", encoded))
                .with_attachment(stub("notes.txt", None, Behavior::Bytes(b"x".to_vec())));
            let turn = normalizer().normalize(&raw).await;
            assert_eq!(turn.parts.len(), 3);
            assert_eq!(turn.parts[0], Part::text("first"));
            assert_eq!(turn.parts[1], Part::text("[Attached file: inline (audio/ogg)]"));
            assert_eq!(turn.parts[2], Part::text("[notes.txt]\nx"));
        }
    }
}
