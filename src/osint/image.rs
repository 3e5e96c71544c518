// src/osint/image.rs
use std::collections::HashSet;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use exif::{Context, Field, In, Reader, Tag};
#[cfg(test)]
use mockall::automock;
use tracing::{debug, warn};

use crate::config::ImageConfig;
use crate::core::model::ExifTags;
use crate::error::{DossierError, DossierResult};
use crate::utils::with_timeout;

/// Where image bytes come from
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> DossierResult<Vec<u8>>;
}

/// Extracts embedded capture metadata from the profile photo
pub struct ImageForensics {
    source: Arc<dyn ImageSource>,
    excluded_tags: HashSet<String>,
    details: bool,
    timeout: Duration,
}

impl ImageForensics {
    pub fn new(source: Arc<dyn ImageSource>, config: &ImageConfig, timeout: Duration) -> Self {
        Self {
            source,
            excluded_tags: config.excluded_tags.iter().cloned().collect(),
            details: config.details,
            timeout,
        }
    }

    /// Metadata tags of the image at `image_url`; empty on any failure
    pub async fn analyze(&self, image_url: Option<&str>) -> ExifTags {
        let Some(url) = image_url else {
            return ExifTags::new();
        };

        debug!("Attempting forensic analysis on {}", url);

        let bytes = match with_timeout("image download", self.timeout, self.source.fetch(url)).await {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!("Could not fetch image {}: {}", url, e);
                return ExifTags::new();
            }
        };

        match self.extract_tags(&bytes) {
            Ok(tags) => {
                if !tags.is_empty() {
                    warn!("Potentially significant EXIF data found in profile picture ({} tags)", tags.len());
                }
                tags
            }
            Err(e) => {
                debug!("No metadata extracted from {}: {}", url, e);
                ExifTags::new()
            }
        }
    }

    /// Read metadata without decoding pixels
    pub fn extract_tags(&self, bytes: &[u8]) -> DossierResult<ExifTags> {
        let exif = Reader::new()
            .read_from_container(&mut Cursor::new(bytes))
            .map_err(|e| DossierError::ImageError(e.to_string()))?;

        let mut tags = ExifTags::new();
        for field in exif.fields() {
            if !self.details && field.tag == Tag::MakerNote {
                continue;
            }

            let name = tag_name(field);
            if self.excluded_tags.contains(&name) {
                continue;
            }

            let value = field.display_value().with_unit(&exif).to_string();
            tags.insert(name, value);
        }

        Ok(tags)
    }
}

/// `"<IFD> <Tag>"`, with embedded thumbnail pointers folded into
/// `JPEGThumbnail` / `TIFFThumbnail`
fn tag_name(field: &Field) -> String {
    if field.ifd_num == In::THUMBNAIL {
        match field.tag {
            Tag::JPEGInterchangeFormat | Tag::JPEGInterchangeFormatLength => {
                return "JPEGThumbnail".to_string();
            }
            Tag::StripOffsets | Tag::StripByteCounts => return "TIFFThumbnail".to_string(),
            _ => {}
        }
    }

    let ifd = match (field.tag.context(), field.ifd_num) {
        (Context::Tiff, In::PRIMARY) => "Image",
        (Context::Tiff, _) => "Thumbnail",
        (Context::Exif, _) => "EXIF",
        (Context::Gps, _) => "GPS",
        (Context::Interop, _) => "Interoperability",
        #[allow(unreachable_patterns)]
        _ => "Unknown",
    };

    format!("{} {}", ifd, field.tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    /// Minimal little-endian TIFF with `Make = "Test"` in IFD0 and an
    /// IFD1 that carries only JPEG thumbnail pointers
    fn tiff_with_thumbnail() -> Vec<u8> {
        let mut t = Vec::new();
        t.extend_from_slice(b"II\x2a\x00");
        t.extend_from_slice(&8u32.to_le_bytes());
        // IFD0 at 8: one entry, Make ASCII[5] stored at offset 38
        t.extend_from_slice(&1u16.to_le_bytes());
        t.extend_from_slice(&0x010fu16.to_le_bytes());
        t.extend_from_slice(&2u16.to_le_bytes());
        t.extend_from_slice(&5u32.to_le_bytes());
        t.extend_from_slice(&38u32.to_le_bytes());
        // next IFD at 44
        t.extend_from_slice(&44u32.to_le_bytes());
        // padding up to 38
        while t.len() < 38 {
            t.push(0);
        }
        t.extend_from_slice(b"Test\0");
        t.push(0);
        // IFD1 at 44: JPEGInterchangeFormat and its length, LONG inline
        t.extend_from_slice(&2u16.to_le_bytes());
        t.extend_from_slice(&0x0201u16.to_le_bytes());
        t.extend_from_slice(&4u16.to_le_bytes());
        t.extend_from_slice(&1u32.to_le_bytes());
        t.extend_from_slice(&0u32.to_le_bytes());
        t.extend_from_slice(&0x0202u16.to_le_bytes());
        t.extend_from_slice(&4u16.to_le_bytes());
        t.extend_from_slice(&1u32.to_le_bytes());
        t.extend_from_slice(&0u32.to_le_bytes());
        t.extend_from_slice(&0u32.to_le_bytes());
        t
    }

    /// Wrap a TIFF block in a bare JPEG APP1 segment
    fn jpeg_with_exif(tiff: &[u8]) -> Vec<u8> {
        let mut jpeg = vec![0xff, 0xd8, 0xff, 0xe1];
        let len = (2 + 6 + tiff.len()) as u16;
        jpeg.extend_from_slice(&len.to_be_bytes());
        jpeg.extend_from_slice(b"Exif\0\0");
        jpeg.extend_from_slice(tiff);
        jpeg.extend_from_slice(&[0xff, 0xd9]);
        jpeg
    }

    fn forensics(source: MockImageSource) -> ImageForensics {
        let config = Config::embedded().unwrap();
        ImageForensics::new(Arc::new(source), &config.image, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_absent_url_makes_no_request() {
        let mut source = MockImageSource::new();
        source.expect_fetch().never();

        let tags = forensics(source).analyze(None).await;
        assert!(tags.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_yields_empty_map() {
        let mut source = MockImageSource::new();
        source
            .expect_fetch()
            .times(1)
            .returning(|_| Err(DossierError::NetworkError("404 Not Found".to_string())));

        let tags = forensics(source).analyze(Some("https://cdn.test/photo.jpg")).await;
        assert!(tags.is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_format_yields_empty_map() {
        let mut source = MockImageSource::new();
        source.expect_fetch().returning(|_| Ok(b"GIF89a not really".to_vec()));

        let tags = forensics(source).analyze(Some("https://cdn.test/photo.gif")).await;
        assert!(tags.is_empty());
    }

    #[tokio::test]
    async fn test_tags_extracted_and_thumbnail_excluded() {
        let jpeg = jpeg_with_exif(&tiff_with_thumbnail());
        let mut source = MockImageSource::new();
        source.expect_fetch().returning(move |_| Ok(jpeg.clone()));

        let tags = forensics(source).analyze(Some("https://cdn.test/photo.jpg")).await;

        assert!(tags.get("Image Make").unwrap().contains("Test"));
        assert!(!tags.contains_key("JPEGThumbnail"));
        assert!(tags.keys().all(|k| !k.contains("JPEGInterchangeFormat")));
    }

    #[test]
    fn test_exclusion_list_is_configurable() {
        let mut config = Config::embedded().unwrap().image;
        config.excluded_tags = vec!["Image Make".to_string()];
        let forensics = ImageForensics::new(Arc::new(MockImageSource::new()), &config, Duration::from_secs(1));

        let tags = forensics.extract_tags(&jpeg_with_exif(&tiff_with_thumbnail())).unwrap();

        assert!(!tags.contains_key("Image Make"));
        // thumbnail pointers show up once they are no longer excluded
        assert!(tags.contains_key("JPEGThumbnail"));
    }
}
