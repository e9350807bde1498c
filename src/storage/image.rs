//! Upload-time image handling: the compressed WebP rendition and object keys.

use std::io::Cursor;

use chrono::Utc;
use image::{imageops::FilterType, DynamicImage, ImageFormat};
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

pub const MAX_WIDTH: u32 = 1920;
pub const MAX_HEIGHT: u32 = 1080;
pub const WEBP_MIME: &str = "image/webp";

pub const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

static UNSAFE_NAME_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9\-_]").unwrap());
static EXTENSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.[^/.]+$").unwrap());

pub fn is_allowed_mime_type(mime_type: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&mime_type)
}

#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub original: Vec<u8>,
    pub original_mime_type: String,
    pub compressed: Vec<u8>,
}

/// Shrinks wide images to 1920px wide, or otherwise tall images to 1080px
/// high, keeping the aspect ratio, and encodes the result as WebP. The
/// original bytes are passed through untouched.
pub fn process_image(bytes: Vec<u8>, mime_type: &str) -> Result<ProcessedImage, image::ImageError> {
    let decoded = image::load_from_memory(&bytes)?;

    let resized = if decoded.width() > MAX_WIDTH {
        decoded.resize(MAX_WIDTH, u32::MAX, FilterType::Lanczos3)
    } else if decoded.height() > MAX_HEIGHT {
        decoded.resize(u32::MAX, MAX_HEIGHT, FilterType::Lanczos3)
    } else {
        decoded
    };

    // The WebP encoder only takes 8-bit buffers.
    let rgba = DynamicImage::ImageRgba8(resized.to_rgba8());
    let mut compressed = Vec::new();
    rgba.write_to(&mut Cursor::new(&mut compressed), ImageFormat::WebP)?;

    Ok(ProcessedImage {
        original: bytes,
        original_mime_type: mime_type.to_string(),
        compressed,
    })
}

/// `images/{millis}-{random}-{name}[-{suffix}].{ext}`
pub fn generate_image_key(filename: &str, suffix: Option<&str>) -> String {
    let timestamp = Utc::now().timestamp_millis();
    let random: String = Uuid::new_v4().simple().to_string().chars().take(6).collect();

    let ext = match filename.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext,
        _ => "jpg",
    };
    let base = EXTENSION.replace(filename, "");
    let base = UNSAFE_NAME_CHARS.replace_all(&base, "-");

    match suffix {
        Some(suffix) => format!("images/{}-{}-{}-{}.{}", timestamp, random, base, suffix, ext),
        None => format!("images/{}-{}-{}.{}", timestamp, random, base, ext),
    }
}

/// Key of the WebP rendition stored next to an `-original` upload.
pub fn compressed_key(original_key: &str) -> String {
    let renamed = original_key.replacen("-original", "-compressed", 1);
    if EXTENSION.is_match(&renamed) {
        EXTENSION.replace(&renamed, ".webp").into_owned()
    } else {
        format!("{}.webp", renamed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageEncoder, RgbImage};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let mut buf = Vec::new();
        image::codecs::png::PngEncoder::new(&mut buf)
            .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
            .unwrap();
        buf
    }

    #[test]
    fn keys_follow_naming_scheme() {
        let key = generate_image_key("Widok na jezioro.JPG", Some("original"));
        assert!(key.starts_with("images/"));
        assert!(key.ends_with("-Widok-na-jezioro-original.JPG"));

        assert_eq!(
            compressed_key("images/1-abc123-taras-original.png"),
            "images/1-abc123-taras-compressed.webp"
        );
    }

    #[test]
    fn files_without_extension_default_to_jpg() {
        let key = generate_image_key("image", None);
        assert!(key.ends_with("-image.jpg"));
    }

    #[test]
    fn wide_images_are_scaled_to_max_width() {
        let processed = process_image(png(2400, 600), "image/png").unwrap();
        let webp = image::load_from_memory_with_format(&processed.compressed, ImageFormat::WebP)
            .unwrap();
        assert_eq!(webp.width(), MAX_WIDTH);
        assert_eq!(webp.height(), 480);
        assert_eq!(processed.original_mime_type, "image/png");
    }

    #[test]
    fn tall_images_are_scaled_to_max_height() {
        let processed = process_image(png(800, 1600), "image/png").unwrap();
        let webp = image::load_from_memory(&processed.compressed).unwrap();
        assert_eq!(webp.height(), MAX_HEIGHT);
        assert_eq!(webp.width(), 540);
    }

    #[test]
    fn small_images_keep_their_size() {
        let processed = process_image(png(64, 48), "image/png").unwrap();
        let webp = image::load_from_memory(&processed.compressed).unwrap();
        assert_eq!((webp.width(), webp.height()), (64, 48));
    }

    #[test]
    fn rejects_garbage() {
        assert!(process_image(b"not an image".to_vec(), "image/jpeg").is_err());
    }

    #[test]
    fn mime_whitelist() {
        assert!(is_allowed_mime_type("image/webp"));
        assert!(!is_allowed_mime_type("image/svg+xml"));
    }
}
