//! `![alt](src)` images rendered as figures under the site images directory.

use super::Transformer;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static IMAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[([^\]\n]*)\]\(([^)\s]+)\)").expect("image pattern"));

static RESIZE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?)\|(\d+)x(\d+)$").expect("resize pattern"));

/// Extensions accepted as images, compared case-insensitively
pub const IMAGE_EXTENSIONS: &[&str] = &["avif", "bmp", "gif", "jpeg", "jpg", "png", "svg", "webp"];

/// Whether `file` ends in an allowed image extension
pub fn is_image_file(file: &str) -> bool {
    file.rsplit_once('.')
        .map(|(_, ext)| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

pub struct ImageTransformer {
    images_url: String,
}

impl ImageTransformer {
    pub fn new(images_url: &str) -> Self {
        let mut images_url = images_url.to_string();
        if !images_url.ends_with('/') {
            images_url.push('/');
        }
        Self { images_url }
    }

    fn render(&self, caps: &Captures) -> String {
        let raw_alt = &caps[1];
        let src = &caps[2];
        let file = src.rsplit('/').next().unwrap_or(src);

        if !is_image_file(file) {
            tracing::warn!("Unsupported image format: {}", src);
            return format!(
                r#"<p class="image-error">Unsupported image format: {}</p>"#,
                escape_attr(file)
            );
        }

        let (alt, size) = match RESIZE.captures(raw_alt) {
            Some(resize) => (
                resize[1].trim().to_string(),
                Some((resize[2].to_string(), resize[3].to_string())),
            ),
            None => (raw_alt.trim().to_string(), None),
        };

        let alt = escape_attr(&alt);
        let dimensions = size
            .map(|(w, h)| format!(r#" width="{w}" height="{h}""#))
            .unwrap_or_default();
        let caption = if alt.is_empty() {
            String::new()
        } else {
            format!("<figcaption>{alt}</figcaption>")
        };

        format!(
            r#"<figure><img src="{}{}" alt="{}"{}>{}</figure>"#,
            self.images_url, file, alt, dimensions, caption
        )
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

impl Transformer for ImageTransformer {
    fn name(&self) -> &'static str {
        "images"
    }

    fn transform(&self, text: &str) -> String {
        IMAGE
            .replace_all(text, |caps: &Captures| self.render(caps))
            .into_owned()
    }
}
