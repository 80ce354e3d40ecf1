//! Letter-to-sign image lookup
//!
//! Maps each letter of a text to its ASL fingerspelling image, base64
//! encoded for direct embedding in a JSON response. Spaces carry no image.

use anyhow::{Context, Result};
use base64::Engine;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One letter of the converted text with its sign image
#[derive(Debug, Clone, Serialize)]
pub struct SignImage {
    pub letter: char,
    /// Base64-encoded PNG, `None` for spaces
    pub image: Option<String>,
}

fn letter_image_path(images_dir: &Path, letter: char) -> PathBuf {
    images_dir.join(format!("{}.png", letter.to_ascii_uppercase()))
}

/// Convert text into sign-language image representations
///
/// Expects the input to be pre-filtered to letters and spaces. Unknown or
/// missing letter images produce entries without image data rather than
/// failing the whole conversion.
pub fn text_to_sign(images_dir: &Path, text: &str) -> Vec<SignImage> {
    let mut images = Vec::with_capacity(text.len());

    for ch in text.chars() {
        if ch == ' ' {
            images.push(SignImage {
                letter: ch,
                image: None,
            });
            continue;
        }

        let path = letter_image_path(images_dir, ch);
        let image = match std::fs::read(&path) {
            Ok(bytes) => Some(base64::engine::general_purpose::STANDARD.encode(bytes)),
            Err(_) => None,
        };

        images.push(SignImage {
            letter: ch.to_ascii_uppercase(),
            image,
        });
    }

    images
}

/// Load the placeholder image shown while the camera is unavailable
pub fn load_placeholder(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read placeholder image: {:?}", path))
}
