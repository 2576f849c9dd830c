//! Clipboard Integration
//!
//! Resolves the image to send: an explicit path is used as-is, otherwise
//! the clipboard image is dumped to a fixed-name PNG so both sources go
//! through the same file-based request path. Also writes result text
//! back to the clipboard.

use anyhow::{bail, Context, Result};
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Resolve the image file to send
pub fn resolve_image(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if !path.is_file() {
            bail!("image not found: {}", path.display());
        }
        return Ok(path.to_path_buf());
    }

    let target = crate::storage::clipboard_image_path()?;
    grab_image_to_file(&target)?;
    Ok(target)
}

/// Dump the current clipboard image to `target` as PNG
pub fn grab_image_to_file(target: &Path) -> Result<()> {
    let mut clipboard =
        arboard::Clipboard::new().context("Clipboard service is unavailable")?;
    let data = clipboard
        .get_image()
        .context("No image on the clipboard (copy one, or pass -i <path>)")?;

    debug!("Clipboard image: {}x{}", data.width, data.height);

    save_rgba_as_png(
        data.width as u32,
        data.height as u32,
        data.bytes.into_owned(),
        target,
    )?;

    info!("Clipboard image written to {}", target.display());
    Ok(())
}

/// Place result text on the clipboard
pub fn set_text(text: &str) -> Result<()> {
    let mut clipboard =
        arboard::Clipboard::new().context("Clipboard service is unavailable")?;
    clipboard
        .set_text(text)
        .context("Failed to copy text to the clipboard")?;
    Ok(())
}

/// Encode raw RGBA pixels as a PNG file
fn save_rgba_as_png(width: u32, height: u32, bytes: Vec<u8>, target: &Path) -> Result<()> {
    let image = RgbaImage::from_raw(width, height, bytes)
        .context("Clipboard image has an unexpected pixel layout")?;
    DynamicImage::ImageRgba8(image)
        .save_with_format(target, ImageFormat::Png)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("equation.png");
        std::fs::write(&path, b"not really a png").unwrap();

        let resolved = resolve_image(Some(&path)).unwrap();
        assert_eq!(resolved, path);
    }

    #[test]
    fn test_resolve_missing_path_fails() {
        let result = resolve_image(Some(Path::new("/nonexistent/equation.png")));
        assert!(result.is_err());
    }

    #[test]
    fn test_save_rgba_as_png_roundtrip() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("clipboard.png");

        // 2x2 opaque test pattern
        let pixels: Vec<u8> = vec![
            255, 0, 0, 255, 0, 255, 0, 255, //
            0, 0, 255, 255, 255, 255, 255, 255,
        ];
        save_rgba_as_png(2, 2, pixels.clone(), &target).unwrap();

        // The bytes sent in the request are exactly the bytes on disk
        let written = std::fs::read(&target).unwrap();
        let reread = std::fs::read(&target).unwrap();
        assert_eq!(written, reread);

        // And they decode back to the captured pixels
        let decoded = image::open(&target).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (2, 2));
        assert_eq!(decoded.into_raw(), pixels);
    }

    #[test]
    fn test_save_rgba_bad_buffer_fails() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("clipboard.png");

        // 3 bytes cannot be a 2x2 RGBA image
        let result = save_rgba_as_png(2, 2, vec![1, 2, 3], &target);
        assert!(result.is_err());
    }

    #[test]
    fn test_overwrites_previous_capture() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("clipboard.png");

        save_rgba_as_png(1, 1, vec![10, 20, 30, 255], &target).unwrap();
        let first = std::fs::read(&target).unwrap();

        save_rgba_as_png(1, 1, vec![200, 100, 50, 255], &target).unwrap();
        let second = std::fs::read(&target).unwrap();

        assert_ne!(first, second);
    }
}
