//! Where a finished capture goes: a timestamped bitmap and the clipboard.

use std::path::{Path, PathBuf};

use arboard::{Clipboard, ImageData};
use chrono::{DateTime, Local};
use image::{DynamicImage, ImageFormat, RgbaImage};
use log::debug;

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("could not create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("clipboard unavailable: {0}")]
    Clipboard(#[from] arboard::Error),
}

pub fn file_name(now: DateTime<Local>) -> String {
    format!("screenshot_{}.bmp", now.format("%Y%m%d_%H%M%S"))
}

/// Writes `image` as a 24-bit bitmap into `dir` and returns the file path.
pub fn save_bitmap(
    image: &RgbaImage,
    dir: &Path,
    now: DateTime<Local>,
) -> Result<PathBuf, OutputError> {
    std::fs::create_dir_all(dir).map_err(|source| OutputError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(file_name(now));
    let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    rgb.save_with_format(&path, ImageFormat::Bmp)
        .map_err(|source| OutputError::Write {
            path: path.clone(),
            source,
        })?;
    debug!("wrote {}x{} to {}", rgb.width(), rgb.height(), path.display());
    Ok(path)
}

pub fn copy_to_clipboard(image: &RgbaImage) -> Result<(), OutputError> {
    let mut clipboard = Clipboard::new()?;
    let image_data = ImageData {
        width: image.width() as usize,
        height: image.height() as usize,
        bytes: image.as_raw().into(),
    };
    clipboard.set_image(image_data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use image::Rgba;

    fn at_noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 12, 5, 7).unwrap()
    }

    #[test]
    fn file_name_is_timestamped() {
        assert_eq!(file_name(at_noon()), "screenshot_20240309_120507.bmp");
    }

    #[test]
    fn saves_opaque_bitmap() {
        let dir = tempfile::tempdir().unwrap();
        let mut img = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]));
        img.put_pixel(2, 1, Rgba([200, 100, 50, 0]));

        let path = save_bitmap(&img, dir.path(), at_noon()).unwrap();
        assert_eq!(path, dir.path().join("screenshot_20240309_120507.bmp"));

        let back = image::open(&path).unwrap();
        assert_eq!((back.width(), back.height()), (3, 2));
        let rgb = back.to_rgb8();
        assert_eq!(rgb.get_pixel(0, 0).0, [10, 20, 30]);
        assert_eq!(rgb.get_pixel(2, 1).0, [200, 100, 50]);
    }

    #[test]
    fn creates_missing_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("shots").join("today");
        let img = RgbaImage::new(1, 1);
        let path = save_bitmap(&img, &nested, at_noon()).unwrap();
        assert!(path.starts_with(&nested));
        assert!(path.exists());
    }
}
