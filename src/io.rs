use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, RgbaImage};
use rfd::FileDialog;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{CombineError, Result};

/// Default file name offered by the export dialog.
pub const DEFAULT_EXPORT_NAME: &str = "combined.png";

// ============================================================================
// LOADING
// ============================================================================

/// True when the file name ends in `.png`, ignoring case.
pub fn is_png_path(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().eq_ignore_ascii_case("png"))
        .unwrap_or(false)
}

/// Decode a PNG from disk into an owned RGBA buffer.
///
/// Paths not named `.png` are rejected up front with
/// [`CombineError::UnsupportedFile`]; the bytes are only inspected by the
/// decoder, so a mislabelled file fails with [`CombineError::DecodeFailure`].
pub fn load_png(path: &Path) -> Result<RgbaImage> {
    if !is_png_path(path) {
        return Err(CombineError::UnsupportedFile(path.to_path_buf()));
    }
    let img = image::open(path).map_err(|source| CombineError::DecodeFailure {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.into_rgba8())
}

// ============================================================================
// SAVING
// ============================================================================

/// Encode `image` as an RGBA PNG at `path`, alpha preserved.
///
/// A file left half-written by a failed encode is removed.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    let encode_err = |source: image::ImageError| CombineError::Encode {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(|e| encode_err(e.into()))?;
    let mut writer = BufWriter::new(file);

    let encoded = PngEncoder::new(&mut writer).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ColorType::Rgba8,
    );
    let written = encoded.and_then(|()| writer.flush().map_err(image::ImageError::IoError));

    if let Err(e) = written {
        drop(writer);
        let _ = fs::remove_file(path);
        return Err(encode_err(e));
    }
    Ok(())
}

/// Append `.png` when the chosen name has no extension.
pub fn with_png_extension(path: PathBuf) -> PathBuf {
    if path.extension().is_some() {
        path
    } else {
        path.with_extension("png")
    }
}

/// Show the native save dialog. `Err(SaveCancelled)` when dismissed.
pub fn pick_export_path() -> Result<PathBuf> {
    FileDialog::new()
        .add_filter("PNG Files", &["png"])
        .set_file_name(DEFAULT_EXPORT_NAME)
        .save_file()
        .map(with_png_extension)
        .ok_or(CombineError::SaveCancelled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn png_extension_is_case_insensitive() {
        assert!(is_png_path(Path::new("a/b/tile.png")));
        assert!(is_png_path(Path::new("TILE.PNG")));
        assert!(is_png_path(Path::new("mixed.PnG")));
        assert!(!is_png_path(Path::new("tile.jpg")));
        assert!(!is_png_path(Path::new("png")));
        assert!(!is_png_path(Path::new("tile.png.bak")));
    }

    #[test]
    fn non_png_name_is_unsupported() {
        let err = load_png(Path::new("photo.jpeg")).unwrap_err();
        assert!(matches!(err, CombineError::UnsupportedFile(_)));
    }

    #[test]
    fn garbage_png_is_decode_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        fs::write(&path, b"definitely not a png").unwrap();
        let err = load_png(&path).unwrap_err();
        assert!(matches!(err, CombineError::DecodeFailure { .. }));
        assert!(!err.is_silent());
    }

    #[test]
    fn save_then_load_keeps_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let mut img = RgbaImage::new(3, 2);
        img.put_pixel(1, 1, Rgba([12, 34, 56, 78]));
        save_png(&img, &path).unwrap();

        let back = load_png(&path).unwrap();
        assert_eq!(back.dimensions(), (3, 2));
        assert_eq!(*back.get_pixel(1, 1), Rgba([12, 34, 56, 78]));
        assert_eq!(*back.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn save_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("out.png");
        let err = save_png(&RgbaImage::new(1, 1), &path).unwrap_err();
        assert!(matches!(err, CombineError::Encode { .. }));
    }

    #[test]
    fn extension_appended_only_when_missing() {
        assert_eq!(with_png_extension("grid".into()), PathBuf::from("grid.png"));
        assert_eq!(with_png_extension("grid.png".into()), PathBuf::from("grid.png"));
    }
}
