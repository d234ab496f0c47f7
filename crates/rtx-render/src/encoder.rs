//! Canvas encoder
//!
//! Writes the canvas as 8-bit RGBA. The image is encoded into a hidden
//! sibling file and renamed onto the output path only once it is
//! complete, so a failed write never leaves a file at `path`.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::{ExtendedColorType, ImageFormat};

use crate::canvas::Canvas;
use crate::{RenderError, Result};

/// Output container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Png,
    Bmp,
    /// Lossless WebP
    WebP,
}

impl OutputFormat {
    /// Get format from file extension, PNG when unknown or missing
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("bmp") => Self::Bmp,
            Some("webp") => Self::WebP,
            _ => Self::Png,
        }
    }

    /// Convert to image crate format
    fn to_image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Bmp => ImageFormat::Bmp,
            Self::WebP => ImageFormat::WebP,
        }
    }
}

/// Encode `canvas` to `path`
pub fn encode(canvas: &Canvas, path: &Path) -> Result<OutputFormat> {
    let format = OutputFormat::from_path(path);
    let partial = partial_path(path)?;

    if let Err(err) = write_image(canvas, path, &partial, format) {
        if partial.exists() {
            if let Err(cleanup) = fs::remove_file(&partial) {
                tracing::warn!("Failed to remove {}: {}", partial.display(), cleanup);
            }
        }
        return Err(err);
    }

    fs::rename(&partial, path).map_err(|source| {
        let _ = fs::remove_file(&partial);
        RenderError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;

    tracing::debug!(
        "Wrote {}x{} {:?} to {}",
        canvas.width(),
        canvas.height(),
        format,
        path.display()
    );
    Ok(format)
}

fn write_image(canvas: &Canvas, path: &Path, partial: &Path, format: OutputFormat) -> Result<()> {
    let io_error = |source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(partial).map_err(io_error)?;
    let mut writer = BufWriter::new(file);

    image::write_buffer_with_format(
        &mut writer,
        canvas.as_bytes(),
        canvas.width(),
        canvas.height(),
        ExtendedColorType::Rgba8,
        format.to_image_format(),
    )
    .map_err(|source| RenderError::Encode {
        path: path.to_path_buf(),
        source,
    })?;

    writer.flush().map_err(io_error)?;
    let file = writer.into_inner().map_err(|e| io_error(e.into_error()))?;
    file.sync_all().map_err(io_error)?;
    Ok(())
}

/// `dir/.name.partial` next to `dir/name`
fn partial_path(path: &Path) -> Result<PathBuf> {
    let name = path.file_name().ok_or_else(|| RenderError::Io {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "output path has no file name"),
    })?;

    let mut partial = std::ffi::OsString::from(".");
    partial.push(name);
    partial.push(".partial");
    Ok(path.with_file_name(partial))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("out.png")), OutputFormat::Png);
        assert_eq!(OutputFormat::from_path(Path::new("out.BMP")), OutputFormat::Bmp);
        assert_eq!(OutputFormat::from_path(Path::new("a/b/out.webp")), OutputFormat::WebP);
        assert_eq!(OutputFormat::from_path(Path::new("out")), OutputFormat::Png);
        assert_eq!(OutputFormat::from_path(Path::new("out.jpg")), OutputFormat::Png);
    }

    #[test]
    fn test_partial_path() {
        let partial = partial_path(Path::new("/tmp/out/img.png")).unwrap();
        assert_eq!(partial, PathBuf::from("/tmp/out/.img.png.partial"));
        assert!(partial_path(Path::new("/")).is_err());
    }
}
