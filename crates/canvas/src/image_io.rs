//! Image files
//!
//! Decoding PNG/JPEG files into RGBA pixels and encoding frames back out.

use std::path::Path;

use image::{ExtendedColorType, GenericImageView, ImageFormat};
use log::debug;
use sdlcanvas_render::ImagePixels;

use crate::error::{CanvasError, CanvasResult};

/// Decode an image file to RGBA pixel data
pub(crate) fn load_image(path: &Path) -> CanvasResult<ImagePixels> {
    if !path.is_file() {
        return Err(CanvasError::MissingFile(path.to_path_buf()));
    }
    let img = image::open(path)?;
    let (width, height) = img.dimensions();
    let data = img.to_rgba8().into_raw();

    debug!("Decoded image {}: {}x{}", path.display(), width, height);

    Ok(ImagePixels {
        width,
        height,
        data,
    })
}

/// Encode an RGBA frame to a file
pub(crate) fn save_rgba(
    path: &Path,
    rgba: &[u8],
    width: u32,
    height: u32,
    format: ImageFormat,
) -> CanvasResult<()> {
    match format {
        // JPEG has no alpha channel
        ImageFormat::Jpeg => {
            let rgb: Vec<u8> = rgba
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect();
            image::save_buffer_with_format(path, &rgb, width, height, ExtendedColorType::Rgb8, format)?;
        }
        _ => {
            image::save_buffer_with_format(path, rgba, width, height, ExtendedColorType::Rgba8, format)?;
        }
    }
    debug!("Wrote {}x{} frame to {}", width, height, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_roundtrip() {
        let path = std::env::temp_dir().join("sdlcanvas-image-io.png");
        let rgba = vec![255, 0, 0, 255, 0, 255, 0, 255];
        save_rgba(&path, &rgba, 2, 1, ImageFormat::Png).unwrap();
        let decoded = load_image(&path).unwrap();
        assert_eq!(decoded.width, 2);
        assert_eq!(decoded.height, 1);
        assert_eq!(decoded.data, rgba);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_jpeg_writes() {
        let path = std::env::temp_dir().join("sdlcanvas-image-io.jpg");
        let rgba = vec![128; 4 * 4 * 4];
        save_rgba(&path, &rgba, 4, 4, ImageFormat::Jpeg).unwrap();
        assert!(path.is_file());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_image() {
        let result = load_image(Path::new("/nonexistent/picture.png"));
        assert!(matches!(result, Err(CanvasError::MissingFile(_))));
    }
}
