use std::path::Path;

use crate::error::MeshError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb8,
    Rgba8,
}

/// Decoded texture pixels, kept opaque by the pipeline and handed to the
/// renderer as-is.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub data: Vec<u8>,
}

/// Thin glue over the image crate: decode whatever format the file is in and
/// flatten it to RGB8 or RGBA8 depending on whether it carries alpha.
pub fn load_image(path: &Path) -> Result<ImageData, MeshError> {
    let img = image::open(path).map_err(|e| {
        MeshError::new("texture-open")
            .with_arg("path", path.display())
            .push_std(e)
    })?;

    let (width, height) = (img.width(), img.height());
    let image_data = if img.color().has_alpha() {
        ImageData {
            width,
            height,
            format: PixelFormat::Rgba8,
            data: img.into_rgba8().into_raw(),
        }
    } else {
        ImageData {
            width,
            height,
            format: PixelFormat::Rgb8,
            data: img.into_rgb8().into_raw(),
        }
    };

    log::debug!(
        "loaded texture '{}': {}x{} {:?}",
        path.display(),
        image_data.width,
        image_data.height,
        image_data.format
    );
    Ok(image_data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reports_texture_open() {
        let err = load_image(Path::new("/nonexistent/tex.tga")).unwrap_err();
        assert_eq!(err.key, "texture-open");
    }
}
