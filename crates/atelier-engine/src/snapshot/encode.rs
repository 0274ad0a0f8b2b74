use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};

use crate::error::{EngineError, EngineResult};
use crate::render::Pixmap;

/// Encodes `pixmap` by file extension and writes it, creating parent
/// directories. Paths without a supported extension get `.png` appended.
///
/// Returns the path actually written.
pub fn write_pixmap(pixmap: &Pixmap, path: &Path) -> EngineResult<PathBuf> {
    let (path, format) = match ImageFormat::from_path(path) {
        Ok(f @ (ImageFormat::Png | ImageFormat::Bmp | ImageFormat::Jpeg)) => (path.to_path_buf(), f),
        _ => {
            let mut with_ext = path.as_os_str().to_owned();
            with_ext.push(".png");
            (PathBuf::from(with_ext), ImageFormat::Png)
        }
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let image = pixmap.to_image();
    let result = match format {
        // JPEG has no alpha channel.
        ImageFormat::Jpeg => DynamicImage::ImageRgba8(image).to_rgb8().save_with_format(&path, format),
        _ => image.save_with_format(&path, format),
    };
    result.map_err(|e| EngineError::snapshot(&path, e.to_string()))?;

    log::debug!("wrote {}x{} snapshot to {}", pixmap.width(), pixmap.height(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Rgba8;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("atelier-encode-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn png_round_trips_pixels() {
        let mut px = Pixmap::new(3, 2);
        px.blend(2, 1, Rgba8::new(10, 20, 30, 255));
        let path = write_pixmap(&px, &scratch("nested/dir/a.png")).unwrap();

        let back = image::open(&path).unwrap().to_rgba8();
        assert_eq!(back.dimensions(), (3, 2));
        assert_eq!(back.get_pixel(2, 1).0, [10, 20, 30, 255]);
    }

    #[test]
    fn unknown_extension_gets_png_appended() {
        let path = write_pixmap(&Pixmap::new(1, 1), &scratch("shot.frame")).unwrap();
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("shot.frame.png"));
        assert!(path.exists());
    }

    #[test]
    fn jpeg_drops_alpha() {
        let path = write_pixmap(&Pixmap::new(4, 4), &scratch("t.jpg")).unwrap();
        assert!(path.exists());
    }
}
