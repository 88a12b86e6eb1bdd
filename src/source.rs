use std::path::Path;

use crate::error::{LoomError, LoomResult};

/// Read-only pixel access for the image being reproduced.
pub trait PixelSource {
    fn dimensions(&self) -> (u32, u32);

    /// RGBA components at an image-local coordinate. Callers stay within
    /// `dimensions()`.
    fn rgba(&self, x: u32, y: u32) -> [u8; 4];
}

/// A decoded image file. Decoding happens once, up front; an unreadable
/// file aborts the run before any placement is attempted.
#[derive(Debug)]
pub struct RasterImage {
    pixels: image::RgbaImage,
}

impl RasterImage {
    pub fn open(path: &Path) -> LoomResult<Self> {
        let decoded = image::open(path)
            .map_err(|e| LoomError::image(format!("open '{}': {e}", path.display())))?;
        Ok(Self {
            pixels: decoded.to_rgba8(),
        })
    }
}

impl PixelSource for RasterImage {
    fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    fn rgba(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels.get_pixel(x, y).0
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::path::PathBuf;

    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "pixelloom_{name}_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ))
    }

    #[test]
    fn opens_png_and_reads_components() {
        let tmp = temp_dir("source_png");
        std::fs::create_dir_all(&tmp).unwrap();
        let path = tmp.join("img.png");

        let img = image::RgbaImage::from_raw(2, 1, vec![255, 0, 0, 255, 0, 0, 0, 10]).unwrap();
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        std::fs::write(&path, &buf).unwrap();

        let source = RasterImage::open(&path).unwrap();
        assert_eq!(source.dimensions(), (2, 1));
        assert_eq!(source.rgba(0, 0), [255, 0, 0, 255]);
        assert_eq!(source.rgba(1, 0), [0, 0, 0, 10]);

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = RasterImage::open(Path::new("definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, LoomError::Image(_)));
    }
}
