use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage};

use crate::error::{Error, Result};

/// Input to a detection call: a filesystem path to decode, or a
/// caller-decoded pixel buffer.
///
/// Everything is resolved to a grayscale buffer so both detection
/// granularities see identical pixels regardless of how the input arrived.
#[derive(Debug, Clone)]
pub enum ImageSource {
    Path(PathBuf),
    Buffer(GrayImage),
}

impl ImageSource {
    /// Resolve the source into exactly one grayscale buffer.
    pub fn into_gray(self) -> Result<GrayImage> {
        let gray = match self {
            Self::Path(path) => image::open(&path)
                .map_err(|e| Error::Input(format!("failed to decode {}: {e}", path.display())))?
                .to_luma8(),
            Self::Buffer(buffer) => buffer,
        };
        if gray.width() == 0 || gray.height() == 0 {
            return Err(Error::Input("image has no pixels".into()));
        }
        Ok(gray)
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&str> for ImageSource {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<GrayImage> for ImageSource {
    fn from(buffer: GrayImage) -> Self {
        Self::Buffer(buffer)
    }
}

impl From<DynamicImage> for ImageSource {
    fn from(image: DynamicImage) -> Self {
        Self::Buffer(image.to_luma8())
    }
}
