// SPDX-License-Identifier: MPL-2.0
//! Static image loading and decoding from various formats (PNG, JPEG, SVG, etc.).

use crate::error::{Error, Result};
use image_rs::{DynamicImage, GenericImageView, RgbaImage};
use resvg::usvg;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Decoded RGBA pixels.
///
/// The pixel buffer is shared, so cloning an `ImageData` is cheap and
/// clones compare equal by identity through [`ImageData::same_pixels`].
#[derive(Clone)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    rgba_bytes: Arc<Vec<u8>>,
}

impl ImageData {
    /// Creates a new `ImageData` from RGBA pixels.
    #[must_use]
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            rgba_bytes: Arc::new(pixels),
        }
    }

    /// Converts a decoded `DynamicImage` into RGBA pixels.
    #[must_use]
    pub fn from_dynamic(dynamic: &DynamicImage) -> Self {
        let (width, height) = dynamic.dimensions();
        Self::from_rgba(width, height, dynamic.to_rgba8().into_vec())
    }

    /// Returns a reference to the RGBA bytes.
    pub fn rgba_bytes(&self) -> &[u8] {
        &self.rgba_bytes
    }

    /// Size of the pixel buffer in bytes.
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.rgba_bytes.len()
    }

    /// Returns `true` if both values share the same pixel buffer.
    #[must_use]
    pub fn same_pixels(&self, other: &ImageData) -> bool {
        Arc::ptr_eq(&self.rgba_bytes, &other.rgba_bytes)
    }

    /// Rebuilds a `DynamicImage` for pixel operations.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the buffer length does not match the dimensions.
    pub fn to_dynamic(&self) -> Result<DynamicImage> {
        let buffer = RgbaImage::from_raw(self.width, self.height, self.rgba_bytes.to_vec())
            .ok_or_else(|| {
                Error::Decode(format!(
                    "pixel buffer does not match {}x{}",
                    self.width, self.height
                ))
            })?;
        Ok(DynamicImage::ImageRgba8(buffer))
    }
}

impl std::fmt::Debug for ImageData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageData")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("size_bytes", &self.size_bytes())
            .finish()
    }
}

/// Decodes a still image (raster formats through `image`, SVG through resvg).
///
/// # Errors
///
/// [`Error::Io`] if the file cannot be read, [`Error::Decode`] for malformed
/// raster data and [`Error::Svg`] for SVG documents that cannot be rendered.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<ImageData> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let is_svg = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
    if is_svg {
        rasterize_svg(&bytes)
    } else {
        Ok(ImageData::from_dynamic(&image_rs::load_from_memory(&bytes)?))
    }
}

/// Renders an SVG document at its intrinsic size.
fn rasterize_svg(document: &[u8]) -> Result<ImageData> {
    let tree = usvg::Tree::from_data(document, &usvg::Options::default())
        .map_err(|e| Error::Svg(e.to_string()))?;
    let size = tree.size().to_int_size();
    let (width, height) = (size.width(), size.height());
    if width == 0 || height == 0 {
        return Err(Error::Svg("document has no area".into()));
    }

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| Error::Svg(format!("cannot allocate a {width}x{height} canvas")))?;
    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

    // tiny-skia stores premultiplied RGBA; demultiply for straight-alpha consumers.
    let pixels = pixmap
        .pixels()
        .iter()
        .flat_map(|pixel| {
            let color = pixel.demultiply();
            [color.red(), color.green(), color.blue(), color.alpha()]
        })
        .collect();
    Ok(ImageData::from_rgba(width, height, pixels))
}
