// SPDX-License-Identifier: MPL-2.0
//! Filesystem-backed decoder.

use super::{
    animation, detect_media_kind, image, Image, ImageContent, MediaKind, StaticImage, VideoClip,
};
use crate::application::port::ImageDecoder;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Decodes images from disk according to their detected [`MediaKind`].
///
/// - Static: raster formats through the `image` crate, SVG through resvg
/// - Animated: every frame of GIF / WebP animations
/// - Video: metadata only; playback belongs to the display
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDecoder;

impl ImageDecoder for FsDecoder {
    fn decode(&self, path: &Path) -> Result<Image> {
        let kind = detect_media_kind(path)
            .ok_or_else(|| Error::Decode(format!("Unsupported file format: {}", path.display())))?;
        let file_size = fs::metadata(path)?.len();

        let content = match kind {
            MediaKind::Static => ImageContent::Static(StaticImage::new(image::load_image(path)?)),
            MediaKind::Animated => ImageContent::Animated(animation::load_animation(path)?),
            MediaKind::Video => ImageContent::Video(VideoClip::default()),
        };

        Ok(Image::new(path.to_path_buf(), file_size, content))
    }
}
