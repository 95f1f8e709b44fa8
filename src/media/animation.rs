// SPDX-License-Identifier: MPL-2.0
//! Frame decoding for animated GIF and WebP files.

use super::{Animation, AnimationFrame, ImageData};
use crate::error::{Error, Result};
use image_rs::codecs::gif::GifDecoder;
use image_rs::codecs::webp::WebPDecoder;
use image_rs::{AnimationDecoder, Frame};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

/// Counts the number of frames in a GIF file.
pub(crate) fn count_gif_frames<P: AsRef<Path>>(path: P) -> Result<usize> {
    let reader = BufReader::new(File::open(path)?);
    let decoder = GifDecoder::new(reader)?;
    Ok(decoder.into_frames().count())
}

/// Decodes every frame of an animated GIF or WebP.
///
/// # Errors
///
/// Returns [`Error::Decode`] for other extensions, unreadable data, or an
/// animation without frames.
pub fn load_animation(path: &Path) -> Result<Animation> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    let reader = BufReader::new(File::open(path)?);

    let frames = match extension.as_str() {
        "gif" => GifDecoder::new(reader)?.into_frames().collect_frames()?,
        "webp" => WebPDecoder::new(reader)?.into_frames().collect_frames()?,
        other => {
            return Err(Error::Decode(format!(
                "no animation decoder for '.{other}' files"
            )))
        }
    };

    let frames: Vec<AnimationFrame> = frames.into_iter().map(to_animation_frame).collect();
    let first = frames
        .first()
        .ok_or_else(|| Error::Decode("animation has no frames".into()))?;
    let (width, height) = (first.image.width, first.image.height);

    Ok(Animation {
        frames,
        width,
        height,
    })
}

fn to_animation_frame(frame: Frame) -> AnimationFrame {
    let (numer, denom) = frame.delay().numer_denom_ms();
    let delay_ms = if denom == 0 { 0 } else { numer / denom };
    let buffer = frame.into_buffer();
    let (width, height) = buffer.dimensions();
    AnimationFrame {
        image: ImageData::from_rgba(width, height, buffer.into_raw()),
        delay: Duration::from_millis(u64::from(delay_ms)),
    }
}
