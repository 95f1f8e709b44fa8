// SPDX-License-Identifier: MPL-2.0
//! Decoded media units held by the cache.
//!
//! An [`Image`] is the opaque unit the browsing engine moves around: it is
//! created by a decoder (or replaced by an edit), owned by the cache, and
//! borrowed by the display for the duration of a single call.

pub mod animation;
pub mod decoder;
pub mod image;
pub mod image_transform;

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

pub use decoder::FsDecoder;
pub use extensions::IMAGE_EXTENSIONS;
pub use image::{load_image, ImageData};

/// The three kinds of media the engine distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Static,
    Animated,
    Video,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Static => write!(f, "static"),
            MediaKind::Animated => write!(f, "animated"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

/// A still image whose displayed pixels may be replaced by an edit.
#[derive(Debug)]
pub struct StaticImage {
    original: ImageData,
    edited: Mutex<Option<ImageData>>,
}

impl StaticImage {
    #[must_use]
    pub fn new(original: ImageData) -> Self {
        Self {
            original,
            edited: Mutex::new(None),
        }
    }

    /// The pixels as decoded from disk.
    pub fn original(&self) -> &ImageData {
        &self.original
    }

    /// The pixels to show: the edited variant if any, otherwise the original.
    #[must_use]
    pub fn current(&self) -> ImageData {
        self.edited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .unwrap_or_else(|| self.original.clone())
    }

    /// Replaces the edited variant.
    ///
    /// Callers must hold a cache reservation on the owning entry.
    pub fn set_edited(&self, edited: ImageData) {
        *self.edited.lock().unwrap_or_else(PoisonError::into_inner) = Some(edited);
    }

    #[must_use]
    pub fn is_edited(&self) -> bool {
        self.edited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

/// One frame of an animation.
#[derive(Debug, Clone)]
pub struct AnimationFrame {
    pub image: ImageData,
    pub delay: Duration,
}

/// A decoded multi-frame image (GIF, animated WebP).
#[derive(Debug, Clone)]
pub struct Animation {
    pub frames: Vec<AnimationFrame>,
    pub width: u32,
    pub height: u32,
}

/// A video file. Frames are decoded by the display, not by the engine.
#[derive(Debug, Clone, Default)]
pub struct VideoClip {
    pub width: u32,
    pub height: u32,
}

/// Content of an [`Image`], one variant per [`MediaKind`].
#[derive(Debug)]
pub enum ImageContent {
    Static(StaticImage),
    Animated(Animation),
    Video(VideoClip),
}

/// A decoded media file, keyed by its file name.
#[derive(Debug)]
pub struct Image {
    name: String,
    path: PathBuf,
    file_size: u64,
    content: ImageContent,
}

impl Image {
    /// Creates an image for `path`; the cache key is the file name.
    #[must_use]
    pub fn new(path: PathBuf, file_size: u64, content: ImageContent) -> Self {
        let name = file_name_key(&path);
        Self {
            name,
            path,
            file_size,
            content,
        }
    }

    /// Stable cache key derived from the file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Source file size in bytes.
    #[must_use]
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    #[must_use]
    pub fn file_size_kb(&self) -> u64 {
        self.file_size / 1024
    }

    pub fn content(&self) -> &ImageContent {
        &self.content
    }

    #[must_use]
    pub fn kind(&self) -> MediaKind {
        match self.content {
            ImageContent::Static(_) => MediaKind::Static,
            ImageContent::Animated(_) => MediaKind::Animated,
            ImageContent::Video(_) => MediaKind::Video,
        }
    }

    /// Returns the editable still image, if this is one.
    pub fn as_static(&self) -> Option<&StaticImage> {
        match &self.content {
            ImageContent::Static(image) => Some(image),
            ImageContent::Animated(_) | ImageContent::Video(_) => None,
        }
    }

    /// Current pixel dimensions (after edits for static images).
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        match &self.content {
            ImageContent::Static(image) => {
                let current = image.current();
                (current.width, current.height)
            }
            ImageContent::Animated(animation) => (animation.width, animation.height),
            ImageContent::Video(clip) => (clip.width, clip.height),
        }
    }

    /// Pixels suitable for scaling: the current still or the first frame.
    #[must_use]
    pub fn current_frame(&self) -> Option<ImageData> {
        match &self.content {
            ImageContent::Static(image) => Some(image.current()),
            ImageContent::Animated(animation) => {
                animation.frames.first().map(|frame| frame.image.clone())
            }
            ImageContent::Video(_) => None,
        }
    }
}

/// Derives the cache key for a path (its file name, not the full path).
#[must_use]
pub fn file_name_key(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Supported media extensions
pub mod extensions {
    /// Image file extensions
    pub const IMAGE_EXTENSIONS: &[&str] = &[
        "jpg", "jpeg", "png", "gif", "tiff", "tif", "webp", "bmp", "ico", "svg",
    ];

    /// Video file extensions
    pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "m4v", "avi", "mov", "mkv", "webm"];

    /// All supported extensions (images + videos)
    #[must_use]
    pub fn all_supported_extensions() -> Vec<&'static str> {
        IMAGE_EXTENSIONS
            .iter()
            .chain(VIDEO_EXTENSIONS.iter())
            .copied()
            .collect()
    }
}

/// Detects if a WebP file is animated by checking for the ANMF chunk marker.
///
/// Animated WebP files contain "ANMF" (Animation Frame) chunks early in the file.
fn is_webp_animated_by_marker<P: AsRef<Path>>(path: P) -> crate::error::Result<bool> {
    let mut file = File::open(path)?;

    let mut buffer = vec![0u8; 1024];
    let bytes_read = file.read(&mut buffer)?;
    buffer.truncate(bytes_read);

    Ok(buffer.windows(4).any(|window| window == b"ANMF"))
}

/// Detects if a GIF or WebP file is animated (has multiple frames).
fn is_animated<P: AsRef<Path>>(path: P, extension: &str) -> crate::error::Result<bool> {
    match extension {
        "gif" => Ok(animation::count_gif_frames(path)? > 1),
        "webp" => is_webp_animated_by_marker(path),
        _ => Ok(false),
    }
}

/// Extension-only check: is this a file the engine can list?
#[must_use]
pub fn is_supported_media<P: AsRef<Path>>(path: P) -> bool {
    lowercase_extension(path.as_ref())
        .is_some_and(|ext| extensions::all_supported_extensions().contains(&ext.as_str()))
}

fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(str::to_lowercase)
}

/// Detects the media kind from the file extension, probing GIF/WebP for animation.
pub fn detect_media_kind<P: AsRef<Path>>(path: P) -> Option<MediaKind> {
    let path_ref = path.as_ref();
    let extension = lowercase_extension(path_ref)?;

    if extension == "gif" || extension == "webp" {
        return match is_animated(path_ref, &extension) {
            Ok(true) => Some(MediaKind::Animated),
            Ok(false) | Err(_) => Some(MediaKind::Static),
        };
    }

    if extensions::IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        Some(MediaKind::Static)
    } else if extensions::VIDEO_EXTENSIONS.contains(&extension.as_str()) {
        Some(MediaKind::Video)
    } else {
        None
    }
}
