// SPDX-License-Identifier: MPL-2.0
//! In-memory fakes for the decoder, directory and display collaborators.

use crate::application::port::{Directory, Display, ImageDecoder};
use crate::error::{Error, FileOperation, Result};
use crate::media::{
    file_name_key, Animation, AnimationFrame, Image, ImageContent, ImageData, MediaKind,
    StaticImage, VideoClip,
};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

/// A 4x2 static image for `name`.
pub fn test_image(name: &str) -> Image {
    test_image_sized(name, 4, 2)
}

pub fn test_image_sized(name: &str, width: u32, height: u32) -> Image {
    let pixels = vec![0u8; (width * height * 4) as usize];
    Image::new(
        PathBuf::from("/test").join(name),
        4096,
        ImageContent::Static(StaticImage::new(ImageData::from_rgba(width, height, pixels))),
    )
}

/// Blocks decodes until opened.
#[derive(Debug, Clone, Default)]
pub struct Gate {
    state: Arc<(Mutex<bool>, Condvar)>,
}

impl Gate {
    pub fn open(&self) {
        let (open, signal) = &*self.state;
        *open.lock().unwrap_or_else(PoisonError::into_inner) = true;
        signal.notify_all();
    }

    fn wait(&self) {
        let (open, signal) = &*self.state;
        let mut is_open = open.lock().unwrap_or_else(PoisonError::into_inner);
        while !*is_open {
            is_open = signal
                .wait(is_open)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

/// Decoder whose outcome per file name is scripted by the test.
#[derive(Debug, Default)]
pub struct ScriptedDecoder {
    failures: Mutex<HashSet<String>>,
    kinds: Mutex<HashMap<String, MediaKind>>,
    counts: Mutex<HashMap<String, usize>>,
    gate: Mutex<Option<Gate>>,
}

impl ScriptedDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoding `name` fails from now on.
    pub fn fail(&self, name: &str) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string());
    }

    /// Decoding `name` produces an image of `kind`.
    pub fn set_kind(&self, name: &str, kind: MediaKind) {
        self.kinds
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), kind);
    }

    /// Closes a gate that every later decode waits on until opened.
    pub fn gate(&self) -> Gate {
        let gate = Gate::default();
        *self.gate.lock().unwrap_or_else(PoisonError::into_inner) = Some(gate.clone());
        gate
    }

    /// How many times `name` has been decoded.
    pub fn decode_count(&self, name: &str) -> usize {
        self.counts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .copied()
            .unwrap_or(0)
    }
}

impl ImageDecoder for ScriptedDecoder {
    fn decode(&self, path: &Path) -> Result<Image> {
        let name = file_name_key(path);
        *self
            .counts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name.clone())
            .or_default() += 1;

        let gate = self
            .gate
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(gate) = gate {
            gate.wait();
        }

        if self
            .failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&name)
        {
            return Err(Error::Decode(format!("scripted failure for {name}")));
        }

        let kind = self
            .kinds
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&name)
            .copied()
            .unwrap_or(MediaKind::Static);
        let frame = ImageData::from_rgba(4, 2, vec![0u8; 32]);
        let content = match kind {
            MediaKind::Static => ImageContent::Static(StaticImage::new(frame)),
            MediaKind::Animated => ImageContent::Animated(Animation {
                frames: vec![AnimationFrame {
                    image: frame,
                    delay: Duration::from_millis(100),
                }],
                width: 4,
                height: 2,
            }),
            MediaKind::Video => ImageContent::Video(VideoClip {
                width: 4,
                height: 2,
            }),
        };
        Ok(Image::new(path.to_path_buf(), 4096, content))
    }
}

#[derive(Debug, Default)]
struct MemoryListing {
    root: Option<PathBuf>,
    names: Vec<String>,
    listings: HashMap<PathBuf, Vec<String>>,
    fail_copies: bool,
    copies: Vec<(String, PathBuf)>,
}

/// Directory listing held in memory. Clones share the same listing, so a
/// test can keep a handle after giving one to the orchestrator.
#[derive(Debug, Clone, Default)]
pub struct MemoryDirectory {
    listing: Arc<Mutex<MemoryListing>>,
}

impl MemoryDirectory {
    /// A directory `/dir` already listed with `names`.
    pub fn with_files(names: &[&str]) -> Self {
        let directory = Self::default();
        directory.add_listing("/dir", names);
        {
            let mut listing = directory.listing();
            listing.root = Some(PathBuf::from("/dir"));
            listing.names = names.iter().map(|name| (*name).to_string()).collect();
        }
        directory
    }

    fn listing(&self) -> std::sync::MutexGuard<'_, MemoryListing> {
        self.listing.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a directory that `set_directory` can switch to.
    pub fn add_listing(&self, root: &str, names: &[&str]) {
        self.listing().listings.insert(
            PathBuf::from(root),
            names.iter().map(|name| (*name).to_string()).collect(),
        );
    }

    /// Makes every later `copy_to` fail.
    pub fn fail_copies(&self) {
        self.listing().fail_copies = true;
    }

    /// Successful copies as `(name, destination)`.
    pub fn copies(&self) -> Vec<(String, PathBuf)> {
        self.listing().copies.clone()
    }

    /// Simulates an external deletion (the listing changes, nothing is notified).
    pub fn forget(&self, index: usize) {
        self.listing().names.remove(index);
    }

    /// Simulates an external addition.
    pub fn insert_name(&self, index: usize, name: &str) {
        self.listing().names.insert(index, name.to_string());
    }

    pub fn names(&self) -> Vec<String> {
        self.listing().names.clone()
    }
}

impl Directory for MemoryDirectory {
    fn file_count(&self) -> usize {
        self.listing().names.len()
    }

    fn file_name_at(&self, index: usize) -> Option<String> {
        self.listing().names.get(index).cloned()
    }

    fn file_path_at(&self, index: usize) -> Option<PathBuf> {
        let listing = self.listing();
        let root = listing.root.as_ref()?;
        listing.names.get(index).map(|name| root.join(name))
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.listing()
            .names
            .iter()
            .position(|candidate| candidate == name)
    }

    fn is_image(&self, path: &Path) -> bool {
        let Some(parent) = path.parent() else {
            return false;
        };
        let name = file_name_key(path);
        self.listing()
            .listings
            .get(parent)
            .is_some_and(|names| names.contains(&name))
    }

    fn is_directory(&self, path: &Path) -> bool {
        self.listing().listings.contains_key(path)
    }

    fn current_directory_path(&self) -> Option<PathBuf> {
        self.listing().root.clone()
    }

    fn set_directory(&mut self, path: &Path) -> Result<()> {
        let mut listing = self.listing();
        let names = listing
            .listings
            .get(path)
            .cloned()
            .ok_or_else(|| Error::Io(format!("no such directory: {}", path.display())))?;
        listing.root = Some(path.to_path_buf());
        listing.names = names;
        Ok(())
    }

    fn remove_at(&mut self, index: usize) -> Result<()> {
        let mut listing = self.listing();
        if index >= listing.names.len() {
            return Err(Error::NotFound(format!("index {index}")));
        }
        listing.names.remove(index);
        Ok(())
    }

    fn copy_to(&self, destination: &Path, index: usize) -> Result<()> {
        let mut listing = self.listing();
        let name = listing
            .names
            .get(index)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("index {index}")))?;
        if listing.fail_copies {
            return Err(Error::FileOperation {
                operation: FileOperation::Copy,
                source_name: name,
                destination: destination.display().to_string(),
            });
        }
        listing.copies.push((name, destination.to_path_buf()));
        Ok(())
    }
}

/// Calls received by [`RecordingDisplay`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayCall {
    Image { name: String, kind: MediaKind },
    Frame { width: u32, height: u32 },
    Close,
    Message(String),
    DirectoryStart,
    DirectoryEnd,
    Info(String),
    Loading,
    IndexChanged(usize),
}

/// Display that records every call for later assertions.
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    calls: Arc<Mutex<Vec<DisplayCall>>>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<DisplayCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear(&self) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Names of displayed images, in order.
    pub fn displayed(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                DisplayCall::Image { name, .. } => Some(name),
                _ => None,
            })
            .collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                DisplayCall::Message(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn last_info(&self) -> Option<String> {
        self.calls().into_iter().rev().find_map(|call| match call {
            DisplayCall::Info(info) => Some(info),
            _ => None,
        })
    }

    pub fn frames(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, DisplayCall::Frame { .. }))
            .count()
    }

    fn record(&self, call: DisplayCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

impl Display for RecordingDisplay {
    fn display_image(&mut self, image: &Image) {
        self.record(DisplayCall::Image {
            name: image.name().to_string(),
            kind: image.kind(),
        });
    }

    fn update_frame(&mut self, frame: &ImageData) {
        self.record(DisplayCall::Frame {
            width: frame.width,
            height: frame.height,
        });
    }

    fn close_image(&mut self) {
        self.record(DisplayCall::Close);
    }

    fn show_message(&mut self, text: &str) {
        self.record(DisplayCall::Message(text.to_string()));
    }

    fn show_message_directory_start(&mut self) {
        self.record(DisplayCall::DirectoryStart);
    }

    fn show_message_directory_end(&mut self) {
        self.record(DisplayCall::DirectoryEnd);
    }

    fn set_info_string(&mut self, info: &str) {
        self.record(DisplayCall::Info(info.to_string()));
    }

    fn show_loading(&mut self) {
        self.record(DisplayCall::Loading);
    }

    fn image_index_changed(&mut self, index: usize) {
        self.record(DisplayCall::IndexChanged(index));
    }
}
