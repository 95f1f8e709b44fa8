// SPDX-License-Identifier: MPL-2.0
//! Navigation, loading, editing and file operation handlers.
//!
//! Results from the loader and scaler may arrive late, out of order, or for
//! work that was believed cancelled. Each completion handler therefore checks
//! the result against the current navigation state before touching the cache
//! or the display.

use super::{info, App, Message};
use crate::application::port::DirectoryEvent;
use crate::config::defaults::{LOADING_INDICATOR_DELAY, MAX_EDIT_DIMENSION};
use crate::error::{Error, FileOperation, Result};
use crate::media::{file_name_key, image_transform, Image, ImageData};
use crate::scaler::ScaleRequest;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

const MSG_NO_FILE: &str = "No file opened.";
const MSG_EMPTY_DIRECTORY: &str = "Directory does not contain supported files.";
const MSG_UNSUPPORTED_PATH: &str = "File does not exist or is not supported.";

/// How a cache miss on the selected file is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadMode {
    /// Through the loader's exclusive queue; the result arrives as a message.
    Exclusive,
    /// On the calling thread, before the handler returns.
    Blocking,
}

impl App {
    // ==========================================================================
    // Navigation
    // ==========================================================================

    pub fn next_image(&mut self) {
        let count = self.directory.file_count();
        if count == 0 {
            return;
        }
        let mut index = self.state.current_index + 1;
        if index >= count {
            if self.settings.infinite_scrolling {
                index = 0;
            } else {
                self.display.show_message_directory_end();
                return;
            }
        }
        self.open_index(index, LoadMode::Exclusive);
        self.preload(index + 1);
    }

    pub fn prev_image(&mut self) {
        let count = self.directory.file_count();
        if count == 0 {
            return;
        }
        let index = match self.state.current_index.checked_sub(1) {
            Some(index) => index.min(count - 1),
            None if self.settings.infinite_scrolling => count - 1,
            None => {
                self.display.show_message_directory_start();
                return;
            }
        };
        self.open_index(index, LoadMode::Exclusive);
        if let Some(previous) = index.checked_sub(1) {
            self.preload(previous);
        }
    }

    /// Selects `index` and preloads its neighbor in the direction of travel.
    /// Returns `false` if `index` is out of range.
    pub fn load_by_index(&mut self, index: usize) -> bool {
        let previous = self.state.current_index;
        if !self.open_index(index, LoadMode::Exclusive) {
            return false;
        }
        if index >= previous {
            self.preload(index + 1);
        } else if let Some(before) = index.checked_sub(1) {
            self.preload(before);
        }
        true
    }

    pub fn jump_to_first(&mut self) {
        if self.load_by_index(0) {
            self.display.show_message_directory_start();
        }
    }

    pub fn jump_to_last(&mut self) {
        let count = self.directory.file_count();
        if count > 0 && self.load_by_index(count - 1) {
            self.display.show_message_directory_end();
        }
    }

    // ==========================================================================
    // Opening files and directories
    // ==========================================================================

    /// Opens a file (selecting it within its directory) or a directory.
    ///
    /// A leading `file://` is ignored. With `blocking`, a file that is not
    /// cached is decoded before this returns.
    pub fn load_by_path(&mut self, path: &str, blocking: bool) {
        let path = Path::new(strip_file_scheme(path));
        if self.directory.is_image(path) {
            self.load_image(path, blocking);
        } else if self.directory.is_directory(path) {
            self.load_directory(path);
        } else {
            tracing::warn!(path = %path.display(), "could not open path");
            self.display.show_message(MSG_UNSUPPORTED_PATH);
        }
    }

    /// Lists `path` from scratch and opens its first file.
    pub fn load_directory(&mut self, path: &Path) {
        self.reset();
        if let Err(e) = self.directory.set_directory(path) {
            tracing::warn!(path = %path.display(), error = %e, "could not list directory");
            self.display.show_message(&e.user_message());
            return;
        }
        if self.directory.has_images() {
            self.open_index(0, LoadMode::Exclusive);
        } else {
            self.display.show_message(MSG_EMPTY_DIRECTORY);
        }
    }

    fn load_image(&mut self, path: &Path, blocking: bool) {
        let Some(parent) = path.parent() else {
            self.display.show_message(MSG_UNSUPPORTED_PATH);
            return;
        };
        if let Err(e) = self.set_directory(parent) {
            tracing::warn!(path = %parent.display(), error = %e, "could not list directory");
            self.display.show_message(&e.user_message());
            return;
        }
        let Some(index) = self.directory.index_of(&file_name_key(path)) else {
            self.display.show_message(MSG_UNSUPPORTED_PATH);
            return;
        };
        let mode = if blocking {
            LoadMode::Blocking
        } else {
            LoadMode::Exclusive
        };
        self.open_index(index, mode);
    }

    /// Switches to `path` unless it is already listed. Returns whether it switched.
    fn set_directory(&mut self, path: &Path) -> Result<bool> {
        if self.directory.has_images()
            && self.directory.current_directory_path().as_deref() == Some(path)
        {
            return Ok(false);
        }
        self.reset();
        self.directory.set_directory(path)?;
        Ok(true)
    }

    /// Forgets everything tied to the previous directory.
    fn reset(&mut self) {
        self.state.reset();
        self.load_generation += 1;
        self.loader.clear_tasks();
        let mut cache = self.cache.lock();
        cache.clear();
        if cache.has_reservations() {
            tracing::warn!(
                remaining = cache.len(),
                "reserved cache entries survived a directory switch"
            );
        }
    }

    // ==========================================================================
    // Loading
    // ==========================================================================

    fn open_index(&mut self, index: usize, mode: LoadMode) -> bool {
        let (Some(name), Some(path)) = (
            self.directory.file_name_at(index),
            self.directory.file_path_at(index),
        ) else {
            return false;
        };
        self.state.current_index = index;
        self.on_load_started();

        let cached = self.cache.lock().get(&name);
        match cached {
            Some(image) => self.display_image(&image),
            None => match mode {
                LoadMode::Exclusive => self.loader.load_exclusive(&path),
                LoadMode::Blocking => {
                    let result = self.loader.load_blocking(&path);
                    self.on_load_finished(&path, result);
                }
            },
        }
        true
    }

    fn on_load_started(&mut self) {
        self.state.is_waiting_for_loader = true;
        self.update_info_string();
        self.arm_loading_indicator();
        self.trim_cache();
    }

    fn arm_loading_indicator(&mut self) {
        self.load_generation += 1;
        let generation = self.load_generation;
        let events = self.events.clone();
        self.runtime.spawn(async move {
            tokio::time::sleep(LOADING_INDICATOR_DELAY).await;
            if events.send(Message::LoadingTimeout(generation)).is_err() {
                tracing::trace!("loading timeout dropped: receiver closed");
            }
        });
    }

    pub(super) fn on_loading_timeout(&mut self, generation: u64) {
        if generation == self.load_generation && self.state.is_waiting_for_loader {
            self.display.show_loading();
        }
    }

    /// Decodes `index` in the background unless it is cached or preloading is off.
    fn preload(&self, index: usize) {
        if !self.settings.use_preloader {
            return;
        }
        let (Some(name), Some(path)) = (
            self.directory.file_name_at(index),
            self.directory.file_path_at(index),
        ) else {
            return;
        };
        if !self.cache.lock().contains(&name) {
            self.loader.load(&path);
        }
    }

    fn trim_cache(&self) {
        let keep: HashSet<String> = self
            .state
            .window()
            .filter_map(|index| self.directory.file_name_at(index))
            .collect();
        self.cache.lock().trim_to(&keep);
    }

    pub(super) fn on_load_finished(&mut self, path: &Path, result: Result<Image>) {
        let name = file_name_key(path);
        let Some(index) = self.directory.index_of(&name) else {
            tracing::debug!(name, "load finished for a file that is no longer listed");
            return;
        };
        if self.directory.file_path_at(index).as_deref() != Some(path) {
            tracing::debug!(
                path = %path.display(),
                "discarding load from a previously opened directory"
            );
            return;
        }

        let image = match result {
            Ok(image) => image,
            Err(e) => {
                if index == self.state.current_index {
                    // Stays waiting: the previous frame remains until the next navigation.
                    self.load_generation += 1;
                    self.display.show_message(&e.user_message());
                }
                return;
            }
        };

        if !self.state.is_relevant(index) {
            tracing::debug!(
                name,
                index,
                current = self.state.current_index,
                "discarding stale load"
            );
            return;
        }

        let resolved = {
            let mut cache = self.cache.lock();
            match cache.insert(name.clone(), image) {
                Ok(image) => Some(image),
                Err(rejected) => {
                    tracing::debug!(name = rejected.name(), "lost insert race, using cached image");
                    drop(rejected);
                    cache.get(&name)
                }
            }
        };

        if index == self.state.current_index {
            match resolved {
                Some(image) => self.display_image(&image),
                None => self
                    .display
                    .show_message(&Error::NotFound(name).user_message()),
            }
        }
    }

    fn display_image(&mut self, image: &Arc<Image>) {
        self.state.is_waiting_for_loader = false;
        self.state.has_active_image = true;
        self.display.display_image(image);
        self.state.displaying_name = image.name().to_string();
        self.display.image_index_changed(self.state.current_index);
        self.update_info_string();
    }

    fn current_cached(&self) -> Option<Arc<Image>> {
        let name = self.directory.file_name_at(self.state.current_index)?;
        self.cache.lock().get(&name)
    }

    fn update_info_string(&mut self) {
        let image = if self.state.is_waiting_for_loader {
            None
        } else {
            self.current_cached()
        };
        let info = info::info_string(
            self.state.current_index,
            self.directory.file_count(),
            image.as_deref(),
        );
        self.display.set_info_string(&info);
    }

    // ==========================================================================
    // Editing
    // ==========================================================================

    pub fn rotate_left(&mut self) {
        self.rotate_by_degrees(-90);
    }

    pub fn rotate_right(&mut self) {
        self.rotate_by_degrees(90);
    }

    pub fn rotate_by_degrees(&mut self, degrees: i32) {
        self.edit_current(|frame| image_transform::rotate(frame, degrees));
    }

    /// Replaces the current image with a resized copy (bilinear).
    /// Each side is clamped to [`MAX_EDIT_DIMENSION`].
    pub fn resize(&mut self, width: u32, height: u32) {
        let (width, height) = clamp_dimensions(width, height);
        self.edit_current(|frame| image_transform::scale(frame, width, height));
    }

    /// Size of the current image, used to seed a resize dialog.
    #[must_use]
    pub fn current_image_size(&self) -> Option<(u32, u32)> {
        self.current_cached().map(|image| image.dimensions())
    }

    fn edit_current(&mut self, edit: impl FnOnce(&ImageData) -> Result<ImageData>) {
        let Some(name) = self.directory.file_name_at(self.state.current_index) else {
            return;
        };

        let outcome = self.cache.lock().with_reserved(&name, |image| -> Result<Arc<Image>> {
            let still = image
                .as_static()
                .ok_or(Error::UnsupportedEdit(image.kind()))?;
            still.set_edited(edit(&still.current())?);
            Ok(image.clone())
        });

        match outcome {
            Some(Ok(image)) => self.display_image(&image),
            Some(Err(e)) => {
                tracing::debug!(name, error = %e, "edit rejected");
                self.display.show_message(&e.user_message());
            }
            None => {
                tracing::warn!(name, "could not reserve cache entry for edit");
                self.display
                    .show_message(&Error::NotFound(name).user_message());
            }
        }
    }

    // ==========================================================================
    // Scaling
    // ==========================================================================

    /// Asks the scaler for a rendition of the current image.
    pub fn request_scaling(&mut self, width: u32, height: u32) {
        if !self.state.has_active_image || self.state.is_waiting_for_loader {
            return;
        }
        let (Some(image), Some(path)) = (
            self.current_cached(),
            self.directory.file_path_at(self.state.current_index),
        ) else {
            return;
        };
        let (width, height) = clamp_dimensions(width, height);
        self.scaler
            .request_scaled(ScaleRequest::new(image, (width, height), path));
    }

    pub(super) fn on_scaling_finished(&mut self, request: &ScaleRequest, result: Result<ImageData>) {
        let current_path = self.directory.file_path_at(self.state.current_index);
        if !self.state.has_active_image || current_path.as_deref() != Some(request.path.as_path()) {
            tracing::debug!(path = %request.path.display(), "discarding stale scale result");
            return;
        }
        match result {
            Ok(frame) => self.display.update_frame(&frame),
            Err(e) => tracing::warn!(path = %request.path.display(), error = %e, "scaling failed"),
        }
    }

    // ==========================================================================
    // File operations
    // ==========================================================================

    /// Deletes the current file.
    pub fn remove_file(&mut self) {
        if self.state.has_active_image {
            self.remove_file_at(self.state.current_index);
        }
    }

    fn remove_file_at(&mut self, index: usize) {
        let Some(name) = self.directory.file_name_at(index) else {
            return;
        };
        match self.directory.remove_at(index) {
            Ok(()) => {
                tracing::info!(name, "file removed");
                self.display.show_message(&format!("File removed: {name}"));
                self.on_file_removed(index);
            }
            Err(e) => {
                tracing::warn!(name, error = %e, "remove failed");
                let failure = Error::FileOperation {
                    operation: FileOperation::Remove,
                    source_name: name,
                    destination: String::new(),
                };
                self.display.show_message(&failure.user_message());
            }
        }
    }

    pub fn copy_file(&mut self, destination: &Path) {
        match self.copy_current(destination) {
            Ok(()) => self
                .display
                .show_message(&format!("File copied to: {}", destination.display())),
            Err(e) => self.display.show_message(&e.user_message()),
        }
    }

    /// Copies the current file into `destination`, then deletes it.
    pub fn move_file(&mut self, destination: &Path) {
        match self.copy_current(destination) {
            Ok(()) => {
                // Removed even when it never decoded.
                self.remove_file_at(self.state.current_index);
                self.display
                    .show_message(&format!("File moved to: {}", destination.display()));
            }
            Err(e) => {
                let failure = match e {
                    Error::FileOperation {
                        source_name,
                        destination,
                        ..
                    } => Error::FileOperation {
                        operation: FileOperation::Move,
                        source_name,
                        destination,
                    },
                    other => other,
                };
                self.display.show_message(&failure.user_message());
            }
        }
    }

    fn copy_current(&self, destination: &Path) -> Result<()> {
        let index = self.state.current_index;
        self.directory.copy_to(destination, index).map_err(|e| {
            tracing::warn!(destination = %destination.display(), error = %e, "copy failed");
            Error::FileOperation {
                operation: FileOperation::Copy,
                source_name: self.directory.file_name_at(index).unwrap_or_default(),
                destination: destination.display().to_string(),
            }
        })
    }

    // ==========================================================================
    // Directory notifications
    // ==========================================================================

    /// Re-reads the listing and applies the resulting notifications.
    pub fn refresh_directory(&mut self) {
        let events = match self.directory.refresh() {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!(error = %e, "could not refresh directory");
                return;
            }
        };
        for event in events {
            match event {
                DirectoryEvent::FileAdded(index) => self.on_file_added(index),
                DirectoryEvent::FileRemoved(index) => self.on_file_removed(index),
            }
        }
    }

    /// A file appeared at `index`; later files moved one position right.
    pub fn on_file_added(&mut self, index: usize) {
        if !self.state.has_active_image && !self.state.is_waiting_for_loader {
            return;
        }
        if index <= self.state.current_index {
            self.state.current_index += 1;
        }
        self.update_info_string();
    }

    /// The file at `index` disappeared; later files moved one position left.
    pub fn on_file_removed(&mut self, index: usize) {
        if self.directory.file_count() == 0 {
            self.state.has_active_image = false;
            self.state.is_waiting_for_loader = false;
            self.state.current_index = 0;
            self.state.displaying_name.clear();
            self.display.close_image();
            self.display.set_info_string(MSG_NO_FILE);
            return;
        }
        if !self.state.has_active_image && !self.state.is_waiting_for_loader {
            return;
        }

        match index.cmp(&self.state.current_index) {
            std::cmp::Ordering::Less => {
                self.state.current_index -= 1;
                self.update_info_string();
            }
            std::cmp::Ordering::Equal => {
                let current = self.state.current_index;
                if !self.open_index(current, LoadMode::Exclusive) {
                    self.open_index(current.saturating_sub(1), LoadMode::Exclusive);
                }
            }
            std::cmp::Ordering::Greater => self.update_info_string(),
        }
    }
}

fn clamp_dimensions(width: u32, height: u32) -> (u32, u32) {
    let clamped = (
        width.min(MAX_EDIT_DIMENSION),
        height.min(MAX_EDIT_DIMENSION),
    );
    if clamped != (width, height) {
        tracing::debug!(width, height, limit = MAX_EDIT_DIMENSION, "clamping requested size");
    }
    clamped
}

fn strip_file_scheme(path: &str) -> &str {
    const SCHEME: &str = "file://";
    match path.get(..SCHEME.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(SCHEME) => &path[SCHEME.len()..],
        _ => path,
    }
}
