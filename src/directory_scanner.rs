// SPDX-License-Identifier: MPL-2.0
//! Directory scanner module for finding and sorting media files.
//!
//! This module scans a directory for supported media formats (images and videos),
//! filters them, and keeps them in alphabetical order. It is the default
//! [`Directory`] collaborator of the browsing engine.

use crate::application::port::{Directory, DirectoryEvent};
use crate::error::{Error, FileOperation, Result};
use crate::media::{self, file_name_key};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// The ordered list of media files (images and videos) in one directory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectoryManager {
    directory: Option<PathBuf>,
    media_files: Vec<PathBuf>,
}

impl DirectoryManager {
    /// Creates a manager with no directory listed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a manager listing `directory`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub fn open(directory: &Path) -> Result<Self> {
        let mut manager = Self::new();
        manager.set_directory(directory)?;
        Ok(manager)
    }

    /// Returns the path at the specified index.
    pub fn get(&self, index: usize) -> Option<&Path> {
        self.media_files.get(index).map(PathBuf::as_path)
    }
}

impl Directory for DirectoryManager {
    fn file_count(&self) -> usize {
        self.media_files.len()
    }

    fn file_name_at(&self, index: usize) -> Option<String> {
        self.get(index).map(file_name_key)
    }

    fn file_path_at(&self, index: usize) -> Option<PathBuf> {
        self.media_files.get(index).cloned()
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.media_files
            .iter()
            .position(|path| file_name_key(path) == name)
    }

    fn is_image(&self, path: &Path) -> bool {
        path.is_file() && media::is_supported_media(path)
    }

    fn current_directory_path(&self) -> Option<PathBuf> {
        self.directory.clone()
    }

    fn set_directory(&mut self, path: &Path) -> Result<()> {
        let media_files = scan(path)?;
        tracing::debug!(
            directory = %path.display(),
            files = media_files.len(),
            "directory listed"
        );
        self.directory = Some(path.to_path_buf());
        self.media_files = media_files;
        Ok(())
    }

    fn remove_at(&mut self, index: usize) -> Result<()> {
        let path = self
            .media_files
            .get(index)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("no file at index {index}")))?;
        fs::remove_file(&path).map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "remove failed");
            Error::FileOperation {
                operation: FileOperation::Remove,
                source_name: file_name_key(&path),
                destination: String::new(),
            }
        })?;
        self.media_files.remove(index);
        Ok(())
    }

    /// Re-reads the directory and returns the changes as notifications.
    ///
    /// Removals come first, highest index first; additions follow in
    /// ascending order. Applying them in order to the previous listing
    /// yields the new one.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    fn refresh(&mut self) -> Result<Vec<DirectoryEvent>> {
        let Some(directory) = self.directory.clone() else {
            return Ok(Vec::new());
        };
        let fresh = scan(&directory)?;
        let events = {
            let fresh_set: HashSet<&PathBuf> = fresh.iter().collect();
            let old_set: HashSet<&PathBuf> = self.media_files.iter().collect();

            let mut events: Vec<DirectoryEvent> = self
                .media_files
                .iter()
                .enumerate()
                .rev()
                .filter(|(_, path)| !fresh_set.contains(path))
                .map(|(index, _)| DirectoryEvent::FileRemoved(index))
                .collect();
            events.extend(
                fresh
                    .iter()
                    .enumerate()
                    .filter(|(_, path)| !old_set.contains(path))
                    .map(|(index, _)| DirectoryEvent::FileAdded(index)),
            );
            events
        };

        if !events.is_empty() {
            tracing::debug!(
                directory = %directory.display(),
                changes = events.len(),
                "directory listing changed"
            );
        }
        self.media_files = fresh;
        Ok(events)
    }

    fn copy_to(&self, destination: &Path, index: usize) -> Result<()> {
        let source = self
            .get(index)
            .ok_or_else(|| Error::NotFound(format!("no file at index {index}")))?;
        let name = file_name_key(source);
        let target = destination.join(&name);
        let failure = |e: std::io::Error| {
            tracing::warn!(
                source = %source.display(),
                target = %target.display(),
                error = %e,
                "copy failed"
            );
            Error::FileOperation {
                operation: FileOperation::Copy,
                source_name: name.clone(),
                destination: destination.display().to_string(),
            }
        };

        if !destination.is_dir() {
            return Err(failure(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "destination is not a directory",
            )));
        }
        if target == source {
            return Err(failure(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "source and destination are the same file",
            )));
        }
        fs::copy(source, &target).map_err(failure)?;
        Ok(())
    }
}

/// Lists the supported media files of `directory`, sorted by file name.
fn scan(directory: &Path) -> Result<Vec<PathBuf>> {
    let mut media_files = Vec::new();

    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() && media::is_supported_media(&path) {
            media_files.push(path);
        }
    }

    media_files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(media_files)
}
