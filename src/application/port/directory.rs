// SPDX-License-Identifier: MPL-2.0
//! Directory collaborator port definition.

use crate::error::Result;
use std::path::{Path, PathBuf};

/// Change notifications raised by the directory collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryEvent {
    /// A file appeared at this index; later files shifted right.
    FileAdded(usize),
    /// The file at this index disappeared; later files shifted left.
    FileRemoved(usize),
}

/// Port for the ordered file list of the current directory.
///
/// Ordering policy, enumeration and watching belong to the implementation.
pub trait Directory {
    /// Number of listed files.
    fn file_count(&self) -> usize;

    /// Cache key (file name) of the file at `index`.
    fn file_name_at(&self, index: usize) -> Option<String>;

    /// Full path of the file at `index`.
    fn file_path_at(&self, index: usize) -> Option<PathBuf>;

    /// Index of the file with this name.
    fn index_of(&self, name: &str) -> Option<usize>;

    /// Returns `true` if `index` addresses a listed file.
    fn check_range(&self, index: isize) -> bool {
        usize::try_from(index).is_ok_and(|index| index < self.file_count())
    }

    /// Returns `true` if at least one file is listed.
    fn has_images(&self) -> bool {
        self.file_count() > 0
    }

    /// Returns `true` if `path` is an existing file of a supported type.
    fn is_image(&self, path: &Path) -> bool;

    /// Returns `true` if `path` is an existing directory.
    fn is_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }

    /// The directory currently listed, if any.
    fn current_directory_path(&self) -> Option<PathBuf>;

    /// Lists `path`, replacing the current file list.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    fn set_directory(&mut self, path: &Path) -> Result<()>;

    /// Removes the file at `index` from disk and from the list.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range or removal fails.
    fn remove_at(&mut self, index: usize) -> Result<()>;

    /// Re-reads the listing and reports what changed since the last read.
    ///
    /// Removals come first, highest index first, then additions in
    /// ascending order.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    fn refresh(&mut self) -> Result<Vec<DirectoryEvent>> {
        Ok(Vec::new())
    }

    /// Copies the file at `index` into `destination`.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range or the copy fails.
    fn copy_to(&self, destination: &Path, index: usize) -> Result<()>;
}
