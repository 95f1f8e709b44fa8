// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the orchestrator.

use crate::application::port::DirectoryEvent;
use crate::config::BrowseSettings;
use crate::loader::LoaderEvent;
use crate::scaler::ScalerEvent;
use std::path::PathBuf;

/// Top-level messages consumed by `App::update`. Worker completions and
/// directory notifications are converted into this type so that every
/// event reaches the orchestrator through a single channel.
#[derive(Debug)]
pub enum Message {
    NextImage,
    PrevImage,
    JumpToFirst,
    JumpToLast,
    LoadIndex(usize),
    /// Open a file or a directory.
    OpenPath {
        path: String,
        blocking: bool,
    },
    RotateLeft,
    RotateRight,
    Resize {
        width: u32,
        height: u32,
    },
    /// The display wants a rendition of the current image at this size.
    ScalingRequested {
        width: u32,
        height: u32,
    },
    RemoveFile,
    CopyFile(PathBuf),
    MoveFile(PathBuf),
    /// Re-read the directory listing.
    Refresh,
    SettingsChanged(BrowseSettings),
    Loader(LoaderEvent),
    Scaler(ScalerEvent),
    Directory(DirectoryEvent),
    /// The loading indicator timer armed for this load generation fired.
    LoadingTimeout(u64),
    Quit,
}

impl From<LoaderEvent> for Message {
    fn from(event: LoaderEvent) -> Self {
        Message::Loader(event)
    }
}

impl From<ScalerEvent> for Message {
    fn from(event: ScalerEvent) -> Self {
        Message::Scaler(event)
    }
}

impl From<DirectoryEvent> for Message {
    fn from(event: DirectoryEvent) -> Self {
        Message::Directory(event)
    }
}

/// Runtime flags passed in from the CLI.
#[derive(Debug, Default)]
pub struct Flags {
    /// Optional file or directory to open on startup.
    pub file_path: Option<String>,
    /// Optional config directory override (for settings.toml).
    /// Takes precedence over `LENS_BROWSE_CONFIG_DIR` environment variable.
    pub config_dir: Option<String>,
    /// Force wraparound at the directory boundaries.
    pub infinite_scrolling: bool,
    /// Disable neighbor preloading.
    pub no_preload: bool,
}
