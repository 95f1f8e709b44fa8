// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! # Available Ports
//!
//! - [`media`]: Decoding a file into an [`Image`](crate::media::Image)
//! - [`directory`]: Listing, removing and copying files of the current directory
//! - [`display`]: Presenting images, frames and messages
//!
//! # Design Notes
//!
//! - Decoders are `Send + Sync`: they run on background workers
//! - Directory and display are only touched from the orchestration thread
//! - No `async fn`: asynchrony lives in the loader and scaler

pub mod directory;
pub mod display;
pub mod media;

pub use directory::{Directory, DirectoryEvent};
pub use display::Display;
pub use media::ImageDecoder;
