// SPDX-License-Identifier: MPL-2.0
//! `lens_browse` is the browsing engine of an image viewer.
//!
//! It keeps the current file and its neighbors decoded in a shared cache,
//! decodes and scales in the background without ever showing a result that
//! arrived too late, and keeps the selection consistent while files are
//! added, removed, copied or moved.

#![doc(html_root_url = "https://docs.rs/lens_browse/0.3.0")]

pub mod app;
pub mod application;
pub mod cache;
pub mod config;
pub mod directory_scanner;
pub mod error;
pub mod loader;
pub mod media;
pub mod scaler;

#[cfg(test)]
mod test_utils;
