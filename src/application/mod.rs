// SPDX-License-Identifier: MPL-2.0
//! Application layer - collaborator interfaces.
//!
//! - [`port`]: Trait definitions for the decoder, directory and display
//!   collaborators the browsing engine drives.
//!
//! # Dependency Rule
//!
//! The orchestrator in [`crate::app`] depends only on these traits. Concrete
//! adapters ([`crate::media::FsDecoder`], [`crate::directory_scanner::DirectoryManager`])
//! implement them; tests substitute in-memory fakes.

pub mod port;
