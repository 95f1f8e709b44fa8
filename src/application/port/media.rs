// SPDX-License-Identifier: MPL-2.0
//! Image decoding port definition.

use crate::error::Result;
use crate::media::Image;
use std::path::Path;

/// Port for decoding media files.
///
/// The engine treats decoding as an opaque pure function; the loader calls
/// it from background workers.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` for use across threads.
pub trait ImageDecoder: Send + Sync {
    /// Decodes the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    fn decode(&self, path: &Path) -> Result<Image>;
}

impl<F> ImageDecoder for F
where
    F: Fn(&Path) -> Result<Image> + Send + Sync,
{
    fn decode(&self, path: &Path) -> Result<Image> {
        self(path)
    }
}
