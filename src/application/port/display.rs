// SPDX-License-Identifier: MPL-2.0
//! Display port definition.

use crate::media::{Image, ImageData};

/// Port for the presentation layer.
///
/// Images are only borrowed for the duration of a call: the cache keeps
/// ownership because eviction may be racing with presentation.
pub trait Display {
    /// Renders an image according to its kind.
    fn display_image(&mut self, image: &Image);

    /// Replaces the shown frame with a scaled rendition of the current image.
    fn update_frame(&mut self, frame: &ImageData);

    /// Removes whatever image is shown.
    fn close_image(&mut self);

    /// Shows a transient, non-fatal message.
    fn show_message(&mut self, text: &str);

    /// Navigation hit the first file.
    fn show_message_directory_start(&mut self);

    /// Navigation hit the last file.
    fn show_message_directory_end(&mut self);

    /// Updates the `[ index / count ]  name  (w x h  size KB)` line.
    fn set_info_string(&mut self, info: &str);

    /// A load has been pending for longer than the loading indicator delay.
    fn show_loading(&mut self) {}

    /// The selected index changed after an image was displayed.
    fn image_index_changed(&mut self, _index: usize) {}
}
