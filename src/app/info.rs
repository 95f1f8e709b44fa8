// SPDX-License-Identifier: MPL-2.0
//! Formatting of the `[ i / n ]   name  (w x h  size KB)` info line.

use crate::config::defaults::{INFO_NAME_ELLIPSIS, INFO_NAME_MAX_CHARS, INFO_NAME_TAIL_CHARS};
use crate::media::Image;

/// Builds the info line for `index` (0-based) out of `count` files.
///
/// The image part is omitted while the current file is still loading.
#[must_use]
pub fn info_string(index: usize, count: usize, image: Option<&Image>) -> String {
    let mut info = format!("[ {} / {} ]   ", index + 1, count);
    if let Some(image) = image {
        let (width, height) = image.dimensions();
        info.push_str(&format!(
            "{}  ({} x {}  {} KB)",
            shorten_name(image.name()),
            width,
            height,
            image.file_size_kb()
        ));
    }
    info
}

/// Keeps the head and tail of names longer than the display allows.
#[must_use]
pub fn shorten_name(name: &str) -> String {
    let length = name.chars().count();
    if length <= INFO_NAME_MAX_CHARS {
        return name.to_string();
    }
    let head: String = name.chars().take(INFO_NAME_MAX_CHARS).collect();
    let tail: String = name.chars().skip(length - INFO_NAME_TAIL_CHARS).collect();
    format!("{head}{INFO_NAME_ELLIPSIS}{tail}")
}
