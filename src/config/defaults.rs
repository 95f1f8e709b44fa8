// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the crate. Constants are organized by category.
//!
//! # Categories
//!
//! - **Navigation**: Wraparound and preloading flags
//! - **Workers**: Decode pool sizing
//! - **Editing**: Bounds on requested output sizes
//! - **Info string**: File name shortening
//! - **Loading indicator**: Delay before a pending load is announced

use std::time::Duration;

// ==========================================================================
// Navigation Defaults
// ==========================================================================

/// Navigation past the last file stops at the boundary by default.
pub const DEFAULT_INFINITE_SCROLLING: bool = false;

/// Neighbors of the current file are decoded ahead of need by default.
pub const DEFAULT_USE_PRELOADER: bool = true;

// ==========================================================================
// Worker Defaults
// ==========================================================================

/// Default number of concurrent decodes.
pub const DEFAULT_DECODE_THREADS: usize = 2;

/// Minimum number of concurrent decodes.
pub const MIN_DECODE_THREADS: usize = 1;

/// Maximum number of concurrent decodes.
pub const MAX_DECODE_THREADS: usize = 16;

// ==========================================================================
// Editing Limits
// ==========================================================================

/// Largest width or height a resize or scale request may ask for.
/// Larger requests are clamped to this value.
pub const MAX_EDIT_DIMENSION: u32 = 8192;

// ==========================================================================
// Info String Defaults
// ==========================================================================

/// Names longer than this many characters are shortened.
pub const INFO_NAME_MAX_CHARS: usize = 95;

/// Characters kept from the end of a shortened name.
pub const INFO_NAME_TAIL_CHARS: usize = 12;

/// Separator inserted between the head and tail of a shortened name.
pub const INFO_NAME_ELLIPSIS: &str = " (...) ";

// ==========================================================================
// Loading Indicator
// ==========================================================================

/// How long a load may be pending before the display is told to show a
/// loading indicator.
pub const LOADING_INDICATOR_DELAY: Duration = Duration::from_millis(500);

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    // Worker validation
    assert!(MIN_DECODE_THREADS > 0);
    assert!(MAX_DECODE_THREADS >= MIN_DECODE_THREADS);
    assert!(DEFAULT_DECODE_THREADS >= MIN_DECODE_THREADS);
    assert!(DEFAULT_DECODE_THREADS <= MAX_DECODE_THREADS);

    // Editing validation
    assert!(MAX_EDIT_DIMENSION > 0);

    // Info string validation
    assert!(INFO_NAME_TAIL_CHARS < INFO_NAME_MAX_CHARS);
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_defaults_are_valid() {
        assert!(!DEFAULT_INFINITE_SCROLLING);
        assert!(DEFAULT_USE_PRELOADER);
    }

    #[test]
    fn decode_thread_defaults_are_valid() {
        assert_eq!(DEFAULT_DECODE_THREADS, 2);
        assert!(DEFAULT_DECODE_THREADS >= MIN_DECODE_THREADS);
        assert!(DEFAULT_DECODE_THREADS <= MAX_DECODE_THREADS);
    }

    #[test]
    fn loading_indicator_delay_is_half_a_second() {
        assert_eq!(LOADING_INDICATOR_DELAY, Duration::from_millis(500));
    }
}
