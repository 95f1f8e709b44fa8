// SPDX-License-Identifier: MPL-2.0
//! Navigation state owned by the orchestrator.

/// Where the user is in the current directory and what is on screen.
///
/// `is_waiting_for_loader` is set when `current_index` changes and cleared
/// once its image is displayed. A failed decode leaves it set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    pub current_index: usize,
    pub has_active_image: bool,
    pub is_waiting_for_loader: bool,
    /// Name of the image last handed to the display.
    pub displaying_name: String,
}

impl NavigationState {
    /// Back to the state of a freshly opened directory.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Returns `true` if `index` is within one position of the current index.
    #[must_use]
    pub fn is_relevant(&self, index: usize) -> bool {
        index.abs_diff(self.current_index) <= 1
    }

    /// The indices whose images may stay cached: previous, current and next.
    pub fn window(&self) -> impl Iterator<Item = usize> {
        let current = self.current_index;
        current.saturating_sub(1)..=current.saturating_add(1)
    }
}
