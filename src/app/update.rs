// SPDX-License-Identifier: MPL-2.0
//! Message dispatch.

use super::{App, Message};
use crate::application::port::DirectoryEvent;
use crate::loader::LoaderEvent;
use crate::scaler::ScalerEvent;
use std::ops::ControlFlow;

impl App {
    /// Applies one message. Returns `Break` when the event loop should stop.
    pub fn update(&mut self, message: Message) -> ControlFlow<()> {
        match message {
            Message::NextImage => self.next_image(),
            Message::PrevImage => self.prev_image(),
            Message::JumpToFirst => self.jump_to_first(),
            Message::JumpToLast => self.jump_to_last(),
            Message::LoadIndex(index) => {
                if !self.load_by_index(index) {
                    tracing::debug!(index, "index out of range");
                }
            }
            Message::OpenPath { path, blocking } => self.load_by_path(&path, blocking),
            Message::RotateLeft => self.rotate_left(),
            Message::RotateRight => self.rotate_right(),
            Message::Resize { width, height } => self.resize(width, height),
            Message::ScalingRequested { width, height } => self.request_scaling(width, height),
            Message::RemoveFile => self.remove_file(),
            Message::CopyFile(destination) => self.copy_file(&destination),
            Message::MoveFile(destination) => self.move_file(&destination),
            Message::Refresh => self.refresh_directory(),
            Message::SettingsChanged(settings) => self.apply_settings(settings),
            Message::Loader(LoaderEvent::Finished { path, result }) => {
                self.on_load_finished(&path, result);
            }
            Message::Scaler(ScalerEvent::Finished { request, result }) => {
                self.on_scaling_finished(&request, result);
            }
            Message::Directory(DirectoryEvent::FileAdded(index)) => self.on_file_added(index),
            Message::Directory(DirectoryEvent::FileRemoved(index)) => self.on_file_removed(index),
            Message::LoadingTimeout(generation) => self.on_loading_timeout(generation),
            Message::Quit => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }
}
