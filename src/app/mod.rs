// SPDX-License-Identifier: MPL-2.0
//! Orchestration between the directory, the loader, the scaler and the display.
//!
//! The `App` struct owns the navigation state and is the only place where it
//! changes. Every input (user commands, worker completions, directory
//! notifications, timers) arrives as a [`Message`] on one channel and is
//! applied in order by [`App::update`], so handlers never race each other.
//! The cache is the only structure shared with worker threads.

pub mod command;
mod handlers;
pub mod info;
mod message;
pub mod paths;
mod state;
pub mod terminal;
mod update;

pub use message::{Flags, Message};
pub use state::NavigationState;

use crate::application::port::{Directory, Display, ImageDecoder};
use crate::cache::ImageCache;
use crate::config::{BrowseSettings, Config};
use crate::loader::Loader;
use crate::scaler::Scaler;
use std::fmt;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

/// Root orchestrator state.
pub struct App {
    directory: Box<dyn Directory>,
    display: Box<dyn Display>,
    loader: Loader<Message>,
    scaler: Scaler,
    cache: Arc<ImageCache>,
    state: NavigationState,
    settings: BrowseSettings,
    runtime: Handle,
    events: mpsc::UnboundedSender<Message>,
    /// Incremented on every load start; identifies the loading indicator
    /// timer that is still meaningful.
    load_generation: u64,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("state", &self.state)
            .field("settings", &self.settings)
            .field("loader", &self.loader)
            .field("cached", &self.cache.lock().len())
            .finish()
    }
}

impl App {
    /// Wires the collaborators together and spawns the workers on `runtime`.
    ///
    /// Returns the receiving end of the event channel; pass it to [`App::run`]
    /// or feed its messages to [`App::update`].
    pub fn new(
        directory: Box<dyn Directory>,
        display: Box<dyn Display>,
        decoder: Arc<dyn ImageDecoder>,
        runtime: Handle,
        config: &Config,
    ) -> (Self, mpsc::UnboundedReceiver<Message>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let loader = Loader::new(
            decoder,
            runtime.clone(),
            events.clone(),
            config.workers.decode_threads(),
        );
        let scaler = Scaler::new(&runtime, events.clone());

        tracing::debug!(
            decode_threads = config.workers.decode_threads(),
            infinite_scrolling = config.navigation.infinite_scrolling,
            use_preloader = config.navigation.use_preloader,
            "browser initialized"
        );

        let app = Self {
            directory,
            display,
            loader,
            scaler,
            cache: Arc::new(ImageCache::new()),
            state: NavigationState::default(),
            settings: config.navigation,
            runtime,
            events,
            load_generation: 0,
        };
        (app, receiver)
    }

    /// Applies messages until [`Message::Quit`], then cancels background loads.
    pub async fn run(&mut self, mut messages: mpsc::UnboundedReceiver<Message>) {
        while let Some(message) = messages.recv().await {
            if self.update(message).is_break() {
                break;
            }
        }
        self.close();
    }

    /// A sender for feeding commands into the event loop from other threads.
    #[must_use]
    pub fn sender(&self) -> mpsc::UnboundedSender<Message> {
        self.events.clone()
    }

    #[must_use]
    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    #[must_use]
    pub fn settings(&self) -> BrowseSettings {
        self.settings
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<ImageCache> {
        &self.cache
    }

    /// Replaces the navigation settings. Takes effect on the next command.
    pub fn apply_settings(&mut self, settings: BrowseSettings) {
        tracing::debug!(?settings, "settings applied");
        self.settings = settings;
    }

    /// Cancels pending background loads.
    pub fn close(&mut self) {
        tracing::debug!("closing browser");
        self.loader.clear_tasks();
    }
}
