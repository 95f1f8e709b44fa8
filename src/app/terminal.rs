// SPDX-License-Identifier: MPL-2.0
//! Line-oriented display that reports what a graphical front end would show.

use crate::application::port::Display;
use crate::media::{Image, ImageContent, ImageData};
use std::io::{self, Write};

/// Writes one line per display call.
#[derive(Debug)]
pub struct TerminalDisplay<W: Write> {
    out: W,
    last_info: String,
}

impl TerminalDisplay<io::Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_info: String::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}").and_then(|()| self.out.flush()) {
            tracing::warn!(error = %e, "failed to write to terminal");
        }
    }
}

impl<W: Write> Display for TerminalDisplay<W> {
    fn display_image(&mut self, image: &Image) {
        let (width, height) = image.dimensions();
        let detail = match image.content() {
            ImageContent::Static(still) if still.is_edited() => "edited".to_string(),
            ImageContent::Static(_) => "still".to_string(),
            ImageContent::Animated(animation) => format!("{} frames", animation.frames.len()),
            ImageContent::Video(_) => "video".to_string(),
        };
        self.line(&format!(
            "showing {} ({width}x{height}, {detail})",
            image.path().display()
        ));
    }

    fn update_frame(&mut self, frame: &ImageData) {
        self.line(&format!("frame {}x{}", frame.width, frame.height));
    }

    fn close_image(&mut self) {
        self.line("closed");
    }

    fn show_message(&mut self, text: &str) {
        self.line(&format!("> {text}"));
    }

    fn show_message_directory_start(&mut self) {
        self.line("> Start of directory");
    }

    fn show_message_directory_end(&mut self) {
        self.line("> End of directory");
    }

    fn set_info_string(&mut self, info: &str) {
        // The info line is refreshed often with identical content.
        if info != self.last_info {
            self.last_info = info.to_string();
            self.line(info.trim_end());
        }
    }

    fn show_loading(&mut self) {
        self.line("loading...");
    }
}
