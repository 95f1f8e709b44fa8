// SPDX-License-Identifier: MPL-2.0
//! Line commands read from the terminal.
//!
//! Each non-empty line maps to one [`Message`]. Unknown or malformed lines
//! produce a [`CommandError`] that the caller prints without stopping.

use super::Message;
use std::path::PathBuf;

/// Help text listing every accepted command.
pub const HELP: &str = "\
commands:
  n, next            next file
  p, prev            previous file
  first | last       jump to an end of the directory
  goto N             select file N (1-based)
  open PATH          open a file or a directory
  rotl | rotr        rotate the current image
  resize W H         resize the current image
  scale W H          request a scaled rendition
  r, refresh         re-read the directory
  rm                 delete the current file
  cp DIR | mv DIR    copy or move the current file
  q, quit            exit";

/// Why a line could not be turned into a message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("{command}: missing {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("{command}: invalid number '{value}'")]
    InvalidNumber { command: &'static str, value: String },
}

/// Parses one input line. Blank lines yield `Ok(None)`.
///
/// # Errors
///
/// Returns an error for unknown commands and malformed arguments.
pub fn parse(line: &str) -> Result<Option<Message>, CommandError> {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let message = match command {
        "" => return Ok(None),
        "n" | "next" => Message::NextImage,
        "p" | "prev" => Message::PrevImage,
        "first" => Message::JumpToFirst,
        "last" => Message::JumpToLast,
        "goto" => {
            let position = number("goto", rest)?;
            // Users count from 1.
            Message::LoadIndex(position.saturating_sub(1) as usize)
        }
        "open" => Message::OpenPath {
            path: argument("open", "PATH", rest)?.to_string(),
            blocking: false,
        },
        "rotl" => Message::RotateLeft,
        "rotr" => Message::RotateRight,
        "resize" => {
            let (width, height) = dimensions("resize", rest)?;
            Message::Resize { width, height }
        }
        "scale" => {
            let (width, height) = dimensions("scale", rest)?;
            Message::ScalingRequested { width, height }
        }
        "r" | "refresh" => Message::Refresh,
        "rm" => Message::RemoveFile,
        "cp" => Message::CopyFile(PathBuf::from(argument("cp", "DIR", rest)?)),
        "mv" => Message::MoveFile(PathBuf::from(argument("mv", "DIR", rest)?)),
        "q" | "quit" | "exit" => Message::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(message))
}

fn argument<'a>(
    command: &'static str,
    name: &'static str,
    rest: &'a str,
) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument {
            command,
            argument: name,
        })
    } else {
        Ok(rest)
    }
}

fn number(command: &'static str, value: &str) -> Result<u32, CommandError> {
    let value = argument(command, "number", value)?;
    value.parse().map_err(|_| CommandError::InvalidNumber {
        command,
        value: value.to_string(),
    })
}

fn dimensions(command: &'static str, rest: &str) -> Result<(u32, u32), CommandError> {
    let mut parts = rest.split_whitespace();
    let width = number(command, parts.next().unwrap_or_default())?;
    let height = parts.next().ok_or(CommandError::MissingArgument {
        command,
        argument: "height",
    })?;
    Ok((width, number(command, height)?))
}
