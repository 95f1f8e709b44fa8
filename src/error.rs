// SPDX-License-Identifier: MPL-2.0
use crate::media::MediaKind;

/// Errors raised by the browsing engine and its collaborators.
///
/// Every variant is terminal at the orchestrator: it is turned into a
/// user-visible message and never propagates further.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("I/O Error: {0}")]
    Io(String),

    #[error("SVG Error: {0}")]
    Svg(String),

    #[error("Config Error: {0}")]
    Config(String),

    /// The file could not be decoded (unreadable, corrupt, unsupported).
    #[error("Decode Error: {0}")]
    Decode(String),

    /// An edit was requested on a kind that only supports viewing.
    #[error("Editing {0} images is unsupported")]
    UnsupportedEdit(MediaKind),

    /// A copy/move/remove delegated to the directory collaborator failed.
    #[error("Failed to {operation} {source_name} to {destination}")]
    FileOperation {
        operation: FileOperation,
        source_name: String,
        destination: String,
    },

    /// The requested entry is not (or no longer) present.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// File operations delegated to the directory collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    Copy,
    Move,
    Remove,
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOperation::Copy => write!(f, "copy"),
            FileOperation::Move => write!(f, "move"),
            FileOperation::Remove => write!(f, "remove"),
        }
    }
}

impl Error {
    /// Returns the line shown to the user for this error.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Error::Decode(_) | Error::Svg(_) | Error::Io(_) | Error::NotFound(_) => {
                "Error: could not load image.".to_string()
            }
            Error::UnsupportedEdit(_) => "Editing gifs/video is unsupported.".to_string(),
            Error::FileOperation {
                operation,
                source_name,
                destination,
            } => match operation {
                FileOperation::Copy => format!("Error copying file to: {destination}"),
                FileOperation::Move => format!("Error moving file to: {destination}"),
                FileOperation::Remove => format!("Error removing file: {source_name}"),
            },
            Error::Config(e) => format!("Config Error: {e}"),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<image_rs::ImageError> for Error {
    fn from(err: image_rs::ImageError) -> Self {
        Error::Decode(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_io_error() {
        let err = Error::Io("disk failure".to_string());
        assert_eq!(format!("{}", err), "I/O Error: disk failure");
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let io_error = std::io::Error::other("boom");
        let err: Error = io_error.into();
        match err {
            Error::Io(message) => assert!(message.contains("boom")),
            _ => panic!("expected Io variant"),
        }
    }

    #[test]
    fn image_error_converts_to_decode_failure() {
        let image_error = image_rs::ImageError::IoError(std::io::Error::other("truncated"));
        let err: Error = image_error.into();
        assert!(matches!(err, Error::Decode(message) if message.contains("truncated")));
    }

    #[test]
    fn config_error_formats_properly() {
        let err = Error::Config("bad field".into());
        assert_eq!(format!("{}", err), "Config Error: bad field");
    }

    #[test]
    fn decode_failures_share_one_user_message() {
        assert_eq!(
            Error::Decode("bad header".into()).user_message(),
            "Error: could not load image."
        );
        assert_eq!(
            Error::NotFound("a.png".into()).user_message(),
            "Error: could not load image."
        );
    }

    #[test]
    fn unsupported_edit_names_kind() {
        let err = Error::UnsupportedEdit(MediaKind::Animated);
        assert_eq!(format!("{err}"), "Editing animated images is unsupported");
        assert_eq!(err.user_message(), "Editing gifs/video is unsupported.");
    }

    #[test]
    fn file_operation_message_names_destination() {
        let err = Error::FileOperation {
            operation: FileOperation::Move,
            source_name: "a.png".into(),
            destination: "/tmp/out".into(),
        };
        assert_eq!(err.user_message(), "Error moving file to: /tmp/out");
        assert_eq!(format!("{err}"), "Failed to move a.png to /tmp/out");
    }
}
