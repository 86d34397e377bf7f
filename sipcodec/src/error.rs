use std::error;
use std::fmt;

/// Errors related to SIP2 message handling and framing.
#[derive(Debug, PartialEq)]
pub enum Error {
    DateFormatError,
    FixedFieldLengthError,
    MessageFormatError,
    UnknownMessageError,
    UnsupportedVersionError,
    NetworkError,
    NoResponseError,
}

use self::Error::*;

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        None
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            DateFormatError => write!(f, "date format error"),
            FixedFieldLengthError => write!(f, "fixed field length error"),
            MessageFormatError => write!(f, "sip message format error"),
            UnknownMessageError => write!(f, "unknown sip message type"),
            UnsupportedVersionError => {
                write!(f, "message not supported in the active protocol version")
            }
            NetworkError => write!(f, "network error"),
            NoResponseError => write!(f, "no message was received"),
        }
    }
}
