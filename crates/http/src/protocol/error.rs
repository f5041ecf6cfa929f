use std::error::Error;
use std::io;

use http::Version;
use thiserror::Error;

/// Boxed application error, the shape handler code hands to [`fail`](crate::writer::ResponseWriter::fail).
pub type BoxError = Box<dyn Error + Send + Sync>;

/// Errors raised while the response is still being built.
#[derive(Error, Debug)]
pub enum ResponseError {
    #[error("invalid header: {source}")]
    InvalidHeader {
        #[from]
        source: http::Error,
    },
}

impl ResponseError {
    pub fn invalid_header<E: Into<http::Error>>(e: E) -> Self {
        Self::InvalidHeader { source: e.into() }
    }
}

/// Errors raised while delivering bytes to the transport.
#[derive(Error, Debug)]
pub enum SendError {
    #[error("unsupported http version: {0:?}")]
    UnsupportedVersion(Version),

    #[error("response already flushed, connection is closed")]
    AlreadyFlushed,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    /// Returns true if the failure came from the underlying transport.
    pub fn is_io(&self) -> bool {
        matches!(self, SendError::Io { .. })
    }
}
