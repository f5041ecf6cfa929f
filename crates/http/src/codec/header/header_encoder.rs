//! HTTP header encoder implementation for serializing a pending response head
//!
//! This module writes the status line and the header block of a
//! [`PendingResponse`] into raw bytes. Headers are written in insertion order,
//! repeated names included.
//!
//! Two headers are reconciled on the way out, because the body length is only
//! final at flush time and the connection is closed after delivery:
//!
//! - `Content-Length` always carries the real body length, and is left out
//!   entirely for 1xx, 204 and 304 responses
//! - `Connection: close` is always sent, replacing any caller-set value

use crate::protocol::{PendingResponse, SendError};

use bytes::{BufMut, BytesMut};

use http::{header, HeaderValue, Version};
use std::io;
use std::io::Write;
use tokio_util::codec::Encoder;
use tracing::{error, warn};

/// Initial buffer size allocated for header serialization
const INIT_HEADER_SIZE: usize = 4 * 1024;

const CONNECTION_CLOSE: HeaderValue = HeaderValue::from_static("close");

/// Reason phrase used when the status code has no canonical one
const UNKNOWN_REASON: &str = "Unknown";

/// Encoder for the head of a [`PendingResponse`] implementing the [`Encoder`] trait.
///
/// The item is the response together with the number of body bytes that will
/// follow the head.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeaderEncoder;

impl<'a> Encoder<(&'a PendingResponse, usize)> for HeaderEncoder {
    type Error = SendError;

    /// Encodes the status line and headers into the provided bytes buffer.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - HTTP version is not HTTP/1.0 or HTTP/1.1
    /// - Writing to buffer fails
    fn encode(&mut self, item: (&'a PendingResponse, usize), dst: &mut BytesMut) -> Result<(), Self::Error> {
        let (response, body_len) = item;

        let version = match response.version() {
            Version::HTTP_10 => "HTTP/1.0",
            Version::HTTP_11 => "HTTP/1.1",
            v => {
                error!(http_version = ?v, "unsupported http version");
                return Err(SendError::UnsupportedVersion(v));
            }
        };

        dst.reserve(INIT_HEADER_SIZE);
        let status = response.status();
        write!(
            FastWrite(dst),
            "{} {} {}\r\n",
            version,
            status.as_str(),
            status.canonical_reason().unwrap_or(UNKNOWN_REASON)
        )?;

        let allows_body = response.allows_body();
        let content_length = HeaderValue::from(body_len);
        let mut length_written = false;

        for (header_name, header_value) in response.headers() {
            if *header_name == header::CONTENT_LENGTH {
                if !allows_body {
                    warn!(%status, declared = ?header_value, "content-length not allowed for status, dropped");
                    continue;
                }
                if *header_value != content_length {
                    warn!(declared = ?header_value, actual = body_len, "content-length does not match body, corrected");
                }
                if length_written {
                    continue;
                }
                length_written = true;
                put_header(dst, header_name.as_ref(), content_length.as_ref());
                continue;
            }
            if *header_name == header::CONNECTION {
                if !header_value.as_bytes().eq_ignore_ascii_case(CONNECTION_CLOSE.as_bytes()) {
                    warn!(declared = ?header_value, "connection is closed after the response, header replaced");
                }
                continue;
            }
            put_header(dst, header_name.as_ref(), header_value.as_ref());
        }

        if allows_body && !length_written {
            put_header(dst, header::CONTENT_LENGTH.as_ref(), content_length.as_ref());
        }

        put_header(dst, header::CONNECTION.as_ref(), CONNECTION_CLOSE.as_ref());

        dst.put_slice(b"\r\n");
        Ok(())
    }
}

#[inline]
fn put_header(dst: &mut BytesMut, name: &[u8], value: &[u8]) {
    dst.put_slice(name);
    dst.put_slice(b": ");
    dst.put_slice(value);
    dst.put_slice(b"\r\n");
}

/// Fast writer implementation for writing to BytesMut.
///
/// This is an optimization to avoid unnecessary bounds checking when writing
/// to the bytes buffer, since we've already reserved enough space.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
