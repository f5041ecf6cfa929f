use crate::codec::header::HeaderEncoder;
use crate::protocol::{PendingResponse, SendError};
use bytes::BytesMut;
use tokio_util::codec::Encoder;
use tracing::warn;

/// Encodes a whole [`PendingResponse`]: status line, headers, blank line and body.
///
/// The body is written as a single fixed-length payload; there is no chunked
/// framing because the response is complete before it is encoded. Statuses that
/// forbid a body (1xx, 204, 304) are sent head only.
#[derive(Debug, Default)]
pub struct ResponseEncoder {
    header_encoder: HeaderEncoder,
}

impl ResponseEncoder {
    pub fn new() -> Self {
        Default::default()
    }
}

impl<'a> Encoder<&'a PendingResponse> for ResponseEncoder {
    type Error = SendError;

    fn encode(&mut self, item: &'a PendingResponse, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let body = item.body();
        self.header_encoder.encode((item, body.len()), dst)?;

        if !item.allows_body() {
            if !body.is_empty() {
                warn!(status = %item.status(), body_len = body.len(), "body not allowed for status, dropped");
            }
            return Ok(());
        }

        dst.reserve(body.len());
        dst.extend_from_slice(body);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{header, HeaderValue, StatusCode};

    #[test]
    fn head_then_body() {
        let mut response = PendingResponse::new();
        response.set_status(StatusCode::NOT_FOUND);
        response.headers_mut().append(header::HeaderName::from_static("x-reason"), HeaderValue::from_static("missing"));
        response.append_text("not found");

        let mut dst = BytesMut::new();
        ResponseEncoder::new().encode(&response, &mut dst).unwrap();

        assert_eq!(
            &dst[..],
            &b"HTTP/1.1 404 Not Found\r\nx-reason: missing\r\ncontent-length: 9\r\nconnection: close\r\n\r\nnot found"[..]
        );
    }

    #[test]
    fn binary_body_is_untouched() {
        let mut response = PendingResponse::new();
        response.append_bytes(&[0, 159, 146, 150]);

        let mut dst = BytesMut::new();
        ResponseEncoder::new().encode(&response, &mut dst).unwrap();

        assert!(dst.ends_with(b"content-length: 4\r\nconnection: close\r\n\r\n\x00\x9f\x92\x96"));
    }

    #[test]
    fn bodiless_status_drops_appended_body() {
        for status in [StatusCode::CONTINUE, StatusCode::NO_CONTENT, StatusCode::NOT_MODIFIED] {
            let mut response = PendingResponse::new();
            response.set_status(status);
            response.append_text("ignored");

            let mut dst = BytesMut::new();
            ResponseEncoder::new().encode(&response, &mut dst).unwrap();

            let expected = format!("HTTP/1.1 {} {}\r\nconnection: close\r\n\r\n", status.as_str(), status.canonical_reason().unwrap());
            assert_eq!(&dst[..], expected.as_bytes());
        }
    }
}
