//! The response state accumulated before the terminal flush.

use bytes::BytesMut;
use http::{StatusCode, Version};

use crate::protocol::{Charset, HeaderList};

/// Status, headers and body of a response that has not been sent yet.
///
/// The body only ever grows; text is converted with [`Charset`] at the time it
/// is appended, so changing the charset later does not touch earlier content.
#[derive(Debug, Clone)]
pub struct PendingResponse {
    status: StatusCode,
    version: Version,
    headers: HeaderList,
    charset: Charset,
    body: BytesMut,
}

impl Default for PendingResponse {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl PendingResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(body_capacity: usize) -> Self {
        Self {
            status: StatusCode::OK,
            version: Version::HTTP_11,
            headers: HeaderList::new(),
            charset: Charset::default(),
            body: BytesMut::with_capacity(body_capacity),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Whether the status permits a body and a `Content-Length` on the wire.
    ///
    /// 1xx, 204 and 304 responses never carry either.
    pub fn allows_body(&self) -> bool {
        !(self.status.is_informational()
            || self.status == StatusCode::NO_CONTENT
            || self.status == StatusCode::NOT_MODIFIED)
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    pub fn headers(&self) -> &HeaderList {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderList {
        &mut self.headers
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    pub fn set_charset(&mut self, charset: Charset) {
        self.charset = charset;
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Encodes `text` with the current charset and appends it to the body.
    pub fn append_text(&mut self, text: &str) {
        self.charset.encode_into(text, &mut self.body);
    }

    pub fn append_bytes(&mut self, bytes: &[u8]) {
        self.body.extend_from_slice(bytes);
    }

    /// Drops the buffered body, keeping the allocation.
    pub(crate) fn clear_body(&mut self) {
        self.body.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let response = PendingResponse::new();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.version(), Version::HTTP_11);
        assert_eq!(response.charset(), Charset::UTF_8);
        assert!(response.headers().is_empty());
        assert!(response.body().is_empty());
    }

    #[test]
    fn bodiless_statuses() {
        let mut response = PendingResponse::new();
        assert!(response.allows_body());

        for status in [StatusCode::CONTINUE, StatusCode::SWITCHING_PROTOCOLS, StatusCode::NO_CONTENT, StatusCode::NOT_MODIFIED] {
            response.set_status(status);
            assert!(!response.allows_body(), "{status} must not carry a body");
        }

        response.set_status(StatusCode::RESET_CONTENT);
        assert!(response.allows_body());
    }

    #[test]
    fn charset_applies_to_later_text_only() {
        let mut response = PendingResponse::new();
        response.append_text("é");
        response.set_charset(Charset::WINDOWS_1252);
        response.append_text("é");
        response.append_bytes(&[0xC3, 0xA9]);

        assert_eq!(response.body(), &[0xC3, 0xA9, 0xE9, 0xC3, 0xA9]);
    }
}
