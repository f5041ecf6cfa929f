use bytes::BytesMut;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE, SET_COOKIE};
use http::{HeaderName, HeaderValue, StatusCode, Version};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::codec::Encoder;
use tracing::{debug, warn};

use crate::codec::ResponseEncoder;
use crate::protocol::{BoxError, Charset, Cookie, HeaderList, PendingResponse, ResponseError, SendError};
use crate::writer::sink::{ErrorSink, ErrorSinks};
use crate::writer::trace::render_trace;

use std::sync::Arc;

const DEFAULT_BODY_CAPACITY: usize = 256;

/// Headroom reserved for the status line and headers when encoding
const HEAD_CAPACITY: usize = 512;

const TEXT_PLAIN: HeaderValue = HeaderValue::from_static("text/plain");

/// Lifecycle of a [`ResponseWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Status, headers and body may still change.
    Building,
    /// The response was written (or the write was attempted) and the connection closed.
    Flushed,
}

/// Accumulates one HTTP response and writes it to a connection exactly once.
///
/// Status, headers and body are buffered in memory. [`end`](Self::end) encodes
/// them, writes them to the transport and closes it; [`fail`](Self::fail) does
/// the same with a 500 response describing an error. After either of them the
/// writer is [`State::Flushed`] and:
///
/// - mutations are ignored (a warning is logged),
/// - `end` is ignored,
/// - `fail` sends nothing but still reports its error to the application sink,
/// - `write_immediate` returns [`SendError::AlreadyFlushed`].
///
/// The transport is any `AsyncWrite + Unpin`. Pass `&mut conn` when the
/// connection is owned elsewhere.
///
/// ```
/// use http::StatusCode;
/// use oneshot_http::writer::{ErrorSinks, ResponseWriter};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut writer = ResponseWriter::new(Vec::new(), ErrorSinks::default());
/// writer.set_status(StatusCode::NOT_FOUND).header("x-reason", "missing")?.append_content("not found");
/// writer.end().await;
///
/// let connection = writer.into_inner();
/// assert!(connection.starts_with(b"HTTP/1.1 404 Not Found\r\n"));
/// assert!(connection.ends_with(b"\r\n\r\nnot found"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ResponseWriter<W> {
    transport: W,
    response: PendingResponse,
    state: State,
    sinks: ErrorSinks,
    encoder: ResponseEncoder,
}

impl<W> ResponseWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(transport: W, sinks: ErrorSinks) -> Self {
        Self::builder(transport).sinks(sinks).build()
    }

    pub fn builder(transport: W) -> ResponseWriterBuilder<W> {
        ResponseWriterBuilder::new(transport)
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_flushed(&self) -> bool {
        self.state == State::Flushed
    }

    pub fn response(&self) -> &PendingResponse {
        &self.response
    }

    pub fn get_ref(&self) -> &W {
        &self.transport
    }

    pub fn into_inner(self) -> W {
        self.transport
    }

    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    pub fn set_status(&mut self, status: StatusCode) -> &mut Self {
        if self.is_building("set_status") {
            self.response.set_status(status);
        }
        self
    }

    pub fn version(&self) -> Version {
        self.response.version()
    }

    pub fn set_version(&mut self, version: Version) -> &mut Self {
        if self.is_building("set_version") {
            self.response.set_version(version);
        }
        self
    }

    pub fn charset(&self) -> Charset {
        self.response.charset()
    }

    /// Sets the charset for text appended from now on.
    pub fn set_charset(&mut self, charset: Charset) -> &mut Self {
        if self.is_building("set_charset") {
            self.response.set_charset(charset);
        }
        self
    }

    pub fn headers(&self) -> &HeaderList {
        self.response.headers()
    }

    pub fn body(&self) -> &[u8] {
        self.response.body()
    }

    /// Appends `value` under `name`, or removes every value of `name` when `value` is `None`.
    ///
    /// Existing values are never replaced, so repeated calls produce repeated
    /// headers.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseError::InvalidHeader`] if the name or value is not a
    /// valid header token; the header list is left unchanged.
    pub fn set_header<K, V>(&mut self, name: K, value: Option<V>) -> Result<&mut Self, ResponseError>
    where
        K: TryInto<HeaderName>,
        K::Error: Into<http::Error>,
        V: TryInto<HeaderValue>,
        V::Error: Into<http::Error>,
    {
        if !self.is_building("set_header") {
            return Ok(self);
        }

        let name = name.try_into().map_err(ResponseError::invalid_header)?;
        match value {
            Some(value) => {
                let value = value.try_into().map_err(ResponseError::invalid_header)?;
                self.response.headers_mut().append(name, value);
            }
            None => {
                self.response.headers_mut().remove(&name);
            }
        }
        Ok(self)
    }

    /// Appends a header value; see [`set_header`](Self::set_header).
    pub fn header<K, V>(&mut self, name: K, value: V) -> Result<&mut Self, ResponseError>
    where
        K: TryInto<HeaderName>,
        K::Error: Into<http::Error>,
        V: TryInto<HeaderValue>,
        V::Error: Into<http::Error>,
    {
        self.set_header(name, Some(value))
    }

    /// Appends a number in decimal form.
    pub fn header_number<K>(&mut self, name: K, value: i64) -> Result<&mut Self, ResponseError>
    where
        K: TryInto<HeaderName>,
        K::Error: Into<http::Error>,
    {
        self.set_header(name, Some(value))
    }

    pub fn remove_header<K>(&mut self, name: K) -> Result<&mut Self, ResponseError>
    where
        K: TryInto<HeaderName>,
        K::Error: Into<http::Error>,
    {
        self.set_header(name, None::<HeaderValue>)
    }

    /// Appends a `Set-Cookie` header.
    pub fn cookie(&mut self, cookie: &Cookie) -> Result<&mut Self, ResponseError> {
        if !self.is_building("cookie") {
            return Ok(self);
        }
        let value = cookie.to_header_value()?;
        self.response.headers_mut().append(SET_COOKIE, value);
        Ok(self)
    }

    /// Encodes `text` with the current charset and appends it to the body.
    pub fn append_content(&mut self, text: &str) -> &mut Self {
        if self.is_building("append_content") {
            self.response.append_text(text);
        }
        self
    }

    pub fn append_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        if self.is_building("append_bytes") {
            self.response.append_bytes(bytes);
        }
        self
    }

    /// Writes UTF-8 `text` straight to the transport, bypassing the body buffer.
    ///
    /// The charset setting does not apply and the state does not change.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::AlreadyFlushed`] once the response was flushed, or
    /// the transport's I/O error.
    pub async fn write_immediate(&mut self, text: &str) -> Result<&mut Self, SendError> {
        if self.is_flushed() {
            return Err(SendError::AlreadyFlushed);
        }

        self.transport.write_all(text.as_bytes()).await?;
        self.transport.flush().await?;
        Ok(self)
    }

    /// Writes the response, then closes the connection.
    ///
    /// Transport failures go to the transport sink.
    pub async fn end(&mut self) -> &mut Self {
        if !self.is_building("end") {
            return self;
        }

        self.flush_response().await;
        self
    }

    /// Replaces the response with a `500` carrying the error's trace, writes
    /// it, closes the connection and hands `error` to the application sink.
    ///
    /// Any status, content type, content length or body set before is
    /// superseded. Other headers are kept.
    pub async fn fail<E>(&mut self, error: E) -> &mut Self
    where
        E: Into<BoxError>,
    {
        let error = error.into();

        if self.is_flushed() {
            warn!(cause = %error, "fail after the response was flushed, reporting without resending");
            self.sinks.report_application(error);
            return self;
        }

        let trace = render_trace(&*error);

        self.response.set_status(StatusCode::INTERNAL_SERVER_ERROR);
        self.response.clear_body();
        self.response.append_text(&trace);

        let content_length = HeaderValue::from(self.response.body().len());
        let headers = self.response.headers_mut();
        headers.set(CONTENT_TYPE, TEXT_PLAIN);
        headers.set(CONTENT_LENGTH, content_length);

        self.flush_response().await;

        self.sinks.report_application(error);
        self
    }

    async fn flush_response(&mut self) {
        self.state = State::Flushed;

        let written = self.write_response().await;
        // close runs after the write whatever its outcome
        let closed = self.transport.shutdown().await.map_err(SendError::io);

        match written.and(closed) {
            Ok(()) => {
                debug!(
                    status = %self.response.status(),
                    body_len = self.response.body().len(),
                    "response flushed, connection closed"
                );
            }
            Err(e) => {
                debug!(cause = %e, "failed to flush response");
                self.sinks.report_transport(Box::new(e));
            }
        }
    }

    async fn write_response(&mut self) -> Result<(), SendError> {
        let mut buffer = BytesMut::with_capacity(HEAD_CAPACITY + self.response.body().len());
        self.encoder.encode(&self.response, &mut buffer)?;

        self.transport.write_all(&buffer).await?;
        Ok(self.transport.flush().await?)
    }

    fn is_building(&self, operation: &'static str) -> bool {
        if self.is_flushed() {
            warn!(operation, "response already flushed, ignoring");
            return false;
        }
        true
    }
}

/// Configures a [`ResponseWriter`] before the first mutation.
#[derive(Debug)]
pub struct ResponseWriterBuilder<W> {
    transport: W,
    sinks: ErrorSinks,
    charset: Charset,
    version: Version,
    body_capacity: usize,
}

impl<W> ResponseWriterBuilder<W>
where
    W: AsyncWrite + Unpin,
{
    fn new(transport: W) -> Self {
        Self {
            transport,
            sinks: ErrorSinks::default(),
            charset: Charset::default(),
            version: Version::HTTP_11,
            body_capacity: DEFAULT_BODY_CAPACITY,
        }
    }

    pub fn sinks(mut self, sinks: ErrorSinks) -> Self {
        self.sinks = sinks;
        self
    }

    pub fn application_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.sinks = self.sinks.with_application(sink);
        self
    }

    pub fn transport_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.sinks = self.sinks.with_transport(sink);
        self
    }

    pub fn charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    pub fn version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    pub fn body_capacity(mut self, capacity: usize) -> Self {
        self.body_capacity = capacity;
        self
    }

    pub fn build(self) -> ResponseWriter<W> {
        let mut response = PendingResponse::with_capacity(self.body_capacity);
        response.set_charset(self.charset);
        response.set_version(self.version);

        ResponseWriter { transport: self.transport, response, state: State::Building, sinks: self.sinks, encoder: ResponseEncoder::new() }
    }
}
