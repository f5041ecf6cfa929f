//! A buffered, one-shot HTTP response writer
//!
//! This crate models the last step of serving a request on a connection that
//! carries exactly one response: handler code accumulates a status, headers,
//! cookies and a body in memory, then a single terminal flush writes the whole
//! response to the transport and closes it.
//!
//! # Features
//!
//! - Fluent mutation API with ordered, repeatable headers
//! - Charset-aware text content next to raw byte content
//! - Automatic `Content-Length` reconciliation and `Connection: close`, with
//!   head-only output for 1xx, 204 and 304
//! - Error responses carrying the diagnostic trace of the causing error
//! - Separate, injected sinks for application errors and transport errors
//! - Works over any tokio `AsyncWrite`
//!
//! # Example
//!
//! ```no_run
//! use http::StatusCode;
//! use tokio::net::TcpListener;
//! use tracing::{error, info, warn, Level};
//! use tracing_subscriber::FmtSubscriber;
//! use oneshot_http::writer::{ErrorSinks, ResponseWriter};
//!
//! #[tokio::main]
//! async fn main() {
//!     // Initialize logging
//!     let subscriber = FmtSubscriber::builder()
//!         .with_max_level(Level::INFO)
//!         .finish();
//!     tracing::subscriber::set_global_default(subscriber)
//!         .expect("setting default subscriber failed");
//!
//!     info!(port = 8080, "start listening");
//!     let tcp_listener = match TcpListener::bind("127.0.0.1:8080").await {
//!         Ok(tcp_listener) => tcp_listener,
//!         Err(e) => {
//!             error!(cause = %e, "bind server error");
//!             return;
//!         }
//!     };
//!
//!     let sinks = ErrorSinks::default();
//!
//!     loop {
//!         let (tcp_stream, _remote_addr) = match tcp_listener.accept().await {
//!             Ok(stream_and_addr) => stream_and_addr,
//!             Err(e) => {
//!                 warn!(cause = %e, "failed to accept");
//!                 continue;
//!             }
//!         };
//!
//!         let sinks = sinks.clone();
//!         tokio::spawn(async move {
//!             let (_reader, writer) = tcp_stream.into_split();
//!             let mut response = ResponseWriter::new(writer, sinks);
//!             response.set_status(StatusCode::OK).append_content("Hello World!\r\n");
//!             response.end().await;
//!         });
//!     }
//! }
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: response state, header list, charsets, cookies and errors
//! - [`codec`]: encoding a pending response into HTTP/1.x bytes
//! - [`writer`]: the response writer, its lifecycle and error sinks
//!
//! # Error Handling
//!
//! - [`protocol::ResponseError`]: invalid headers while building
//! - [`protocol::SendError`]: failures while delivering to the transport
//!
//! Application errors passed to [`writer::ResponseWriter::fail`] are never
//! returned to the caller: they become a `500` response and are then handed to
//! the application [`writer::ErrorSink`]. Transport failures during the flush go
//! to the transport sink instead.
//!
//! # Limitations
//!
//! - HTTP/1.0 and HTTP/1.1 only
//! - No chunked or streaming bodies; the connection is closed after the response

pub mod codec;
pub mod protocol;
pub mod writer;
