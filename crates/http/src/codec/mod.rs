//! HTTP codec module for encoding buffered responses
//!
//! This module turns a [`PendingResponse`](crate::protocol::PendingResponse)
//! into the bytes that go on the wire. It plugs into `tokio_util`'s
//! [`Encoder`](tokio_util::codec::Encoder) trait so it can also be used with a
//! `FramedWrite`.
//!
//! # Architecture
//!
//! - [`ResponseEncoder`]: Encodes the complete response
//!   - Header encoding via [`HeaderEncoder`]
//!   - Body written as one fixed-length payload
//!
//! # Example
//!
//! ```
//! use oneshot_http::codec::ResponseEncoder;
//! use oneshot_http::protocol::PendingResponse;
//! use tokio_util::codec::Encoder;
//! use bytes::BytesMut;
//!
//! let mut response = PendingResponse::new();
//! response.append_text("hello");
//!
//! let mut buffer = BytesMut::new();
//! ResponseEncoder::new().encode(&response, &mut buffer).unwrap();
//! assert!(buffer.ends_with(b"\r\n\r\nhello"));
//! ```

mod header;
mod response_encoder;

pub use header::HeaderEncoder;
pub use response_encoder::ResponseEncoder;
