//! HTTP header processing module for encoding response heads
//!
//! # Components
//!
//! - [`HeaderEncoder`]: Encodes the status line and headers to bytes
//!   - Implements standard HTTP/1.x header formatting
//!   - Keeps repeated headers in insertion order
//!   - Reconciles content-length and connection headers

mod header_encoder;

pub use header_encoder::HeaderEncoder;
