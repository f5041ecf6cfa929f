//! Per-request response writer
//!
//! # Components
//!
//! - [`ResponseWriter`]: buffers status, headers and body, then performs the
//!   single terminal flush and closes the connection
//! - [`ResponseWriterBuilder`]: configures sinks, charset, version and buffer size
//! - [`ErrorSinks`]: the application and transport error channels
//!
//! # Lifecycle
//!
//! ```text
//! Building --end()/fail()--> Flushed
//! ```
//!
//! `write_immediate` writes to the connection without leaving `Building`.

mod response_writer;
mod sink;
mod trace;

pub use response_writer::ResponseWriter;
pub use response_writer::ResponseWriterBuilder;
pub use response_writer::State;
pub use sink::ErrorSink;
pub use sink::ErrorSinks;
pub use sink::LogSink;
pub use sink::ReportContext;
