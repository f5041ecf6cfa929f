//! Building blocks of a response under construction.
//!
//! - [`PendingResponse`]: status, version, headers, charset and body buffer
//! - [`HeaderList`]: ordered header multimap with append-or-remove semantics
//! - [`Charset`]: text-to-bytes conversion for body content
//! - [`Cookie`]: `Set-Cookie` values
//! - [`ResponseError`] / [`SendError`]: build-time and delivery-time failures

mod header;
pub use header::HeaderList;

mod charset;
pub use charset::Charset;

mod cookie;
pub use cookie::Cookie;
pub use cookie::SameSite;

mod response;
pub use response::PendingResponse;

mod error;
pub use error::BoxError;
pub use error::ResponseError;
pub use error::SendError;
