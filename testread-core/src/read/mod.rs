//! Test read assembly.
//!
//! ```text
//! Message stream
//!   -> MessageGrouper (http_log parses request/response/slice markers)
//!   -> MessageGroup
//!   -> StreamReadHandler (record limit, slice and page ceilings)
//!   -> StreamRead
//! ```

mod error;
mod grouper;
mod handler;
mod http_log;
mod limits;
mod request;
#[cfg(test)]
mod tests;
mod types;

pub use error::*;
pub use grouper::*;
pub use handler::*;
pub use http_log::*;
pub use limits::*;
pub use request::*;
pub use types::*;
