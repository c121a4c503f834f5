//! Transport collaborators
//!
//! The core only depends on [`Transport`]: one request in, one raw reply out.
//! [`HttpTransport`] talks to a real engine; [`MemoryTransport`] replays canned
//! replies for tests and demos.

pub mod http;
pub mod memory;
pub mod traits;

pub use http::HttpTransport;
pub use memory::MemoryTransport;
pub use traits::{RawResponse, Transport, TransportError};
