//! Utility modules
//!
//! - `http_headers`: header builder and MakeHub's fixed header table
//! - `streaming`: SSE payload extraction over `reqwest` byte streams

pub mod http_headers;
pub mod streaming;

pub use http_headers::HttpHeaderBuilder;
pub use streaming::sse_data_stream;
