//! Shared data types.

pub mod message;
pub mod model;
pub mod stream;

pub use message::*;
pub use model::*;
pub use stream::*;
