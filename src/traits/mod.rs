//! Capability traits implemented by the MakeHub client.

mod api_handler;
mod model_listing;

pub use api_handler::ApiHandler;
pub use model_listing::ModelListing;
