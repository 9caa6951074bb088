pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod nav;
pub mod notify;
pub mod pager;
pub mod session;
pub mod store;
pub mod types;
pub mod views;

pub use api::Api;
pub use config::ClientConfig;
pub use error::{ApiError, Failure};
