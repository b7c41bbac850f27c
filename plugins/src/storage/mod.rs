pub mod http_client;
pub mod service;
pub mod sigv4;

pub use http_client::{ObjectAuth, ObjectHttpClient};
pub use service::HttpObjectStore;
pub use sigv4::SigningKeys;
