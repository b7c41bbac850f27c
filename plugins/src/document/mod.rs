pub mod http_client;
pub mod service;

pub use http_client::RealtimeDbClient;
pub use service::RealtimeDocumentStore;
