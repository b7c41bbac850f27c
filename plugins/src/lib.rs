pub mod document;
pub mod factory;
pub mod http;
pub mod storage;
