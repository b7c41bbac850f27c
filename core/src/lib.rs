//! Core logic for the recharge admin panel: the collection sync store over a
//! remote document and the object uploader, independent of any transport.

pub mod api;
pub mod config;
pub mod error;
pub mod item;
pub mod notify;
pub mod store;
pub mod upload;
