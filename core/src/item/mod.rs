mod decode;
mod models;

pub use decode::decode_collection;
pub use models::{Collection, Item};
