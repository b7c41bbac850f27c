pub mod helpers;
pub mod key;
pub mod progress;
pub mod r#trait;
pub mod uploader;

pub use helpers::{file_extension, format_file_size, is_image_file, is_video_file};
pub use key::{is_dot_segment, key_from_url, key_from_url_under, sanitize_file_name, storage_key};
pub use progress::{chunked_body, ProgressCallback, ProgressTracker, UploadProgress};
pub use r#trait::{ObjectStore, PutRequest};
pub use uploader::{ObjectUploader, UploadFile, DEFAULT_FOLDER};
