//! Filesystem storage for uploaded images.

mod local_image_store;

pub use local_image_store::{LocalImageStore, stored_file_name};
