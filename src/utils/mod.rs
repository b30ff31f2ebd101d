pub mod color;
pub mod file_size;
pub mod pretty_json;
