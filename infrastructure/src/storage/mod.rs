//! Storage adapters implementing [`StorageMedium`](consent_application::StorageMedium).

mod json_file;

pub use json_file::JsonFileMedium;
