pub mod path;
pub mod process;
pub mod service;
pub mod version;

pub use path::clean_image_path;
pub use process::scan_processes;
pub use service::{ServiceScan, scan_services};
pub use version::file_version;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("service enumeration failed: {0}")]
    Services(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
