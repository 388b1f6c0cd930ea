pub mod capture;
pub mod config;

pub use capture::PageCapture;
pub use config::{ConnectionOptions, LaunchOptions};
