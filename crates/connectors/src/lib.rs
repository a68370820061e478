pub mod error;
pub mod fetcher;
pub mod file;
pub mod http;
pub mod memory;
pub mod session;
pub mod settings;
pub mod wire;
