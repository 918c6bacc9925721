pub mod error;
pub mod snapshot;
pub mod loader;
pub mod scene;
pub mod driver;
