pub mod settings;

pub use settings::{RegistryConfig, Settings};
