/// Registry configuration loading.
pub mod config;
/// Common error types: subscription limits and glob patterns.
pub mod error;
/// Structured logging setup (filters, formats).
pub mod logging;
/// Pub/Sub: Registry, Endpoint, glob patterns.
pub mod pubsub;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// config
pub use self::config::{RegistryConfig, Settings};
/// Operation errors.
pub use error::{PatternError, SubscribeError};
/// Logging initialization.
pub use logging::{init_logging, LoggingConfig};
/// Pub/Sub API.
pub use pubsub::{pattern_matches, validate_pattern, ChannelRegistry, Endpoint, Registry};
