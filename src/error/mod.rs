pub mod pubsub;

pub use pubsub::{PatternError, SubscribeError};
