//! JetStream channel core
//!
//! Types shared by the channel dispatcher: the declarative channel
//! specification, the JetStream-native stream/consumer configuration, and
//! the policy converters between the two.

pub mod channel_spec;

pub mod jetstream;

pub mod policy;

mod duration;
pub use duration::parse_duration;

pub mod errors;
pub use errors::DurationParseError;
