pub mod message_builder;
pub mod upstream_forwarder;

pub use message_builder::MessageBuilder;
pub use upstream_forwarder::{ForwardedResponse, UpstreamForwarder};
