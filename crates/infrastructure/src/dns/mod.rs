pub mod forwarding;
pub mod record_builder;
pub mod resolver;
pub mod server;
pub mod transport;
pub mod zone_index;

pub use forwarding::{ForwardedResponse, MessageBuilder, UpstreamForwarder};
pub use resolver::{Resolution, ZoneResolver};
pub use server::{DnsRequestHandler, MAX_UDP_PAYLOAD};
pub use zone_index::{IndexSnapshot, ZoneIndex};
