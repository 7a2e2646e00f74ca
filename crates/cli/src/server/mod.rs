pub mod dns;
pub mod web;

pub use dns::start_dns_server;
pub use web::start_web_server;

use std::net::{IpAddr, SocketAddr};

/// Accepts bare IPv4/IPv6 addresses, with or without brackets.
pub fn socket_addr(bind_address: &str, port: u16) -> anyhow::Result<SocketAddr> {
    let ip: IpAddr = bind_address
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid bind address: {}", bind_address))?;
    Ok(SocketAddr::new(ip, port))
}
