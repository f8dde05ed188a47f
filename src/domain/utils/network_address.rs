use std::net::Ipv6Addr;

use crate::error::{Error, Result};

/// Number of leading bits that identify the router network of an address or SID.
pub const NETWORK_PREFIX_LENGTH: u32 = 64;

/// Derives the /64 network address (e.g. `2001:db8:1:1::`) of an IPv6 address or SID.
///
/// Routers announce their loopback and locator prefixes as /64 networks, so the
/// network address is the key used to look up the advertising router in the cache.
pub fn get_network_address(address: &str) -> Result<String> {
    let parsed: Ipv6Addr = address.trim().parse().map_err(|_| Error::InvalidAddress(address.to_string()))?;
    let mask: u128 = u128::MAX << (128 - NETWORK_PREFIX_LENGTH);
    let network = Ipv6Addr::from(u128::from(parsed) & mask);

    Ok(network.to_string())
}
