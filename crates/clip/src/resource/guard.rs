// ABOUTME: Private-network guard for outbound page fetches.
// ABOUTME: Refuses hosts that are, or resolve to, loopback, RFC1918, link-local or unique-local addresses.

use std::net::{IpAddr, SocketAddr};

use ipnet::IpNet;
use once_cell::sync::Lazy;
use reqwest::dns::{Addrs, Name, Resolve, Resolving};
use url::Url;

use crate::error::ClipError;

static BLOCKED_RANGES: Lazy<Vec<IpNet>> = Lazy::new(|| {
    [
        "0.0.0.0/8",
        "10.0.0.0/8",
        "127.0.0.0/8",
        "169.254.0.0/16",
        "172.16.0.0/12",
        "192.168.0.0/16",
        "::1/128",
        "fc00::/7",
        "fe80::/10",
    ]
    .iter()
    .filter_map(|range| range.parse().ok())
    .collect()
});

/// True for addresses a clip must never reach unless private networks are allowed.
pub(crate) fn is_blocked(addr: &IpAddr) -> bool {
    match addr {
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => is_blocked(&IpAddr::V4(v4)),
            None => BLOCKED_RANGES.iter().any(|range| range.contains(addr)),
        },
        IpAddr::V4(_) => BLOCKED_RANGES.iter().any(|range| range.contains(addr)),
    }
}

/// Fails with `Ssrf` when `target`'s host is blocked, resolving names first.
///
/// `url` is the URL the caller asked for and is what the error reports.
pub(crate) async fn check_host(target: &Url, url: &str, reason: &str) -> Result<(), ClipError> {
    let Some(host) = target.host_str() else {
        return Ok(());
    };
    let host = host.trim_start_matches('[').trim_end_matches(']');
    let blocked = || ClipError::ssrf(url, "Fetch", Some(anyhow::anyhow!("{reason}")));

    if let Ok(ip) = host.parse::<IpAddr>() {
        return if is_blocked(&ip) { Err(blocked()) } else { Ok(()) };
    }

    let port = target.port_or_known_default().unwrap_or(80);
    let mut resolved = tokio::net::lookup_host((host, port)).await.map_err(|e| {
        ClipError::fetch(url, "Fetch", Some(anyhow::anyhow!("cannot resolve {host}: {e}")))
    })?;

    if resolved.any(|sock| is_blocked(&sock.ip())) {
        return Err(blocked());
    }
    Ok(())
}

/// Why a redirect to `target` must not be followed, if it must not.
///
/// Only literal addresses are judged here; named hosts are left to [`PublicResolver`]
/// when the connection is made.
pub(crate) fn redirect_refusal(target: &Url) -> Option<&'static str> {
    let host = target.host_str()?;
    let ip = host
        .trim_start_matches('[')
        .trim_end_matches(']')
        .parse::<IpAddr>()
        .ok()?;
    is_blocked(&ip).then_some("redirect to private IP blocked")
}

/// DNS resolver that never hands a blocked address to the connector.
///
/// Every connection a guarded client makes goes through it, redirect hops included.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct PublicResolver;

impl Resolve for PublicResolver {
    fn resolve(&self, name: Name) -> Resolving {
        Box::pin(resolve_public(name.as_str().to_string()))
    }
}

async fn resolve_public(host: String) -> Result<Addrs, Box<dyn std::error::Error + Send + Sync>> {
    let public: Vec<SocketAddr> = tokio::net::lookup_host((host.as_str(), 0))
        .await?
        .filter(|sock| !is_blocked(&sock.ip()))
        .collect();
    if public.is_empty() {
        return Err(format!("{host} resolves only to private IP addresses").into());
    }
    Ok(Box::new(public.into_iter()))
}
