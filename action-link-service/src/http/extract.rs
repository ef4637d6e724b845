use std::convert::Infallible;
use std::net::SocketAddr;

use action_link_api::RequestMetadata;
use axum::extract::{ConnectInfo, FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::http::HeaderMap;

/// Number of reverse proxies in front of the server that append to `X-Forwarded-For`.
///
/// With no trusted proxies the socket peer is the client and forwarding headers
/// are ignored. With `hops` proxies the client is the entry the outermost proxy
/// appended, `hops` positions from the right; anything left of it came from the
/// client and is not used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrustedProxies {
    pub hops: usize,
}

impl TrustedProxies {
    pub fn new(hops: usize) -> Self {
        Self { hops }
    }

    fn client_ip(&self, headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
        let peer_ip = peer.map(|addr| addr.ip().to_string());
        if self.hops == 0 {
            return peer_ip;
        }

        let entries: Vec<&str> = headers
            .get_all("x-forwarded-for")
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(','))
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
            .collect();

        match entries.get(entries.len().saturating_sub(self.hops)) {
            Some(ip) => Some(ip.to_string()),
            None => header_str(headers, "x-real-ip")
                .map(str::trim)
                .filter(|ip| !ip.is_empty())
                .map(str::to_string)
                .or(peer_ip),
        }
    }
}

/// Client IP and user agent of the current request.
#[derive(Debug, Clone, Default)]
pub struct ClientContext(pub RequestMetadata);

impl<S> FromRequestParts<S> for ClientContext
where
    S: Send + Sync,
    TrustedProxies: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let peer = ConnectInfo::<SocketAddr>::from_request_parts(parts, state)
            .await
            .ok()
            .map(|ConnectInfo(addr)| addr);
        let ip_address = TrustedProxies::from_ref(state).client_ip(&parts.headers, peer);
        let user_agent = header_str(&parts.headers, "user-agent").map(str::to_string);

        Ok(ClientContext(RequestMetadata {
            ip_address,
            user_agent,
        }))
    }
}

pub(crate) fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}
