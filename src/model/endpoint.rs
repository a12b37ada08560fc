use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

/// The network context of a node in the service graph.
///
/// Attached to every reported span as the local endpoint of the process that
/// recorded it, and optionally as the remote endpoint of its peer.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "camelCase"))]
pub struct Endpoint {
    #[cfg_attr(
        feature = "serialize",
        serde(skip_serializing_if = "Option::is_none")
    )]
    service_name: Option<String>,
    #[cfg_attr(
        feature = "serialize",
        serde(skip_serializing_if = "Option::is_none")
    )]
    ipv4: Option<Ipv4Addr>,
    #[cfg_attr(
        feature = "serialize",
        serde(skip_serializing_if = "Option::is_none")
    )]
    ipv6: Option<Ipv6Addr>,
    #[cfg_attr(
        feature = "serialize",
        serde(skip_serializing_if = "Option::is_none")
    )]
    port: Option<u16>,
}

impl Endpoint {
    /// Create an endpoint from a service name and an optional socket address.
    pub fn new(service_name: impl Into<String>, socket_addr: Option<SocketAddr>) -> Self {
        match socket_addr {
            Some(SocketAddr::V4(v4)) => Endpoint {
                service_name: Some(service_name.into()),
                ipv4: Some(*v4.ip()),
                ipv6: None,
                port: Some(v4.port()),
            },
            Some(SocketAddr::V6(v6)) => Endpoint {
                service_name: Some(service_name.into()),
                ipv4: None,
                ipv6: Some(*v6.ip()),
                port: Some(v6.port()),
            },
            None => Endpoint {
                service_name: Some(service_name.into()),
                ipv4: None,
                ipv6: None,
                port: None,
            },
        }
    }

    /// Lowercase label of this node in the service graph, if known.
    pub fn service_name(&self) -> Option<&str> {
        self.service_name.as_deref()
    }

    /// IPv4 address of the node, if known.
    pub fn ipv4(&self) -> Option<Ipv4Addr> {
        self.ipv4
    }

    /// IPv6 address of the node, if known.
    pub fn ipv6(&self) -> Option<Ipv6Addr> {
        self.ipv6
    }

    /// Port of the socket the node was reached on, if known.
    pub fn port(&self) -> Option<u16> {
        self.port
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_socket_addr_by_family() {
        let v4 = Endpoint::new("backend", Some("10.1.2.3:9000".parse().unwrap()));
        assert_eq!(v4.service_name(), Some("backend"));
        assert_eq!(v4.ipv4(), Some(Ipv4Addr::new(10, 1, 2, 3)));
        assert_eq!(v4.ipv6(), None);
        assert_eq!(v4.port(), Some(9000));

        let v6 = Endpoint::new("backend", Some("[::1]:9000".parse().unwrap()));
        assert_eq!(v6.ipv4(), None);
        assert_eq!(v6.ipv6(), Some(Ipv6Addr::LOCALHOST));
        assert_eq!(v6.port(), Some(9000));

        let bare = Endpoint::new("backend", None);
        assert_eq!(bare.ipv4(), None);
        assert_eq!(bare.ipv6(), None);
        assert_eq!(bare.port(), None);
    }
}
