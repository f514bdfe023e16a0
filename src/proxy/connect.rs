use std::net::SocketAddr;

use async_trait::async_trait;
use tokio::net::TcpStream;

use crate::error::{Error, Result};
use crate::proto::{Destination, Host};

/// Opens the outbound side of a session.
#[async_trait]
pub trait Connect: Sync + Send {
    async fn connect(&self, destination: &Destination) -> Result<TcpStream>;
}

/// Dials the destination directly, once, with no timeout.
pub struct TcpConnector;

#[async_trait]
impl Connect for TcpConnector {
    async fn connect(&self, destination: &Destination) -> Result<TcpStream> {
        let port = destination.port;
        let stream = match &destination.host {
            Host::Ipv4(ip) => TcpStream::connect(SocketAddr::new((*ip).into(), port)).await,
            Host::Ipv6(ip) => TcpStream::connect(SocketAddr::new((*ip).into(), port)).await,
            Host::Domain(name) => TcpStream::connect((name.as_str(), port)).await,
        };

        stream.map_err(|source| Error::Connect {
            destination: destination.to_string(),
            source,
        })
    }
}
