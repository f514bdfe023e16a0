pub mod connect;
pub mod relay;
pub mod socks5;

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use futures::stream::StreamExt;
use log::{debug, info, warn};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio_stream::wrappers::TcpListenerStream;

use crate::error::Result;
use connect::{Connect, TcpConnector};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Handshaking,
    Negotiated,
    RequestParsed,
    Connecting,
    Relaying,
    Closed,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            State::Handshaking => "HANDSHAKING",
            State::Negotiated => "NEGOTIATED",
            State::RequestParsed => "REQUEST_PARSED",
            State::Connecting => "CONNECTING",
            State::Relaying => "RELAYING",
            State::Closed => "CLOSED",
        };
        f.write_str(name)
    }
}

pub struct Socks5Server {
    listener: TcpListener,
    connector: Arc<dyn Connect>,
}

impl Socks5Server {
    pub async fn listen<A: ToSocketAddrs>(address: A) -> std::io::Result<Self> {
        let listener = TcpListener::bind(address).await?;
        Ok(Self {
            listener,
            connector: Arc::new(TcpConnector),
        })
    }

    pub fn with_connector(mut self, connector: Arc<dyn Connect>) -> Self {
        self.connector = connector;
        self
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts forever, one task per connection.
    pub async fn run(self) {
        let mut incoming = TcpListenerStream::new(self.listener);

        while let Some(stream) = incoming.next().await {
            match stream {
                Ok(stream) => {
                    let connector = self.connector.clone();
                    tokio::spawn(async move {
                        let peer = match stream.peer_addr() {
                            Ok(peer) => peer,
                            Err(e) => {
                                warn!("drop connection: {}", e);
                                return;
                            }
                        };
                        let mut conn = Connection::new(peer, connector);
                        match conn.run(stream).await {
                            Ok(()) => debug!("{} [{}]", conn.peer, conn.state),
                            Err(e) => warn!("{} [{}] {}", conn.peer, conn.state, e),
                        }
                    });
                }
                Err(e) => {
                    warn!("accept error: {}", e);
                }
            }
        }
    }
}

struct Connection {
    peer: SocketAddr,
    connector: Arc<dyn Connect>,
    state: State,
}

impl Connection {
    fn new(peer: SocketAddr, connector: Arc<dyn Connect>) -> Self {
        Self {
            peer,
            connector,
            state: State::Handshaking,
        }
    }

    /// Drives one client through the handshake and the relay. The client
    /// stream is owned here, so it is closed on every exit path.
    async fn run(&mut self, mut client: TcpStream) -> Result<()> {
        socks5::negotiate(&mut client).await?;
        socks5::reply_method(&mut client).await?;
        self.state = State::Negotiated;

        let destination = socks5::parse_request(&mut client).await?;
        socks5::reply_connect(&mut client).await?;
        self.state = State::RequestParsed;

        info!("CONNECT {} from {}", destination, self.peer);
        self.state = State::Connecting;
        let remote = self.connector.connect(&destination).await?;

        self.state = State::Relaying;
        let (up, down) = relay::relay(client, remote).await;
        self.state = State::Closed;
        debug!(
            "{} <-> {} closed, sent {} received {}",
            self.peer, destination, up, down
        );

        Ok(())
    }
}
