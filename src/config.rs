use std::net::{Ipv4Addr, SocketAddr};

use clap::Parser;

pub const DEFAULT_PORT: u16 = 9000;

/// SOCKS5 CONNECT proxy with no authentication.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Listen port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,
}

impl Config {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_port() {
        let config = Config::try_parse_from(["socks5d"]).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.listen_addr().to_string(), "0.0.0.0:9000");
    }

    #[test]
    fn port_flag() {
        let config = Config::try_parse_from(["socks5d", "--port", "1080"]).unwrap();
        assert_eq!(config.port, 1080);

        let config = Config::try_parse_from(["socks5d", "-p", "7000"]).unwrap();
        assert_eq!(config.listen_addr().port(), 7000);

        assert!(Config::try_parse_from(["socks5d", "--port", "70000"]).is_err());
        assert!(Config::try_parse_from(["socks5d", "--host", "x"]).is_err());
    }
}
