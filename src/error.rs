use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Where in the exchange a bad version byte was seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Greeting,
    Request,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Greeting => f.write_str("greeting"),
            Stage::Request => f.write_str("request"),
        }
    }
}

/// Closed classification of every failure a connection can hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Version,
    MethodCount,
    MethodUnsupported,
    Command,
    Protocol,
    Io,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("socks5: unsupported version {actual} in {stage}")]
    Version { stage: Stage, actual: u8 },

    #[error("socks5: no authentication method offered")]
    MethodCount,

    #[error("socks5: NO AUTH not among offered methods {offered:?}")]
    MethodUnsupported { offered: Vec<u8> },

    #[error("socks5: unsupported CMD {0:#04x}")]
    Command(u8),

    #[error("socks5: unsupported addr type {0:#04x}")]
    AddressType(u8),

    #[error("socks5: reserved byte is {0:#04x}, expected 0x00")]
    Reserved(u8),

    #[error("socks5: malformed address: {0}")]
    Address(&'static str),

    #[error("socks5: connect {destination} failed: {source}")]
    Connect {
        destination: String,
        #[source]
        source: std::io::Error,
    },

    #[error("socks5: io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Version { .. } => ErrorKind::Version,
            Error::MethodCount => ErrorKind::MethodCount,
            Error::MethodUnsupported { .. } => ErrorKind::MethodUnsupported,
            // An unknown address type in a request is rejected like an unknown command.
            Error::Command(_) | Error::AddressType(_) => ErrorKind::Command,
            Error::Reserved(_) | Error::Address(_) => ErrorKind::Protocol,
            Error::Connect { .. } | Error::Io(_) => ErrorKind::Io,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        assert_eq!(Error::from(io).kind(), ErrorKind::Io);
        assert_eq!(Error::AddressType(9).kind(), ErrorKind::Command);
        assert_eq!(Error::Reserved(1).kind(), ErrorKind::Protocol);
        assert_eq!(
            Error::Version {
                stage: Stage::Request,
                actual: 4
            }
            .to_string(),
            "socks5: unsupported version 4 in request"
        );
    }
}
