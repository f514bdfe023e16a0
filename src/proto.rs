use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use crate::error::{Error, Result};

pub const VER: u8 = 5;
pub const NO_AUTH: u8 = 0;

pub const CMD_CONNECT: u8 = 1;
pub const CMD_BIND: u8 = 2;
pub const CMD_UDP_ASSOCIATE: u8 = 3;

pub const ATYP_IPV4: u8 = 1;
pub const ATYP_DOMAIN: u8 = 3;
pub const ATYP_IPV6: u8 = 4;

pub const RSV: u8 = 0;
pub const REP_SUCCESS: u8 = 0;

pub const METHOD_REPLY: [u8; 2] = [VER, NO_AUTH];

/// Always reports success with a zeroed IPv4 bound address.
pub const CONNECT_REPLY: [u8; 10] = [VER, REP_SUCCESS, RSV, ATYP_IPV4, 0, 0, 0, 0, 0, 0];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Host {
    Ipv4(Ipv4Addr),
    Domain(String),
    Ipv6(Ipv6Addr),
}

impl Host {
    /// Decodes the address bytes of a request. For `ATYP_DOMAIN`, `raw`
    /// starts with the length byte.
    pub fn decode(atyp: u8, raw: &[u8]) -> Result<Self> {
        match atyp {
            ATYP_IPV4 => {
                let octets: [u8; 4] = raw
                    .try_into()
                    .map_err(|_| Error::Address("IPv4 address must be 4 bytes"))?;
                Ok(Host::Ipv4(Ipv4Addr::from(octets)))
            }
            ATYP_DOMAIN => {
                let (len, name) = raw
                    .split_first()
                    .ok_or(Error::Address("missing domain length"))?;
                if name.len() != *len as usize {
                    return Err(Error::Address("domain length mismatch"));
                }
                let name = String::from_utf8(name.to_vec())
                    .map_err(|_| Error::Address("domain is not utf-8"))?;
                Ok(Host::Domain(name))
            }
            ATYP_IPV6 => {
                let octets: [u8; 16] = raw
                    .try_into()
                    .map_err(|_| Error::Address("IPv6 address must be 16 bytes"))?;
                Ok(Host::Ipv6(Ipv6Addr::from(octets)))
            }
            _ => Err(Error::Address("unsupported address type")),
        }
    }

    pub fn atyp(&self) -> u8 {
        match self {
            Host::Ipv4(_) => ATYP_IPV4,
            Host::Domain(_) => ATYP_DOMAIN,
            Host::Ipv6(_) => ATYP_IPV6,
        }
    }

    pub fn encode(&self, buf: &mut Vec<u8>) -> Result<()> {
        buf.push(self.atyp());
        match self {
            Host::Ipv4(ip) => buf.extend_from_slice(&ip.octets()),
            Host::Ipv6(ip) => buf.extend_from_slice(&ip.octets()),
            Host::Domain(name) => {
                let len: u8 = name
                    .len()
                    .try_into()
                    .map_err(|_| Error::Address("domain longer than 255 bytes"))?;
                buf.push(len);
                buf.extend_from_slice(name.as_bytes());
            }
        }
        Ok(())
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Host::Ipv4(ip) => fmt::Display::fmt(ip, f),
            Host::Domain(name) => f.write_str(name),
            Host::Ipv6(ip) => fmt::Display::fmt(ip, f),
        }
    }
}

/// Target of a CONNECT request, printed as `host:port`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub host: Host,
    pub port: u16,
}

impl Destination {
    pub fn new(host: Host, port: u16) -> Self {
        Self { host, port }
    }

    /// `raw` is the address bytes followed by the two port bytes.
    pub fn decode(atyp: u8, raw: &[u8]) -> Result<Self> {
        if raw.len() < 2 {
            return Err(Error::Address("missing port"));
        }
        let (addr, port) = raw.split_at(raw.len() - 2);
        let host = Host::decode(atyp, addr)?;
        Ok(Self::new(host, port_from_bytes([port[0], port[1]])))
    }

    /// Writes `ATYP | ADDR | PORT`.
    pub fn encode(&self, buf: &mut Vec<u8>) -> Result<()> {
        self.host.encode(buf)?;
        buf.extend_from_slice(&self.port.to_be_bytes());
        Ok(())
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[inline]
pub fn port_from_bytes(bytes: [u8; 2]) -> u16 {
    u16::from_be_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn decode_ipv4() {
        let dest = Destination::decode(ATYP_IPV4, &[127, 0, 0, 1, 0, 80]).unwrap();
        assert_eq!(dest.to_string(), "127.0.0.1:80");

        let dest = Destination::decode(ATYP_IPV4, &[10, 1, 2, 254, 0x1f, 0x90]).unwrap();
        assert_eq!(dest.to_string(), "10.1.2.254:8080");
    }

    #[test]
    fn decode_domain_keeps_name_bytes() {
        let mut raw = vec![11];
        raw.extend_from_slice(b"Example.COM");
        raw.extend_from_slice(&[0x01, 0xbb]);

        let dest = Destination::decode(ATYP_DOMAIN, &raw).unwrap();
        assert_eq!(dest.host, Host::Domain("Example.COM".to_string()));
        assert_eq!(dest.to_string(), "Example.COM:443");
    }

    #[test]
    fn decode_ipv6() {
        let mut raw = [0u8; 18];
        raw[15] = 1;
        raw[17] = 22;
        let dest = Destination::decode(ATYP_IPV6, &raw).unwrap();
        assert_eq!(dest.to_string(), "::1:22");

        let mut raw = vec![0x20, 0x01, 0x0d, 0xb8];
        raw.extend_from_slice(&[0; 11]);
        raw.push(0x42);
        raw.extend_from_slice(&[0x00, 0x50]);
        let dest = Destination::decode(ATYP_IPV6, &raw).unwrap();
        assert_eq!(dest.to_string(), "2001:db8::42:80");
    }

    #[test]
    fn decode_rejects_bad_input() {
        let err = Host::decode(0x02, &[1, 2, 3, 4]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Protocol);

        let err = Host::decode(ATYP_IPV4, &[1, 2, 3]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Protocol);

        let err = Host::decode(ATYP_DOMAIN, &[5, b'a', b'b']).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Protocol);

        let err = Destination::decode(ATYP_IPV4, &[0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Protocol);
    }

    #[test]
    fn port_is_big_endian() {
        assert_eq!(port_from_bytes([0x00, 0x50]), 80);
        assert_eq!(port_from_bytes([0x23, 0x28]), 9000);
        assert_eq!(port_from_bytes([0xff, 0xff]), 65535);
    }

    #[test]
    fn encode_domain() {
        let dest = Destination::new(Host::Domain("a.io".to_string()), 443);
        let mut buf = Vec::new();
        dest.encode(&mut buf).unwrap();
        assert_eq!(buf, [ATYP_DOMAIN, 4, b'a', b'.', b'i', b'o', 0x01, 0xbb]);

        let long = Destination::new(Host::Domain("x".repeat(256)), 1);
        assert!(long.encode(&mut Vec::new()).is_err());
    }
}
