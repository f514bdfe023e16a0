use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{Error, Result, Stage};
use crate::proto::*;

/// Reads the greeting and checks that NO AUTH is offered. The method reply is
/// left to the caller.
pub async fn negotiate<S>(stream: &mut S) -> Result<()>
where
    S: AsyncRead + Unpin,
{
    let mut buf = [0u8; 2];
    stream.read_exact(&mut buf).await?;

    if buf[0] != VER {
        return Err(Error::Version {
            stage: Stage::Greeting,
            actual: buf[0],
        });
    }
    if buf[1] == 0 {
        return Err(Error::MethodCount);
    }

    let mut methods = vec![0u8; buf[1] as usize];
    stream.read_exact(&mut methods).await?;
    if !methods.contains(&NO_AUTH) {
        return Err(Error::MethodUnsupported { offered: methods });
    }

    Ok(())
}

pub async fn reply_method<S>(stream: &mut S) -> std::io::Result<()>
where
    S: AsyncWrite + Unpin,
{
    stream.write_all(&METHOD_REPLY).await
}

/// Reads a CONNECT request and returns its destination.
pub async fn parse_request<S>(stream: &mut S) -> Result<Destination>
where
    S: AsyncRead + Unpin,
{
    // VER CMD RSV ATYP and the first address byte, which is the length for domains.
    let mut req = [0u8; 5];
    stream.read_exact(&mut req).await?;

    if req[0] != VER {
        return Err(Error::Version {
            stage: Stage::Request,
            actual: req[0],
        });
    }
    if req[1] != CMD_CONNECT {
        return Err(Error::Command(req[1]));
    }
    if req[2] != RSV {
        return Err(Error::Reserved(req[2]));
    }

    let atyp = req[3];
    let remaining = match atyp {
        ATYP_IPV4 => 4 - 1 + 2,
        ATYP_DOMAIN => req[4] as usize + 2,
        ATYP_IPV6 => 16 - 1 + 2,
        t => return Err(Error::AddressType(t)),
    };

    let mut raw = Vec::with_capacity(1 + remaining);
    raw.push(req[4]);
    raw.resize(1 + remaining, 0);
    stream.read_exact(&mut raw[1..]).await?;

    Destination::decode(atyp, &raw)
}

pub async fn reply_connect<S>(stream: &mut S) -> std::io::Result<()>
where
    S: AsyncWrite + Unpin,
{
    stream.write_all(&CONNECT_REPLY).await
}
