use log::debug;
use tokio::io::{split, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::watch;

pub const RELAY_BUFFER_SIZE: usize = 1024;

/// Copies bytes both ways until either direction ends, then shuts down and
/// drops both streams. Returns the bytes copied client to remote and remote
/// to client.
pub async fn relay<C, R>(client: C, remote: R) -> (u64, u64)
where
    C: AsyncRead + AsyncWrite + Unpin,
    R: AsyncRead + AsyncWrite + Unpin,
{
    let (client_reader, client_writer) = split(client);
    let (remote_reader, remote_writer) = split(remote);

    let (closed_tx, closed_rx) = watch::channel(false);

    let up = pump(
        "client->remote",
        client_reader,
        remote_writer,
        &closed_tx,
        closed_rx.clone(),
    );
    let down = pump(
        "remote->client",
        remote_reader,
        client_writer,
        &closed_tx,
        closed_rx,
    );

    futures::join!(up, down)
}

async fn pump<R, W>(
    direction: &'static str,
    mut reader: R,
    mut writer: W,
    close: &watch::Sender<bool>,
    mut closed: watch::Receiver<bool>,
) -> u64
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = [0u8; RELAY_BUFFER_SIZE];
    let mut total = 0u64;

    'relay: loop {
        let n = tokio::select! {
            res = reader.read(&mut buf) => match res {
                Ok(0) => {
                    debug!("{} eof", direction);
                    break;
                }
                Ok(n) => n,
                Err(e) => {
                    debug!("{} read error: {}", direction, e);
                    break;
                }
            },
            _ = closed.changed() => break,
        };

        // Partial writes count toward the total even if the rest is abandoned.
        let mut written = 0;
        while written < n {
            tokio::select! {
                res = writer.write(&buf[written..n]) => match res {
                    Ok(0) => {
                        debug!("{} write zero", direction);
                        break 'relay;
                    }
                    Ok(m) => {
                        written += m;
                        total += m as u64;
                    }
                    Err(e) => {
                        debug!("{} write error: {}", direction, e);
                        break 'relay;
                    }
                },
                _ = closed.changed() => break 'relay,
            }
        }
    }

    // Wake the other direction even if it is parked on a silent peer.
    let _ = close.send(true);
    let _ = writer.shutdown().await;
    debug!("{} done, {} bytes", direction, total);
    total
}
