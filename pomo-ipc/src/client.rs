//! One-shot request helper for talking to a running pomo instance.

use std::io::ErrorKind;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;

use crate::{Command, IpcError, Response, SOCKET_PATH};

/// Send a single command and wait for the response.
///
/// The server answers one command per connection and closes the stream
/// after writing, so the response is read to EOF.
pub async fn send(command: Command) -> Result<Response, IpcError> {
    let mut stream = match UnixStream::connect(SOCKET_PATH).await {
        Ok(stream) => stream,
        Err(err) if matches!(err.kind(), ErrorKind::ConnectionRefused | ErrorKind::NotFound) => {
            return Err(IpcError::ConnectionRefused);
        }
        Err(err) => return Err(IpcError::Io(err)),
    };

    let msg = serde_json::to_vec(&command)?;
    stream.write_all(&msg).await?;
    stream.write_all(b"\n").await?;

    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await?;
    let response = serde_json::from_slice(&buf)?;

    Ok(response)
}
