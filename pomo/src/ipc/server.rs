//! Unix domain socket server for IPC
//!
//! One newline-terminated JSON command per connection; the reply is a
//! single JSON response and the connection closes. `pomoctl` is the
//! expected client, but anything that speaks the protocol works.

use anyhow::Result;
use pomo_ipc::{Command, Response, SOCKET_PATH};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tracing::{error, info};

use crate::timer::TimerSession;

pub async fn serve(session: TimerSession) -> Result<()> {
    serve_at(std::path::PathBuf::from(SOCKET_PATH), session).await
}

async fn serve_at(path: std::path::PathBuf, session: TimerSession) -> Result<()> {
    // Remove old socket if it exists
    let _ = std::fs::remove_file(&path);

    let listener = UnixListener::bind(&path)?;
    info!("IPC server listening on {}", path.display());

    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let session = session.clone();
                tokio::spawn(async move {
                    if let Err(e) = handle_client(stream, session).await {
                        error!("Error handling client: {}", e);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {}", e);
            }
        }
    }
}

async fn handle_client(stream: UnixStream, session: TimerSession) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();
    reader.read_line(&mut line).await?;

    let response = match serde_json::from_str::<Command>(&line) {
        Ok(command) => dispatch(command, &session).await,
        Err(e) => Response::Error(format!("bad command: {}", e)),
    };

    let response_json = serde_json::to_vec(&response)?;
    writer.write_all(&response_json).await?;
    writer.write_all(b"\n").await?;
    Ok(())
}

async fn dispatch(command: Command, session: &TimerSession) -> Response {
    match command {
        Command::Start => {
            session.start().await;
            Response::Ok
        }
        Command::Pause => {
            session.pause().await;
            Response::Ok
        }
        Command::Reset => {
            session.reset().await;
            Response::Ok
        }
        Command::ResetCycle => {
            session.reset_cycle().await;
            Response::Ok
        }
        Command::Skip => {
            session.skip().await;
            Response::Ok
        }
        Command::Status => Response::Status(session.snapshot().await),
        Command::Stats => Response::Stats(session.stats().await),
        Command::ClearStats => {
            session.clear_stats().await;
            Response::Ok
        }
        Command::UpdateSettings(patch) => {
            if patch.is_empty() {
                Response::Error("nothing to update".to_string())
            } else {
                session.update_settings(patch).await;
                Response::Ok
            }
        }
    }
}
