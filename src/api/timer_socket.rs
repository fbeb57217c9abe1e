use crate::api::state::AppState;
use crate::games::lifecycle::TickOutcome;
use crate::notify::message::WorkerMessage;
use actix_web::web::{Data, Path, Payload};
use actix_web::{get, HttpRequest, Responder};
use actix_ws::{Message, MessageStream, Session};
use log::{error, info};
use std::time::Duration;

pub const SNAPSHOT_PERIOD: Duration = Duration::from_millis(500);

#[get("/games/{id}/ws")]
pub async fn timer_socket(
    req: HttpRequest,
    id: Path<String>,
    state: Data<AppState>,
    body: Payload,
) -> actix_web::Result<impl Responder> {
    let (response, session, msg_stream) = actix_ws::handle(&req, body)?;

    info!("Timer socket opened for game {}", id);
    actix_web::rt::spawn(push_snapshots(id.into_inner(), state, session, msg_stream));

    Ok(response)
}

/// Sends a tick outcome every period until the game is gone or finished.
async fn push_snapshots(
    id: String,
    state: Data<AppState>,
    mut session: Session,
    mut msg_stream: MessageStream,
) {
    let mut interval = tokio::time::interval(SNAPSHOT_PERIOD);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let outcome = state.games.lock().await.tick(&id);

                let outcome = match outcome {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        let _ = session.text(e.to_string()).await;
                        break;
                    }
                };

                let finished = matches!(outcome, TickOutcome::Finished(_));
                if finished {
                    state.notifications.send(WorkerMessage::cancel(&id));
                }

                match serde_json::to_string(&outcome) {
                    Ok(json) => {
                        if session.text(json).await.is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        error!("Failed to serialize timer for {}: {}", id, e);
                        break;
                    }
                }

                if finished {
                    break;
                }
            }
            msg = msg_stream.recv() => {
                match msg {
                    Some(Ok(Message::Ping(bytes))) => {
                        if session.pong(&bytes).await.is_err() {
                            return;
                        }
                    }
                    Some(Ok(Message::Text(_))) | Some(Ok(Message::Pong(_))) => {}
                    _ => break,
                }
            }
        }
    }

    info!("Timer socket closed for game {}", id);
    let _ = session.close(None).await;
}
