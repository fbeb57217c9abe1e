use crate::api::requests::{HistoryQuery, MinutesRequest, PreviewQuery, StartRequest, TimerQuery};
use crate::api::state::AppState;
use crate::errors::{GameError, Result};
use crate::games::lifecycle::{GameManager, NewGame, TickOutcome};
use crate::notify::message::WorkerMessage;
use crate::notify::notification::APP_ENTRY;
use actix_web::http::header;
use actix_web::web::{Data, Json, Path, Query};
use actix_web::{delete, get, post, HttpResponse, Responder};
use log::debug;
use serde_json::json;

#[post("/games")]
pub async fn create_game(state: Data<AppState>, body: Json<NewGame>) -> Result<impl Responder> {
    let manager = state.games.lock().await;
    let game = manager.create(body.into_inner())?;

    Ok(HttpResponse::Created().json(game))
}

#[get("/games/preview")]
pub async fn preview_game(query: Query<PreviewQuery>) -> impl Responder {
    Json(json!({ "preview": GameManager::preview(query.mode, query.amount) }))
}

#[get("/games/active")]
pub async fn active_games(state: Data<AppState>) -> impl Responder {
    Json(state.games.lock().await.active_board())
}

fn back_to_app() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, APP_ENTRY))
        .finish()
}

/// Timer page poll. Unknown games send the browser back to the app.
#[get("/timer")]
pub async fn timer(state: Data<AppState>, query: Query<TimerQuery>) -> Result<HttpResponse> {
    let id = match &query.id {
        Some(id) if !id.is_empty() => id,
        _ => return Ok(back_to_app()),
    };

    let outcome = state.games.lock().await.tick(id);
    match outcome {
        Ok(outcome) => {
            if let TickOutcome::Finished(record) = &outcome {
                state.notifications.send(WorkerMessage::cancel(&record.id));
            }
            Ok(HttpResponse::Ok().json(outcome))
        }
        Err(GameError::NotFound(_)) => {
            debug!("Timer requested for unknown game {}", id);
            Ok(back_to_app())
        }
        Err(e) => Err(e),
    }
}

#[post("/games/{id}/start")]
pub async fn start_game(
    state: Data<AppState>,
    id: Path<String>,
    body: Option<Json<StartRequest>>,
) -> Result<impl Responder> {
    let extra_minutes = body.map(|x| x.extra_minutes).unwrap_or_default();
    let game = state.games.lock().await.start(&id, extra_minutes)?;

    if let Some(message) = WorkerMessage::schedule(&game) {
        state.notifications.send(message);
    }

    Ok(Json(game))
}

#[post("/games/{id}/extend")]
pub async fn extend_game(
    state: Data<AppState>,
    id: Path<String>,
    body: Json<MinutesRequest>,
) -> Result<impl Responder> {
    let game = state.games.lock().await.extend(&id, body.minutes)?;

    if let Some(message) = WorkerMessage::schedule(&game) {
        state.notifications.send(message);
    }

    Ok(Json(game))
}

#[get("/games/{id}/extend/preview")]
pub async fn extension_preview(
    state: Data<AppState>,
    id: Path<String>,
    query: Query<MinutesRequest>,
) -> Result<impl Responder> {
    let cost = state
        .games
        .lock()
        .await
        .extension_preview(&id, query.minutes)?;

    Ok(Json(json!({ "cost": cost })))
}

#[post("/games/{id}/stop")]
pub async fn stop_game(state: Data<AppState>, id: Path<String>) -> Result<impl Responder> {
    let record = state.games.lock().await.stop(&id)?;
    state.notifications.send(WorkerMessage::cancel(&record.id));

    Ok(Json(record))
}

#[get("/history")]
pub async fn history(state: Data<AppState>, query: Query<HistoryQuery>) -> impl Responder {
    Json(state.games.lock().await.history(query.filter))
}

#[delete("/history")]
pub async fn clear_history(state: Data<AppState>) -> Result<HttpResponse> {
    state.games.lock().await.clear_history()?;

    Ok(HttpResponse::NoContent().finish())
}
