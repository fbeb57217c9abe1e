use crate::api::requests::ClickRequest;
use crate::api::state::AppState;
use crate::notify::message::WorkerMessage;
use crate::notify::notification::click_target;
use actix_web::web::{Data, Json};
use actix_web::{post, HttpResponse, Responder};
use serde_json::json;

/// Raw worker message, as a page would post it.
#[post("/notify")]
pub async fn post_message(state: Data<AppState>, body: Json<WorkerMessage>) -> HttpResponse {
    state.notifications.send(body.into_inner());

    HttpResponse::Accepted().finish()
}

#[post("/notify/click")]
pub async fn notification_click(body: Json<ClickRequest>) -> impl Responder {
    Json(json!({ "open": click_target(body.action.as_deref()) }))
}
