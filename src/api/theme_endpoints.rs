use crate::api::requests::ToggleRequest;
use crate::api::state::AppState;
use actix_web::web::{Data, Json};
use actix_web::{get, post, Responder};
use log::debug;
use serde_json::json;

#[get("/theme")]
pub async fn get_theme(state: Data<AppState>) -> impl Responder {
    Json(state.theme.lock().await.state())
}

#[post("/theme/toggle")]
pub async fn toggle_theme(state: Data<AppState>, body: Json<ToggleRequest>) -> impl Responder {
    let mut theme = state.theme.lock().await;
    let toggled = theme.handle(body.event);
    debug!("Theme event {:?}, toggled: {}", body.event, toggled);

    Json(json!({
        "toggled": toggled,
        "theme": theme.state(),
    }))
}
