use crate::api::requests::{EvaluateRequest, FunctionRequest, KeyRequest};
use crate::api::state::AppState;
use crate::calculator::format::format_result;
use crate::calculator::parser::{evaluate, CalcError};
use actix_web::web::{Data, Json};
use actix_web::{get, post, Responder};
use serde_json::json;
use std::time::Instant;

#[post("/calculator/evaluate")]
pub async fn evaluate_expression(body: Json<EvaluateRequest>) -> Result<impl Responder, CalcError> {
    let value = evaluate(&body.expression)?;

    Ok(Json(json!({
        "value": value,
        "display": format_result(value),
    })))
}

#[get("/calculator")]
pub async fn calculator_state(state: Data<AppState>) -> impl Responder {
    Json(state.calculator.lock().await.view(Instant::now()))
}

#[post("/calculator/input")]
pub async fn press_key(
    state: Data<AppState>,
    body: Json<KeyRequest>,
) -> Result<impl Responder, CalcError> {
    let now = Instant::now();
    let mut calculator = state.calculator.lock().await;
    calculator.press(&body.key, now)?;

    Ok(Json(calculator.view(now)))
}

#[post("/calculator/function")]
pub async fn apply_function(
    state: Data<AppState>,
    body: Json<FunctionRequest>,
) -> Result<impl Responder, CalcError> {
    let now = Instant::now();
    let mut calculator = state.calculator.lock().await;
    calculator.apply_function(&body.name, now)?;

    Ok(Json(calculator.view(now)))
}
