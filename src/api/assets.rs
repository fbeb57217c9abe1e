use crate::api::state::AppState;
use actix_web::http::Method;
use actix_web::web::Data;
use actix_web::{HttpRequest, HttpResponse};

/// Fallback for everything outside the API: cached app assets.
pub async fn serve_asset(req: HttpRequest, state: Data<AppState>) -> HttpResponse {
    if *req.method() != Method::GET {
        return HttpResponse::MethodNotAllowed().finish();
    }

    match state.assets.fetch(req.path()) {
        Some(asset) => HttpResponse::Ok()
            .content_type(asset.content_type)
            .body(asset.body),
        None => HttpResponse::NotFound().finish(),
    }
}
