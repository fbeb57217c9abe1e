use actix_web::http::{header, StatusCode};
use actix_web::web::Data;
use actix_web::{test, App};
use chrono::FixedOffset;
use pitch_timer::api::configure;
use pitch_timer::api::state::AppState;
use pitch_timer::games::clock::ManualClock;
use pitch_timer::games::game_store::MemoryGameStore;
use pitch_timer::games::lifecycle::GameManager;
use pitch_timer::notify::asset_cache::AssetCache;
use pitch_timer::notify::message::WorkerMessage;
use pitch_timer::notify::scheduler::NotificationHandle;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tokio::sync::Mutex;

const T0: i64 = 1_792_143_000_000;

fn app_state() -> (Data<AppState>, Arc<ManualClock>, UnboundedReceiver<WorkerMessage>) {
    let clock = Arc::new(ManualClock::new(T0));
    let manager = GameManager::new(
        Arc::new(MemoryGameStore::new()),
        clock.clone(),
        FixedOffset::east_opt(5 * 3600).unwrap(),
    );
    let (sender, receiver) = unbounded_channel();
    let assets = AssetCache::new(std::env::temp_dir().join("pitch-timer-api-no-assets"));

    let state = AppState::new(
        Arc::new(Mutex::new(manager)),
        NotificationHandle::new(sender),
        Arc::new(assets),
    );

    (Data::new(state), clock, receiver)
}

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(App::new().app_data($state.clone()).configure(configure)).await
    };
}

macro_rules! create_game {
    ($app:expr, $body:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/v1/games")
            .set_json($body)
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let game: Value = test::read_body_json(resp).await;
        game["id"].as_str().unwrap().to_string()
    }};
}

#[actix_web::test]
async fn test_game_lifecycle_over_http() {
    let (state, clock, mut receiver) = app_state();
    let app = test_app!(state);

    let req = test::TestRequest::get()
        .uri("/api/v1/games/preview?mode=day&amount=40")
        .to_request();
    let preview: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(preview["preview"], "≈ 1 soat 0 daqiqa o'yin vaqti");

    let id = create_game!(app, json!({ "mode": "day", "teamName": "Navbahor", "amount": 40 }));

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/games/{id}/start"))
        .set_json(json!({ "extraMinutes": 0 }))
        .to_request();
    let game: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(game["status"], "running");
    assert_eq!(game["totalSeconds"], 3600);
    match receiver.try_recv().unwrap() {
        WorkerMessage::ScheduleNotify { ends_at, .. } => assert_eq!(ends_at, T0 + 3_600_000),
        other => panic!("unexpected message {:?}", other),
    }

    clock.advance_secs(3000);
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/timer?id={id}"))
        .to_request();
    let timer: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(timer["state"], "running");
    assert_eq!(timer["remaining"], 600);
    assert_eq!(timer["display"], "10:00");
    assert_eq!(timer["urgency"], "normal");

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/games/{id}/extend/preview?minutes=30"))
        .to_request();
    let cost: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(cost["cost"], "≈ +20 000 so'm qo'shimcha");

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/games/{id}/extend"))
        .set_json(json!({ "minutes": 10 }))
        .to_request();
    let game: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(game["totalSeconds"], 4200);
    assert_eq!(game["startTime"], T0);
    match receiver.try_recv().unwrap() {
        WorkerMessage::ScheduleNotify { ends_at, .. } => assert_eq!(ends_at, T0 + 4_200_000),
        other => panic!("unexpected message {:?}", other),
    }

    let req = test::TestRequest::get().uri("/api/v1/games/active").to_request();
    let board: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(board["runningCount"], 1);
    assert_eq!(board["running"][0]["amount"], "40 000 so'm");

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/games/{id}/stop"))
        .to_request();
    let record: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(record["reason"], "To'xtatildi (20:00 qoldi)");
    assert_eq!(receiver.try_recv().unwrap(), WorkerMessage::cancel(&id));

    let req = test::TestRequest::get()
        .uri("/api/v1/history?filter=day")
        .to_request();
    let history: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(history["records"].as_array().unwrap().len(), 1);
    assert_eq!(history["records"][0]["id"], id.as_str());
    assert_eq!(history["stats"]["totalGames"], 1);

    let req = test::TestRequest::get()
        .uri("/api/v1/history?filter=night")
        .to_request();
    let history: Value = test::call_and_read_body_json(&app, req).await;
    assert!(history["records"].as_array().unwrap().is_empty());

    let req = test::TestRequest::delete().uri("/api/v1/history").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get().uri("/api/v1/history").to_request();
    let history: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(history["stats"]["totalGames"], 0);
}

#[actix_web::test]
async fn test_timer_finishes_expired_game() {
    let (state, clock, mut receiver) = app_state();
    let app = test_app!(state);

    let id = create_game!(app, json!({ "mode": "night", "captain": "Aziz", "amount": 50 }));
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/games/{id}/start"))
        .to_request();
    let game: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(game["teamName"], "Aziz");
    assert_eq!(game["totalSeconds"], 1800);
    let _ = receiver.try_recv();

    clock.advance_secs(1800);
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/timer?id={id}"))
        .to_request();
    let outcome: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(outcome["state"], "finished");
    assert_eq!(outcome["reason"], "Vaqt tugadi!");
    assert_eq!(receiver.try_recv().unwrap(), WorkerMessage::cancel(&id));

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/timer?id={id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
}

#[actix_web::test]
async fn test_timer_without_game_redirects() {
    let (state, _, _) = app_state();
    let app = test_app!(state);

    for uri in ["/api/v1/timer", "/api/v1/timer?id=", "/api/v1/timer?id=g_missing"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/index.html");
    }
}

#[actix_web::test]
async fn test_invalid_transitions() {
    let (state, _, _) = app_state();
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/games")
        .set_json(json!({ "mode": "day", "amount": 0 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);

    let req = test::TestRequest::post()
        .uri("/api/v1/games/g_missing/start")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let id = create_game!(app, json!({ "mode": "day", "amount": 40 }));

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/games/{id}/stop"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let start = || {
        test::TestRequest::post()
            .uri(&format!("/api/v1/games/{id}/start"))
            .to_request()
    };
    let resp = test::call_service(&app, start()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = test::call_service(&app, start()).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/games/{id}/extend"))
        .set_json(json!({ "minutes": 0 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_calculator_endpoints() {
    let (state, _, _) = app_state();
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/calculator/evaluate")
        .set_json(json!({ "expression": "2+3*4" }))
        .to_request();
    let result: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(result["display"], "14");

    let req = test::TestRequest::post()
        .uri("/api/v1/calculator/evaluate")
        .set_json(json!({ "expression": "5/0" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    for key in ["1", "2", "+", "3"] {
        let req = test::TestRequest::post()
            .uri("/api/v1/calculator/input")
            .set_json(json!({ "key": key }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    let req = test::TestRequest::get().uri("/api/v1/calculator").to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view["expression"], "12+3");
    assert_eq!(view["preview"], "= 15");

    let req = test::TestRequest::post()
        .uri("/api/v1/calculator/input")
        .set_json(json!({ "key": "Enter" }))
        .to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view["display"], "15");

    let req = test::TestRequest::post()
        .uri("/api/v1/calculator/function")
        .set_json(json!({ "name": "sq" }))
        .to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view["display"], "225");

    let req = test::TestRequest::post()
        .uri("/api/v1/calculator/input")
        .set_json(json!({ "key": "%" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_theme_toggle() {
    let (state, _, _) = app_state();
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/api/v1/theme").to_request();
    let theme: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(theme["enabledStylesheet"], "link1");

    let req = test::TestRequest::post()
        .uri("/api/v1/theme/toggle")
        .set_json(json!({ "event": { "type": "key", "ctrl": true } }))
        .to_request();
    let result: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(result["toggled"], false);

    let req = test::TestRequest::post()
        .uri("/api/v1/theme/toggle")
        .set_json(json!({ "event": { "type": "click" } }))
        .to_request();
    let result: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(result["toggled"], true);
    assert_eq!(result["theme"]["enabledStylesheet"], "link2");
}

#[actix_web::test]
async fn test_notify_endpoints() {
    let (state, _, mut receiver) = app_state();
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/notify")
        .set_json(json!({ "type": "CANCEL_NOTIFY", "gameId": "g_1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    assert_eq!(receiver.try_recv().unwrap(), WorkerMessage::cancel("g_1"));

    let req = test::TestRequest::post()
        .uri("/api/v1/notify/click")
        .set_json(json!({ "action": "dismiss" }))
        .to_request();
    let click: Value = test::call_and_read_body_json(&app, req).await;
    assert!(click["open"].is_null());

    let req = test::TestRequest::post()
        .uri("/api/v1/notify/click")
        .set_json(json!({}))
        .to_request();
    let click: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(click["open"], "/index.html");
}

#[actix_web::test]
async fn test_unknown_paths_fall_back_to_assets() {
    let (state, _, _) = app_state();
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/nowhere.css").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post().uri("/nowhere.css").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}
