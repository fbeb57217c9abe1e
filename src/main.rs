use actix_web::middleware::Logger;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use log::info;
use pitch_timer::api;
use pitch_timer::api::state::AppState;
use pitch_timer::config::Config;
use pitch_timer::games::clock::SystemClock;
use pitch_timer::games::game_store::FlatFileGameStore;
use pitch_timer::games::game_ticker::{GameTicker, TICK_PERIOD};
use pitch_timer::games::lifecycle::GameManager;
use pitch_timer::notify::asset_cache::AssetCache;
use pitch_timer::notify::notification::LogNotifier;
use pitch_timer::notify::scheduler::NotificationWorker;
use std::io::Error;
use std::io::ErrorKind::Other;
use std::sync::Arc;
use tokio::sync::Mutex;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info,actix_web=debug"))
        .init();

    let config = Config::from_env().map_err(|x| Error::new(Other, x))?;
    let offset = config.offset().map_err(|x| Error::new(Other, x))?;

    let clock = Arc::new(SystemClock);
    let store = Arc::new(FlatFileGameStore::new(&config.data_dir));
    let games = Arc::new(Mutex::new(GameManager::new(store, clock.clone(), offset)));

    let (notifications, _worker) =
        NotificationWorker::new(Arc::new(LogNotifier), clock).spawn();
    let _ticker = GameTicker::spawn(&games, notifications.clone(), TICK_PERIOD);

    let mut assets = AssetCache::new(&config.static_dir);
    assets.install();
    assets.activate();

    let state = Data::new(AppState::new(games, notifications, Arc::new(assets)));

    info!("Listening on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(api::configure)
    })
    .workers(config.workers)
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
