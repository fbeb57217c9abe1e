use actix_web::web;

pub mod assets;
pub mod calculator_endpoints;
pub mod game_endpoints;
pub mod notify_endpoints;
pub mod requests;
pub mod state;
pub mod theme_endpoints;
pub mod timer_socket;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(game_endpoints::create_game)
            .service(game_endpoints::preview_game)
            .service(game_endpoints::active_games)
            .service(game_endpoints::timer)
            .service(game_endpoints::start_game)
            .service(game_endpoints::extend_game)
            .service(game_endpoints::extension_preview)
            .service(game_endpoints::stop_game)
            .service(game_endpoints::history)
            .service(game_endpoints::clear_history)
            .service(timer_socket::timer_socket)
            .service(calculator_endpoints::evaluate_expression)
            .service(calculator_endpoints::calculator_state)
            .service(calculator_endpoints::press_key)
            .service(calculator_endpoints::apply_function)
            .service(theme_endpoints::get_theme)
            .service(theme_endpoints::toggle_theme)
            .service(notify_endpoints::post_message)
            .service(notify_endpoints::notification_click),
    )
    .default_service(web::route().to(assets::serve_asset));
}
