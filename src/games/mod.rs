pub mod clock;
pub mod format;
pub mod game;
pub mod game_store;
pub mod game_ticker;
pub mod lifecycle;
pub mod rates;
