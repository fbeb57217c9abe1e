pub mod asset_cache;
pub mod message;
pub mod notification;
pub mod scheduler;
