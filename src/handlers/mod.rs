pub mod rest;
pub mod ws;

pub use rest::{pool_handler, roll_handler};
pub use ws::websocket_handler;
