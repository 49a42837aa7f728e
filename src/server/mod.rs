mod api_routes;
pub mod config;
mod http_layers;
pub mod server;
pub mod session;
pub mod state;
mod ui_routes;

pub use config::ServerConfig;
pub use http_layers::*;
pub use server::{make_app, run_server};
pub use session::COOKIE_SESSION_KEY;
