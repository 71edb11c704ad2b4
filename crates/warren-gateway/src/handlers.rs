mod health;
mod url;
mod ws;

pub use health::health_handler;
pub use url::{create_url_handler, get_url_handler};
pub use ws::ws_handler;
