//! Entry point for the WASM application

use cloudstore_frontend::{App, Config};
use leptos::*;

pub fn main() {
    console_error_panic_hook::set_once();
    _ = console_log::init_with_level(log::Level::Debug);

    log::info!("☁️ Cloud Storage - Starting uploader");

    // Host name is read once here, everything below gets the value
    let config = Config::from_window();
    log::info!("🔗 Backend: {}", config.backend_url);

    mount_to_body(move || view! { <App config=config/> })
}
