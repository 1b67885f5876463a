mod catalog;
mod commands;
mod config;
mod fallback;
mod gateway;
mod identity;
mod models;
mod notifications;
mod session;
mod wire;

#[cfg(test)]
mod tests;

use config::AppConfig;
use gateway::DataGateway;
use session::SessionController;
use tauri::{Emitter, Manager};
use tracing::{info, warn};

/// Event carrying a `SessionView` after every session change.
pub const SESSION_UPDATED_EVENT: &str = "session://updated";

fn init_tracing(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    init_tracing(&config.log_level);
    if let Some(e) = config_error {
        warn!(error = %e, "invalid configuration, using defaults");
    }

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(move |app| {
            info!(base_url = %config.api.base_url, "connecting to booth service");
            let gateway = DataGateway::http(&config.api)?;

            let handle = app.handle().clone();
            let controller = SessionController::new(gateway).with_observer(move |state| {
                let view = session::SessionView::from(state.clone());
                if let Err(e) = handle.emit(SESSION_UPDATED_EVENT, &view) {
                    warn!(error = %e, "failed to publish session update");
                }
            });
            app.manage(controller);

            commands::session::start_intro(app.handle().clone());
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Session
            commands::session::get_session,
            commands::session::submit_booth,
            commands::session::open_orders,
            commands::session::open_checklist,
            commands::session::go_back,
            commands::session::refresh,
            // Lookups
            commands::lookup::describe_status,
            commands::lookup::status_catalog,
            commands::lookup::derive_identity,
            commands::lookup::check_service_health,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
