use crate::session::{SessionExt, SessionView, Stage};
use tauri::AppHandle;
use tracing::warn;

#[tauri::command]
pub fn get_session(app: AppHandle) -> Result<SessionView, String> {
    let state = app.session().snapshot().map_err(|e| e.to_string())?;
    Ok(SessionView::from(state))
}

#[tauri::command]
pub fn submit_booth(app: AppHandle, booth_number: String) -> Result<SessionView, String> {
    let state = app
        .session()
        .submit_booth(&booth_number)
        .map_err(|e| e.to_string())?;
    Ok(SessionView::from(state))
}

#[tauri::command]
pub async fn open_orders(app: AppHandle) -> Result<SessionView, String> {
    let state = app
        .session()
        .open_view(Stage::Orders)
        .await
        .map_err(|e| e.to_string())?;
    Ok(SessionView::from(state))
}

#[tauri::command]
pub async fn open_checklist(app: AppHandle) -> Result<SessionView, String> {
    let state = app
        .session()
        .open_view(Stage::Checklist)
        .await
        .map_err(|e| e.to_string())?;
    Ok(SessionView::from(state))
}

#[tauri::command]
pub fn go_back(app: AppHandle) -> Result<SessionView, String> {
    let state = app.session().go_back().map_err(|e| e.to_string())?;
    Ok(SessionView::from(state))
}

/// Force-refresh the active view. Returns the unchanged session when a
/// fetch is already running.
#[tauri::command]
pub async fn refresh(app: AppHandle) -> Result<SessionView, String> {
    let state = app
        .session()
        .refresh()
        .await
        .map_err(|e| e.to_string())?;
    Ok(SessionView::from(state))
}

/// Run the intro sequence in the background; the frontend follows it
/// through session update events.
pub fn start_intro(app: AppHandle) {
    tauri::async_runtime::spawn(async move {
        if let Err(e) = app.session().play_intro().await {
            warn!(error = %e, "intro sequence aborted");
        }
    });
}
