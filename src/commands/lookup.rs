use crate::catalog::{OrderStatusDescriptor, StatusCatalog};
use crate::identity::BoothIdentity;
use crate::models::ServiceHealth;
use crate::session::SessionExt;
use tauri::AppHandle;

#[tauri::command]
pub fn describe_status(code: String) -> OrderStatusDescriptor {
    StatusCatalog::describe(&code).clone()
}

#[tauri::command]
pub fn status_catalog() -> Vec<OrderStatusDescriptor> {
    StatusCatalog::all().into_iter().cloned().collect()
}

#[tauri::command]
pub fn derive_identity(exhibitor_name: String, booth_number: String) -> BoothIdentity {
    BoothIdentity::derive(&exhibitor_name, &booth_number)
}

#[tauri::command]
pub async fn check_service_health(app: AppHandle) -> Result<ServiceHealth, String> {
    Ok(app.session().gateway().check_health().await)
}
