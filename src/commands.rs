use std::sync::Arc;

use serde_json::Value;
use tauri::AppHandle;

use crate::desktop::{self, Desktop};
use crate::lifecycle::Outcome;
use crate::menu::MenuEntry;

fn busy_to_err(outcome: Outcome) -> Result<(), String> {
    match outcome {
        Outcome::Busy => Err("Another model operation is in progress".to_string()),
        // Everything else has been logged by the lifecycle
        _ => Ok(()),
    }
}

// ============================================================================
// Model Commands
// ============================================================================

#[tauri::command]
pub async fn model_saved(
    app: AppHandle,
    desktop_state: tauri::State<'_, Arc<Desktop>>,
    model_data: Value,
    file_name: Option<String>,
) -> Result<(), String> {
    log::debug!("model_saved: file_name={:?}", file_name);

    let desktop = desktop_state.inner().clone();
    let outcome = desktop.lifecycle.model_saved(model_data, file_name).await;

    // A first save adds to the recent documents menu
    desktop::refresh_menu(&app);
    busy_to_err(outcome)
}

#[tauri::command]
pub fn model_closed(desktop_state: tauri::State<'_, Arc<Desktop>>) {
    log::debug!("model_closed");
    desktop_state.lifecycle.model_closed();
}

#[tauri::command]
pub fn model_opened(desktop_state: tauri::State<'_, Arc<Desktop>>) {
    log::debug!("model_opened");
    desktop_state.lifecycle.model_opened();
}

// ============================================================================
// Locale Commands
// ============================================================================

#[tauri::command]
pub fn set_locale(
    app: AppHandle,
    desktop_state: tauri::State<'_, Arc<Desktop>>,
    locale: String,
) -> Result<String, String> {
    let locale = desktop_state
        .lifecycle
        .set_locale(&locale)
        .map_err(|e| e.to_string())?;

    // Labels are baked into the menu when it is built
    desktop::refresh_menu(&app);
    Ok(locale.code().to_string())
}

#[tauri::command]
pub fn get_menu_template(desktop_state: tauri::State<'_, Arc<Desktop>>) -> Vec<MenuEntry> {
    desktop_state.template()
}
