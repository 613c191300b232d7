mod commands;
pub mod config;
pub mod desktop;
pub mod dialog;
pub mod error;
pub mod host;
pub mod lifecycle;
pub mod locale;
pub mod menu;
pub mod recent;
pub mod state;
pub mod storage;

use std::sync::Arc;

pub use config::DesktopConfig;
pub use dialog::{DialogError, DialogFilter, DialogOutcome, FileDialog, OpenDialogOptions, SaveDialogOptions};
pub use error::LifecycleError;
pub use host::{ExternalLinks, Renderer};
pub use lifecycle::{LifecycleSettings, ModelLifecycle, Outcome};
pub use locale::{Locale, LocaleContext, Messages, UnknownLocale};
pub use menu::{menu_template, HostPlatform, MenuAction, MenuEntry};
pub use recent::{RecentDocuments, RecentList, RecentStore};
pub use state::ModelState;
pub use storage::{FsModelStorage, ModelStorage};

use desktop::Desktop;
use tauri::Manager;

fn log_plugin() -> tauri::plugin::TauriPlugin<tauri::Wry> {
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    tauri_plugin_log::Builder::new().level(level).build()
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(log_plugin())
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            let config = DesktopConfig::load_or_default();
            let desktop = Desktop::new(app.handle().clone(), &config);
            // Wrap in Arc so menu handlers can hold it across awaits
            app.manage(Arc::new(desktop));
            desktop::refresh_menu(app.handle());
            Ok(())
        })
        .on_menu_event(desktop::handle_menu_event)
        .invoke_handler(tauri::generate_handler![
            // Model commands
            commands::model_saved,
            commands::model_closed,
            commands::model_opened,
            // Locale commands
            commands::set_locale,
            commands::get_menu_template,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
