use std::path::PathBuf;
use std::sync::Arc;

use tauri::menu::{IsMenuItem, Menu, MenuEvent, MenuItem, PredefinedMenuItem, Submenu};
use tauri::{AppHandle, Manager, Wry};

use crate::config::DesktopConfig;
use crate::dialog::TauriFileDialog;
use crate::host::{TauriLinks, TauriRenderer};
use crate::lifecycle::{LifecycleSettings, ModelLifecycle};
use crate::locale::{Locale, Messages};
use crate::menu::{self, EntryKind, HostPlatform, MenuAction, MenuEntry, MenuRole};
use crate::recent::{RecentDocuments, RecentStore};
use crate::storage::FsModelStorage;

pub type DesktopLifecycle =
    ModelLifecycle<TauriFileDialog, FsModelStorage, RecentStore, TauriRenderer>;

/// Everything the menu and the commands operate on, managed as `Arc<Desktop>`
pub struct Desktop {
    pub lifecycle: DesktopLifecycle,
    pub links: TauriLinks,
}

impl Desktop {
    pub fn new(app_handle: AppHandle, config: &DesktopConfig) -> Self {
        let recent_file = DesktopConfig::dir().map(|dir| DesktopConfig::recent_file(&dir));
        let recent = RecentStore::load(recent_file, config.recent_capacity);
        let locale = Locale::resolve(config.locale.as_deref());
        log::info!("Desktop shell starting with locale {}", locale);

        let lifecycle = ModelLifecycle::new(
            TauriFileDialog::new(app_handle.clone()),
            FsModelStorage,
            recent,
            TauriRenderer::new(app_handle.clone()),
            locale,
            LifecycleSettings::from(config),
        );
        Self {
            lifecycle,
            links: TauriLinks::new(app_handle),
        }
    }

    pub fn template(&self) -> Vec<MenuEntry> {
        menu::menu_template(self.lifecycle.messages(), HostPlatform::current())
    }
}

// ============================================================================
// Native menu
// ============================================================================

/// Rebuild the native menu from the current locale and recent documents
pub fn refresh_menu(app: &AppHandle) {
    let desktop = app.state::<Arc<Desktop>>();
    let template = desktop.template();
    let recent = desktop.lifecycle.recent_documents().recent();
    let result = build_menu(app, &template, desktop.lifecycle.messages(), &recent)
        .and_then(|menu| app.set_menu(menu).map(|_| ()));
    if let Err(e) = result {
        log::error!("Failed to build application menu: {}", e);
    }
}

pub fn build_menu(
    app: &AppHandle,
    template: &[MenuEntry],
    messages: &Messages,
    recent: &[PathBuf],
) -> tauri::Result<Menu<Wry>> {
    let menu = Menu::new(app)?;
    for entry in template {
        let item = realize(app, entry, messages, recent)?;
        menu.append(&*item)?;
    }
    Ok(menu)
}

fn realize(
    app: &AppHandle,
    entry: &MenuEntry,
    messages: &Messages,
    recent: &[PathBuf],
) -> tauri::Result<Box<dyn IsMenuItem<Wry>>> {
    if entry.kind == Some(EntryKind::Separator) {
        return Ok(Box::new(PredefinedMenuItem::separator(app)?));
    }
    if let Some(role) = entry.role {
        return realize_role(app, role, entry, messages, recent);
    }
    let label = entry.label.as_deref().unwrap_or_default();
    if let Some(action) = &entry.action {
        return Ok(Box::new(MenuItem::with_id(app, action.id(), label, true, None::<&str>)?));
    }
    let submenu = Submenu::new(app, label, true)?;
    for child in &entry.submenu {
        submenu.append(&*realize(app, child, messages, recent)?)?;
    }
    Ok(Box::new(submenu))
}

/// Roles are provided by the host menu system, only the headings are translated here
fn realize_role(
    app: &AppHandle,
    role: MenuRole,
    entry: &MenuEntry,
    messages: &Messages,
    recent: &[PathBuf],
) -> tauri::Result<Box<dyn IsMenuItem<Wry>>> {
    let menus = &messages.desktop.menus;
    let item: Box<dyn IsMenuItem<Wry>> = match role {
        MenuRole::AppMenu => Box::new(Submenu::with_items(
            app,
            app.package_info().name.clone(),
            true,
            &[
                &PredefinedMenuItem::about(app, None, None)?,
                &PredefinedMenuItem::separator(app)?,
                &PredefinedMenuItem::services(app, None)?,
                &PredefinedMenuItem::separator(app)?,
                &PredefinedMenuItem::hide(app, None)?,
                &PredefinedMenuItem::hide_others(app, None)?,
                &PredefinedMenuItem::show_all(app, None)?,
                &PredefinedMenuItem::separator(app)?,
                &PredefinedMenuItem::quit(app, None)?,
            ],
        )?),
        MenuRole::EditMenu => Box::new(Submenu::with_items(
            app,
            menus.edit,
            true,
            &[
                &PredefinedMenuItem::undo(app, None)?,
                &PredefinedMenuItem::redo(app, None)?,
                &PredefinedMenuItem::separator(app)?,
                &PredefinedMenuItem::cut(app, None)?,
                &PredefinedMenuItem::copy(app, None)?,
                &PredefinedMenuItem::paste(app, None)?,
                &PredefinedMenuItem::select_all(app, None)?,
            ],
        )?),
        MenuRole::ViewMenu => Box::new(Submenu::with_items(
            app,
            menus.view,
            true,
            &[&PredefinedMenuItem::fullscreen(app, None)?],
        )?),
        MenuRole::WindowMenu => Box::new(Submenu::with_items(
            app,
            menus.window,
            true,
            &[
                &PredefinedMenuItem::minimize(app, None)?,
                &PredefinedMenuItem::maximize(app, None)?,
                &PredefinedMenuItem::separator(app)?,
                &PredefinedMenuItem::close_window(app, None)?,
            ],
        )?),
        MenuRole::RecentDocuments => {
            let submenu = Submenu::new(app, menus.recent, true)?;
            for path in recent {
                submenu.append(&MenuItem::with_id(
                    app,
                    MenuAction::OpenRecent(path.clone()).id(),
                    path.display().to_string(),
                    true,
                    None::<&str>,
                )?)?;
            }
            if !recent.is_empty() {
                submenu.append(&PredefinedMenuItem::separator(app)?)?;
            }
            for child in &entry.submenu {
                submenu.append(&*realize(app, child, messages, recent)?)?;
            }
            Box::new(submenu)
        }
        MenuRole::ClearRecentDocuments => Box::new(MenuItem::with_id(
            app,
            MenuAction::ClearRecent.id(),
            menus.clear_recent,
            !recent.is_empty(),
            None::<&str>,
        )?),
        MenuRole::Close => Box::new(PredefinedMenuItem::close_window(app, None)?),
        MenuRole::About => Box::new(PredefinedMenuItem::about(app, None, None)?),
    };
    Ok(item)
}

// ============================================================================
// Menu events
// ============================================================================

pub fn handle_menu_event(app: &AppHandle, event: MenuEvent) {
    let Some(action) = MenuAction::from_id(event.id().as_ref()) else {
        log::debug!("Ignoring menu event {:?}", event.id());
        return;
    };
    let desktop = app.state::<Arc<Desktop>>().inner().clone();
    let app = app.clone();
    tauri::async_runtime::spawn(async move {
        let id = action.id();
        if let Some(outcome) = menu::dispatch(action, &desktop.lifecycle, &desktop.links).await {
            log::debug!("Menu action {} finished: {:?}", id, outcome);
        }
        refresh_menu(&app);
    });
}
