//! Declarative application menu.
//!
//! [`menu_template`] builds the menu tree from a message table. The tree
//! serializes to the Electron-style schema (`label`, `role`,
//! `type: "separator"`, `id`, nested `submenu`) and is turned into a native
//! menu by the desktop layer. Labels are copied in at build time, so the
//! template has to be rebuilt after a locale change.

use std::path::PathBuf;

use serde::Serialize;

use crate::dialog::FileDialog;
use crate::host::{ExternalLinks, Renderer};
use crate::lifecycle::{ModelLifecycle, Outcome};
use crate::locale::Messages;
use crate::recent::RecentDocuments;
use crate::storage::ModelStorage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPlatform {
    MacOs,
    Other,
}

impl HostPlatform {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            HostPlatform::MacOs
        } else {
            HostPlatform::Other
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MenuRole {
    #[serde(rename = "appMenu")]
    AppMenu,
    #[serde(rename = "recentdocuments")]
    RecentDocuments,
    #[serde(rename = "clearrecentdocuments")]
    ClearRecentDocuments,
    #[serde(rename = "close")]
    Close,
    #[serde(rename = "editMenu")]
    EditMenu,
    #[serde(rename = "viewMenu")]
    ViewMenu,
    #[serde(rename = "windowMenu")]
    WindowMenu,
    #[serde(rename = "about")]
    About,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Separator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpLink {
    Docs,
    Visit,
    Sheets,
    Github,
    Submit,
    Check,
}

impl HelpLink {
    pub fn url(self) -> &'static str {
        match self {
            HelpLink::Docs => "https://www.threatdragon.com/docs/",
            HelpLink::Visit => "https://owasp.org/www-project-threat-dragon/",
            HelpLink::Sheets => {
                "https://cheatsheetseries.owasp.org/cheatsheets/Threat_Modeling_Cheat_Sheet.html"
            }
            HelpLink::Github => "https://github.com/owasp/threat-dragon/",
            HelpLink::Submit => "https://github.com/owasp/threat-dragon/issues/new/choose/",
            HelpLink::Check => "https://github.com/OWASP/threat-dragon/releases/",
        }
    }

    fn key(self) -> &'static str {
        match self {
            HelpLink::Docs => "docs",
            HelpLink::Visit => "visit",
            HelpLink::Sheets => "sheets",
            HelpLink::Github => "github",
            HelpLink::Submit => "submit",
            HelpLink::Check => "check",
        }
    }

    const ALL: [HelpLink; 6] = [
        HelpLink::Docs,
        HelpLink::Visit,
        HelpLink::Sheets,
        HelpLink::Github,
        HelpLink::Submit,
        HelpLink::Check,
    ];
}

const RECENT_ID_PREFIX: &str = "recent.open:";

/// What a menu item does when clicked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    Open,
    Save,
    SaveAs,
    Close,
    Help(HelpLink),
    /// Recent items carry their path, so a click opens what the item showed
    OpenRecent(PathBuf),
    ClearRecent,
}

impl MenuAction {
    /// Stable id used for native menu items
    pub fn id(&self) -> String {
        match self {
            MenuAction::Open => "file.open".to_string(),
            MenuAction::Save => "file.save".to_string(),
            MenuAction::SaveAs => "file.saveAs".to_string(),
            MenuAction::Close => "file.close".to_string(),
            MenuAction::Help(link) => format!("help.{}", link.key()),
            MenuAction::OpenRecent(path) => format!("{}{}", RECENT_ID_PREFIX, path.display()),
            MenuAction::ClearRecent => "recent.clear".to_string(),
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "file.open" => return Some(MenuAction::Open),
            "file.save" => return Some(MenuAction::Save),
            "file.saveAs" => return Some(MenuAction::SaveAs),
            "file.close" => return Some(MenuAction::Close),
            "recent.clear" => return Some(MenuAction::ClearRecent),
            _ => {}
        }
        if let Some(key) = id.strip_prefix("help.") {
            return HelpLink::ALL
                .into_iter()
                .find(|link| link.key() == key)
                .map(MenuAction::Help);
        }
        id.strip_prefix(RECENT_ID_PREFIX)
            .filter(|path| !path.is_empty())
            .map(|path| MenuAction::OpenRecent(PathBuf::from(path)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<EntryKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<MenuRole>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub submenu: Vec<MenuEntry>,
    #[serde(skip)]
    pub action: Option<MenuAction>,
}

impl MenuEntry {
    fn empty() -> Self {
        Self {
            kind: None,
            id: None,
            label: None,
            role: None,
            submenu: Vec::new(),
            action: None,
        }
    }

    pub fn item(label: &str, action: MenuAction) -> Self {
        Self {
            id: Some(action.id()),
            label: Some(label.to_string()),
            action: Some(action),
            ..Self::empty()
        }
    }

    pub fn submenu(label: &str, submenu: Vec<MenuEntry>) -> Self {
        Self {
            label: Some(label.to_string()),
            submenu,
            ..Self::empty()
        }
    }

    pub fn role(role: MenuRole) -> Self {
        Self {
            role: Some(role),
            ..Self::empty()
        }
    }

    pub fn role_with_submenu(role: MenuRole, submenu: Vec<MenuEntry>) -> Self {
        Self {
            role: Some(role),
            submenu,
            ..Self::empty()
        }
    }

    pub fn separator() -> Self {
        Self {
            kind: Some(EntryKind::Separator),
            ..Self::empty()
        }
    }

    /// This entry and everything below it, depth first
    pub fn walk(&self) -> Vec<&MenuEntry> {
        let mut entries = vec![self];
        for child in &self.submenu {
            entries.extend(child.walk());
        }
        entries
    }
}

/// Build the application menu for `messages`
pub fn menu_template(messages: &Messages, platform: HostPlatform) -> Vec<MenuEntry> {
    let file = &messages.desktop.file;
    let help = &messages.desktop.help;

    let mut template = Vec::new();
    if platform == HostPlatform::MacOs {
        template.push(MenuEntry::role(MenuRole::AppMenu));
    }

    template.push(MenuEntry::submenu(
        file.heading,
        vec![
            MenuEntry::item(file.open, MenuAction::Open),
            MenuEntry::role_with_submenu(
                MenuRole::RecentDocuments,
                vec![MenuEntry::role(MenuRole::ClearRecentDocuments)],
            ),
            MenuEntry::item(file.save, MenuAction::Save),
            MenuEntry::item(file.save_as, MenuAction::SaveAs),
            MenuEntry::item(file.close, MenuAction::Close),
            MenuEntry::separator(),
            MenuEntry::role(MenuRole::Close),
        ],
    ));

    template.push(MenuEntry::role(MenuRole::EditMenu));
    template.push(MenuEntry::role(MenuRole::ViewMenu));
    template.push(MenuEntry::role(MenuRole::WindowMenu));

    template.push(MenuEntry::submenu(
        help.heading,
        vec![
            MenuEntry::item(help.docs, MenuAction::Help(HelpLink::Docs)),
            MenuEntry::item(help.visit, MenuAction::Help(HelpLink::Visit)),
            MenuEntry::item(help.sheets, MenuAction::Help(HelpLink::Sheets)),
            MenuEntry::separator(),
            MenuEntry::item(help.github, MenuAction::Help(HelpLink::Github)),
            MenuEntry::item(help.submit, MenuAction::Help(HelpLink::Submit)),
            MenuEntry::item(help.check, MenuAction::Help(HelpLink::Check)),
            MenuEntry::separator(),
            MenuEntry::role(MenuRole::About),
        ],
    ));

    template
}

/// Run the operation behind a menu action
pub async fn dispatch<D, S, R, N, L>(
    action: MenuAction,
    lifecycle: &ModelLifecycle<D, S, R, N>,
    links: &L,
) -> Option<Outcome>
where
    D: FileDialog,
    S: ModelStorage,
    R: RecentDocuments,
    N: Renderer,
    L: ExternalLinks,
{
    match action {
        MenuAction::Open => Some(lifecycle.open().await),
        MenuAction::Save => Some(lifecycle.save(None).await),
        MenuAction::SaveAs => Some(lifecycle.save_as(None, None).await),
        MenuAction::Close => {
            lifecycle.close();
            None
        }
        MenuAction::Help(link) => {
            if let Err(e) = links.open_url(link.url()) {
                log::warn!("Failed to open {}: {}", link.url(), e);
            }
            None
        }
        MenuAction::OpenRecent(path) => Some(lifecycle.open_path(path).await),
        MenuAction::ClearRecent => {
            lifecycle.recent_documents().clear_recent();
            None
        }
    }
}
