//! Localized labels for the native menu, dialogs and log lines.

use std::fmt;
use std::sync::Mutex;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    El,
    #[default]
    En,
    Es,
    Zh,
    De,
    Fr,
    Pt,
    Ru,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown locale code: {0}")]
pub struct UnknownLocale(pub String);

impl Locale {
    pub const ALL: [Locale; 8] = [
        Locale::El,
        Locale::En,
        Locale::Es,
        Locale::Zh,
        Locale::De,
        Locale::Fr,
        Locale::Pt,
        Locale::Ru,
    ];

    /// Parse a locale code such as `de`, `pt-BR` or `zh_CN`.
    /// `cn` and `zh` select the same table.
    pub fn from_code(code: &str) -> Option<Self> {
        let primary = code
            .trim()
            .split(|c| c == '-' || c == '_')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "el" => Some(Locale::El),
            "en" => Some(Locale::En),
            "es" => Some(Locale::Es),
            "cn" | "zh" => Some(Locale::Zh),
            "de" => Some(Locale::De),
            "fr" => Some(Locale::Fr),
            "pt" => Some(Locale::Pt),
            "ru" => Some(Locale::Ru),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Locale::El => "el",
            Locale::En => "en",
            Locale::Es => "es",
            Locale::Zh => "zh",
            Locale::De => "de",
            Locale::Fr => "fr",
            Locale::Pt => "pt",
            Locale::Ru => "ru",
        }
    }

    pub fn messages(self) -> &'static Messages {
        match self {
            Locale::El => &EL,
            Locale::En => &EN,
            Locale::Es => &ES,
            Locale::Zh => &ZH,
            Locale::De => &DE,
            Locale::Fr => &FR,
            Locale::Pt => &PT,
            Locale::Ru => &RU,
        }
    }

    /// Configured code first, then the OS locale, then English
    pub fn resolve(configured: Option<&str>) -> Self {
        if let Some(code) = configured {
            match Self::from_code(code) {
                Some(locale) => return locale,
                None => log::warn!("Ignoring configured locale {}", code),
            }
        }
        sys_locale::get_locale()
            .as_deref()
            .and_then(Self::from_code)
            .unwrap_or(Locale::En)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ============================================================================
// Locale context
// ============================================================================

/// The active locale, owned by whoever builds menus and dialogs
#[derive(Debug, Default)]
pub struct LocaleContext {
    current: Mutex<Locale>,
}

impl LocaleContext {
    pub fn new(locale: Locale) -> Self {
        Self {
            current: Mutex::new(locale),
        }
    }

    pub fn current(&self) -> Locale {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn messages(&self) -> &'static Messages {
        self.current().messages()
    }

    /// Switch the active locale. Unknown codes leave the current one in place.
    pub fn set_locale(&self, code: &str) -> Result<Locale, UnknownLocale> {
        let Some(locale) = Locale::from_code(code) else {
            log::warn!("Rejecting unknown locale {}, keeping {}", code, self.current());
            return Err(UnknownLocale(code.to_string()));
        };
        *self.current.lock().unwrap_or_else(|e| e.into_inner()) = locale;
        log::debug!("Locale set to {}", locale);
        Ok(locale)
    }
}

// ============================================================================
// Message tables
// ============================================================================

#[derive(Debug, PartialEq, Eq)]
pub struct Messages {
    pub desktop: DesktopMessages,
    pub threatmodel: ThreatModelMessages,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DesktopMessages {
    pub file: FileMessages,
    pub help: HelpMessages,
    pub menus: MenuMessages,
}

#[derive(Debug, PartialEq, Eq)]
pub struct FileMessages {
    pub heading: &'static str,
    pub open: &'static str,
    pub save: &'static str,
    pub save_as: &'static str,
    pub close: &'static str,
}

#[derive(Debug, PartialEq, Eq)]
pub struct HelpMessages {
    pub heading: &'static str,
    pub docs: &'static str,
    pub visit: &'static str,
    pub sheets: &'static str,
    pub github: &'static str,
    pub submit: &'static str,
    pub check: &'static str,
}

/// Headings for menus the host provides but does not translate
#[derive(Debug, PartialEq, Eq)]
pub struct MenuMessages {
    pub edit: &'static str,
    pub view: &'static str,
    pub window: &'static str,
    pub recent: &'static str,
    pub clear_recent: &'static str,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ThreatModelMessages {
    pub errors: ThreatModelErrors,
    pub saved: &'static str,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ThreatModelErrors {
    pub open: &'static str,
    pub save: &'static str,
}

impl Messages {
    /// Every label a menu can show
    pub fn labels(&self) -> Vec<&'static str> {
        let file = &self.desktop.file;
        let help = &self.desktop.help;
        let menus = &self.desktop.menus;
        vec![
            file.heading,
            file.open,
            file.save,
            file.save_as,
            file.close,
            help.heading,
            help.docs,
            help.visit,
            help.sheets,
            help.github,
            help.submit,
            help.check,
            menus.edit,
            menus.view,
            menus.window,
            menus.recent,
            menus.clear_recent,
        ]
    }
}

static EN: Messages = Messages {
    desktop: DesktopMessages {
        file: FileMessages {
            heading: "File",
            open: "Open Model",
            save: "Save Model",
            save_as: "Save Model As",
            close: "Close Model",
        },
        help: HelpMessages {
            heading: "Help",
            docs: "Documentation",
            visit: "Visit us at OWASP",
            sheets: "OWASP Cheat Sheets",
            github: "Visit us on GitHub",
            submit: "Submit an Issue",
            check: "Check for updates ...",
        },
        menus: MenuMessages {
            edit: "Edit",
            view: "View",
            window: "Window",
            recent: "Open Recent",
            clear_recent: "Clear Menu",
        },
    },
    threatmodel: ThreatModelMessages {
        errors: ThreatModelErrors {
            open: "Error opening this threat model",
            save: "Error saving this threat model",
        },
        saved: "Threat model successfully saved",
    },
};

static EL: Messages = Messages {
    desktop: DesktopMessages {
        file: FileMessages {
            heading: "Αρχείο",
            open: "Άνοιγμα μοντέλου",
            save: "Αποθήκευση μοντέλου",
            save_as: "Αποθήκευση μοντέλου ως",
            close: "Κλείσιμο μοντέλου",
        },
        help: HelpMessages {
            heading: "Βοήθεια",
            docs: "Τεκμηρίωση",
            visit: "Επισκεφθείτε μας στο OWASP",
            sheets: "Φύλλα αναφοράς OWASP",
            github: "Επισκεφθείτε μας στο GitHub",
            submit: "Υποβολή ζητήματος",
            check: "Έλεγχος για ενημερώσεις ...",
        },
        menus: MenuMessages {
            edit: "Επεξεργασία",
            view: "Προβολή",
            window: "Παράθυρο",
            recent: "Πρόσφατα",
            clear_recent: "Εκκαθάριση μενού",
        },
    },
    threatmodel: ThreatModelMessages {
        errors: ThreatModelErrors {
            open: "Σφάλμα κατά το άνοιγμα του μοντέλου απειλών",
            save: "Σφάλμα κατά την αποθήκευση του μοντέλου απειλών",
        },
        saved: "Το μοντέλο απειλών αποθηκεύτηκε",
    },
};

static ES: Messages = Messages {
    desktop: DesktopMessages {
        file: FileMessages {
            heading: "Archivo",
            open: "Abrir modelo",
            save: "Guardar modelo",
            save_as: "Guardar modelo como",
            close: "Cerrar modelo",
        },
        help: HelpMessages {
            heading: "Ayuda",
            docs: "Documentación",
            visit: "Visítenos en OWASP",
            sheets: "Hojas de referencia de OWASP",
            github: "Visítenos en GitHub",
            submit: "Reportar un problema",
            check: "Buscar actualizaciones ...",
        },
        menus: MenuMessages {
            edit: "Editar",
            view: "Ver",
            window: "Ventana",
            recent: "Abrir reciente",
            clear_recent: "Borrar menú",
        },
    },
    threatmodel: ThreatModelMessages {
        errors: ThreatModelErrors {
            open: "Error al abrir este modelo de amenazas",
            save: "Error al guardar este modelo de amenazas",
        },
        saved: "Modelo de amenazas guardado correctamente",
    },
};

static ZH: Messages = Messages {
    desktop: DesktopMessages {
        file: FileMessages {
            heading: "文件",
            open: "打开模型",
            save: "保存模型",
            save_as: "模型另存为",
            close: "关闭模型",
        },
        help: HelpMessages {
            heading: "帮助",
            docs: "文档",
            visit: "访问 OWASP",
            sheets: "OWASP 速查表",
            github: "访问 GitHub",
            submit: "提交问题",
            check: "检查更新 ...",
        },
        menus: MenuMessages {
            edit: "编辑",
            view: "视图",
            window: "窗口",
            recent: "最近打开",
            clear_recent: "清除菜单",
        },
    },
    threatmodel: ThreatModelMessages {
        errors: ThreatModelErrors {
            open: "打开威胁模型时出错",
            save: "保存威胁模型时出错",
        },
        saved: "威胁模型已成功保存",
    },
};

static DE: Messages = Messages {
    desktop: DesktopMessages {
        file: FileMessages {
            heading: "Datei",
            open: "Modell öffnen",
            save: "Modell speichern",
            save_as: "Modell speichern unter",
            close: "Modell schließen",
        },
        help: HelpMessages {
            heading: "Hilfe",
            docs: "Dokumentation",
            visit: "Besuchen Sie uns bei OWASP",
            sheets: "OWASP Cheat Sheets",
            github: "Besuchen Sie uns auf GitHub",
            submit: "Problem melden",
            check: "Nach Updates suchen ...",
        },
        menus: MenuMessages {
            edit: "Bearbeiten",
            view: "Ansicht",
            window: "Fenster",
            recent: "Zuletzt geöffnet",
            clear_recent: "Menü leeren",
        },
    },
    threatmodel: ThreatModelMessages {
        errors: ThreatModelErrors {
            open: "Fehler beim Öffnen des Bedrohungsmodells",
            save: "Fehler beim Speichern des Bedrohungsmodells",
        },
        saved: "Bedrohungsmodell erfolgreich gespeichert",
    },
};

static FR: Messages = Messages {
    desktop: DesktopMessages {
        file: FileMessages {
            heading: "Fichier",
            open: "Ouvrir le modèle",
            save: "Enregistrer le modèle",
            save_as: "Enregistrer le modèle sous",
            close: "Fermer le modèle",
        },
        help: HelpMessages {
            heading: "Aide",
            docs: "Documentation",
            visit: "Rendez-nous visite sur OWASP",
            sheets: "Aide-mémoire OWASP",
            github: "Rendez-nous visite sur GitHub",
            submit: "Signaler un problème",
            check: "Rechercher des mises à jour ...",
        },
        menus: MenuMessages {
            edit: "Édition",
            view: "Affichage",
            window: "Fenêtre",
            recent: "Ouvrir un élément récent",
            clear_recent: "Effacer le menu",
        },
    },
    threatmodel: ThreatModelMessages {
        errors: ThreatModelErrors {
            open: "Erreur lors de l'ouverture du modèle de menace",
            save: "Erreur lors de l'enregistrement du modèle de menace",
        },
        saved: "Modèle de menace enregistré",
    },
};

static PT: Messages = Messages {
    desktop: DesktopMessages {
        file: FileMessages {
            heading: "Arquivo",
            open: "Abrir modelo",
            save: "Salvar modelo",
            save_as: "Salvar modelo como",
            close: "Fechar modelo",
        },
        help: HelpMessages {
            heading: "Ajuda",
            docs: "Documentação",
            visit: "Visite-nos na OWASP",
            sheets: "Folhas de referência OWASP",
            github: "Visite-nos no GitHub",
            submit: "Relatar um problema",
            check: "Verificar atualizações ...",
        },
        menus: MenuMessages {
            edit: "Editar",
            view: "Exibir",
            window: "Janela",
            recent: "Abrir recente",
            clear_recent: "Limpar menu",
        },
    },
    threatmodel: ThreatModelMessages {
        errors: ThreatModelErrors {
            open: "Erro ao abrir este modelo de ameaças",
            save: "Erro ao salvar este modelo de ameaças",
        },
        saved: "Modelo de ameaças salvo com sucesso",
    },
};

static RU: Messages = Messages {
    desktop: DesktopMessages {
        file: FileMessages {
            heading: "Файл",
            open: "Открыть модель",
            save: "Сохранить модель",
            save_as: "Сохранить модель как",
            close: "Закрыть модель",
        },
        help: HelpMessages {
            heading: "Справка",
            docs: "Документация",
            visit: "Посетите нас на OWASP",
            sheets: "Шпаргалки OWASP",
            github: "Посетите нас на GitHub",
            submit: "Сообщить о проблеме",
            check: "Проверить обновления ...",
        },
        menus: MenuMessages {
            edit: "Правка",
            view: "Вид",
            window: "Окно",
            recent: "Недавние",
            clear_recent: "Очистить меню",
        },
    },
    threatmodel: ThreatModelMessages {
        errors: ThreatModelErrors {
            open: "Ошибка при открытии модели угроз",
            save: "Ошибка при сохранении модели угроз",
        },
        saved: "Модель угроз успешно сохранена",
    },
};
