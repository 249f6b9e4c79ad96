//! Editor session: owned state plus a command reducer.
//!
//! [`update`] is the only way the session changes. It never performs I/O;
//! anything that has to leave the process (generation delay, persistence,
//! export) comes back as an [`Effect`] for the caller to run, and its outcome
//! is fed back in as another [`Command`].

use crate::design::{DesignDocument, DesignType, ElementPatch};
use crate::rendering::{self, View};

pub const NOTICE_EMPTY_PROMPT: &str = "Please enter a design prompt";
pub const NOTICE_SAVED: &str = "Design saved successfully!";
pub const NOTICE_SAVE_FAILED: &str = "Failed to save design";
pub const NOTICE_DELETED: &str = "Design deleted successfully!";
pub const NOTICE_DELETE_FAILED: &str = "Failed to delete design";

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Home,
    Editor,
    Library,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Info(m) | Notice::Error(m) => m,
        }
    }
}

/// The document being edited plus the editor-local view state
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    pub document: DesignDocument,
    pub selected: Option<String>,
    pub zoom: f64,
}

impl EditorState {
    pub fn new(document: DesignDocument) -> Self {
        Self { document, selected: None, zoom: 1.0 }
    }

    /// View used for the on-screen canvas
    pub fn view(&self) -> View {
        View::preview(&self.document.dimensions).with_zoom(self.zoom)
    }

    /// Select `id` unless it is missing or locked; returns whether it took effect.
    fn select(&mut self, id: &str) -> bool {
        match self.document.element(id) {
            Some(e) if !e.is_locked() => {
                self.selected = Some(id.to_string());
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub screen: Screen,
    pub prompt: String,
    pub design_type: DesignType,
    /// A generation is pending; further requests are ignored until it lands
    pub generating: bool,
    pub editor: Option<EditorState>,
    pub library: Vec<DesignDocument>,
    pub notice: Option<Notice>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            screen: Screen::Home,
            prompt: String::new(),
            design_type: DesignType::BusinessCard,
            generating: false,
            editor: None,
            library: Vec::new(),
            notice: None,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> Option<&DesignDocument> {
        self.editor.as_ref().map(|e| &e.document)
    }

    pub fn selected(&self) -> Option<&str> {
        self.editor.as_ref().and_then(|e| e.selected.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    PromptChanged(String),
    DesignTypeChanged(DesignType),
    GenerateRequested,
    DesignGenerated(DesignDocument),
    /// Click on the editor canvas, in canvas pixels
    PointerPressed { x: f64, y: f64 },
    /// Pick from the element list
    ElementSelected(String),
    ElementUpdated { id: String, patch: ElementPatch },
    ZoomChanged(f64),
    SaveRequested,
    /// Outcome of a persist effect: the stored document or an error message
    SaveCompleted(std::result::Result<DesignDocument, String>),
    DeleteRequested(String),
    DeleteCompleted(std::result::Result<(), String>),
    LibraryLoaded(Vec<DesignDocument>),
    /// Open a library entry by id
    DesignOpened(String),
    ExportRequested,
    Navigate(Screen),
    DismissNotice,
}

/// Work the caller has to perform on behalf of the session
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Interpret + synthesize (after the generation delay) and answer with `DesignGenerated`
    Generate { prompt: String, design_type: DesignType },
    /// Create or overwrite; answer with `SaveCompleted`
    Persist(DesignDocument),
    /// Answer with `DeleteCompleted`
    Delete(String),
    /// Answer with `LibraryLoaded`
    LoadLibrary,
    /// Render at print resolution and write `<type>-<millis>.png`
    Export(DesignDocument),
}

/// Apply `command` to `session`, returning the effects to run.
pub fn update(session: &mut Session, command: Command) -> Vec<Effect> {
    match command {
        Command::PromptChanged(prompt) => {
            session.prompt = prompt;
            vec![]
        }
        Command::DesignTypeChanged(design_type) => {
            session.design_type = design_type;
            vec![]
        }
        Command::GenerateRequested => {
            if session.prompt.trim().is_empty() {
                session.notice = Some(Notice::Error(NOTICE_EMPTY_PROMPT.to_string()));
                return vec![];
            }
            if session.generating {
                return vec![];
            }
            session.generating = true;
            vec![Effect::Generate { prompt: session.prompt.clone(), design_type: session.design_type }]
        }
        Command::DesignGenerated(document) => {
            session.generating = false;
            session.editor = Some(EditorState::new(document));
            session.screen = Screen::Editor;
            vec![]
        }
        Command::PointerPressed { x, y } => {
            if let Some(editor) = session.editor.as_mut() {
                editor.selected = rendering::hit_test(&editor.document, x, y, &editor.view());
            }
            vec![]
        }
        Command::ElementSelected(id) => {
            if let Some(editor) = session.editor.as_mut() {
                editor.select(&id);
            }
            vec![]
        }
        Command::ElementUpdated { id, patch } => {
            if let Some(editor) = session.editor.as_mut() {
                if let Err(e) = editor.document.update_element(&id, &patch) {
                    log::debug!("edit ignored: {}", e);
                }
            }
            vec![]
        }
        Command::ZoomChanged(zoom) => {
            if let Some(editor) = session.editor.as_mut() {
                if zoom.is_finite() && zoom > 0.0 {
                    editor.zoom = zoom;
                }
            }
            vec![]
        }
        Command::SaveRequested => match session.document() {
            Some(doc) => vec![Effect::Persist(doc.clone())],
            None => vec![],
        },
        Command::SaveCompleted(Ok(stored)) => {
            // adopt the assigned id so the next save overwrites instead of duplicating
            if let Some(editor) = session.editor.as_mut() {
                if editor.document.id.is_none() || editor.document.id == stored.id {
                    editor.document.id = stored.id.clone();
                    editor.document.created_at = stored.created_at;
                    editor.document.updated_at = stored.updated_at;
                }
            }
            session.notice = Some(Notice::Info(NOTICE_SAVED.to_string()));
            vec![Effect::LoadLibrary]
        }
        Command::SaveCompleted(Err(e)) => {
            log::error!("Error saving design: {}", e);
            session.notice = Some(Notice::Error(NOTICE_SAVE_FAILED.to_string()));
            vec![]
        }
        Command::DeleteRequested(id) => vec![Effect::Delete(id)],
        Command::DeleteCompleted(Ok(())) => {
            session.notice = Some(Notice::Info(NOTICE_DELETED.to_string()));
            vec![Effect::LoadLibrary]
        }
        Command::DeleteCompleted(Err(e)) => {
            log::error!("Error deleting design: {}", e);
            session.notice = Some(Notice::Error(NOTICE_DELETE_FAILED.to_string()));
            vec![]
        }
        Command::LibraryLoaded(docs) => {
            session.library = docs;
            vec![]
        }
        Command::DesignOpened(id) => {
            if let Some(doc) = session.library.iter().find(|d| d.id.as_deref() == Some(id.as_str())) {
                session.editor = Some(EditorState::new(doc.clone()));
                session.screen = Screen::Editor;
            }
            vec![]
        }
        Command::ExportRequested => match session.document() {
            Some(doc) => vec![Effect::Export(doc.clone())],
            None => vec![],
        },
        Command::Navigate(screen) => {
            // the editor needs a document
            if screen == Screen::Editor && session.editor.is_none() {
                return vec![];
            }
            session.screen = screen;
            if screen == Screen::Library {
                vec![Effect::LoadLibrary]
            } else {
                vec![]
            }
        }
        Command::DismissNotice => {
            session.notice = None;
            vec![]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::interpret;
    use crate::synth::synthesize;

    fn card() -> DesignDocument {
        synthesize(&interpret("blue card", DesignType::BusinessCard), DesignType::BusinessCard)
    }

    fn editing() -> Session {
        let mut s = Session::new();
        update(&mut s, Command::DesignGenerated(card()));
        s
    }

    #[test]
    fn empty_prompt_raises_notice_without_effects() {
        let mut s = Session::new();
        update(&mut s, Command::PromptChanged("   ".into()));
        assert!(update(&mut s, Command::GenerateRequested).is_empty());
        assert_eq!(s.notice.as_ref().map(Notice::message), Some(NOTICE_EMPTY_PROMPT));
        assert!(!s.generating);
    }

    #[test]
    fn generate_emits_once_until_result_arrives() {
        let mut s = Session::new();
        update(&mut s, Command::PromptChanged("red flyer".into()));
        update(&mut s, Command::DesignTypeChanged(DesignType::Flyer));
        let effects = update(&mut s, Command::GenerateRequested);
        assert_eq!(effects, vec![Effect::Generate { prompt: "red flyer".into(), design_type: DesignType::Flyer }]);
        assert!(update(&mut s, Command::GenerateRequested).is_empty());

        update(&mut s, Command::DesignGenerated(card()));
        assert!(!s.generating);
        assert_eq!(s.screen, Screen::Editor);
    }

    #[test]
    fn pointer_selects_and_clears() {
        let mut s = editing();
        // accent circle center in preview pixels
        update(&mut s, Command::PointerPressed { x: 525.0, y: 200.0 });
        assert_eq!(s.selected(), Some("accent-shape"));
        // bottom-left corner only has the locked background
        update(&mut s, Command::PointerPressed { x: 2.0, y: 398.0 });
        assert_eq!(s.selected(), None);
    }

    #[test]
    fn locked_elements_cannot_be_selected_from_list() {
        let mut s = editing();
        update(&mut s, Command::ElementSelected("bg".into()));
        assert_eq!(s.selected(), None);
        update(&mut s, Command::ElementSelected("email".into()));
        assert_eq!(s.selected(), Some("email"));
    }

    #[test]
    fn edits_flow_into_document() {
        let mut s = editing();
        update(&mut s, Command::ElementUpdated { id: "name".into(), patch: ElementPatch::text("Jane Roe") });
        update(&mut s, Command::ElementUpdated { id: "bg".into(), patch: ElementPatch::fill("#000000") });
        let doc = s.document().unwrap();
        assert_eq!(doc.element("name").and_then(|e| e.as_text()).map(|t| t.text.as_str()), Some("Jane Roe"));
        assert_ne!(doc.element("bg").map(|e| e.fill.as_str()), Some("#000000"));
    }

    #[test]
    fn save_adopts_assigned_id_and_reloads_library() {
        let mut s = editing();
        let effects = update(&mut s, Command::SaveRequested);
        let Some(Effect::Persist(mut doc)) = effects.into_iter().next() else {
            panic!("expected persist effect");
        };
        doc.id = Some("new-id".into());
        let effects = update(&mut s, Command::SaveCompleted(Ok(doc)));
        assert_eq!(effects, vec![Effect::LoadLibrary]);
        assert_eq!(s.document().and_then(|d| d.id.as_deref()), Some("new-id"));
        assert_eq!(s.notice, Some(Notice::Info(NOTICE_SAVED.into())));
    }

    #[test]
    fn failures_surface_generic_notices() {
        let mut s = editing();
        update(&mut s, Command::SaveCompleted(Err("disk full".into())));
        assert_eq!(s.notice, Some(Notice::Error(NOTICE_SAVE_FAILED.into())));
        update(&mut s, Command::DeleteCompleted(Err("gone".into())));
        assert_eq!(s.notice, Some(Notice::Error(NOTICE_DELETE_FAILED.into())));
    }

    #[test]
    fn open_from_library_and_navigate() {
        let mut s = Session::new();
        assert!(update(&mut s, Command::Navigate(Screen::Editor)).is_empty());
        assert_eq!(s.screen, Screen::Home);

        assert_eq!(update(&mut s, Command::Navigate(Screen::Library)), vec![Effect::LoadLibrary]);
        let mut doc = card();
        doc.id = Some("abc".into());
        update(&mut s, Command::LibraryLoaded(vec![doc]));
        update(&mut s, Command::DesignOpened("abc".into()));
        assert_eq!(s.screen, Screen::Editor);
        assert!(matches!(update(&mut s, Command::ExportRequested).as_slice(), [Effect::Export(_)]));
    }
}
