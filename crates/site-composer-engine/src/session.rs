use crate::editing::{Cmd, EditError};
use crate::io::{STORAGE_KEY, Storage, StorageError};
use crate::models::{Document, SectionId, SectionKind, StyleDelta};
use crate::serializer::{
    ExportFile, ExportOptions, ParseError, SerializeError, deserialize, export_file, serialize,
};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error("Stored document could not be read: {0}")]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Serialize(#[from] SerializeError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Everything a front end can ask of an editing session
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    AddSection(SectionKind),
    UpdateSection {
        id: SectionId,
        content: String,
        style: Option<StyleDelta>,
    },
    DeleteSection(SectionId),
    /// `destination` is an index into the list after the source section has been removed
    ReorderSections {
        source: usize,
        destination: usize,
    },
    SetTitle(String),
    /// Select a section, or clear the selection with `None`
    Select(Option<SectionId>),
    Save,
    Load,
    Export,
}

/// What handling an event did
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Edited,
    Selected,
    Saved,
    Loaded,
    /// `Load` found nothing under the storage key
    NothingStored,
    Exported(ExportFile),
}

/// The editing session owning the current document.
///
/// Each event replaces the document wholesale. Selection is tracked here
/// rather than in the model, and is cleared whenever the selected section
/// may no longer exist.
pub struct EditorSession<S: Storage> {
    document: Document,
    selected: Option<SectionId>,
    storage: S,
    export_options: ExportOptions,
}

impl<S: Storage> EditorSession<S> {
    /// Start with the default document
    pub fn new(storage: S) -> Self {
        Self::with_document(storage, Document::default())
    }

    pub fn with_document(storage: S, document: Document) -> Self {
        Self {
            document,
            selected: None,
            storage,
            export_options: ExportOptions::default(),
        }
    }

    pub fn with_export_options(mut self, export_options: ExportOptions) -> Self {
        self.export_options = export_options;
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selected(&self) -> Option<&SectionId> {
        self.selected.as_ref()
    }

    /// The document held in storage, if any, without touching the session.
    ///
    /// Front ends call this at start-up to ask whether the saved copy should
    /// replace the default document, then pass the answer to [`Self::restore`].
    pub fn stored_document(&self) -> Result<Option<Document>, SessionError> {
        match self.storage.get(STORAGE_KEY)? {
            Some(text) => Ok(Some(deserialize(&text)?)),
            None => Ok(None),
        }
    }

    /// Replace the current document wholesale
    pub fn restore(&mut self, document: Document) {
        self.document = document;
        self.selected = None;
    }

    pub fn handle(&mut self, event: EditorEvent) -> Result<Outcome, SessionError> {
        log::debug!("Handling editor event: {event:?}");

        match event {
            EditorEvent::AddSection(kind) => self.edit(Cmd::AddSection { kind }),
            EditorEvent::UpdateSection { id, content, style } => {
                self.edit(Cmd::UpdateSection { id, content, style })
            }
            EditorEvent::DeleteSection(id) => {
                let outcome = self.edit(Cmd::DeleteSection { id })?;
                // Deleting always drops the selection, even for an unknown id
                self.selected = None;
                Ok(outcome)
            }
            EditorEvent::ReorderSections {
                source,
                destination,
            } => self.edit(Cmd::MoveSection {
                from: source,
                to: destination,
            }),
            EditorEvent::SetTitle(title) => self.edit(Cmd::SetTitle { title }),
            EditorEvent::Select(id) => {
                self.selected = id.filter(|id| self.document.contains(id));
                Ok(Outcome::Selected)
            }
            EditorEvent::Save => self.save(),
            EditorEvent::Load => self.load(),
            EditorEvent::Export => Ok(Outcome::Exported(export_file(
                &self.document,
                &self.export_options,
            ))),
        }
    }

    fn edit(&mut self, cmd: Cmd) -> Result<Outcome, SessionError> {
        self.document = self.document.apply(cmd)?;
        Ok(Outcome::Edited)
    }

    fn save(&mut self) -> Result<Outcome, SessionError> {
        let text = serialize(&self.document)?;
        self.storage.set(STORAGE_KEY, &text)?;
        log::info!("Saved document {:?} ({} sections)", self.document.title, self.document.len());
        Ok(Outcome::Saved)
    }

    fn load(&mut self) -> Result<Outcome, SessionError> {
        match self.stored_document() {
            Ok(Some(document)) => {
                log::info!("Loaded document {:?} ({} sections)", document.title, document.len());
                self.restore(document);
                Ok(Outcome::Loaded)
            }
            Ok(None) => Ok(Outcome::NothingStored),
            Err(e) => {
                log::warn!("Failed to load stored document: {e}");
                Err(e)
            }
        }
    }
}
