use crate::models::{Document, Section, SectionId, SectionKind, StyleDelta};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("Section index {index} is out of range for {len} sections")]
    IndexOutOfRange { index: usize, len: usize },
}

/// An edit to a document
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    AddSection {
        kind: SectionKind,
    },
    UpdateSection {
        id: SectionId,
        content: String,
        style: Option<StyleDelta>,
    },
    DeleteSection {
        id: SectionId,
    },
    /// `to` is an index into the list after the section at `from` has been removed
    MoveSection {
        from: usize,
        to: usize,
    },
    SetTitle {
        title: String,
    },
}

impl Document {
    /// Apply a command, producing the next document
    pub fn apply(&self, cmd: Cmd) -> Result<Document, EditError> {
        match cmd {
            Cmd::AddSection { kind } => Ok(self.add_section(kind)),
            Cmd::UpdateSection { id, content, style } => {
                Ok(self.update_section(&id, content, style.as_ref()))
            }
            Cmd::DeleteSection { id } => Ok(self.delete_section(&id)),
            Cmd::MoveSection { from, to } => self.move_section(from, to),
            Cmd::SetTitle { title } => Ok(self.set_title(title)),
        }
    }

    /// Append a new section with a fresh id, placeholder content and default style
    pub fn add_section(&self, kind: SectionKind) -> Document {
        self.push_section(Section::new(self.fresh_id(), kind))
    }

    pub(crate) fn push_section(&self, section: Section) -> Document {
        let mut sections = Vec::with_capacity(self.sections.len() + 1);
        sections.extend(self.sections.iter().cloned());
        sections.push(section);

        Document {
            title: self.title.clone(),
            sections,
        }
    }

    /// Replace the content of the section with `id` and merge `style` over its style.
    ///
    /// An unknown id returns an identical document.
    pub fn update_section(
        &self,
        id: &SectionId,
        content: impl Into<String>,
        style: Option<&StyleDelta>,
    ) -> Document {
        let content = content.into();
        let sections = self
            .sections
            .iter()
            .map(|section| {
                if &section.id != id {
                    return section.clone();
                }
                Section {
                    id: section.id.clone(),
                    kind: section.kind,
                    content: content.clone(),
                    style: match style {
                        Some(delta) => section.style.merged(delta),
                        None => section.style.clone(),
                    },
                }
            })
            .collect();

        Document {
            title: self.title.clone(),
            sections,
        }
    }

    /// Remove the section with `id`; an unknown id returns an identical document
    pub fn delete_section(&self, id: &SectionId) -> Document {
        Document {
            title: self.title.clone(),
            sections: self
                .sections
                .iter()
                .filter(|section| &section.id != id)
                .cloned()
                .collect(),
        }
    }

    /// Remove the section at `from` and reinsert it at `to`.
    ///
    /// `to` is interpreted against the shortened list, so moving the first of
    /// three sections to the end is `move_section(0, 2)`.
    pub fn move_section(&self, from: usize, to: usize) -> Result<Document, EditError> {
        let len = self.sections.len();
        if from >= len {
            return Err(EditError::IndexOutOfRange { index: from, len });
        }
        // After removal there are len - 1 sections, and inserting at len - 1 appends
        if to >= len {
            return Err(EditError::IndexOutOfRange { index: to, len });
        }

        let mut sections = self.sections.clone();
        let moved = sections.remove(from);
        sections.insert(to, moved);

        Ok(Document {
            title: self.title.clone(),
            sections,
        })
    }

    pub fn set_title(&self, title: impl Into<String>) -> Document {
        Document {
            title: title.into(),
            sections: self.sections.clone(),
        }
    }
}
