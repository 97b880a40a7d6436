/*!
 * # Editing Core Module
 *
 * Every change to a [`Document`](crate::models::Document) goes through this
 * module.
 *
 * ## Architecture Overview
 *
 * ### 1. Replace, Never Mutate
 * - Each operation borrows the current document and returns a new one
 * - Sections that an edit does not touch are carried over unchanged
 * - Callers swap the old value for the new one; nothing else holds a reference
 *
 * ### 2. Command-Based Editing
 * - All edits can be expressed as a **Command** (`Cmd` enum)
 * - `Document::apply` is the single entry point the editing session uses
 * - The same operations are available as direct methods for library callers
 *
 * ### 3. Forgiving Lookups, Strict Indices
 * - Updating or deleting an unknown section id is a no-op, not an error
 * - Moving with an index outside the list fails with `EditError::IndexOutOfRange`
 *   and leaves the document untouched
 *
 * ### 4. No Selection State
 * - The model has no notion of a selected section
 * - A delete tells the caller "this section is gone"; clearing any selection
 *   that pointed at it is the caller's job (see `session`)
 *
 * ## Usage Pattern
 *
 * ```rust
 * use site_composer_engine::editing::Cmd;
 * use site_composer_engine::models::{Document, SectionKind, StyleDelta};
 *
 * let doc = Document::default();
 * let doc = doc.add_section(SectionKind::Image);
 * let first = doc.sections[0].id.clone();
 *
 * let doc = doc
 *     .apply(Cmd::UpdateSection {
 *         id: first,
 *         content: "Hi".to_string(),
 *         style: Some(StyleDelta::default().bold(true)),
 *     })
 *     .unwrap();
 *
 * let doc = doc.move_section(1, 0).unwrap();
 * assert_eq!(doc.sections[1].content, "Hi");
 * ```
 */

pub mod commands;

pub use commands::{Cmd, EditError};
