pub mod editing;
pub mod io;
pub mod models;
pub mod serializer;
pub mod session;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use editing::{Cmd, EditError};
pub use io::*;
pub use models::*;
pub use serializer::*;
pub use session::{EditorEvent, EditorSession, Outcome, SessionError};
