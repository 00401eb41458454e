//! Loading of the free-form recipe notes handed to the analyzer.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::NotesError;

/// Reads the knowledge base at `path`.
///
/// A missing file is not an error: the run continues with an empty
/// knowledge base and a warning.
pub fn load_knowledge_base(path: &Path) -> Result<String, NotesError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::warn!(
                "Knowledge base {} not found, continuing without it",
                path.display()
            );
            Ok(String::new())
        }
        Err(e) => Err(NotesError::io(path, e)),
    }
}
