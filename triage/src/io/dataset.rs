//! Dataset loading for humanoid entities.
//!
//! A dataset is a JSON array of records with a ground-truth state and an
//! optional image reference:
//!
//! ```json
//! [
//!   { "state": "healthy", "image": "img/test_00000.png" },
//!   { "state": "zombie" }
//! ]
//! ```
//!
//! The image path is carried through to run logs untouched; the core never
//! opens it.

use std::fs;
use std::path::Path;

use crate::core::types::{DataLoadError, Entity};

/// Load and validate a dataset file. Any failure here is fatal at start-up.
pub fn load_dataset(path: &Path) -> Result<Vec<Entity>, DataLoadError> {
    let contents = fs::read_to_string(path)
        .map_err(|err| DataLoadError::new(format!("read {}: {err}", path.display())))?;
    let entities: Vec<Entity> = serde_json::from_str(&contents)
        .map_err(|err| DataLoadError::new(format!("parse {}: {err}", path.display())))?;
    if entities.is_empty() {
        return Err(DataLoadError::new(format!(
            "{} contains no entities",
            path.display()
        )));
    }
    Ok(entities)
}
