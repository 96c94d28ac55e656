//! CSV codec for the input table.
//!
//! The table has one row per item with the columns `Type,ID,Title,Content`.
//! Rows are validated on the way in. A bad row is an error that names the
//! row, never a silent drop. Each (Type, ID) pair may appear only once.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HarvesterError, Result};
use crate::types::{parse_item_number, CanonicalId, Item, ItemType};

/// Row layout as stored on disk. Everything is text until validated.
#[derive(Debug, Serialize, Deserialize)]
struct RawRow {
    #[serde(rename = "Type")]
    item_type: String,
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Content")]
    content: String,
}

impl RawRow {
    fn into_item(self) -> Result<Item> {
        let item_type: ItemType = self.item_type.trim().parse()?;
        let number = parse_item_number(&self.id)?;
        Item::new(item_type, number, self.title, self.content)
    }
}

impl From<&Item> for RawRow {
    fn from(item: &Item) -> Self {
        Self {
            item_type: item.item_type().as_str().to_string(),
            id: item.number().to_string(),
            title: item.title.clone(),
            content: item.content.clone(),
        }
    }
}

/// Parse items from CSV read from `reader`.
///
/// `source_name` is only used in error messages.
pub fn read_items_from<R: Read>(reader: R, source_name: &str) -> Result<Vec<Item>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut items = Vec::new();
    let mut seen: HashMap<CanonicalId, usize> = HashMap::new();

    for (index, record) in csv_reader.deserialize::<RawRow>().enumerate() {
        // Row 1 is the header
        let row = index + 2;
        let raw = record.map_err(|e| HarvesterError::from(e).at_row(row, source_name))?;
        let item = raw.into_item().map_err(|e| e.at_row(row, source_name))?;

        let id = item.canonical_id();
        if let Some(&first_row) = seen.get(&id) {
            return Err(HarvesterError::DuplicateItem {
                id: id.to_string(),
                first_row,
            }
            .at_row(row, source_name));
        }
        seen.insert(id, row);
        items.push(item);
    }

    Ok(items)
}

/// Load the input table.
///
/// A missing file surfaces as `HarvesterError::Io` with kind `NotFound`,
/// which callers use to decide whether to fetch the corpus.
pub fn read_items(path: &Path) -> Result<Vec<Item>> {
    let file = File::open(path)?;
    let items = read_items_from(file, &path.display().to_string())?;
    tracing::info!(path = %path.display(), rows = items.len(), "Loaded input table");
    Ok(items)
}

/// Serialize items as CSV into `writer`.
pub fn write_items_to<W: Write>(writer: W, items: &[Item]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for item in items {
        csv_writer.serialize(RawRow::from(item))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Save the input table.
///
/// Uses atomic write pattern: writes to temp file, syncs to disk, then renames.
pub fn write_items(path: &Path, items: &[Item]) -> Result<()> {
    write_atomically(path, |file| write_items_to(file, items))?;
    tracing::info!(path = %path.display(), rows = items.len(), "Saved input table");
    Ok(())
}

/// Write a file through a temporary sibling and rename it into place.
///
/// Parent directories are created as needed. On error the temporary file is
/// removed and the destination is left untouched.
pub fn write_atomically<F, E>(path: &Path, write: F) -> std::result::Result<(), E>
where
    F: FnOnce(&mut File) -> std::result::Result<(), E>,
    E: From<std::io::Error>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_path = path.with_file_name(format!(".{file_name}.tmp"));

    let result = File::create(&temp_path)
        .map_err(E::from)
        .and_then(|mut file| {
            write(&mut file)?;
            file.sync_all()?;
            Ok(())
        });
    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    // On Windows, rename fails if the destination already exists
    #[cfg(target_os = "windows")]
    if path.exists() {
        fs::remove_file(path)?;
    }

    fs::rename(&temp_path, path)?;
    Ok(())
}
