//! Format selection and file I/O for world maps.

use crate::error::StoreError;
use crate::mapfile::{parse_map, write_map};
use crate::snapshot::Snapshot;
use blockworld_kernel::BlockWorld;
use std::io::{Read, Write};
use std::path::Path;

/// On-disk representation of a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapFormat {
    /// Line-based map text (`.txt` and anything unrecognised).
    Text,
    /// Hash-verified JSON snapshot (`.json`).
    Json,
}

impl MapFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => MapFormat::Json,
            _ => MapFormat::Text,
        }
    }
}

/// Read a world from any source in the given format.
pub fn read_world(mut reader: impl Read, format: MapFormat) -> Result<BlockWorld, StoreError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    match format {
        MapFormat::Text => parse_map(&text),
        MapFormat::Json => {
            let snapshot: Snapshot = serde_json::from_str(&text)?;
            snapshot.restore()
        }
    }
}

/// Write a world to any sink in the given format.
pub fn write_world(
    world: &BlockWorld,
    mut writer: impl Write,
    format: MapFormat,
) -> Result<(), StoreError> {
    match format {
        MapFormat::Text => writer.write_all(write_map(world)?.as_bytes())?,
        MapFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, &Snapshot::capture(world)?)?;
            writer.write_all(b"\n")?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Load a world from a file, picking the format from its extension.
pub fn load_world(path: impl AsRef<Path>) -> Result<BlockWorld, StoreError> {
    let path = path.as_ref();
    let format = MapFormat::from_path(path);
    let file = std::fs::File::open(path)?;
    match read_world(file, format) {
        Ok(world) => {
            tracing::info!(
                path = %path.display(),
                ?format,
                tiles = world.tile_count(),
                "world loaded"
            );
            Ok(world)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "world rejected");
            Err(e)
        }
    }
}

/// Save a world to a file, picking the format from its extension.
///
/// The world is serialized in memory first so a failing encode leaves any
/// existing file untouched.
pub fn save_world(world: &BlockWorld, path: impl AsRef<Path>) -> Result<(), StoreError> {
    let path = path.as_ref();
    let format = MapFormat::from_path(path);
    let mut buf = Vec::new();
    write_world(world, &mut buf, format)?;
    std::fs::write(path, &buf)?;
    tracing::info!(path = %path.display(), ?format, bytes = buf.len(), "world saved");
    Ok(())
}
