// World backups, taken before a save overwrites the level file.
// Archives live in `<saves>/backups/<folder>_<timestamp>.zip`. Each one holds
// the world folder as it was on disk under `<folder>/`, plus a `backup.json`
// manifest naming the world.
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::write::FileOptions;

use crate::error::Result;
use crate::saves::{LEVEL_FILE, World};

/// Folder under the saves root that holds world backups.
pub const BACKUP_DIR: &str = "backups";
/// Manifest entry written at the top of every archive.
pub const MANIFEST_ENTRY: &str = "backup.json";

/// Archive `world`'s folder into the saves root's backup folder.
///
/// Returns `None` when the world has never been written to disk, since there
/// is nothing to protect yet.
pub fn backup_world(saves_root: &Path, world: &World) -> Result<Option<PathBuf>> {
    let folder = world.folder();
    if !folder.join(LEVEL_FILE).is_file() {
        return Ok(None);
    }
    let dir = saves_root.join(BACKUP_DIR);
    fs::create_dir_all(&dir)?;
    let now = chrono::Local::now();
    let dest = dir.join(format!(
        "{}_{}.zip",
        world.folder_name(),
        now.format("%Y%m%d-%H%M%S%.3f")
    ));

    let mut zip = zip::ZipWriter::new(fs::File::create(&dest)?);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let manifest = serde_json::json!({
        "folder": world.folder_name(),
        "name": world.display_name(),
        "level_file": LEVEL_FILE,
        "created": now.to_rfc3339(),
    });
    zip.start_file(MANIFEST_ENTRY, options)?;
    zip.write_all(serde_json::to_string_pretty(&manifest)?.as_bytes())?;

    for entry in WalkDir::new(folder).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(folder) else { continue };
        let name = format!(
            "{}/{}",
            world.folder_name(),
            rel.to_string_lossy().replace('\\', "/")
        );
        zip.start_file(name, options)?;
        zip.write_all(&fs::read(entry.path())?)?;
    }
    zip.finish()?;
    Ok(Some(dest))
}

/// Backups of the world in `folder`, oldest first.
pub fn list_backups(saves_root: &Path, folder: &str) -> Vec<PathBuf> {
    let prefix = format!("{}_", folder);
    let mut out: Vec<PathBuf> = fs::read_dir(saves_root.join(BACKUP_DIR))
        .into_iter()
        .flatten()
        .flatten()
        .map(|e| e.path())
        .filter(|p| {
            p.extension().and_then(|s| s.to_str()) == Some("zip")
                && p.file_name()
                    .and_then(|s| s.to_str())
                    .is_some_and(|n| n.starts_with(&prefix))
        })
        .collect();
    out.sort();
    out
}
