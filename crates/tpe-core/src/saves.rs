use std::fs;
use std::path::{Path, PathBuf};

use crate::backup::backup_world;
use crate::error::Result;
use crate::path::{TagPath, read};
use crate::provider::{TreeProvider, WorldSelector};
use crate::tag::{Compound, TagNode};

/// Tree file inside each world folder.
pub const LEVEL_FILE: &str = "level.json";
/// Where a world keeps its display name.
pub const LEVEL_NAME_PATH: &str = "Data.LevelName";

pub fn is_world_dir(p: &Path) -> bool { p.is_dir() && p.join(LEVEL_FILE).is_file() }

pub fn list_worlds(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    if let Ok(rd) = fs::read_dir(root) {
        for e in rd.flatten() {
            let p = e.path();
            if is_world_dir(&p) { out.push(p); }
        }
    }
    out.sort(); out
}

/// One world folder with its tree loaded.
#[derive(Debug, Clone)]
pub struct World {
    folder: PathBuf,
    root: Compound,
}

impl World {
    pub fn new(folder: impl Into<PathBuf>, root: Compound) -> Self {
        Self { folder: folder.into(), root }
    }

    pub fn open(folder: &Path) -> Result<Self> {
        let data = fs::read(folder.join(LEVEL_FILE))?;
        let root: Compound = serde_json::from_slice(&data)?;
        Ok(Self::new(folder, root))
    }

    pub fn folder(&self) -> &Path { &self.folder }

    pub fn folder_name(&self) -> &str {
        self.folder.file_name().and_then(|s| s.to_str()).unwrap_or("")
    }

    /// The `Data.LevelName` string, if the tree has one.
    pub fn display_name(&self) -> Option<&str> {
        let path = TagPath::parse(LEVEL_NAME_PATH).ok()?;
        match read(&self.root, &path)? {
            TagNode::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn root(&self) -> &Compound { &self.root }

    pub fn root_mut(&mut self) -> &mut Compound { &mut self.root }

    /// Write the tree to the world's level file, creating the folder if needed.
    pub fn save(&self) -> Result<()> {
        fs::create_dir_all(&self.folder)?;
        let s = serde_json::to_string_pretty(&self.root)?;
        fs::write(self.folder.join(LEVEL_FILE), s)?;
        Ok(())
    }
}

/// A directory of world folders, usable as a [`TreeProvider`].
#[derive(Debug, Clone)]
pub struct SaveDir {
    root: PathBuf,
    current: Option<String>,
    backup_on_save: bool,
}

impl SaveDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), current: None, backup_on_save: false }
    }

    /// Folder name of the world that `current` resolves to.
    pub fn with_current(mut self, folder: Option<String>) -> Self {
        self.current = folder;
        self
    }

    /// Archive the world folder into `<root>/backups` before each persist.
    pub fn with_backup(mut self, on: bool) -> Self {
        self.backup_on_save = on;
        self
    }

    pub fn root(&self) -> &Path { &self.root }

    /// Every loadable world, in folder order. Unreadable worlds are skipped.
    pub fn worlds(&self) -> Vec<World> {
        let mut out = Vec::new();
        for p in list_worlds(&self.root) {
            match World::open(&p) {
                Ok(w) => out.push(w),
                Err(e) => tracing::warn!("skipping unreadable world {}: {}", p.display(), e),
            }
        }
        out
    }

    pub fn find_by_name(&self, name: &str) -> Option<World> {
        self.worlds().into_iter().find(|w| w.display_name() == Some(name))
    }

    pub fn find_by_folder(&self, folder: &str) -> Result<Option<World>> {
        let Some(p) = list_worlds(&self.root)
            .into_iter()
            .find(|p| p.file_name().and_then(|s| s.to_str()) == Some(folder))
        else {
            return Ok(None);
        };
        World::open(&p).map(Some)
    }
}

impl TreeProvider for SaveDir {
    type Tree = World;

    fn resolve(&self, world: &WorldSelector) -> Result<Option<World>> {
        match world {
            WorldSelector::Current => match &self.current {
                Some(folder) => self.find_by_folder(folder),
                None => {
                    tracing::debug!("no active world configured");
                    Ok(None)
                }
            },
            WorldSelector::Named(name) => {
                if let Some(w) = self.find_by_name(name) {
                    tracing::debug!("resolved '{}' by display name to {}", name, w.folder().display());
                    return Ok(Some(w));
                }
                self.find_by_folder(name)
            }
        }
    }

    fn root<'t>(&self, tree: &'t mut World) -> &'t mut Compound {
        tree.root_mut()
    }

    fn persist(&self, tree: &World) -> Result<()> {
        if self.backup_on_save {
            match backup_world(&self.root, tree)? {
                Some(zip) => tracing::info!("backup written to {}", zip.display()),
                None => tracing::debug!("{} not on disk yet, no backup taken", tree.folder().display()),
            }
        }
        tree.save()?;
        tracing::info!("saved {}", tree.folder().join(LEVEL_FILE).display());
        Ok(())
    }
}
