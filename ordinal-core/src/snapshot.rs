//! Timestamped snapshots of generated HTML.
//!
//! Every `.html` file under the public directory is copied into the snapshot
//! directory at the same relative path, renamed `<stem>_<YYYYMMDD_HHMMSS>.html`.
//! A manifest next to the archives records where each copy came from, so a
//! restore does not depend on parsing file names. Archives without a manifest
//! record are still restorable from their name.

use crate::config::Config;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Manifest file name inside the snapshot directory
pub const MANIFEST_FILE: &str = "manifest.json";

/// `chrono` format of the timestamp suffix
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

static ARCHIVE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+)_(\d{8}_\d{6})\.html$").expect("archive name pattern"));

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid snapshot manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),
}

/// Where one archived copy came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    /// Archive path relative to the snapshot directory
    pub archived: PathBuf,
    /// Source path relative to the public directory
    pub original: PathBuf,
    pub timestamp: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Manifest {
    snapshots: Vec<SnapshotRecord>,
}

/// One archived file as shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    /// 1-based position in the listing
    pub index: usize,
    /// Path relative to the snapshot directory
    pub archived: PathBuf,
    /// Restore target relative to the public directory, if known
    pub original: Option<PathBuf>,
    pub timestamp: Option<String>,
}

impl std::fmt::Display for SnapshotEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}. {}", self.index, self.archived.display())
    }
}

/// Which archives a restore copies back
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreSelection {
    /// Every file from the most recent snapshot run
    Latest,
    /// Every archive whose relative path contains the token
    Matching(String),
    /// One archive, by path relative to the snapshot directory
    Entry(PathBuf),
}

/// Which archives a delete removes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteSelection {
    All,
    /// 1-based listing indices
    Indices(Vec<usize>),
}

impl DeleteSelection {
    /// Parse `all` or a comma-separated list of indices
    pub fn parse(input: &str) -> Result<Self, SnapshotError> {
        let input = input.trim().to_lowercase();
        if input == "all" {
            return Ok(Self::All);
        }

        let indices = input
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<usize>()
                    .map_err(|_| SnapshotError::InvalidSelection(part.trim().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::Indices(indices))
    }
}

/// Interactive decisions the snapshot commands need
pub trait SnapshotPrompt {
    /// Pick one entry to restore; `None` cancels
    fn choose(&mut self, entries: &[SnapshotEntry]) -> Option<usize>;

    /// Read a delete selection such as `all` or `1,3`; `None` cancels
    fn delete_selection(&mut self, entries: &[SnapshotEntry]) -> Option<String>;

    fn confirm(&mut self, message: &str) -> bool;
}

/// Snapshot operations over the configured public and snapshot directories
pub struct SnapshotStore {
    public_dir: PathBuf,
    snapshots_dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(config: &Config) -> Self {
        Self::with_dirs(config.public_dir(), config.snapshots_dir())
    }

    pub fn with_dirs(public_dir: impl Into<PathBuf>, snapshots_dir: impl Into<PathBuf>) -> Self {
        Self {
            public_dir: public_dir.into(),
            snapshots_dir: snapshots_dir.into(),
        }
    }

    /// Archive every generated HTML file
    pub fn snapshot_all(&self) -> Result<Vec<PathBuf>, SnapshotError> {
        self.snapshot_tree(&self.public_dir)
    }

    /// Archive one category's output subtree
    pub fn snapshot_category(&self, category: &str) -> Result<Vec<PathBuf>, SnapshotError> {
        let archived = self.snapshot_tree(&self.public_dir.join(category))?;
        if archived.is_empty() {
            tracing::warn!("No HTML files found for category `{}`", category);
        }
        Ok(archived)
    }

    fn snapshot_tree(&self, root: &Path) -> Result<Vec<PathBuf>, SnapshotError> {
        if !root.is_dir() {
            tracing::error!("Directory `{}` does not exist", root.display());
            return Ok(Vec::new());
        }

        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        let mut manifest = self.load_manifest()?;
        let mut archived = Vec::new();

        for entry in WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && is_html(e.path()))
        {
            let original = entry
                .path()
                .strip_prefix(&self.public_dir)
                .unwrap_or(entry.path())
                .to_path_buf();
            let rel = archive_name(&original, &timestamp);
            let dest = self.snapshots_dir.join(&rel);

            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &dest)?;
            tracing::info!("Snapshot created: {} -> {}", original.display(), dest.display());

            manifest.snapshots.retain(|r| r.archived != rel);
            manifest.snapshots.push(SnapshotRecord {
                archived: rel,
                original,
                timestamp: timestamp.clone(),
            });
            archived.push(dest);
        }

        self.save_manifest(&manifest)?;
        tracing::info!("Snapshot created for {} file(s)", archived.len());
        Ok(archived)
    }

    /// Archived files under the snapshot directory (or one category), sorted
    pub fn list(&self, category: Option<&str>) -> Result<Vec<SnapshotEntry>, SnapshotError> {
        let root = match category {
            Some(category) => self.snapshots_dir.join(category),
            None => self.snapshots_dir.clone(),
        };
        if !root.is_dir() {
            return Ok(Vec::new());
        }

        let manifest = self.load_manifest()?;
        let mut archived: Vec<PathBuf> = WalkDir::new(&root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && is_html(e.path()))
            .map(|e| {
                e.path()
                    .strip_prefix(&self.snapshots_dir)
                    .unwrap_or(e.path())
                    .to_path_buf()
            })
            .collect();
        archived.sort();

        Ok(archived
            .into_iter()
            .enumerate()
            .map(|(i, rel)| {
                let record = manifest.snapshots.iter().find(|r| r.archived == rel);
                let parsed = parse_archive_name(&rel);
                SnapshotEntry {
                    index: i + 1,
                    original: record
                        .map(|r| r.original.clone())
                        .or_else(|| parsed.as_ref().map(|(o, _)| o.clone())),
                    timestamp: record
                        .map(|r| r.timestamp.clone())
                        .or_else(|| parsed.map(|(_, t)| t)),
                    archived: rel,
                }
            })
            .collect())
    }

    /// Copy selected archives back into the public directory
    ///
    /// Returns the restored paths; restoring nothing is logged as a warning.
    pub fn restore(
        &self,
        category: Option<&str>,
        selection: &RestoreSelection,
    ) -> Result<Vec<PathBuf>, SnapshotError> {
        let source = category.map_or_else(|| self.snapshots_dir.clone(), |c| self.snapshots_dir.join(c));
        if !source.is_dir() {
            tracing::error!("Snapshot directory `{}` does not exist", source.display());
            return Ok(Vec::new());
        }

        let entries = self.list(category)?;
        let selected: Vec<&SnapshotEntry> = match selection {
            RestoreSelection::Latest => {
                let newest = entries.iter().filter_map(|e| e.timestamp.as_deref()).max();
                match newest {
                    Some(newest) => entries
                        .iter()
                        .filter(|e| e.timestamp.as_deref() == Some(newest))
                        .collect(),
                    None => Vec::new(),
                }
            }
            RestoreSelection::Matching(token) => entries
                .iter()
                .filter(|e| e.archived.to_string_lossy().contains(token.as_str()))
                .collect(),
            RestoreSelection::Entry(path) => entries.iter().filter(|e| &e.archived == path).collect(),
        };

        let mut restored = Vec::new();
        for entry in selected {
            let Some(original) = &entry.original else {
                tracing::warn!(
                    "Cannot tell where {} came from; skipping",
                    entry.archived.display()
                );
                continue;
            };

            let target = self.public_dir.join(original);
            if let Err(err) = self.copy_back(&entry.archived, &target) {
                tracing::error!(
                    "Failed to restore {} -> {}: {}",
                    entry.archived.display(),
                    target.display(),
                    err
                );
                continue;
            }
            tracing::info!("Restored: {} -> {}", entry.archived.display(), target.display());
            restored.push(target);
        }

        if restored.is_empty() {
            tracing::warn!("No files restored for selection {:?}", selection);
        } else {
            tracing::info!("Restored {} file(s)", restored.len());
        }
        Ok(restored)
    }

    /// Let the user pick one archive, then restore it
    pub fn restore_interactive(
        &self,
        category: Option<&str>,
        prompt: &mut dyn SnapshotPrompt,
    ) -> Result<Vec<PathBuf>, SnapshotError> {
        let entries = self.list(category)?;
        if entries.is_empty() {
            tracing::warn!("No snapshots found");
            return Ok(Vec::new());
        }

        match prompt.choose(&entries) {
            Some(index) => {
                let entry = entries
                    .iter()
                    .find(|e| e.index == index)
                    .ok_or_else(|| SnapshotError::InvalidSelection(index.to_string()))?;
                self.restore(category, &RestoreSelection::Entry(entry.archived.clone()))
            }
            None => {
                tracing::info!("Snapshot restoration cancelled");
                Ok(Vec::new())
            }
        }
    }

    /// Delete archives after confirmation
    ///
    /// Any index outside the listing rejects the whole selection before
    /// anything is removed. Returns how many files were deleted.
    pub fn delete(
        &self,
        selection: &DeleteSelection,
        prompt: &mut dyn SnapshotPrompt,
    ) -> Result<usize, SnapshotError> {
        let entries = self.list(None)?;
        if entries.is_empty() {
            tracing::warn!("No snapshots available to delete");
            return Ok(0);
        }

        let chosen: Vec<&SnapshotEntry> = match selection {
            DeleteSelection::All => entries.iter().collect(),
            DeleteSelection::Indices(indices) => {
                if indices.is_empty() {
                    return Err(SnapshotError::InvalidSelection(String::from("empty")));
                }
                let mut chosen = Vec::new();
                for &index in indices {
                    let entry = entries
                        .iter()
                        .find(|e| e.index == index)
                        .ok_or_else(|| SnapshotError::InvalidSelection(index.to_string()))?;
                    if !chosen.contains(&entry) {
                        chosen.push(entry);
                    }
                }
                chosen
            }
        };

        let message = match selection {
            DeleteSelection::All => String::from("Delete all snapshots?"),
            DeleteSelection::Indices(_) => format!("Delete {} selected snapshot(s)?", chosen.len()),
        };
        if !prompt.confirm(&message) {
            tracing::info!("Deletion cancelled");
            return Ok(0);
        }

        let mut manifest = self.load_manifest()?;
        for entry in &chosen {
            fs::remove_file(self.snapshots_dir.join(&entry.archived))?;
            manifest.snapshots.retain(|r| r.archived != entry.archived);
            tracing::info!("Deleted snapshot: {}", entry.archived.display());
        }
        self.save_manifest(&manifest)?;

        Ok(chosen.len())
    }

    /// Ask which archives to delete, then delete them
    pub fn delete_interactive(&self, prompt: &mut dyn SnapshotPrompt) -> Result<usize, SnapshotError> {
        let entries = self.list(None)?;
        if entries.is_empty() {
            tracing::warn!("No snapshots available to delete");
            return Ok(0);
        }

        let Some(input) = prompt.delete_selection(&entries) else {
            tracing::info!("Deletion cancelled");
            return Ok(0);
        };
        let selection = DeleteSelection::parse(&input)?;
        self.delete(&selection, prompt)
    }

    fn copy_back(&self, archived: &Path, target: &Path) -> std::io::Result<()> {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(self.snapshots_dir.join(archived), target)?;
        Ok(())
    }

    fn manifest_path(&self) -> PathBuf {
        self.snapshots_dir.join(MANIFEST_FILE)
    }

    fn load_manifest(&self) -> Result<Manifest, SnapshotError> {
        let path = self.manifest_path();
        if !path.exists() {
            return Ok(Manifest::default());
        }
        let text = fs::read_to_string(&path)?;
        match serde_json::from_str(&text) {
            Ok(manifest) => Ok(manifest),
            Err(err) => {
                tracing::warn!(
                    "Ignoring unreadable manifest {}: {}; falling back to file names",
                    path.display(),
                    err
                );
                Ok(Manifest::default())
            }
        }
    }

    fn save_manifest(&self, manifest: &Manifest) -> Result<(), SnapshotError> {
        fs::create_dir_all(&self.snapshots_dir)?;
        let text = serde_json::to_string_pretty(manifest)?;
        fs::write(self.manifest_path(), text)?;
        Ok(())
    }
}

fn is_html(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "html")
}

/// `dir/page.html` -> `dir/page_<timestamp>.html`
fn archive_name(original: &Path, timestamp: &str) -> PathBuf {
    let stem = original
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    original.with_file_name(format!("{}_{}.html", stem, timestamp))
}

/// `dir/page_<timestamp>.html` -> (`dir/page.html`, timestamp)
fn parse_archive_name(archived: &Path) -> Option<(PathBuf, String)> {
    let name = archived.file_name()?.to_str()?;
    let caps = ARCHIVE_NAME.captures(name)?;
    let original = archived.with_file_name(format!("{}.html", &caps[1]));
    Some((original, caps[2].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use tempfile::TempDir;

    /// Replays canned answers
    #[derive(Default)]
    struct Scripted {
        choices: VecDeque<Option<usize>>,
        selections: VecDeque<Option<String>>,
        confirms: VecDeque<bool>,
    }

    impl SnapshotPrompt for Scripted {
        fn choose(&mut self, _entries: &[SnapshotEntry]) -> Option<usize> {
            self.choices.pop_front().flatten()
        }

        fn delete_selection(&mut self, _entries: &[SnapshotEntry]) -> Option<String> {
            self.selections.pop_front().flatten()
        }

        fn confirm(&mut self, _message: &str) -> bool {
            self.confirms.pop_front().unwrap_or(false)
        }
    }

    fn store_with(files: &[(&str, &str)]) -> (TempDir, SnapshotStore) {
        let dir = tempfile::tempdir().unwrap();
        for (rel, content) in files {
            let path = dir.path().join("public").join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        let store = SnapshotStore::with_dirs(dir.path().join("public"), dir.path().join("snapshots"));
        (dir, store)
    }

    #[test]
    fn test_round_trip_restores_bytes() {
        let (dir, store) = store_with(&[("foo.html", "<p>original</p>")]);
        let foo = dir.path().join("public/foo.html");

        store.snapshot_all().unwrap();
        fs::write(&foo, "<p>changed</p>").unwrap();

        let restored = store.restore(None, &RestoreSelection::Latest).unwrap();
        assert_eq!(restored, vec![foo.clone()]);
        assert_eq!(fs::read_to_string(foo).unwrap(), "<p>original</p>");
    }

    #[test]
    fn test_archive_naming_mirrors_tree() {
        let (_dir, store) = store_with(&[("notes/a.html", "a"), ("index.html", "i"), ("style.css", "c")]);

        let archived = store.snapshot_all().unwrap();
        assert_eq!(archived.len(), 2);

        let entries = store.list(None).unwrap();
        let names: Vec<String> = entries
            .iter()
            .map(|e| e.archived.to_string_lossy().to_string())
            .collect();
        assert!(names[0].starts_with("index_"));
        assert!(names[1].starts_with("notes/a_"));
        assert!(ARCHIVE_NAME.is_match(entries[1].archived.file_name().unwrap().to_str().unwrap()));
        assert_eq!(entries[1].original, Some(PathBuf::from("notes/a.html")));
    }

    #[test]
    fn test_category_snapshot_and_restore() {
        let (dir, store) = store_with(&[("notes/a.html", "a"), ("articles/b.html", "b")]);

        let archived = store.snapshot_category("notes").unwrap();
        assert_eq!(archived.len(), 1);
        assert!(store.list(Some("articles")).unwrap().is_empty());

        fs::remove_file(dir.path().join("public/notes/a.html")).unwrap();
        let restored = store.restore(Some("notes"), &RestoreSelection::Latest).unwrap();
        assert_eq!(restored, vec![dir.path().join("public/notes/a.html")]);
    }

    #[test]
    fn test_restore_without_manifest_uses_file_name() {
        let (dir, store) = store_with(&[]);
        let archive = dir.path().join("snapshots/notes/page_20240101_120000.html");
        fs::create_dir_all(archive.parent().unwrap()).unwrap();
        fs::write(&archive, "old").unwrap();

        let restored = store
            .restore(None, &RestoreSelection::Matching("20240101".to_string()))
            .unwrap();
        assert_eq!(restored, vec![dir.path().join("public/notes/page.html")]);
    }

    #[test]
    fn test_restore_continues_past_failed_file() {
        let (dir, store) = store_with(&[("a/x.html", "x"), ("b/y.html", "y")]);
        store.snapshot_all().unwrap();

        let public = dir.path().join("public");
        fs::remove_dir_all(public.join("a")).unwrap();
        fs::write(public.join("a"), "not a directory").unwrap();
        fs::write(public.join("b/y.html"), "changed").unwrap();

        let restored = store.restore(None, &RestoreSelection::Latest).unwrap();
        assert_eq!(restored, vec![public.join("b/y.html")]);
        assert_eq!(fs::read_to_string(public.join("b/y.html")).unwrap(), "y");
    }

    #[test]
    fn test_corrupt_manifest_falls_back_to_file_names() {
        let (dir, store) = store_with(&[("notes/page.html", "v1")]);
        store.snapshot_all().unwrap();
        fs::write(dir.path().join("snapshots").join(MANIFEST_FILE), "{ truncated").unwrap();

        let entries = store.list(None).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].original, Some(PathBuf::from("notes/page.html")));

        fs::write(dir.path().join("public/notes/page.html"), "v2").unwrap();
        let restored = store.restore(None, &RestoreSelection::Latest).unwrap();
        assert_eq!(restored.len(), 1);
        assert_eq!(
            fs::read_to_string(dir.path().join("public/notes/page.html")).unwrap(),
            "v1"
        );

        assert_eq!(store.snapshot_all().unwrap().len(), 1);
    }

    #[test]
    fn test_restore_with_no_match_is_not_an_error() {
        let (_dir, store) = store_with(&[("foo.html", "x")]);
        store.snapshot_all().unwrap();

        let restored = store
            .restore(None, &RestoreSelection::Matching("19990101".to_string()))
            .unwrap();
        assert!(restored.is_empty());
    }

    #[test]
    fn test_missing_snapshot_directory_returns_early() {
        let (_dir, store) = store_with(&[]);
        assert!(store.restore(None, &RestoreSelection::Latest).unwrap().is_empty());
        assert!(store.snapshot_category("ghost").unwrap().is_empty());
    }

    #[test]
    fn test_interactive_restore_picks_one_entry() {
        let (dir, store) = store_with(&[("a.html", "a"), ("b.html", "b")]);
        store.snapshot_all().unwrap();
        fs::remove_file(dir.path().join("public/a.html")).unwrap();
        fs::remove_file(dir.path().join("public/b.html")).unwrap();

        let mut prompt = Scripted {
            choices: VecDeque::from([Some(2)]),
            ..Default::default()
        };
        let restored = store.restore_interactive(None, &mut prompt).unwrap();

        assert_eq!(restored, vec![dir.path().join("public/b.html")]);
        assert!(!dir.path().join("public/a.html").exists());
    }

    #[test]
    fn test_out_of_range_delete_removes_nothing() {
        let (_dir, store) = store_with(&[("a.html", "a"), ("b.html", "b")]);
        store.snapshot_all().unwrap();

        let mut prompt = Scripted {
            confirms: VecDeque::from([true]),
            ..Default::default()
        };
        let result = store.delete(&DeleteSelection::Indices(vec![1, 7]), &mut prompt);

        assert!(matches!(result, Err(SnapshotError::InvalidSelection(_))));
        assert_eq!(store.list(None).unwrap().len(), 2);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let (_dir, store) = store_with(&[("a.html", "a"), ("b.html", "b")]);
        store.snapshot_all().unwrap();

        let mut declined = Scripted {
            confirms: VecDeque::from([false]),
            ..Default::default()
        };
        assert_eq!(store.delete(&DeleteSelection::All, &mut declined).unwrap(), 0);
        assert_eq!(store.list(None).unwrap().len(), 2);

        let mut accepted = Scripted {
            selections: VecDeque::from([Some("1".to_string())]),
            confirms: VecDeque::from([true]),
            ..Default::default()
        };
        assert_eq!(store.delete_interactive(&mut accepted).unwrap(), 1);

        let remaining = store.list(None).unwrap();
        assert_eq!(remaining.len(), 1);
        assert!(remaining[0].archived.to_string_lossy().starts_with("b_"));
    }

    #[test]
    fn test_parse_delete_selection() {
        assert_eq!(DeleteSelection::parse(" ALL ").unwrap(), DeleteSelection::All);
        assert_eq!(
            DeleteSelection::parse("1, 3").unwrap(),
            DeleteSelection::Indices(vec![1, 3])
        );
        assert!(DeleteSelection::parse("one").is_err());
        assert!(DeleteSelection::parse("").is_err());
    }
}
