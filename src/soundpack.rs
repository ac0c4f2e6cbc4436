//! Sound pack discovery and sample resolution
//!
//! A sound pack is a directory of wav files: `space.wav` and `delete.wav`
//! for the dedicated key roles, `key1.wav`/`key2.wav` for generic keys.
//! Any subset may be missing, in which case that role is silently skipped
//! at playback time. A `default` pack always exists; if absent it is created
//! with empty placeholder files, which count as silent samples.
//!
//! Which samples exist is cached when a pack is loaded so the playback path
//! never stats the filesystem per keystroke.

use crate::error::PackError;
use crate::keys::KeyRole;
use rand::seq::SliceRandom;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Name of the always-present pack.
pub const DEFAULT_PACK: &str = "default";

const SPACE_SAMPLE: &str = "space.wav";
const DELETE_SAMPLE: &str = "delete.wav";
const GENERIC_SAMPLES: [&str; 2] = ["key1.wav", "key2.wav"];

/// File extensions recognized when importing a pack.
const AUDIO_EXTENSIONS: [&str; 1] = ["wav"];

/// An installed sound pack with its resolved sample paths.
///
/// Sample existence is checked once at load time. Empty files are the
/// silent-placeholder representation and are excluded, so resolving them
/// yields `None` instead of a decoder error.
#[derive(Debug, Clone)]
pub struct SoundPack {
    name: String,
    dir: PathBuf,
    space: Option<PathBuf>,
    delete: Option<PathBuf>,
    generic: Vec<PathBuf>,
}

impl SoundPack {
    /// Load a pack from a directory, caching which role samples are usable.
    pub fn load(name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let generic = GENERIC_SAMPLES
            .iter()
            .filter_map(|file| usable_sample(&dir.join(file)))
            .collect();

        Self {
            name: name.into(),
            space: usable_sample(&dir.join(SPACE_SAMPLE)),
            delete: usable_sample(&dir.join(DELETE_SAMPLE)),
            generic,
            dir,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve the sample for a key role.
    ///
    /// Space and delete map to their fixed-name samples; the generic role is
    /// a uniform-random choice among the usable generic samples. `None`
    /// means the pack does not define the role — a normal case, not an
    /// error.
    pub fn resolve(&self, role: KeyRole) -> Option<&Path> {
        match role {
            KeyRole::Space => self.space.as_deref(),
            KeyRole::Delete => self.delete.as_deref(),
            KeyRole::Generic => self
                .generic
                .choose(&mut rand::thread_rng())
                .map(PathBuf::as_path),
        }
    }

    /// True if the pack defines no usable sample at all.
    pub fn is_silent(&self) -> bool {
        self.space.is_none() && self.delete.is_none() && self.generic.is_empty()
    }
}

/// A sample is usable if it exists and is non-empty.
fn usable_sample(path: &Path) -> Option<PathBuf> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() && meta.len() > 0 => Some(path.to_path_buf()),
        _ => None,
    }
}

/// Registry of installed sound packs, keyed by name.
#[derive(Debug)]
pub struct SoundPackRegistry {
    base_dir: PathBuf,
    packs: HashMap<String, SoundPack>,
}

impl SoundPackRegistry {
    /// Discover installed packs under `base_dir`.
    ///
    /// Creates `base_dir` and the `default` pack (with empty placeholder
    /// samples for any missing file) if absent, then registers every other
    /// subdirectory as a pack. Unreadable entries are logged and skipped;
    /// only an unusable base directory fails discovery.
    pub fn discover(base_dir: impl Into<PathBuf>) -> Result<Self, PackError> {
        let base_dir = base_dir.into();

        std::fs::create_dir_all(&base_dir).map_err(|e| {
            PackError::Filesystem(format!("cannot create {}: {}", base_dir.display(), e))
        })?;

        let default_dir = base_dir.join(DEFAULT_PACK);
        ensure_default_pack(&default_dir)?;

        let mut packs = HashMap::new();
        packs.insert(
            DEFAULT_PACK.to_string(),
            SoundPack::load(DEFAULT_PACK, &default_dir),
        );

        let entries = std::fs::read_dir(&base_dir).map_err(|e| {
            PackError::Filesystem(format!("cannot read {}: {}", base_dir.display(), e))
        })?;

        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!("Skipping unreadable pack entry: {}", e);
                    continue;
                }
            };
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name == DEFAULT_PACK || !path.is_dir() {
                continue;
            }
            let pack = SoundPack::load(name, &path);
            if pack.is_silent() {
                tracing::debug!("Pack '{}' has no usable samples", name);
            }
            packs.insert(name.to_string(), pack);
        }

        tracing::info!(
            "Discovered {} sound pack(s) in {}",
            packs.len(),
            base_dir.display()
        );

        Ok(Self { base_dir, packs })
    }

    /// Look up a pack by name.
    pub fn get(&self, name: &str) -> Option<&SoundPack> {
        self.packs.get(name)
    }

    /// Registered pack names: `default` first, the rest sorted.
    pub fn names(&self) -> Vec<String> {
        let mut rest: Vec<String> = self
            .packs
            .keys()
            .filter(|n| n.as_str() != DEFAULT_PACK)
            .cloned()
            .collect();
        rest.sort();

        let mut names = Vec::with_capacity(rest.len() + 1);
        names.push(DEFAULT_PACK.to_string());
        names.extend(rest);
        names
    }

    pub fn len(&self) -> usize {
        self.packs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packs.is_empty()
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Import a pack: move every recognized audio file from `source` into a
    /// new subdirectory named after `source`'s base name.
    ///
    /// Fails with [`PackError::AlreadyExists`] if a pack of that name is
    /// already registered (or its directory already exists on disk), leaving
    /// the filesystem and registry untouched.
    pub fn add_pack(&mut self, source: &Path) -> Result<&SoundPack, PackError> {
        let name = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| PackError::InvalidSource(source.display().to_string()))?
            .to_string();

        if !source.is_dir() {
            return Err(PackError::InvalidSource(source.display().to_string()));
        }

        let dest = self.base_dir.join(&name);
        if self.packs.contains_key(&name) || dest.exists() {
            return Err(PackError::AlreadyExists(name));
        }

        std::fs::create_dir_all(&dest).map_err(|e| {
            PackError::Filesystem(format!("cannot create {}: {}", dest.display(), e))
        })?;

        let entries = std::fs::read_dir(source).map_err(|e| {
            PackError::Filesystem(format!("cannot read {}: {}", source.display(), e))
        })?;

        let mut moved = 0usize;
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() || !has_audio_extension(&path) {
                continue;
            }
            let Some(file_name) = path.file_name() else {
                continue;
            };
            let target = dest.join(file_name);
            move_file(&path, &target).map_err(|e| {
                PackError::Filesystem(format!("cannot move {}: {}", path.display(), e))
            })?;
            moved += 1;
        }

        tracing::info!("Added pack '{}' ({} sample file(s))", name, moved);

        let pack = SoundPack::load(&name, &dest);
        Ok(self.packs.entry(name).or_insert(pack))
    }
}

fn has_audio_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| AUDIO_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Move a file, falling back to copy+remove for cross-device sources.
fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    match std::fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(_) => {
            std::fs::copy(from, to)?;
            std::fs::remove_file(from)
        }
    }
}

/// Create the default pack directory and its placeholder samples.
///
/// Each of the four role files is created empty when missing; an empty file
/// reads as a silent sample and never reaches the decoder.
fn ensure_default_pack(default_dir: &Path) -> Result<(), PackError> {
    std::fs::create_dir_all(default_dir).map_err(|e| {
        PackError::Filesystem(format!("cannot create {}: {}", default_dir.display(), e))
    })?;

    let roles = [SPACE_SAMPLE, DELETE_SAMPLE, GENERIC_SAMPLES[0], GENERIC_SAMPLES[1]];
    for file in roles {
        let path = default_dir.join(file);
        if !path.exists() {
            std::fs::File::create(&path).map_err(|e| {
                PackError::Filesystem(format!("cannot create {}: {}", path.display(), e))
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_sample(dir: &Path, name: &str) {
        // Any non-empty bytes count as a usable sample for resolution
        fs::write(dir.join(name), b"RIFFdata").unwrap();
    }

    #[test]
    fn test_discover_creates_default_pack() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("sound_packs");

        let registry = SoundPackRegistry::discover(&base).unwrap();

        let default_dir = base.join("default");
        for file in ["space.wav", "delete.wav", "key1.wav", "key2.wav"] {
            assert!(default_dir.join(file).exists(), "missing {}", file);
        }
        assert!(registry.get("default").is_some());
    }

    #[test]
    fn test_default_placeholders_are_silent() {
        let tmp = tempfile::tempdir().unwrap();
        let registry = SoundPackRegistry::discover(tmp.path().join("packs")).unwrap();

        // Empty placeholder files resolve to nothing
        let pack = registry.get("default").unwrap();
        assert!(pack.resolve(KeyRole::Space).is_none());
        assert!(pack.resolve(KeyRole::Delete).is_none());
        assert!(pack.resolve(KeyRole::Generic).is_none());
        assert!(pack.is_silent());
    }

    #[test]
    fn test_discover_registers_extra_packs() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("packs");
        let clicky = base.join("clicky");
        fs::create_dir_all(&clicky).unwrap();
        write_sample(&clicky, "space.wav");
        write_sample(&clicky, "key1.wav");

        let registry = SoundPackRegistry::discover(&base).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.get("clicky").is_some());
        assert_eq!(registry.names(), vec!["default", "clicky"]);
    }

    #[test]
    fn test_role_mapping_is_deterministic() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        write_sample(dir, "space.wav");
        write_sample(dir, "delete.wav");
        write_sample(dir, "key1.wav");
        write_sample(dir, "key2.wav");

        let pack = SoundPack::load("t", dir);
        // Space and delete always resolve to their fixed samples, never a
        // generic one
        for _ in 0..20 {
            assert_eq!(
                pack.resolve(KeyRole::Space).unwrap(),
                dir.join("space.wav")
            );
            assert_eq!(
                pack.resolve(KeyRole::Delete).unwrap(),
                dir.join("delete.wav")
            );
        }
    }

    #[test]
    fn test_generic_choice_over_present_candidates() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        write_sample(dir, "key1.wav");
        write_sample(dir, "key2.wav");

        let pack = SoundPack::load("t", dir);
        let key1 = dir.join("key1.wav");
        let key2 = dir.join("key2.wav");
        for _ in 0..20 {
            let chosen = pack.resolve(KeyRole::Generic).unwrap();
            assert!(chosen == key1 || chosen == key2);
        }
    }

    #[test]
    fn test_generic_single_candidate_fallback() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        write_sample(dir, "key1.wav");

        let pack = SoundPack::load("t", dir);
        for _ in 0..10 {
            assert_eq!(
                pack.resolve(KeyRole::Generic).unwrap(),
                dir.join("key1.wav")
            );
        }
    }

    #[test]
    fn test_generic_absent_is_silent() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        write_sample(dir, "space.wav");

        let pack = SoundPack::load("t", dir);
        assert!(pack.resolve(KeyRole::Generic).is_none());
        assert!(!pack.is_silent());
    }

    #[test]
    fn test_add_pack_moves_wav_files() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("packs");
        let mut registry = SoundPackRegistry::discover(&base).unwrap();

        let source = tmp.path().join("Topre 45g");
        fs::create_dir_all(&source).unwrap();
        write_sample(&source, "space.wav");
        write_sample(&source, "key1.wav");
        fs::write(source.join("readme.txt"), "not audio").unwrap();

        let pack = registry.add_pack(&source).unwrap();
        assert_eq!(pack.name(), "Topre 45g");

        let dest = base.join("Topre 45g");
        assert!(dest.join("space.wav").exists());
        assert!(dest.join("key1.wav").exists());
        // Moved, not copied; non-audio files stay behind
        assert!(!source.join("space.wav").exists());
        assert!(source.join("readme.txt").exists());
        assert!(!dest.join("readme.txt").exists());

        assert!(registry.get("Topre 45g").is_some());
    }

    #[test]
    fn test_add_pack_already_exists_is_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("packs");
        let mut registry = SoundPackRegistry::discover(&base).unwrap();

        let source = tmp.path().join("clicky");
        fs::create_dir_all(&source).unwrap();
        write_sample(&source, "key1.wav");
        registry.add_pack(&source).unwrap();

        // Re-adding under the same name fails and moves nothing
        let source2 = tmp.path().join("other").join("clicky");
        fs::create_dir_all(&source2).unwrap();
        write_sample(&source2, "key2.wav");

        let before = registry.len();
        match registry.add_pack(&source2) {
            Err(PackError::AlreadyExists(name)) => assert_eq!(name, "clicky"),
            other => panic!("expected AlreadyExists, got {:?}", other.map(|p| p.name().to_string())),
        }
        assert_eq!(registry.len(), before);
        assert!(source2.join("key2.wav").exists());
        assert!(!base.join("clicky").join("key2.wav").exists());
    }

    #[test]
    fn test_add_pack_rejects_non_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let mut registry = SoundPackRegistry::discover(tmp.path().join("packs")).unwrap();

        let file = tmp.path().join("loose.wav");
        fs::write(&file, b"RIFF").unwrap();
        assert!(matches!(
            registry.add_pack(&file),
            Err(PackError::InvalidSource(_))
        ));
    }

    #[test]
    fn test_existing_default_files_are_kept() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("packs");
        let default_dir = base.join("default");
        fs::create_dir_all(&default_dir).unwrap();
        write_sample(&default_dir, "space.wav");

        let registry = SoundPackRegistry::discover(&base).unwrap();
        let pack = registry.get("default").unwrap();
        // The pre-existing non-empty sample survives and resolves
        assert_eq!(
            pack.resolve(KeyRole::Space).unwrap(),
            default_dir.join("space.wav")
        );
        // The other placeholders were filled in as silent files
        assert!(default_dir.join("key2.wav").exists());
        assert!(pack.resolve(KeyRole::Generic).is_none());
    }
}
