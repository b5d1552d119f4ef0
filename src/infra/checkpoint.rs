// ============================================================
// Layer 6 — Artifact Store
// ============================================================
// Persists everything serving needs to reproduce training-time
// predictions, as one directory:
//
//   trained_model/
//     model.mpk           ← weights (Burn CompactRecorder)
//     model_config.json   ← RecommenderNetConfig, to rebuild the
//                           architecture before loading weights
//     index_maps.json     ← {"users": [...], "items": [...]}
//                           raw ids in dense-index order
//
// Saving is a full overwrite. Files are written to a sibling
// staging directory first. The previous artifact is renamed
// aside, the staging directory takes its place, and only then is
// the old copy deleted. A failed swap puts the old copy back.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use burn::{
    prelude::*,
    record::{CompactRecorder, FileRecorder, Recorder},
};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::index_map::IdIndex;
use crate::error::ArtifactError;
use crate::ml::model::{RecommenderNet, RecommenderNetConfig};

const MODEL_FILE:  &str = "model";
const CONFIG_FILE: &str = "model_config.json";
const INDEX_FILE:  &str = "index_maps.json";

/// File the recorder actually writes for MODEL_FILE.
fn weights_file() -> String {
    let ext = <CompactRecorder as FileRecorder<burn::backend::NdArray>>::file_extension();
    format!("{MODEL_FILE}.{ext}")
}

#[derive(Debug, Serialize, Deserialize)]
struct IndexMaps {
    users: IdIndex,
    items: IdIndex,
}

/// A model rebuilt from disk together with its index maps.
pub struct LoadedArtifact<B: Backend> {
    pub model:  RecommenderNet<B>,
    pub config: RecommenderNetConfig,
    pub users:  IdIndex,
    pub items:  IdIndex,
}

pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// True when a complete artifact is present.
    pub fn exists(&self) -> bool {
        let weights = weights_file();
        [weights.as_str(), CONFIG_FILE, INDEX_FILE]
            .iter()
            .all(|f| self.dir.join(f).is_file())
    }

    /// Write model, architecture and index maps, replacing any
    /// previous artifact in the same directory.
    pub fn save<B: Backend>(
        &self,
        model:  &RecommenderNet<B>,
        config: &RecommenderNetConfig,
        users:  &IdIndex,
        items:  &IdIndex,
    ) -> Result<(), ArtifactError> {
        if config.num_users != users.len() || config.num_items != items.len() {
            return Err(ArtifactError::Mismatch(format!(
                "model expects {}x{} ids, index maps hold {}x{}",
                config.num_users, config.num_items, users.len(), items.len()
            )));
        }

        let staging = self.sibling_dir("staging")?;
        if staging.exists() {
            fs::remove_dir_all(&staging).map_err(|e| io_err(&staging, e))?;
        }
        fs::create_dir_all(&staging).map_err(|e| io_err(&staging, e))?;

        // CompactRecorder appends its own extension
        let weights = staging.join(MODEL_FILE);
        CompactRecorder::new()
            .record(model.clone().into_record(), weights.clone())
            .map_err(|e| ArtifactError::Recorder { path: weights, reason: e.to_string() })?;

        write_json(&staging.join(CONFIG_FILE), config)?;
        write_json(
            &staging.join(INDEX_FILE),
            &IndexMaps { users: users.clone(), items: items.clone() },
        )?;

        self.swap_in(&staging)?;

        tracing::info!("Saved artifact to '{}'", self.dir.display());
        Ok(())
    }

    /// Rebuild the model and index maps saved by [`save`](Self::save).
    pub fn load<B: Backend>(&self, device: &B::Device) -> Result<LoadedArtifact<B>, ArtifactError> {
        let config: RecommenderNetConfig = read_json(&self.dir.join(CONFIG_FILE))?;
        let maps:   IndexMaps            = read_json(&self.dir.join(INDEX_FILE))?;

        if config.num_users != maps.users.len() || config.num_items != maps.items.len() {
            return Err(ArtifactError::Mismatch(format!(
                "'{}' describes {}x{} ids but index maps hold {}x{}",
                self.dir.display(),
                config.num_users, config.num_items,
                maps.users.len(), maps.items.len()
            )));
        }

        let weights = self.dir.join(MODEL_FILE);
        let record  = CompactRecorder::new()
            .load(weights.clone(), device)
            .map_err(|e| ArtifactError::Recorder { path: weights, reason: e.to_string() })?;

        let model = config.init::<B>(device).load_record(record);
        tracing::debug!("Loaded artifact from '{}'", self.dir.display());

        Ok(LoadedArtifact { model, config, users: maps.users, items: maps.items })
    }

    /// Replace `self.dir` with `staging`, keeping the previous
    /// artifact on disk until the new one is in place.
    fn swap_in(&self, staging: &Path) -> Result<(), ArtifactError> {
        let previous = self.sibling_dir("previous")?;
        if previous.exists() {
            fs::remove_dir_all(&previous).map_err(|e| io_err(&previous, e))?;
        }

        let had_previous = self.dir.exists();
        if had_previous {
            fs::rename(&self.dir, &previous).map_err(|e| io_err(&self.dir, e))?;
        }

        if let Err(e) = fs::rename(staging, &self.dir) {
            if had_previous {
                if let Err(restore) = fs::rename(&previous, &self.dir) {
                    tracing::error!(
                        "Cannot restore previous artifact from '{}': {}",
                        previous.display(),
                        restore
                    );
                }
            }
            return Err(io_err(&self.dir, e));
        }

        if had_previous {
            if let Err(e) = fs::remove_dir_all(&previous) {
                tracing::warn!("Cannot remove old artifact '{}': {}", previous.display(), e);
            }
        }
        Ok(())
    }

    /// `.<name>.<suffix>` next to the artifact directory.
    fn sibling_dir(&self, suffix: &str) -> Result<PathBuf, ArtifactError> {
        let name = self.dir.file_name().ok_or_else(|| {
            ArtifactError::Mismatch(format!(
                "artifact path '{}' has no directory name",
                self.dir.display()
            ))
        })?;
        Ok(self.dir.with_file_name(format!(".{}.{}", name.to_string_lossy(), suffix)))
    }
}

fn io_err(path: &Path, source: std::io::Error) -> ArtifactError {
    ArtifactError::Io { path: path.to_path_buf(), source }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ArtifactError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|source| ArtifactError::Json { path: path.to_path_buf(), source })?;
    fs::write(path, json).map_err(|e| io_err(path, e))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ArtifactError> {
    let json = fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    serde_json::from_str(&json)
        .map_err(|source| ArtifactError::Json { path: path.to_path_buf(), source })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn fixture() -> (RecommenderNet<TestBackend>, RecommenderNetConfig, IdIndex, IdIndex) {
        let device = Default::default();
        let config = RecommenderNetConfig::new(3, 2, 4, vec![6]);
        let model  = config.init::<TestBackend>(&device);
        (
            model,
            config,
            IdIndex::from_observed(["1", "2", "3"]),
            IdIndex::from_observed(["100", "200"]),
        )
    }

    #[test]
    fn test_save_then_load_restores_index_maps_and_shape() {
        let tmp   = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(tmp.path().join("trained_model"));
        let (model, config, users, items) = fixture();

        store.save(&model, &config, &users, &items).unwrap();
        assert!(store.exists());

        let loaded = store.load::<TestBackend>(&Default::default()).unwrap();
        assert_eq!(loaded.users, users);
        assert_eq!(loaded.items, items);
        assert_eq!(loaded.model.num_users(), 3);
        assert_eq!(loaded.model.num_items(), 2);
        assert_eq!(loaded.config.dense_units, vec![6]);
    }

    #[test]
    fn test_save_overwrites_previous_artifact() {
        let tmp   = tempfile::tempdir().unwrap();
        let dir   = tmp.path().join("trained_model");
        let store = ArtifactStore::new(&dir);
        let (model, config, users, items) = fixture();

        store.save(&model, &config, &users, &items).unwrap();
        fs::write(dir.join("stale.txt"), "old").unwrap();
        store.save(&model, &config, &users, &items).unwrap();

        assert!(!dir.join("stale.txt").exists());
        assert!(store.exists());
        assert!(!tmp.path().join(".trained_model.staging").exists());
        assert!(!tmp.path().join(".trained_model.previous").exists());
    }

    #[test]
    fn test_leftover_previous_dir_does_not_block_save() {
        let tmp   = tempfile::tempdir().unwrap();
        let dir   = tmp.path().join("trained_model");
        let store = ArtifactStore::new(&dir);
        let (model, config, users, items) = fixture();

        store.save(&model, &config, &users, &items).unwrap();
        fs::create_dir_all(tmp.path().join(".trained_model.previous")).unwrap();
        store.save(&model, &config, &users, &items).unwrap();

        assert!(store.exists());
        assert!(!tmp.path().join(".trained_model.previous").exists());
    }

    #[test]
    fn test_missing_weights_file_is_not_a_complete_artifact() {
        let tmp   = tempfile::tempdir().unwrap();
        let dir   = tmp.path().join("trained_model");
        let store = ArtifactStore::new(&dir);
        let (model, config, users, items) = fixture();

        store.save(&model, &config, &users, &items).unwrap();
        assert!(dir.join(weights_file()).is_file());

        fs::remove_file(dir.join(weights_file())).unwrap();
        assert!(!store.exists());
    }

    #[test]
    fn test_index_size_mismatch_is_rejected() {
        let tmp   = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(tmp.path().join("m"));
        let (model, config, users, _) = fixture();
        let wrong_items = IdIndex::from_observed(["only-one"]);

        assert!(matches!(
            store.save(&model, &config, &users, &wrong_items),
            Err(ArtifactError::Mismatch(_))
        ));
    }

    #[test]
    fn test_missing_artifact_is_io_error() {
        let tmp   = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(tmp.path().join("never-trained"));
        assert!(!store.exists());
        assert!(matches!(
            store.load::<TestBackend>(&Default::default()),
            Err(ArtifactError::Io { .. })
        ));
    }
}
