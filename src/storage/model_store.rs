//! Versioned on-disk model store.
//!
//! Each saved bundle becomes one file named
//! `<prefix>[_filename]_<YYYYMMDD_HHMMSS>.<extension>` in the store
//! directory. The version is the timestamp; the latest model is the one
//! whose version sorts last. Files that do not match the pattern exactly
//! are ignored.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{LecternError, Result};
use crate::ml::bundle::{BundleVariant, ModelBundle};
use crate::storage::artifact;

/// Timestamp layout of a version identifier.
pub const VERSION_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Where and under which names the store keeps artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the artifacts.
    pub directory: PathBuf,
    /// File name prefix.
    pub prefix: String,
    /// File extension, without the dot.
    pub extension: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            directory: PathBuf::from("models"),
            prefix: "classifier_model".to_string(),
            extension: "bin".to_string(),
        }
    }
}

impl StoreConfig {
    pub fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() {
            return Err(LecternError::invalid_config("store prefix must not be empty"));
        }
        if self.extension.is_empty() || self.extension.contains(['.', '/', '\\']) {
            return Err(LecternError::invalid_config(format!(
                "invalid store extension '{}'",
                self.extension
            )));
        }
        Ok(())
    }
}

/// A model version: the second at which the bundle was saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModelVersion(NaiveDateTime);

impl ModelVersion {
    pub fn new(timestamp: NaiveDateTime) -> Self {
        // Versions have second resolution.
        ModelVersion(timestamp.with_nanosecond(0).unwrap_or(timestamp))
    }

    pub fn now() -> Self {
        Self::new(Local::now().naive_local())
    }

    /// Parse a `YYYYMMDD_HHMMSS` identifier.
    pub fn parse(s: &str) -> Result<Self> {
        if s.len() != 15 {
            return Err(LecternError::storage(format!("invalid model version '{s}'")));
        }
        NaiveDateTime::parse_from_str(s, VERSION_FORMAT)
            .map(ModelVersion)
            .map_err(|e| LecternError::storage(format!("invalid model version '{s}': {e}")))
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.0
    }

    /// The next version one second later.
    pub fn successor(&self) -> Self {
        ModelVersion(self.0 + TimeDelta::seconds(1))
    }
}

impl fmt::Display for ModelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(VERSION_FORMAT))
    }
}

impl std::str::FromStr for ModelVersion {
    type Err = LecternError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A bundle read back from the store.
#[derive(Debug, Clone)]
pub struct StoredModel {
    pub version: ModelVersion,
    pub path: PathBuf,
    pub bundle: ModelBundle,
}

/// Outcome of looking for the latest artifact.
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    Found(StoredModel),
    /// No usable artifact. Covers an empty or missing directory as well as
    /// a latest artifact that failed to decode.
    NotFound,
}

impl LoadOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, LoadOutcome::Found(_))
    }

    pub fn into_found(self) -> Option<StoredModel> {
        match self {
            LoadOutcome::Found(stored) => Some(stored),
            LoadOutcome::NotFound => None,
        }
    }
}

/// Saves and loads bundles of one variant.
#[derive(Debug, Clone)]
pub struct ModelStore {
    config: StoreConfig,
    variant: BundleVariant,
}

impl ModelStore {
    pub fn new(config: StoreConfig, variant: BundleVariant) -> Result<Self> {
        config.validate()?;
        Ok(ModelStore { config, variant })
    }

    pub fn directory(&self) -> &Path {
        &self.config.directory
    }

    pub fn variant(&self) -> BundleVariant {
        self.variant
    }

    /// File name stem shared by every artifact of this store's variant.
    fn stem(&self) -> String {
        match self.variant {
            BundleVariant::TextOnly => format!("{}_", self.config.prefix),
            BundleVariant::TextWithFilename => format!("{}_filename_", self.config.prefix),
        }
    }

    /// Path of the artifact for a version.
    pub fn path_for(&self, version: &ModelVersion) -> PathBuf {
        self.config.directory.join(format!(
            "{}{}.{}",
            self.stem(),
            version,
            self.config.extension
        ))
    }

    /// Version encoded in a file name, if the name belongs to this store.
    fn version_of(&self, file_name: &str) -> Option<ModelVersion> {
        let rest = file_name.strip_prefix(&self.stem())?;
        let version = rest.strip_suffix(&format!(".{}", self.config.extension))?;
        ModelVersion::parse(version).ok()
    }

    /// Save a bundle under the current local time.
    pub fn save(&self, bundle: &ModelBundle) -> Result<ModelVersion> {
        self.save_at(bundle, ModelVersion::now())
    }

    /// Save a bundle under a given version. If that version is taken, the
    /// next free second is used instead.
    pub fn save_at(&self, bundle: &ModelBundle, version: ModelVersion) -> Result<ModelVersion> {
        bundle.expect_variant(self.variant)?;
        fs::create_dir_all(&self.config.directory)?;

        let mut version = version;
        while self.path_for(&version).exists() {
            let next = version.successor();
            log::warn!("Model version {version} already exists; saving as {next}");
            version = next;
        }

        let bytes = artifact::encode(bundle)?;
        let path = self.path_for(&version);
        let temp_path = path.with_extension(format!("{}.tmp", self.config.extension));

        fs::write(&temp_path, &bytes)?;
        fs::rename(&temp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            LecternError::storage(format!("Failed to move artifact into place: {e}"))
        })?;

        log::info!("Model saved to {}", path.display());
        Ok(version)
    }

    /// All versions present in the directory, oldest first.
    pub fn list_versions(&self) -> Result<Vec<ModelVersion>> {
        let entries = match fs::read_dir(&self.config.directory) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut versions = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(version) = entry.file_name().to_str().and_then(|n| self.version_of(n)) {
                versions.push(version);
            }
        }

        versions.sort();
        Ok(versions)
    }

    /// The newest version, if any.
    pub fn latest_version(&self) -> Result<Option<ModelVersion>> {
        Ok(self.list_versions()?.pop())
    }

    /// Load the newest artifact.
    ///
    /// An unreadable store directory or a damaged latest artifact is logged
    /// and reported as [`LoadOutcome::NotFound`]; older versions are not
    /// tried. An intact artifact of another variant is an error.
    pub fn load_latest(&self) -> Result<LoadOutcome> {
        let latest = match self.latest_version() {
            Ok(latest) => latest,
            Err(e) => {
                log::error!(
                    "Failed to scan model directory {}: {e}",
                    self.config.directory.display()
                );
                return Ok(LoadOutcome::NotFound);
            }
        };
        let Some(version) = latest else {
            log::info!(
                "No {} model found in {}",
                self.variant,
                self.config.directory.display()
            );
            return Ok(LoadOutcome::NotFound);
        };

        match self.load_version(version) {
            Ok(stored) => Ok(LoadOutcome::Found(stored)),
            Err(e @ LecternError::BundleVariantMismatch { .. }) => Err(e),
            Err(e) => {
                log::error!(
                    "Failed to load model {}: {e}",
                    self.path_for(&version).display()
                );
                Ok(LoadOutcome::NotFound)
            }
        }
    }

    /// Load a specific version.
    pub fn load_version(&self, version: ModelVersion) -> Result<StoredModel> {
        let path = self.path_for(&version);
        let bytes = fs::read(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                LecternError::not_found(format!("no model at {}", path.display()))
            }
            _ => e.into(),
        })?;

        let bundle = artifact::decode(&bytes, self.variant)?;
        log::info!("Model loaded from {}", path.display());

        Ok(StoredModel {
            version,
            path,
            bundle,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::bundle::testing::sample_bundle;
    use tempfile::TempDir;

    fn store(dir: &Path, variant: BundleVariant) -> ModelStore {
        let config = StoreConfig {
            directory: dir.to_path_buf(),
            ..StoreConfig::default()
        };
        ModelStore::new(config, variant).unwrap()
    }

    fn version(s: &str) -> ModelVersion {
        ModelVersion::parse(s).unwrap()
    }

    #[test]
    fn test_version_parsing() {
        let v = version("20240102_030405");
        assert_eq!(v.to_string(), "20240102_030405");
        assert_eq!(v.successor().to_string(), "20240102_030406");
        assert!(ModelVersion::parse("2024010_030405").is_err());
        assert!(ModelVersion::parse("20241302_030405").is_err());
        assert!(ModelVersion::parse("latest").is_err());
    }

    #[test]
    fn test_save_and_load_latest() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(temp_dir.path(), BundleVariant::TextOnly);
        let bundle = sample_bundle(BundleVariant::TextOnly);

        store.save_at(&bundle, version("20240101_000000")).unwrap();
        store.save_at(&bundle, version("20240102_000000")).unwrap();

        assert!(temp_dir.path().join("classifier_model_20240102_000000.bin").exists());

        let stored = store.load_latest().unwrap().into_found().unwrap();
        assert_eq!(stored.version, version("20240102_000000"));
        assert_eq!(stored.bundle.classes(), bundle.classes());
    }

    #[test]
    fn test_same_second_saves_do_not_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(temp_dir.path(), BundleVariant::TextOnly);
        let bundle = sample_bundle(BundleVariant::TextOnly);

        let first = store.save_at(&bundle, version("20240101_000000")).unwrap();
        let second = store.save_at(&bundle, version("20240101_000000")).unwrap();

        assert_eq!(second, first.successor());
        assert_eq!(store.list_versions().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_directory_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir.path().join("absent"), BundleVariant::TextOnly);

        assert!(store.list_versions().unwrap().is_empty());
        assert!(!store.load_latest().unwrap().is_found());
    }

    #[test]
    fn test_unreadable_directory_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let not_a_dir = temp_dir.path().join("models");
        fs::write(&not_a_dir, b"plain file").unwrap();
        let store = store(&not_a_dir, BundleVariant::TextOnly);

        assert!(store.list_versions().is_err());
        assert!(!store.load_latest().unwrap().is_found());
    }

    #[test]
    fn test_foreign_files_are_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(temp_dir.path(), BundleVariant::TextOnly);
        for name in [
            "classifier_model_latest.bin",
            "classifier_model_20240101.bin",
            "classifier_model_20240101_000000.pkl",
            "notes.txt",
        ] {
            fs::write(temp_dir.path().join(name), b"x").unwrap();
        }

        assert!(store.list_versions().unwrap().is_empty());
    }

    #[test]
    fn test_variants_use_separate_namespaces() {
        let temp_dir = TempDir::new().unwrap();
        let text = store(temp_dir.path(), BundleVariant::TextOnly);
        let serving = store(temp_dir.path(), BundleVariant::TextWithFilename);

        serving
            .save_at(&sample_bundle(BundleVariant::TextWithFilename), version("20240101_000000"))
            .unwrap();

        assert!(text.list_versions().unwrap().is_empty());
        assert_eq!(serving.list_versions().unwrap().len(), 1);
    }

    #[test]
    fn test_save_rejects_other_variant() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(temp_dir.path(), BundleVariant::TextOnly);
        let result = store.save(&sample_bundle(BundleVariant::TextWithFilename));
        assert!(matches!(result, Err(LecternError::BundleVariantMismatch { .. })));
    }

    #[test]
    fn test_misplaced_artifact_is_a_variant_mismatch() {
        let temp_dir = TempDir::new().unwrap();
        let serving = store(temp_dir.path(), BundleVariant::TextWithFilename);
        let bytes = artifact::encode(&sample_bundle(BundleVariant::TextOnly)).unwrap();
        fs::write(serving.path_for(&version("20240101_000000")), bytes).unwrap();

        assert!(matches!(
            serving.load_latest(),
            Err(LecternError::BundleVariantMismatch {
                expected: BundleVariant::TextWithFilename,
                found: BundleVariant::TextOnly
            })
        ));
    }

    #[test]
    fn test_corrupt_latest_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(temp_dir.path(), BundleVariant::TextOnly);
        store
            .save_at(&sample_bundle(BundleVariant::TextOnly), version("20240101_000000"))
            .unwrap();
        fs::write(store.path_for(&version("20240102_000000")), b"not a model").unwrap();

        assert!(!store.load_latest().unwrap().is_found());
    }
}
