//! Binary model file with atomic replace

use crate::dataset::Feature;
use crate::error::{AgriError, Result};
use crate::inference::CropModel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Current envelope version
pub const FORMAT_VERSION: u32 = 1;

/// Magic bytes for AgriVerse model files
const MAGIC: [u8; 4] = [b'A', b'G', b'R', b'M'];

/// Envelope written to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Magic bytes for format detection
    pub magic: [u8; 4],
    /// Envelope version
    pub format_version: u32,
    /// Crate version that wrote the file
    pub crate_version: String,
    /// When the file was written
    pub created_at: DateTime<Utc>,
    /// Column order the model was fit with
    pub feature_names: Vec<String>,
    /// Bincode-encoded model
    pub model_data: Vec<u8>,
    /// FNV-1a hash of `model_data`
    pub checksum: u64,
}

impl ModelArtifact {
    /// Wrap an encoded model
    pub fn new(model: &CropModel) -> Result<Self> {
        let model_data = bincode::serialize(model)?;
        let checksum = Self::compute_checksum(&model_data);
        Ok(Self {
            magic: MAGIC,
            format_version: FORMAT_VERSION,
            crate_version: env!("CARGO_PKG_VERSION").to_string(),
            created_at: Utc::now(),
            feature_names: model.feature_names().to_vec(),
            model_data,
            checksum,
        })
    }

    fn compute_checksum(data: &[u8]) -> u64 {
        const FNV_OFFSET: u64 = 14695981039346656037;
        const FNV_PRIME: u64 = 1099511628211;

        let mut hash = FNV_OFFSET;
        for byte in data {
            hash ^= *byte as u64;
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        hash
    }

    /// Check the envelope and decode the model
    pub fn into_model(self) -> Result<CropModel> {
        if self.magic != MAGIC {
            return Err(AgriError::SerializationError(
                "not an AgriVerse model file".to_string(),
            ));
        }
        if self.format_version != FORMAT_VERSION {
            return Err(AgriError::SerializationError(format!(
                "unsupported format version {} (expected {})",
                self.format_version, FORMAT_VERSION
            )));
        }
        if self.feature_names != Feature::columns() {
            return Err(AgriError::SerializationError(format!(
                "feature order mismatch: {:?}",
                self.feature_names
            )));
        }
        if Self::compute_checksum(&self.model_data) != self.checksum {
            return Err(AgriError::SerializationError(
                "checksum verification failed - file may be corrupted".to_string(),
            ));
        }

        let model: CropModel = bincode::deserialize(&self.model_data)?;
        if model.feature_names() != self.feature_names.as_slice() {
            return Err(AgriError::SerializationError(
                "envelope and model disagree on feature order".to_string(),
            ));
        }
        Ok(model)
    }
}

/// Location of the persisted model.
///
/// Callers serialize access; [`crate::inference::CropPredictor`] only touches
/// the store while holding its initialization lock.
#[derive(Debug, Clone)]
pub struct ModelStore {
    path: PathBuf,
}

impl ModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Sibling file the next write goes to before it is renamed into place
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "model".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Write `model`, replacing any existing file in one rename
    pub fn save(&self, model: &CropModel) -> Result<()> {
        let artifact = ModelArtifact::new(model)?;
        let bytes = bincode::serialize(&artifact)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.temp_path();
        {
            let file = File::create(&tmp)?;
            let mut writer = BufWriter::new(file);
            writer.write_all(&bytes)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }

        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        debug!(path = %self.path.display(), bytes = bytes.len(), "Wrote model file");
        Ok(())
    }

    /// Read and verify the model file
    pub fn load(&self) -> Result<CropModel> {
        let file = File::open(&self.path)?;
        let mut reader = BufReader::new(file);
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;

        let artifact: ModelArtifact = bincode::deserialize(&bytes)?;
        artifact.into_model()
    }
}
