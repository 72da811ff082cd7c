//! Model persistence
//!
//! A trained [`crate::inference::CropModel`] is stored as one bincode file:
//! a versioned envelope carrying the feature order the model expects, an
//! integrity checksum and the encoded model itself.

mod serializer;

pub use serializer::{ModelArtifact, ModelStore, FORMAT_VERSION};
