use std::{
    fs, io,
    path::{Path, PathBuf},
};

use shared::domain::Itinerary;
use thiserror::Error;
use tracing::{error, info};

use super::{document::parse_itinerary, sample::sample_itinerary};

/// Storage key of the last generated itinerary.
pub const GENERATED_ITINERARY_KEY: &str = "generated_itinerary";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Document(#[from] super::document::DocumentError),
}

/// Where the itinerary on screen came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentSource {
    Persisted,
    Sample,
    /// A persisted payload existed but could not be read or parsed.
    SampleAfterCorruptPayload,
}

#[derive(Debug, Clone)]
pub struct LoadedItinerary {
    pub itinerary: Itinerary,
    pub source: DocumentSource,
}

/// File-backed key/value slot for the generated itinerary.
#[derive(Debug, Clone)]
pub struct ItineraryStore {
    data_dir: PathBuf,
}

impl ItineraryStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.data_dir.join(format!("{GENERATED_ITINERARY_KEY}.json"))
    }

    pub fn read_raw(&self) -> Result<Option<String>, StoreError> {
        let path = self.path();
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(source) if source.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Read { path, source }),
        }
    }

    /// Persisted itinerary if there is a readable one, else the sample.
    pub fn load_or_sample(&self) -> LoadedItinerary {
        let raw = match self.read_raw() {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                return LoadedItinerary {
                    itinerary: sample_itinerary(),
                    source: DocumentSource::Sample,
                }
            }
            Err(error) => {
                error!(%error, "failed to read saved itinerary");
                return LoadedItinerary {
                    itinerary: sample_itinerary(),
                    source: DocumentSource::SampleAfterCorruptPayload,
                };
            }
        };

        match parse_itinerary(&raw) {
            Ok(itinerary) => {
                info!(days = itinerary.day_count(), "loaded saved itinerary");
                LoadedItinerary {
                    itinerary,
                    source: DocumentSource::Persisted,
                }
            }
            Err(error) => {
                error!(%error, "failed to parse saved itinerary");
                LoadedItinerary {
                    itinerary: sample_itinerary(),
                    source: DocumentSource::SampleAfterCorruptPayload,
                }
            }
        }
    }

    /// Validates `raw` and stores it verbatim under the itinerary key.
    pub fn write_raw(&self, raw: &str) -> Result<Itinerary, StoreError> {
        let itinerary = parse_itinerary(raw)?;
        fs::create_dir_all(&self.data_dir).map_err(|source| StoreError::Write {
            path: self.data_dir.clone(),
            source,
        })?;
        let path = self.path();
        fs::write(&path, raw).map_err(|source| StoreError::Write { path, source })?;
        Ok(itinerary)
    }

    /// Copies an itinerary file into the store.
    pub fn import_file(&self, source: &Path) -> Result<Itinerary, StoreError> {
        let raw = fs::read_to_string(source).map_err(|error| StoreError::Read {
            path: source.to_path_buf(),
            source: error,
        })?;
        let itinerary = self.write_raw(&raw)?;
        info!(from = %source.display(), "imported itinerary");
        Ok(itinerary)
    }
}

#[cfg(test)]
#[path = "../tests/store_tests.rs"]
mod tests;
