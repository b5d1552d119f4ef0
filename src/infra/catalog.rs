// ============================================================
// Layer 6 — Movie Catalog
// ============================================================
// Serving receives movie titles, but the model's item index is
// keyed by movieId. The catalog bridges the two; it is read
// once at startup from the same movies.csv used for metadata.

use std::{collections::HashMap, path::Path};

use crate::data::loader::CsvMetadataSource;
use crate::domain::{rating::MovieMetadata, traits::MetadataSource};
use crate::error::DataError;

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    by_title: HashMap<String, String>,
}

impl Catalog {
    pub fn from_metadata(rows: impl IntoIterator<Item = MovieMetadata>) -> Self {
        let mut by_title = HashMap::new();
        for row in rows {
            if by_title.contains_key(&row.title) {
                tracing::warn!("Duplicate catalog title '{}'; keeping first movieId", row.title);
                continue;
            }
            by_title.insert(row.title, row.movie_id);
        }
        Self { by_title }
    }

    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let rows    = CsvMetadataSource::new(path.as_ref()).load_metadata()?;
        let catalog = Self::from_metadata(rows);
        tracing::info!("Catalog loaded: {} titles from '{}'", catalog.len(), path.as_ref().display());
        Ok(catalog)
    }

    /// movieId for an exact title match.
    pub fn movie_id(&self, title: &str) -> Option<&str> {
        self.by_title.get(title).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_title.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_title.is_empty()
    }
}
