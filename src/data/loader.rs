// ============================================================
// Layer 4 — Ratings Loader
// ============================================================
// Reads the ratings table (and optionally the movie metadata
// table) from CSV with the `csv` crate, assigns dense indices
// and produces the train/test partitions.
//
// Expected ratings header:   userId,movieId,rating[,timestamp]
// Expected metadata header:  movieId,title[,genres][,release_date]
//
// Every stage returns a DataError instead of panicking; a
// missing file surfaces as DataError::Io, a malformed row as
// DataError::Csv naming the file.

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use crate::config::DataConfig;
use crate::data::{metadata::add_metadata, splitter::split_train_test};
use crate::domain::{
    index_map::IdIndex,
    rating::{IndexedRating, MovieMetadata, RatingRecord},
    traits::{MetadataSource, RatingSource},
};
use crate::error::DataError;

// ─── CSV Sources ──────────────────────────────────────────────────────────────

/// Reads `userId,movieId,rating[,timestamp]` rows from a CSV file.
pub struct CsvRatingSource {
    path: PathBuf,
}

impl CsvRatingSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RatingSource for CsvRatingSource {
    fn load_ratings(&self) -> Result<Vec<RatingRecord>, DataError> {
        let mut records = Vec::new();
        for (row, result) in open_csv(&self.path)?.deserialize::<RatingRecord>().enumerate() {
            let record = result.map_err(|source| DataError::Csv {
                path: self.path.clone(),
                source,
            })?;
            if !record.rating.is_finite() {
                return Err(DataError::InvalidRating {
                    path:   self.path.clone(),
                    row:    row + 1,
                    rating: record.rating,
                });
            }
            records.push(record);
        }
        tracing::debug!("Read {} ratings from '{}'", records.len(), self.path.display());
        Ok(records)
    }
}

/// Reads `movieId,title[,genres][,release_date]` rows from a CSV file.
pub struct CsvMetadataSource {
    path: PathBuf,
}

impl CsvMetadataSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MetadataSource for CsvMetadataSource {
    fn load_metadata(&self) -> Result<Vec<MovieMetadata>, DataError> {
        open_csv(&self.path)?
            .deserialize::<MovieMetadata>()
            .map(|result| {
                result.map_err(|source| DataError::Csv {
                    path: self.path.clone(),
                    source,
                })
            })
            .collect()
    }
}

fn open_csv(path: &Path) -> Result<csv::Reader<File>, DataError> {
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file))
}

// ─── Indexing ─────────────────────────────────────────────────────────────────

/// Assign dense indices to every user and item, in first-observed
/// order, and attach them to the rows.
pub fn index_ratings(records: Vec<RatingRecord>) -> (Vec<IndexedRating>, IdIndex, IdIndex) {
    let mut users = IdIndex::new();
    let mut items = IdIndex::new();

    let rows = records
        .into_iter()
        .map(|record| {
            let user = users.insert(&record.user_id);
            let item = items.insert(&record.item_id);
            IndexedRating { record, user, item, features: None }
        })
        .collect();

    (rows, users, items)
}

// ─── Full Load ────────────────────────────────────────────────────────────────

/// Output of the data stage: both partitions and the index maps
/// that produced their `user` / `item` columns.
#[derive(Debug, Clone)]
pub struct LoadedRatings {
    pub train: Vec<IndexedRating>,
    pub test:  Vec<IndexedRating>,
    pub users: IdIndex,
    pub items: IdIndex,
}

impl LoadedRatings {
    pub fn num_users(&self) -> usize {
        self.users.len()
    }

    pub fn num_items(&self) -> usize {
        self.items.len()
    }
}

/// Load, index, optionally enrich, and split the ratings table
/// described by `cfg`.
pub fn load_data(cfg: &DataConfig) -> Result<LoadedRatings, DataError> {
    let source  = CsvRatingSource::new(&cfg.path);
    let records = source.load_ratings()?;
    if records.is_empty() {
        return Err(DataError::Empty(PathBuf::from(&cfg.path)));
    }

    let (mut rows, users, items) = index_ratings(records);
    tracing::info!(
        "Indexed {} ratings: {} users, {} movies",
        rows.len(),
        users.len(),
        items.len()
    );

    if let Some(meta_path) = &cfg.metadata_path {
        let metadata = CsvMetadataSource::new(meta_path).load_metadata()?;
        let matched  = add_metadata(&mut rows, &metadata);
        tracing::info!("Joined metadata for {}/{} rows", matched, rows.len());
    }

    let (train, test) = split_train_test(rows, cfg.test_size, cfg.random_state)?;
    tracing::info!("Split: {} train, {} test", train.len(), test.len());

    Ok(LoadedRatings { train, test, users, items })
}
