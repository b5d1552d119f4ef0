// ============================================================
// Layer 4 — Metadata Join
// ============================================================
// Left-joins movie metadata onto indexed rating rows by
// `movieId` and derives two simple features:
//
//   release_year ← parsed from release_date
//   genre_count  ← number of '|' separated genres
//
// A date that cannot be parsed only loses `release_year`;
// the rest of the row and its other features are kept.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::collections::HashMap;

use crate::domain::rating::{IndexedRating, ItemFeatures, MovieMetadata};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%b-%Y", "%m/%d/%Y", "%Y/%m/%d"];

/// Extract the year from a free-text release date.
pub fn parse_release_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(date.year());
        }
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.year());
    }
    // A bare year, e.g. "1995"
    if raw.len() == 4 && raw.chars().all(|c| c.is_ascii_digit()) {
        return raw.parse().ok();
    }
    None
}

/// Count pipe-separated genres. Empty or missing → None.
pub fn genre_count(genres: Option<&str>) -> Option<usize> {
    let genres = genres?.trim();
    if genres.is_empty() {
        return None;
    }
    Some(genres.split('|').count())
}

/// Derive the per-item features for one metadata row.
pub fn derive_features(meta: &MovieMetadata) -> ItemFeatures {
    let release_year = meta.release_date.as_deref().and_then(|raw| {
        let year = parse_release_year(raw);
        if year.is_none() {
            tracing::debug!("Unparseable release date '{}' for movie {}", raw, meta.movie_id);
        }
        year
    });

    ItemFeatures {
        title:        meta.title.clone(),
        genres:       meta.genres.clone(),
        release_year,
        genre_count:  genre_count(meta.genres.as_deref()),
    }
}

/// Attach metadata features to every row whose movie has a
/// metadata entry. Returns the number of rows that matched.
pub fn add_metadata(rows: &mut [IndexedRating], metadata: &[MovieMetadata]) -> usize {
    let by_movie: HashMap<&str, ItemFeatures> = metadata
        .iter()
        .map(|m| (m.movie_id.as_str(), derive_features(m)))
        .collect();

    let mut matched = 0;
    for row in rows.iter_mut() {
        if let Some(features) = by_movie.get(row.record.item_id.as_str()) {
            row.features = Some(features.clone());
            matched += 1;
        }
    }

    if matched < rows.len() {
        tracing::warn!(
            "{} of {} rating rows have no metadata entry",
            rows.len() - matched,
            rows.len()
        );
    }
    matched
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rating::RatingRecord;

    fn movie(id: &str, genres: Option<&str>, date: Option<&str>) -> MovieMetadata {
        MovieMetadata {
            movie_id:     id.to_string(),
            title:        format!("Movie {id}"),
            genres:       genres.map(str::to_string),
            release_date: date.map(str::to_string),
        }
    }

    fn row(item: &str, idx: usize) -> IndexedRating {
        IndexedRating {
            record:   RatingRecord::new("u1", item, 4.0),
            user:     0,
            item:     idx,
            features: None,
        }
    }

    #[test]
    fn test_parse_release_year_formats() {
        assert_eq!(parse_release_year("1995-07-14"), Some(1995));
        assert_eq!(parse_release_year("01-Jan-1995"), Some(1995));
        assert_eq!(parse_release_year("07/14/1999"), Some(1999));
        assert_eq!(parse_release_year("2001"), Some(2001));
        assert_eq!(parse_release_year("not a date"), None);
        assert_eq!(parse_release_year(""), None);
    }

    #[test]
    fn test_genre_count() {
        assert_eq!(genre_count(Some("Action|Comedy|Drama")), Some(3));
        assert_eq!(genre_count(Some("Drama")), Some(1));
        assert_eq!(genre_count(Some("")), None);
        assert_eq!(genre_count(None), None);
    }

    #[test]
    fn test_bad_date_only_drops_year() {
        let features = derive_features(&movie("1", Some("Action|Sci-Fi"), Some("sometime")));
        assert_eq!(features.release_year, None);
        assert_eq!(features.genre_count, Some(2));
        assert_eq!(features.title, "Movie 1");
    }

    #[test]
    fn test_left_join_keeps_unmatched_rows() {
        let mut rows = vec![row("1", 0), row("2", 1), row("1", 0)];
        let meta     = vec![movie("1", Some("Drama"), Some("1994-09-23"))];

        let matched = add_metadata(&mut rows, &meta);
        assert_eq!(matched, 2);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].features.as_ref().unwrap().release_year, Some(1994));
        assert!(rows[1].features.is_none());
    }
}
