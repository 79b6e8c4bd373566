//!
//! src/dataset.rs  Andrew Belles  Oct 4th, 2025
//!
//! Reads the chart and unemployment csv files and joins them on year into
//! the cleaned records every aggregation runs over
//!

use std::{collections::BTreeMap, fs::File, path::Path};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{info, warn};

use crate::clean::{clean_year, split_artists, ArtistList};
use crate::config::DataConfig;
use crate::errors::TrendsError;
use crate::genre::{categorize_genre, GenreCategory};

/// One line of the raw top 40 listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawChartRow {
    pub song: String,
    pub artist: String,
    pub date: String
}

/// Raw listing plus what spotify knew about it. `genres` is the artist tag
/// list joined by ';' and `genre` its first entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedChartRow {
    pub song: String,
    pub artist: String,
    pub date: String,
    pub track_id: Option<String>,
    pub release_date: Option<String>,
    pub artist_id: Option<String>,
    #[serde(default)]
    pub genres: String,
    pub genre: Option<String>
}

pub const GENRE_LIST_SEPARATOR: &str = ";";

impl EnrichedChartRow {
    pub fn genre_list(&self) -> Vec<&str> {
        self.genres.split(GENRE_LIST_SEPARATOR)
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
struct UnemploymentRow {
    year: String,
    unemployment: Option<f64>
}

/// A cleaned chart appearance joined with the unemployment of its year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRecord {
    pub song: String,
    pub artist_credit: String,
    pub artists: ArtistList,
    pub genre: GenreCategory,
    pub year: i32,
    pub unemployment: Option<f64>
}

impl ChartRecord {
    pub fn new(
        song: &str,
        artist_credit: &str,
        raw_genre: Option<&str>,
        year: i32,
        unemployment: Option<f64>
    ) -> Self {
        Self {
            song: song.to_string(),
            artist_credit: artist_credit.to_string(),
            artists: split_artists(artist_credit),
            genre: categorize_genre(raw_genre),
            year,
            unemployment
        }
    }
}

/// Parses the year of a date cell, None when the leading part is not numeric
pub fn parse_year(date: &str) -> Option<i32> {
    clean_year(date.trim()).trim().parse::<i32>().ok()
}

/// Reads every row that deserializes, unreadable rows are logged and skipped
pub fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, TrendsError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => TrendsError::NotFound(path.display().to_string()),
        _ => TrendsError::Csv(format!("open {}: {e}", path.display())),
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut rows = Vec::new();
    for (idx, result) in reader.deserialize::<T>().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => {
                // +2: header line and 1-based numbering
                warn!(path = %path.display(), line = idx + 2, error = %e, "dataset.row.skip");
            }
        }
    }
    Ok(rows)
}

/// year -> unemployment rate, rows without a numeric year or rate are dropped
pub fn read_unemployment(path: &Path) -> Result<BTreeMap<i32, f64>, TrendsError> {
    let rows: Vec<UnemploymentRow> = read_rows(path)?;
    let mut table = BTreeMap::new();
    for row in rows {
        let (Some(year), Some(rate)) = (parse_year(&row.year), row.unemployment) else {
            warn!(year = %row.year, "dataset.unemployment.skip");
            continue;
        };
        if let Some(previous) = table.insert(year, rate) {
            warn!(year, previous, rate, "dataset.unemployment.duplicate");
        }
    }
    Ok(table)
}

/// Cleans chart rows and joins the unemployment table on the chart year
pub fn build_records(
    rows: &[EnrichedChartRow],
    unemployment: &BTreeMap<i32, f64>
) -> Vec<ChartRecord> {
    rows.iter()
        .filter_map(|row| {
            let Some(year) = parse_year(&row.date) else {
                warn!(song = %row.song, date = %row.date, "dataset.year.skip");
                return None;
            };
            // the primary tag column wins, the tag list covers hand edited rows
            let tags = row.genre_list();
            let raw_genre = row.genre.as_deref()
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .or_else(|| tags.first().copied());
            Some(ChartRecord::new(
                &row.song,
                &row.artist,
                raw_genre,
                year,
                unemployment.get(&year).copied()
            ))
        })
        .collect()
}

pub fn load_records(data: &DataConfig) -> Result<Vec<ChartRecord>, TrendsError> {
    let rows: Vec<EnrichedChartRow> = read_rows(&data.charts)?;
    let unemployment = read_unemployment(&data.unemployment)?;
    let records = build_records(&rows, &unemployment);

    let unmatched = records.iter().filter(|r| r.unemployment.is_none()).count();
    info!(
        rows = rows.len(),
        records = records.len(),
        years = unemployment.len(),
        unmatched,
        "dataset.loaded"
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn parse_year_variants() {
        assert_eq!(parse_year("2015-06-01"), Some(2015));
        assert_eq!(parse_year(" 2009 "), Some(2009));
        assert_eq!(parse_year("June 2009"), None);
        assert_eq!(parse_year(""), None);
    }

    #[test]
    fn records_join_on_year() -> Result<(), TrendsError> {
        let dir = tempfile::tempdir()?;
        let charts = write_file(&dir, "charts.csv", "\
song,artist,date,track_id,release_date,artist_id,genres,genre
Umbrella,Rihanna feat. Jay-Z,2007-06-02,t1,2007-03-29,a1,dance pop;pop,dance pop
Ruby,Kaiser Chiefs,2007-02-24,,,,,
Nope,Someone,unknown,,,,,
Shout,Dizzee Rascal & James Corden,2010-06-12,t3,2010-06-06,a3,grime,grime
");
        let unemployment = write_file(&dir, "unemployment.csv", "\
year,unemployment
2007,5.3
2008,
2009,7.6
");
        let data = DataConfig {
            raw_charts: dir.path().join("unused.csv"),
            charts,
            unemployment,
            plots_dir: dir.path().join("plots"),
        };

        let records = load_records(&data)?;
        assert_eq!(records.len(), 3);

        let umbrella = &records[0];
        assert_eq!(umbrella.year, 2007);
        assert_eq!(umbrella.genre, GenreCategory::EdmHouseDance);
        assert_eq!(umbrella.unemployment, Some(5.3));
        assert_eq!(umbrella.artists.names(), ["rihanna", "jay-z"]);

        let ruby = &records[1];
        assert_eq!(ruby.genre, GenreCategory::NoGenreFound);

        let shout = &records[2];
        assert_eq!(shout.year, 2010);
        assert_eq!(shout.unemployment, None);
        Ok(())
    }

    #[test]
    fn unemployment_skips_bad_rows() -> Result<(), TrendsError> {
        let dir = tempfile::tempdir()?;
        let path = write_file(&dir, "u.csv", "\
year,unemployment
2000,5.4
2001,not-a-number
abc,3.0
2002,5.2
");
        let table = read_unemployment(&path)?;
        assert_eq!(table.into_iter().collect::<Vec<_>>(), vec![(2000, 5.4), (2002, 5.2)]);
        Ok(())
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = read_rows::<RawChartRow>(Path::new("/definitely/not/here.csv"));
        assert!(matches!(result, Err(TrendsError::NotFound(_))));
    }

    #[test]
    fn genre_list_splits_tags() {
        let row = EnrichedChartRow {
            song: "s".into(), artist: "a".into(), date: "2001".into(),
            track_id: None, release_date: None, artist_id: None,
            genres: "uk pop; boy band ;".into(),
            genre: Some("uk pop".into()),
        };
        assert_eq!(row.genre_list(), vec!["uk pop", "boy band"]);
    }

    #[test]
    fn tag_list_backs_up_missing_primary_genre() {
        let row = EnrichedChartRow {
            song: "s".into(), artist: "a".into(), date: "2001-05-05".into(),
            track_id: None, release_date: None, artist_id: None,
            genres: "uk pop;boy band".into(),
            genre: Some("  ".into()),
        };
        let records = build_records(&[row], &BTreeMap::from([(2001, 5.1)]));
        assert_eq!(records[0].genre, GenreCategory::Pop);
        assert_eq!(records[0].unemployment, Some(5.1));
    }
}
