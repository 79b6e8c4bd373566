//!
//! src/collect.rs  Andrew Belles  Oct 4th, 2025
//!
//! Walks the raw chart listing, asks spotify for each song and its artist
//! genres and writes the enriched table consumed by the analysis side
//!

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::{HttpConfig, SpotifyConfig};
use crate::dataset::{read_rows, EnrichedChartRow, RawChartRow, GENRE_LIST_SEPARATOR};
use crate::errors::TrendsError;
use crate::fetch::{MetadataSource, SpotifyClient, SpotifyFetcher};
use crate::sink::CsvSink;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectStats {
    pub rows: usize,
    pub tracks_found: usize,
    pub with_genres: usize
}

/// Looks up a single row. Misses leave the spotify columns empty
pub async fn enrich_row<S>(source: &S, row: &RawChartRow) -> EnrichedChartRow
where
    S: MetadataSource + Sync + ?Sized
{
    let mut enriched = EnrichedChartRow {
        song: row.song.clone(),
        artist: row.artist.clone(),
        date: row.date.clone(),
        track_id: None,
        release_date: None,
        artist_id: None,
        genres: String::new(),
        genre: None
    };

    let Some(hit) = source.search_track(&row.song, &row.artist).await else {
        warn!(song = %row.song, artist = %row.artist, "collect.row.not_found");
        return enriched;
    };

    enriched.track_id = Some(hit.track_id.0.clone());
    enriched.release_date = hit.release_date.clone();

    if let Some(artist_id) = hit.artist_id {
        let genres = source.artist_genres(&artist_id).await;
        enriched.genre = genres.first().cloned();
        enriched.genres = genres.join(GENRE_LIST_SEPARATOR);
        enriched.artist_id = Some(artist_id.0);
    }

    debug!(
        song = %row.song,
        track = ?enriched.track_id,
        genre = ?enriched.genre,
        "collect.row"
    );
    enriched
}

/// Enriches rows one after another, in input order
pub async fn enrich_rows<S>(source: &S, rows: &[RawChartRow]) ->
    (Vec<EnrichedChartRow>, CollectStats)
where
    S: MetadataSource + Sync + ?Sized
{
    let mut stats = CollectStats { rows: rows.len(), ..Default::default() };
    let mut out = Vec::with_capacity(rows.len());

    for (idx, row) in rows.iter().enumerate() {
        let enriched = enrich_row(source, row).await;
        if enriched.track_id.is_some() {
            stats.tracks_found += 1;
        }
        if enriched.genre.is_some() {
            stats.with_genres += 1;
        }
        out.push(enriched);

        if (idx + 1) % 50 == 0 {
            info!(done = idx + 1, total = rows.len(), "collect.progress");
        }
    }
    (out, stats)
}

/// Reads `input`, enriches every row through spotify and writes `output`
pub async fn run_collect(
    http: &HttpConfig,
    spotify: &SpotifyConfig,
    input: &Path,
    output: &Path
) -> Result<CollectStats, TrendsError> {
    let rows: Vec<RawChartRow> = read_rows(input)?;
    info!(rows = rows.len(), input = %input.display(), "collect.start");

    let client  = SpotifyClient::new(http, spotify)?;
    let fetcher = SpotifyFetcher::connect(client).await?;

    let (enriched, stats) = enrich_rows(&fetcher, &rows).await;
    let path: PathBuf = CsvSink::new(output).write_rows(&enriched)?;

    info!(
        rows = stats.rows,
        found = stats.tracks_found,
        with_genres = stats.with_genres,
        output = %path.display(),
        "collect.done"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use async_trait::async_trait;
    use crate::types::{SpotifyArtistId, SpotifyTrackId, TrackLookup};

    /// In memory catalogue keyed by "song|artist"
    struct FakeCatalogue {
        tracks: HashMap<String, TrackLookup>,
        genres: HashMap<String, Vec<String>>
    }

    #[async_trait]
    impl MetadataSource for FakeCatalogue {
        async fn search_track(&self, song: &str, artist: &str) -> Option<TrackLookup> {
            self.tracks.get(&format!("{song}|{artist}")).cloned()
        }

        async fn artist_genres(&self, artist_id: &SpotifyArtistId) -> Vec<String> {
            self.genres.get(&artist_id.0).cloned().unwrap_or_default()
        }
    }

    fn catalogue() -> FakeCatalogue {
        let mut tracks = HashMap::new();
        tracks.insert("Umbrella|Rihanna feat. Jay-Z".to_string(), TrackLookup {
            track_id: SpotifyTrackId("t-umbrella".into()),
            release_date: Some("2007-03-29".into()),
            artist_id: Some(SpotifyArtistId("a-rihanna".into())),
        });
        tracks.insert("Obscure|Nobody".to_string(), TrackLookup {
            track_id: SpotifyTrackId("t-obscure".into()),
            release_date: None,
            artist_id: Some(SpotifyArtistId("a-nobody".into())),
        });

        let mut genres = HashMap::new();
        genres.insert("a-rihanna".to_string(), vec!["barbadian pop".to_string(), "pop".to_string()]);

        FakeCatalogue { tracks, genres }
    }

    fn raw(song: &str, artist: &str, date: &str) -> RawChartRow {
        RawChartRow { song: song.into(), artist: artist.into(), date: date.into() }
    }

    #[tokio::test]
    async fn enrich_fills_found_rows_and_leaves_misses_empty() {
        let source = catalogue();
        let rows = vec![
            raw("Umbrella", "Rihanna feat. Jay-Z", "2007-06-02"),
            raw("Missing", "Ghost", "2007-06-09"),
            raw("Obscure", "Nobody", "2007-06-16"),
        ];

        let (out, stats) = enrich_rows(&source, &rows).await;
        assert_eq!(stats, CollectStats { rows: 3, tracks_found: 2, with_genres: 1 });

        assert_eq!(out[0].track_id.as_deref(), Some("t-umbrella"));
        assert_eq!(out[0].genres, "barbadian pop;pop");
        assert_eq!(out[0].genre.as_deref(), Some("barbadian pop"));
        assert_eq!(out[0].date, "2007-06-02");

        assert_eq!(out[1].track_id, None);
        assert_eq!(out[1].genre, None);
        assert!(out[1].genres.is_empty());

        assert_eq!(out[2].artist_id.as_deref(), Some("a-nobody"));
        assert_eq!(out[2].genre, None);
    }

    #[tokio::test]
    async fn enrich_keeps_input_order() {
        let source = catalogue();
        let rows: Vec<RawChartRow> = (0..5)
            .map(|i| raw(&format!("song {i}"), "x", "2001-01-01"))
            .collect();
        let (out, _) = enrich_rows(&source, &rows).await;
        let songs: Vec<&str> = out.iter().map(|r| r.song.as_str()).collect();
        assert_eq!(songs, vec!["song 0", "song 1", "song 2", "song 3", "song 4"]);
    }
}
