//!
//! src/aggregate.rs  Andrew Belles  Oct 5th, 2025
//!
//! Table level statistics over cleaned chart records: genre shares per
//! year, averages within an economic period, top artists and genres and
//! the genre/unemployment overlay. Every function is a pure query over the
//! slice it is handed
//!

use std::{cmp::Ordering, collections::BTreeMap};
use serde::Serialize;

use crate::clean::EconomicPeriod;
use crate::dataset::ChartRecord;
use crate::genre::GenreCategory;

/// Genres left out of the minor genre view
pub const MAJOR_GENRES: [GenreCategory; 4] = [
    GenreCategory::Pop,
    GenreCategory::EdmHouseDance,
    GenreCategory::RapAndHipHop,
    GenreCategory::NoGenreFound,
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreShare {
    pub year: i32,
    pub genre: GenreCategory,
    pub count: usize,
    pub proportion: f64
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreAverageShare {
    pub genre: GenreCategory,
    pub average_proportion: f64
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopEntry {
    pub year: i32,
    pub name: String,
    pub appearances: usize
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreMean {
    pub genre: GenreCategory,
    pub mean_appearances: f64
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayPoint {
    pub year: i32,
    pub genre_count: usize,
    pub year_total: usize,
    pub proportion: f64,
    pub unemployment_rate: Option<f64>,
    pub scaled_unemployment: Option<f64>
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnemploymentPoint {
    pub year: i32,
    pub unemployment: f64
}

fn is_placeholder(record: &&ChartRecord) -> bool {
    record.genre == GenreCategory::NoGenreFound
}

/// (year, genre) -> appearances, ordered by year then category order
fn count_year_genre<'a>(records: impl Iterator<Item = &'a ChartRecord>) ->
    BTreeMap<(i32, GenreCategory), usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry((record.year, record.genre)).or_insert(0) += 1;
    }
    counts
}

fn count_year<'a>(records: impl Iterator<Item = &'a ChartRecord>) -> BTreeMap<i32, usize> {
    let mut totals = BTreeMap::new();
    for record in records {
        *totals.entry(record.year).or_insert(0) += 1;
    }
    totals
}

/// Proportions of each year's total among the counted rows
fn shares_from_counts(counts: &BTreeMap<(i32, GenreCategory), usize>) -> Vec<GenreShare> {
    let mut totals: BTreeMap<i32, usize> = BTreeMap::new();
    for ((year, _), count) in counts {
        *totals.entry(*year).or_insert(0) += count;
    }
    shares_against(counts, &totals)
}

fn shares_against(
    counts: &BTreeMap<(i32, GenreCategory), usize>,
    totals: &BTreeMap<i32, usize>
) -> Vec<GenreShare> {
    counts.iter()
        .filter_map(|(&(year, genre), &count)| {
            let total = *totals.get(&year)?;
            (total > 0).then(|| GenreShare {
                year,
                genre,
                count,
                proportion: count as f64 / total as f64
            })
        })
        .collect()
}

/// Descending by value, category order on ties
fn by_value_desc(a: (f64, GenreCategory), b: (f64, GenreCategory)) -> Ordering {
    b.0.partial_cmp(&a.0)
        .unwrap_or(Ordering::Equal)
        .then(a.1.cmp(&b.1))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Share of every genre within its year, No Genre Found left out
pub fn genre_shares_by_year(records: &[ChartRecord]) -> Vec<GenreShare> {
    let counts = count_year_genre(records.iter().filter(|r| !is_placeholder(r)));
    shares_from_counts(&counts)
}

/// Per year share of one genre
pub fn genre_trend(records: &[ChartRecord], genre: GenreCategory) -> Vec<GenreShare> {
    genre_shares_by_year(records)
        .into_iter()
        .filter(|share| share.genre == genre)
        .collect()
}

/// Average per year share of each genre over the years that fall into
/// `period`. A genre is averaged over the years it appears in. Other has no
/// chart name and is left out of counts and totals alike
pub fn period_genre_shares(records: &[ChartRecord], period: EconomicPeriod) ->
    Vec<GenreAverageShare> {
    let in_period = records.iter()
        .filter(|r| !is_placeholder(r) && r.genre != GenreCategory::Other)
        .filter(|r| matches!(r.unemployment, Some(rate) if EconomicPeriod::from_rate(rate) == period));
    let shares = shares_from_counts(&count_year_genre(in_period));

    let mut sums: BTreeMap<GenreCategory, (f64, usize)> = BTreeMap::new();
    for share in &shares {
        let entry = sums.entry(share.genre).or_insert((0.0, 0));
        entry.0 += share.proportion;
        entry.1 += 1;
    }

    let mut averages: Vec<GenreAverageShare> = sums.into_iter()
        .map(|(genre, (sum, years))| GenreAverageShare {
            genre,
            average_proportion: sum / years as f64
        })
        .collect();
    averages.sort_by(|a, b| by_value_desc(
        (a.average_proportion, a.genre),
        (b.average_proportion, b.genre)
    ));
    averages
}

/// Highest count per year. Equal counts go to the alphabetically first name
fn top_per_year(pairs: impl Iterator<Item = (i32, String)>) -> Vec<TopEntry> {
    let mut counts: BTreeMap<i32, BTreeMap<String, usize>> = BTreeMap::new();
    for (year, name) in pairs {
        *counts.entry(year).or_default().entry(name).or_insert(0) += 1;
    }

    counts.into_iter()
        .filter_map(|(year, names)| {
            let mut best: Option<(String, usize)> = None;
            for (name, count) in names {
                match &best {
                    Some((_, top)) if count <= *top => {},
                    _ => best = Some((name, count)),
                }
            }
            best.map(|(name, appearances)| TopEntry { year, name, appearances })
        })
        .collect()
}

/// Most frequent artist per year, every artist of a shared credit counts
pub fn top_artists_by_year(records: &[ChartRecord]) -> Vec<TopEntry> {
    top_per_year(records.iter().flat_map(|r| {
        r.artists.names().iter().map(move |name| (r.year, name.clone()))
    }))
}

/// Most frequent genre per year, No Genre Found left out
pub fn top_genres_by_year(records: &[ChartRecord]) -> Vec<TopEntry> {
    top_per_year(records.iter()
        .filter(|r| !is_placeholder(r))
        .map(|r| (r.year, r.genre.label().to_string())))
}

/// Mean yearly appearances of each genre over the years it appears in,
/// rounded to 2 decimals
pub fn mean_genre_appearances(records: &[ChartRecord]) -> Vec<GenreMean> {
    let counts = count_year_genre(records.iter().filter(|r| !is_placeholder(r)));

    let mut per_genre: BTreeMap<GenreCategory, Vec<usize>> = BTreeMap::new();
    for ((_, genre), count) in counts {
        per_genre.entry(genre).or_default().push(count);
    }

    let mut means: Vec<GenreMean> = per_genre.into_iter()
        .map(|(genre, counts)| {
            let total: usize = counts.iter().sum();
            GenreMean {
                genre,
                mean_appearances: round2(total as f64 / counts.len() as f64)
            }
        })
        .collect();
    means.sort_by(|a, b| by_value_desc(
        (a.mean_appearances, a.genre),
        (b.mean_appearances, b.genre)
    ));
    means
}

/// Unemployment rate of each year present in the records
pub fn unemployment_by_year(records: &[ChartRecord]) -> Vec<UnemploymentPoint> {
    let mut rates: BTreeMap<i32, f64> = BTreeMap::new();
    for record in records {
        if let Some(rate) = record.unemployment {
            rates.entry(record.year).or_insert(rate);
        }
    }
    rates.into_iter()
        .map(|(year, unemployment)| UnemploymentPoint { year, unemployment })
        .collect()
}

/// Share of `genre` among all records of each year it appears in, next to
/// that year's unemployment rescaled by max proportion / max rate so both
/// fit on one axis
pub fn genre_unemployment_overlay(records: &[ChartRecord], genre: GenreCategory) ->
    Vec<OverlayPoint> {
    let totals = count_year(records.iter());
    let genre_counts = count_year(records.iter().filter(|r| r.genre == genre));
    let rates: BTreeMap<i32, f64> = unemployment_by_year(records)
        .into_iter()
        .map(|p| (p.year, p.unemployment))
        .collect();

    let mut points: Vec<OverlayPoint> = genre_counts.into_iter()
        .filter_map(|(year, genre_count)| {
            let year_total = *totals.get(&year)?;
            Some(OverlayPoint {
                year,
                genre_count,
                year_total,
                proportion: genre_count as f64 / year_total as f64,
                unemployment_rate: rates.get(&year).copied(),
                scaled_unemployment: None
            })
        })
        .collect();

    let max_proportion = points.iter().map(|p| p.proportion).fold(0.0, f64::max);
    let max_rate = points.iter()
        .filter_map(|p| p.unemployment_rate)
        .fold(0.0, f64::max);
    let scale = if max_rate > 0.0 { max_proportion / max_rate } else { 0.0 };

    for point in &mut points {
        point.scaled_unemployment = point.unemployment_rate.map(|rate| rate * scale);
    }
    points
}

/// Share of every genre outside Pop, EDM and Rap, measured against all
/// records of the year
pub fn minor_genre_shares(records: &[ChartRecord]) -> Vec<GenreShare> {
    let totals = count_year(records.iter());
    let counts = count_year_genre(
        records.iter().filter(|r| !MAJOR_GENRES.contains(&r.genre))
    );
    shares_against(&counts, &totals)
}
