//!
//! src/clean.rs  Andrew Belles  Oct 3rd, 2025
//!
//! Row level cleaning of chart credits, dates and unemployment rates
//!

use std::fmt;
use serde::Serialize;

/// Tokens that join several artists in one chart credit. Applied in order,
/// so "featuring" is consumed before "feat"
pub const ARTIST_SEPARATORS: [&str; 8] = [
    "featuring", " vs", " ft", "feat.", "feat", " and", "&", "/"
];

/// Lowercased, trimmed artist names of one credit, never empty strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArtistList(Vec<String>);

impl ArtistList {
    pub fn names(&self) -> &[String] {
        &self.0
    }
}

/// Splits a credit such as "A feat. B & C" into its artists.
/// A separator hiding inside a real name ("Florence and the Machine") splits
/// it as well
pub fn split_artists(credit: &str) -> ArtistList {
    let lowered = ARTIST_SEPARATORS.iter()
        .fold(credit.to_lowercase(), |acc, sep| acc.replace(sep, ","));

    ArtistList(
        lowered.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    )
}

/// Year part of a "YYYY-MM-DD" style date. Input without a dash comes back
/// as is
pub fn clean_year(date: &str) -> &str {
    date.split_once('-').map_or(date, |(year, _)| year)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum EconomicPeriod {
    #[serde(rename = "Recession")]
    Recession,
    #[serde(rename = "Moderate Unemployment")]
    ModerateUnemployment,
    #[serde(rename = "Economic Stability")]
    EconomicStability
}

impl EconomicPeriod {
    pub const ALL: [EconomicPeriod; 3] = [
        EconomicPeriod::Recession,
        EconomicPeriod::ModerateUnemployment,
        EconomicPeriod::EconomicStability,
    ];

    /// Bands are strict: exactly 8.0 is moderate, exactly 5.0 is stable
    pub fn from_rate(unemployment: f64) -> Self {
        if unemployment > 8.0 {
            EconomicPeriod::Recession
        } else if unemployment > 5.0 {
            EconomicPeriod::ModerateUnemployment
        } else {
            EconomicPeriod::EconomicStability
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EconomicPeriod::Recession => "Recession",
            EconomicPeriod::ModerateUnemployment => "Moderate Unemployment",
            EconomicPeriod::EconomicStability => "Economic Stability",
        }
    }

    pub fn caption(self) -> &'static str {
        match self {
            EconomicPeriod::Recession => "Unemployment Rate over 8%",
            EconomicPeriod::ModerateUnemployment => "Unemployment Rate between 5 and 8%",
            EconomicPeriod::EconomicStability => "Unemployment Rate below 5%",
        }
    }
}

impl fmt::Display for EconomicPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &ArtistList) -> Vec<&str> {
        list.names().iter().map(String::as_str).collect()
    }

    #[test]
    fn split_featuring() {
        let artists = split_artists("Artist A featuring Artist B");
        assert_eq!(names(&artists), vec!["artist a", "artist b"]);
    }

    #[test]
    fn split_solo() {
        assert_eq!(names(&split_artists("Solo Artist")), vec!["solo artist"]);
    }

    #[test]
    fn split_mixed_separators_keeps_order() {
        let artists = split_artists("Calvin Harris ft Rihanna & Drake / Future");
        assert_eq!(names(&artists), vec!["calvin harris", "rihanna", "drake", "future"]);

        let artists = split_artists("DJ Fresh vs Rita Ora");
        assert_eq!(names(&artists), vec!["dj fresh", "rita ora"]);

        let artists = split_artists("Jay-Z feat. Alicia Keys");
        assert_eq!(names(&artists), vec!["jay-z", "alicia keys"]);
    }

    #[test]
    fn split_empty_input() {
        assert!(split_artists("").names().is_empty());
        assert!(split_artists("   ").names().is_empty());
        assert!(split_artists(" & , / ").names().is_empty());
    }

    #[test]
    fn split_breaks_names_containing_and() {
        let artists = split_artists("Florence and The Machine");
        assert_eq!(names(&artists), vec!["florence", "the machine"]);
    }

    #[test]
    fn split_never_yields_blank_names() {
        for credit in ["A,,B", "feat", "x & & y", "Mumford & Sons"] {
            let artists = split_artists(credit);
            assert!(artists.names().iter().all(|n| !n.trim().is_empty()));
            assert!(artists.names().iter().all(|n| *n == n.to_lowercase()));
        }
    }

    #[test]
    fn year_from_date() {
        assert_eq!(clean_year("2015-06-01"), "2015");
        assert_eq!(clean_year("1999"), "1999");
        assert_eq!(clean_year("garbage"), "garbage");
        assert_eq!(clean_year("-05"), "");
    }

    #[test]
    fn economic_bands() {
        assert_eq!(EconomicPeriod::from_rate(9.0), EconomicPeriod::Recession);
        assert_eq!(EconomicPeriod::from_rate(6.0), EconomicPeriod::ModerateUnemployment);
        assert_eq!(EconomicPeriod::from_rate(3.0), EconomicPeriod::EconomicStability);
    }

    #[test]
    fn economic_band_boundaries_are_strict() {
        assert_eq!(EconomicPeriod::from_rate(8.0), EconomicPeriod::ModerateUnemployment);
        assert_eq!(EconomicPeriod::from_rate(5.0), EconomicPeriod::EconomicStability);
        assert_eq!(EconomicPeriod::from_rate(8.0001), EconomicPeriod::Recession);
        assert_eq!(EconomicPeriod::from_rate(-1.0), EconomicPeriod::EconomicStability);
    }

    #[test]
    fn economic_labels() {
        assert_eq!(EconomicPeriod::Recession.to_string(), "Recession");
        assert_eq!(EconomicPeriod::ModerateUnemployment.caption(),
            "Unemployment Rate between 5 and 8%");
    }
}
