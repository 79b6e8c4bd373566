//!
//! src/genre.rs  Andrew Belles  Oct 3rd, 2025
//!
//! Maps spotify subgenre tags onto the broad categories used by every
//! report and chart
//!

use std::fmt;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GenreCategory {
    LatinInspired,
    JazzAndSoul,
    Indie,
    CountryAndFolk,
    RapAndHipHop,
    RnB,
    Rock,
    EdmHouseDance,
    Pop,
    MoviesTvTheater,
    NoGenreFound,
    Other
}

/// Priority ordered rules, the first category with a keyword contained in
/// the tag wins
pub const GENRE_RULES: &[(GenreCategory, &[&str])] = &[
    (GenreCategory::LatinInspired, &["soca", "reggae", "latin", "moombahton"]),
    (GenreCategory::JazzAndSoul, &["jazz", "soul", "blues"]),
    (GenreCategory::Indie, &["indie", "alt", "madchester", "neo", "lilith", "escape room"]),
    (GenreCategory::CountryAndFolk, &["country", "folk", "comic", "stomp", "oktoberfest"]),
    (GenreCategory::RapAndHipHop, &[
        "rap", "hip hop", "hip-hop", "drill", "urban", "afro", "g funk"
    ]),
    (GenreCategory::RnB, &["rnb", "r&b", "gold", "relaxative"]),
    (GenreCategory::Rock, &[
        "rock", "wave", "metal", "grunge", "emo", "new romantic", "beatlesque"
    ]),
    (GenreCategory::EdmHouseDance, &[
        "edm", "elec", "house", "dance", "ukg", "grime", "techno", "dnb", "bounce", "rave",
        "garage", "big beat", "bass", "tron", "2-step", "big room", "trance", "hardcore",
        "complextro", "charva", "funky", "brostep"
    ]),
    (GenreCategory::Pop, &[
        "pop", "boy band", "girl group", "singer-songwriter", "talent show", "schlager"
    ]),
    (GenreCategory::MoviesTvTheater, &[
        "classic", "broadway", "tune", "children", "glee", "filmi", "hollywood", "cartoon",
        "backing", "advocacy"
    ]),
    (GenreCategory::NoGenreFound, &["nan", "fake", "karaoke"]),
];

impl GenreCategory {
    pub const ALL: [GenreCategory; 12] = [
        GenreCategory::LatinInspired,
        GenreCategory::JazzAndSoul,
        GenreCategory::Indie,
        GenreCategory::CountryAndFolk,
        GenreCategory::RapAndHipHop,
        GenreCategory::RnB,
        GenreCategory::Rock,
        GenreCategory::EdmHouseDance,
        GenreCategory::Pop,
        GenreCategory::MoviesTvTheater,
        GenreCategory::NoGenreFound,
        GenreCategory::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            GenreCategory::LatinInspired => "Latin Inspired",
            GenreCategory::JazzAndSoul => "Jazz and Soul",
            GenreCategory::Indie => "Indie",
            GenreCategory::CountryAndFolk => "Country and Folk",
            GenreCategory::RapAndHipHop => "Rap and Hip Hop",
            GenreCategory::RnB => "R&B",
            GenreCategory::Rock => "Rock",
            GenreCategory::EdmHouseDance => "EDM, House, and Dance",
            GenreCategory::Pop => "Pop",
            GenreCategory::MoviesTvTheater => "Movies, TV, and Theater",
            GenreCategory::NoGenreFound => "No Genre Found",
            GenreCategory::Other => "Other",
        }
    }

    /// Exact label lookup, used for cli arguments
    pub fn from_label(label: &str) -> Option<GenreCategory> {
        let label = label.trim();
        Self::ALL.into_iter().find(|g| g.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for GenreCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for GenreCategory {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.label())
    }
}

/// Buckets a raw tag. A missing tag is the "nan" placeholder, which lands in
/// No Genre Found; a tag no rule matches is Other
pub fn categorize_genre(raw: Option<&str>) -> GenreCategory {
    let Some(raw) = raw else {
        return GenreCategory::NoGenreFound;
    };
    let genre = raw.to_lowercase();

    GENRE_RULES.iter()
        .find(|(_, keywords)| keywords.iter().any(|k| genre.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(GenreCategory::Other)
}
