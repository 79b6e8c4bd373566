use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpotifyTrackId(pub String);


#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpotifyArtistId(pub String);


/// First search hit for a song/artist query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackLookup {
    pub track_id: SpotifyTrackId,
    pub release_date: Option<String>,
    pub artist_id: Option<SpotifyArtistId>
}

impl TrackLookup {
    /// Reads the first item of a /search?type=track response,
    /// None when there are no items
    pub fn from_search(body: &Value) -> Option<Self> {
        let item = body.pointer("/tracks/items")
            .and_then(|v| v.as_array())
            .and_then(|items| items.first())?;

        let track_id = item.get("id").and_then(|v| v.as_str())?;
        Some(Self {
            track_id: SpotifyTrackId(track_id.to_string()),
            release_date: item.pointer("/album/release_date")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            artist_id: item.pointer("/artists/0/id")
                .and_then(|v| v.as_str())
                .map(|id| SpotifyArtistId(id.to_string())),
        })
    }
}

/// Reads the genre tags of an /artists/{id} response
pub fn genres_from_artist(body: &Value) -> Vec<String> {
    body.get("genres")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|g| g.as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>
}
