use crate::error::{HavaError, Result};
use crate::models::{MusicDraft, SpotifyKind, SpotifyLink};
use serde::Deserialize;

const OEMBED_URL: &str = "https://open.spotify.com/oembed";
const FALLBACK_ARTIST: &str = "اسپاتیفای";

/// Resolves Spotify links to display metadata through the public oEmbed
/// endpoint. No API credentials are needed.
pub struct SpotifyClient {
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct OEmbedResponse {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    author_name: Option<String>,
    #[serde(default)]
    thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpotifyMetadata {
    pub title: String,
    pub artist: String,
    pub cover_url: Option<String>,
    pub spotify_link: String,
}

impl SpotifyMetadata {
    pub fn into_draft(self) -> MusicDraft {
        MusicDraft {
            title: self.title,
            artist: self.artist,
            spotify_link: self.spotify_link,
            cover_url: self.cover_url,
        }
    }
}

impl SpotifyClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Validate `url` and fetch its title, artist and cover.
    ///
    /// Malformed links fail with a validation error before any request is
    /// made.
    pub async fn resolve(&self, url: &str) -> Result<SpotifyMetadata> {
        let link = SpotifyLink::parse(url)?;

        let endpoint = reqwest::Url::parse_with_params(OEMBED_URL, &[("url", link.url.as_str())])
            .map_err(|e| HavaError::Validation(format!("Invalid Spotify URL: {}", e)))?;

        let response =
            self.client.get(endpoint).send().await.map_err(|e| {
                HavaError::DataSourceUnavailable(format!("Spotify oEmbed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(HavaError::DataSourceUnavailable(format!(
                "Spotify oEmbed returned {}",
                response.status()
            )));
        }

        let oembed: OEmbedResponse = response.json().await.map_err(|e| {
            HavaError::DataSourceUnavailable(format!("Failed to parse Spotify oEmbed: {}", e))
        })?;

        let metadata = metadata_from_oembed(&link, oembed);
        tracing::debug!(
            kind = link.kind.as_str(),
            title = %metadata.title,
            artist = %metadata.artist,
            "Resolved Spotify link"
        );
        Ok(metadata)
    }
}

impl Default for SpotifyClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Split `"<title> - <artist>"` on the first spaced hyphen or dash.
fn split_title(full: &str) -> (String, Option<String>) {
    let re = regex_lite::Regex::new(r"^(.+?)\s+[-–—]\s+(.+)$");
    let Ok(re) = re else {
        return (full.trim().to_string(), None);
    };
    match re.captures(full) {
        Some(caps) => (caps[1].trim().to_string(), Some(caps[2].trim().to_string())),
        None => (full.trim().to_string(), None),
    }
}

fn metadata_from_oembed(link: &SpotifyLink, oembed: OEmbedResponse) -> SpotifyMetadata {
    let raw_title = oembed
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());

    let (title, artist) = match (link.kind, raw_title) {
        (_, None) => (link.kind.placeholder_title().to_string(), None),
        (SpotifyKind::Playlist, Some(title)) => (title.to_string(), oembed.author_name.clone()),
        (SpotifyKind::Track | SpotifyKind::Album, Some(title)) => split_title(title),
    };

    let artist = artist
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| FALLBACK_ARTIST.to_string());

    SpotifyMetadata {
        title,
        artist,
        cover_url: oembed.thumbnail_url.filter(|u| !u.trim().is_empty()),
        spotify_link: link.url.clone(),
    }
}
