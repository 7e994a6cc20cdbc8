use crate::error::{HavaError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Music {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub spotify_link: String,
    pub cover_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MusicDraft {
    pub title: String,
    pub artist: String,
    pub spotify_link: String,
    pub cover_url: Option<String>,
}

impl MusicDraft {
    pub fn validated(mut self) -> Result<Self> {
        self.title = self.title.trim().to_string();
        self.artist = self.artist.trim().to_string();
        self.spotify_link = self.spotify_link.trim().to_string();
        self.cover_url = self
            .cover_url
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        if self.title.is_empty() || self.artist.is_empty() || self.spotify_link.is_empty() {
            return Err(HavaError::Validation(
                "title, artist and spotify link are required".into(),
            ));
        }
        SpotifyLink::parse(&self.spotify_link)?;
        Ok(self)
    }
}

impl From<&Music> for MusicDraft {
    fn from(music: &Music) -> Self {
        Self {
            title: music.title.clone(),
            artist: music.artist.clone(),
            spotify_link: music.spotify_link.clone(),
            cover_url: music.cover_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpotifyKind {
    Track,
    Playlist,
    Album,
}

impl SpotifyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpotifyKind::Track => "track",
            SpotifyKind::Playlist => "playlist",
            SpotifyKind::Album => "album",
        }
    }

    /// Title used when the provider does not report one.
    pub fn placeholder_title(&self) -> &'static str {
        match self {
            SpotifyKind::Track => "آهنگ اسپاتیفای",
            SpotifyKind::Playlist => "پلی‌لیست اسپاتیفای",
            SpotifyKind::Album => "آلبوم اسپاتیفای",
        }
    }
}

/// A validated Spotify track, playlist or album URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotifyLink {
    pub kind: SpotifyKind,
    pub id: String,
    pub url: String,
}

impl SpotifyLink {
    pub fn parse(url: &str) -> Result<Self> {
        let re = regex_lite::Regex::new(
            r"^https?://(?:open\.spotify\.com|spotify\.com)/(track|playlist|album)/([A-Za-z0-9]+)",
        )
        .map_err(|e| HavaError::Validation(format!("spotify pattern: {}", e)))?;

        let url = url.trim();
        let caps = re
            .captures(url)
            .ok_or_else(|| HavaError::Validation(format!("not a Spotify link: {}", url)))?;

        let kind = match &caps[1] {
            "track" => SpotifyKind::Track,
            "playlist" => SpotifyKind::Playlist,
            _ => SpotifyKind::Album,
        };

        Ok(Self {
            kind,
            id: caps[2].to_string(),
            url: url.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spotify_link_parses_known_kinds() {
        let link =
            SpotifyLink::parse("https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC?si=abc")
                .unwrap();
        assert_eq!(link.kind, SpotifyKind::Track);
        assert_eq!(link.id, "4uLU6hMCjMI75M1A2tKUQC");

        let link = SpotifyLink::parse("http://spotify.com/playlist/37i9dQZF1DX").unwrap();
        assert_eq!(link.kind, SpotifyKind::Playlist);

        let link = SpotifyLink::parse("https://open.spotify.com/album/1DFixLWuPkv3KT3TnV35m3")
            .unwrap();
        assert_eq!(link.kind, SpotifyKind::Album);
    }

    #[test]
    fn spotify_link_rejects_other_urls() {
        for url in [
            "https://example.com/track/abc",
            "https://open.spotify.com/artist/abc",
            "open.spotify.com/track/abc",
            "https://open.spotify.com/track/",
            "",
        ] {
            let err = SpotifyLink::parse(url).unwrap_err();
            assert!(matches!(err, HavaError::Validation(_)), "{}", url);
        }
    }

    #[test]
    fn draft_requires_fields_and_valid_link() {
        let draft = MusicDraft {
            title: "Song".into(),
            artist: " ".into(),
            spotify_link: "https://open.spotify.com/track/abc".into(),
            cover_url: None,
        };
        assert!(matches!(draft.validated(), Err(HavaError::Validation(_))));

        let draft = MusicDraft {
            title: "Song".into(),
            artist: "Artist".into(),
            spotify_link: "https://soundcloud.com/x".into(),
            cover_url: None,
        };
        assert!(matches!(draft.validated(), Err(HavaError::Validation(_))));

        let draft = MusicDraft {
            title: " Song ".into(),
            artist: "Artist".into(),
            spotify_link: "https://open.spotify.com/track/abc".into(),
            cover_url: Some("".into()),
        }
        .validated()
        .unwrap();
        assert_eq!(draft.title, "Song");
        assert!(draft.cover_url.is_none());
    }
}
