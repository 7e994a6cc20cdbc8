//! One-shot admin and diagnostic commands run from the CLI.

use crate::cli::{
    AssociationCommand, ClothingCommand, MusicCommand, PatternArgs, SituationCommand,
};
use crate::config::Config;
use crate::datasources::{
    ConfiguredLocation, LocationProvider, OpenWeatherMapClient, SpotifyClient,
};
use crate::db::SituationStore;
use crate::logic::{SituationService, WeatherService};
use crate::models::{
    Category, Clothing, ClothingDraft, Criterion, Mood, Music, MusicDraft, Situation,
    SituationDraft,
};
use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

pub async fn handle_check(config: &Config, store: Arc<dyn SituationStore>) -> Result<()> {
    println!("Configuration OK");
    println!("  datastore: {}", config.datastore.backend.as_str());
    println!("  candidate limit: {}", config.matching.candidate_limit);

    let location = ConfiguredLocation::new(config.location.clone());
    let position = match location.position().await {
        Ok(p) => {
            println!("Location: {}", p);
            Some(p)
        }
        Err(e) => {
            println!("Location: {}", e);
            None
        }
    };

    if let Some(position) = position {
        let client = OpenWeatherMapClient::new(config.openweathermap.clone());
        match client.test_connection(&position).await {
            Ok(true) => println!("OpenWeatherMap: OK"),
            Ok(false) => println!("OpenWeatherMap: FAILED"),
            Err(e) => println!("OpenWeatherMap: FAILED ({})", e),
        }
    }

    match store.test_connection().await {
        Ok(true) => println!("Datastore ({}): OK", store.backend_name()),
        Ok(false) => println!("Datastore ({}): FAILED", store.backend_name()),
        Err(e) => println!("Datastore ({}): FAILED ({})", store.backend_name(), e),
    }

    Ok(())
}

pub async fn handle_match(
    weather: &WeatherService,
    situations: &SituationService,
    json: bool,
    hour: Option<u32>,
) -> Result<()> {
    let observed = match hour {
        Some(h) => weather.fetch_at(h).await,
        None => weather.fetch().await,
    }
    .context("Failed to fetch weather")?;

    let mut rng = StdRng::from_os_rng();
    let matched = situations
        .find_situation(&observed, &mut rng)
        .await
        .context("Situation lookup failed")?;

    if json {
        let out = serde_json::json!({ "weather": observed, "situation": matched });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "{}: {}°C, {} / {} / {} / {} / {}",
        observed.city,
        observed.temp_celsius,
        observed.weather,
        observed.temperature,
        observed.humidity,
        observed.wind,
        observed.time_of_day
    );
    match matched {
        Some(situation) => print_situation_detail(&situation),
        None => println!("No situation matches this weather."),
    }
    Ok(())
}

pub async fn handle_situation(store: &dyn SituationStore, cmd: SituationCommand) -> Result<()> {
    match cmd {
        SituationCommand::List { json } => {
            let situations = store.list_situations().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&situations)?);
            } else if situations.is_empty() {
                println!("No situations yet.");
            } else {
                for s in &situations {
                    print_situation_row(s);
                }
            }
        }
        SituationCommand::Add { sentence, pattern } => {
            let draft = apply_pattern(SituationDraft::new(sentence), &pattern)?;
            let created = store
                .create_situation(&draft)
                .await
                .context("Failed to add situation")?;
            println!("Added situation {}", created.id);
        }
        SituationCommand::Edit {
            id,
            sentence,
            pattern,
        } => {
            let existing = store
                .get_situation(&id)
                .await?
                .with_context(|| format!("No situation with id {}", id))?;
            let mut draft = existing.to_draft();
            if let Some(sentence) = sentence {
                draft.sentence_fa = sentence;
            }
            let draft = apply_pattern(draft, &pattern)?;
            store
                .update_situation(&id, &draft)
                .await
                .context("Failed to update situation")?;
            println!("Updated situation {}", id);
        }
        SituationCommand::Remove { id } => {
            store
                .delete_situation(&id)
                .await
                .context("Failed to remove situation")?;
            println!("Removed situation {}", id);
        }
    }
    Ok(())
}

pub async fn handle_music(
    store: &dyn SituationStore,
    spotify: &SpotifyClient,
    cmd: MusicCommand,
) -> Result<()> {
    match cmd {
        MusicCommand::List { json } => {
            let music = store.list_music().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&music)?);
            } else if music.is_empty() {
                println!("No music yet.");
            } else {
                for m in &music {
                    print_music_row(m);
                }
            }
        }
        MusicCommand::Add {
            url,
            title,
            artist,
            offline,
        } => {
            let draft = if offline {
                let (Some(title), Some(artist)) = (title, artist) else {
                    bail!("--offline needs both --title and --artist");
                };
                MusicDraft {
                    title,
                    artist,
                    spotify_link: url,
                    cover_url: None,
                }
            } else {
                let mut draft = spotify
                    .resolve(&url)
                    .await
                    .context("Could not resolve Spotify link (use --offline with --title and --artist to skip the lookup)")?
                    .into_draft();
                if let Some(title) = title {
                    draft.title = title;
                }
                if let Some(artist) = artist {
                    draft.artist = artist;
                }
                draft
            };
            let created = store
                .create_music(&draft)
                .await
                .context("Failed to add music")?;
            println!(
                "Added music {} ({} - {})",
                created.id, created.title, created.artist
            );
        }
        MusicCommand::Edit {
            id,
            title,
            artist,
            url,
            cover_url,
        } => {
            let existing = find_by_id(store.list_music().await?, &id, |m| &m.id)
                .with_context(|| format!("No music with id {}", id))?;
            let mut draft = MusicDraft::from(&existing);
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(artist) = artist {
                draft.artist = artist;
            }
            if let Some(url) = url {
                draft.spotify_link = url;
            }
            if let Some(cover_url) = cover_url {
                draft.cover_url = Some(cover_url);
            }
            store
                .update_music(&id, &draft)
                .await
                .context("Failed to update music")?;
            println!("Updated music {}", id);
        }
        MusicCommand::Remove { id } => {
            store
                .delete_music(&id)
                .await
                .context("Failed to remove music")?;
            println!("Removed music {}", id);
        }
    }
    Ok(())
}

pub async fn handle_clothing(store: &dyn SituationStore, cmd: ClothingCommand) -> Result<()> {
    match cmd {
        ClothingCommand::List { json } => {
            let clothing = store.list_clothing().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&clothing)?);
            } else if clothing.is_empty() {
                println!("No clothing yet.");
            } else {
                for c in &clothing {
                    print_clothing_row(c);
                }
            }
        }
        ClothingCommand::Add {
            description,
            english,
        } => {
            let draft = ClothingDraft {
                description_fa: description,
                english_phrase: english,
            };
            let created = store
                .create_clothing(&draft)
                .await
                .context("Failed to add clothing")?;
            println!("Added clothing {}", created.id);
        }
        ClothingCommand::Edit {
            id,
            description,
            english,
        } => {
            let existing = find_by_id(store.list_clothing().await?, &id, |c| &c.id)
                .with_context(|| format!("No clothing with id {}", id))?;
            let mut draft = ClothingDraft::from(&existing);
            if let Some(description) = description {
                draft.description_fa = description;
            }
            if let Some(english) = english {
                draft.english_phrase = Some(english);
            }
            store
                .update_clothing(&id, &draft)
                .await
                .context("Failed to update clothing")?;
            println!("Updated clothing {}", id);
        }
        ClothingCommand::Remove { id } => {
            store
                .delete_clothing(&id)
                .await
                .context("Failed to remove clothing")?;
            println!("Removed clothing {}", id);
        }
    }
    Ok(())
}

pub async fn handle_assign(store: &dyn SituationStore, cmd: AssociationCommand) -> Result<()> {
    match cmd {
        AssociationCommand::Music {
            situation_id,
            music_id,
        } => {
            store
                .assign_music(&situation_id, &music_id)
                .await
                .context("Failed to assign music")?;
            println!("Assigned music {} to situation {}", music_id, situation_id);
        }
        AssociationCommand::Clothing {
            situation_id,
            clothing_id,
        } => {
            store
                .assign_clothing(&situation_id, &clothing_id)
                .await
                .context("Failed to assign clothing")?;
            println!(
                "Assigned clothing {} to situation {}",
                clothing_id, situation_id
            );
        }
    }
    Ok(())
}

pub async fn handle_unassign(store: &dyn SituationStore, cmd: AssociationCommand) -> Result<()> {
    match cmd {
        AssociationCommand::Music {
            situation_id,
            music_id,
        } => {
            store
                .unassign_music(&situation_id, &music_id)
                .await
                .context("Failed to unassign music")?;
            println!(
                "Unassigned music {} from situation {}",
                music_id, situation_id
            );
        }
        AssociationCommand::Clothing {
            situation_id,
            clothing_id,
        } => {
            store
                .unassign_clothing(&situation_id, &clothing_id)
                .await
                .context("Failed to unassign clothing")?;
            println!(
                "Unassigned clothing {} from situation {}",
                clothing_id, situation_id
            );
        }
    }
    Ok(())
}

/// Overlay the flags that were given onto `draft`. Flags left out keep the
/// draft's current value.
fn apply_pattern(mut draft: SituationDraft, pattern: &PatternArgs) -> Result<SituationDraft> {
    if let Some(v) = &pattern.weather {
        draft.weather = Criterion::parse_input(v).context("--weather")?;
    }
    if let Some(v) = &pattern.temperature {
        draft.temperature = Criterion::parse_input(v).context("--temperature")?;
    }
    if let Some(v) = &pattern.humidity {
        draft.humidity = Criterion::parse_input(v).context("--humidity")?;
    }
    if let Some(v) = &pattern.wind {
        draft.wind = Criterion::parse_input(v).context("--wind")?;
    }
    if let Some(v) = &pattern.time_of_day {
        draft.time_of_day = Criterion::parse_input(v).context("--time-of-day")?;
    }
    if let Some(v) = &pattern.mood {
        draft.mood = parse_mood(v)?;
    }
    if let Some(v) = &pattern.city {
        draft.city = Some(v.clone());
    }
    Ok(draft)
}

fn parse_mood(s: &str) -> Result<Option<Mood>> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    match Mood::parse(trimmed) {
        Some(m) => Ok(Some(m)),
        None => {
            let allowed: Vec<&str> = Mood::ALL.iter().map(|m| m.as_str()).collect();
            bail!(
                "--mood: unknown value '{}' (expected one of: {}, none)",
                trimmed,
                allowed.join(", ")
            )
        }
    }
}

fn find_by_id<T>(items: Vec<T>, id: &str, key: impl Fn(&T) -> &String) -> Option<T> {
    items.into_iter().find(|item| key(item) == id)
}

fn print_situation_row(s: &Situation) {
    println!(
        "{}  [{}]  music:{} clothing:{}  {}",
        s.id,
        s.pattern_summary(),
        s.music.len(),
        s.clothing.len(),
        s.sentence_fa
    );
}

fn print_situation_detail(s: &Situation) {
    println!();
    println!("{}", s.sentence_fa);
    println!("  pattern: {}", s.pattern_summary());
    if let Some(mood) = s.mood {
        println!("  mood: {}", mood);
    }
    if let Some(music) = s.featured_music() {
        println!(
            "  music: {} - {} ({})",
            music.title, music.artist, music.spotify_link
        );
    }
    if let Some(clothing) = s.featured_clothing() {
        match &clothing.english_phrase {
            Some(phrase) => println!("  wear: {} ({})", clothing.description_fa, phrase),
            None => println!("  wear: {}", clothing.description_fa),
        }
    }
}

fn print_music_row(m: &Music) {
    println!("{}  {} - {}  {}", m.id, m.title, m.artist, m.spotify_link);
}

fn print_clothing_row(c: &Clothing) {
    match &c.english_phrase {
        Some(phrase) => println!("{}  {}  ({})", c.id, c.description_fa, phrase),
        None => println!("{}  {}", c.id, c.description_fa),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{TimeOfDay, WeatherCondition};

    #[test]
    fn pattern_overlays_only_given_flags() {
        let draft = SituationDraft::new("s")
            .with_weather(WeatherCondition::Rainy)
            .with_time_of_day(TimeOfDay::Night);
        let pattern = PatternArgs {
            weather: Some("any".into()),
            wind: Some("Breezy".into()),
            mood: Some("calm".into()),
            ..Default::default()
        };

        let draft = apply_pattern(draft, &pattern).unwrap();
        assert_eq!(draft.weather, Criterion::Any);
        assert_eq!(draft.time_of_day, Criterion::Specific(TimeOfDay::Night));
        assert!(!draft.wind.is_any());
        assert_eq!(draft.mood, Some(Mood::Calm));
    }

    #[test]
    fn unknown_category_rejected() {
        let pattern = PatternArgs {
            temperature: Some("warm".into()),
            ..Default::default()
        };
        assert!(apply_pattern(SituationDraft::new("s"), &pattern).is_err());
        assert!(parse_mood("grumpy").is_err());
        assert_eq!(parse_mood("none").unwrap(), None);
    }

    #[tokio::test]
    async fn add_and_assign_through_commands() {
        let db = Database::open_in_memory().unwrap();
        let store: &dyn SituationStore = &db;

        handle_situation(
            store,
            SituationCommand::Add {
                sentence: "هوا بارانی است".into(),
                pattern: PatternArgs {
                    weather: Some("rainy".into()),
                    ..Default::default()
                },
            },
        )
        .await
        .unwrap();
        handle_clothing(
            store,
            ClothingCommand::Add {
                description: "بارانی".into(),
                english: Some("raincoat".into()),
            },
        )
        .await
        .unwrap();

        let situation = store.list_situations().await.unwrap().remove(0);
        let clothing = store.list_clothing().await.unwrap().remove(0);
        handle_assign(
            store,
            AssociationCommand::Clothing {
                situation_id: situation.id.clone(),
                clothing_id: clothing.id.clone(),
            },
        )
        .await
        .unwrap();

        let situation = store.get_situation(&situation.id).await.unwrap().unwrap();
        assert_eq!(situation.clothing.len(), 1);
        assert_eq!(
            situation.weather,
            Criterion::Specific(WeatherCondition::Rainy)
        );
    }

    #[tokio::test]
    async fn offline_music_needs_title_and_artist() {
        let db = Database::open_in_memory().unwrap();
        let spotify = SpotifyClient::new();
        let result = handle_music(
            &db,
            &spotify,
            MusicCommand::Add {
                url: "https://open.spotify.com/track/abc123".into(),
                title: Some("Baran".into()),
                artist: None,
                offline: true,
            },
        )
        .await;
        assert!(result.is_err());

        handle_music(
            &db,
            &spotify,
            MusicCommand::Add {
                url: "https://open.spotify.com/track/abc123".into(),
                title: Some("Baran".into()),
                artist: Some("Googoosh".into()),
                offline: true,
            },
        )
        .await
        .unwrap();
        assert_eq!(db.list_music().await.unwrap()[0].title, "Baran");
    }

    #[tokio::test]
    async fn edit_missing_situation_fails() {
        let db = Database::open_in_memory().unwrap();
        let result = handle_situation(
            &db,
            SituationCommand::Edit {
                id: "missing".into(),
                sentence: Some("x".into()),
                pattern: PatternArgs::default(),
            },
        )
        .await;
        assert!(result.is_err());
    }
}
