use super::{parse_timestamp, stored_criterion, stored_mood, SituationStore};
use crate::db::Database;
use crate::error::{HavaError, Result};
use crate::logic::{CandidateFilter, SqlDialect};
use crate::models::{Category, Clothing, ClothingDraft, Music, MusicDraft, Situation, SituationDraft};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, params_from_iter, Connection, Row};
use uuid::Uuid;

const SITUATION_COLUMNS: &str =
    "id, weather, temperature, humidity, wind, time_of_day, mood, city, sentence_fa, created_at";

// Situation Queries

impl Database {
    pub fn candidate_situations(&self, filter: &CandidateFilter) -> Result<Vec<Situation>> {
        let sql = filter.to_sql(SqlDialect::Sqlite);
        self.with_conn(|conn| {
            let query = format!(
                "SELECT {} FROM situations WHERE {} ORDER BY {} LIMIT {}",
                SITUATION_COLUMNS, sql.where_clause, sql.order_by, sql.limit
            );
            let mut stmt = conn.prepare(&query)?;
            let mut situations = stmt
                .query_map(params_from_iter(sql.params.iter()), row_to_situation)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            attach_associations(conn, &mut situations)?;
            Ok(situations)
        })
    }

    pub fn all_situations(&self) -> Result<Vec<Situation>> {
        self.with_conn(|conn| {
            let query = format!(
                "SELECT {} FROM situations ORDER BY created_at DESC",
                SITUATION_COLUMNS
            );
            let mut stmt = conn.prepare(&query)?;
            let mut situations = stmt
                .query_map([], row_to_situation)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            attach_associations(conn, &mut situations)?;
            Ok(situations)
        })
    }

    pub fn situation_by_id(&self, id: &str) -> Result<Option<Situation>> {
        self.with_conn(|conn| {
            let query = format!("SELECT {} FROM situations WHERE id = ?1", SITUATION_COLUMNS);
            let situation = conn
                .query_row(&query, [id], row_to_situation)
                .optional()?;
            match situation {
                Some(situation) => {
                    let mut found = vec![situation];
                    attach_associations(conn, &mut found)?;
                    Ok(found.pop())
                }
                None => Ok(None),
            }
        })
    }

    pub fn insert_situation(&self, draft: &SituationDraft) -> Result<Situation> {
        let draft = draft.clone().validated()?;
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();

        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO situations
                    (id, weather, temperature, humidity, wind, time_of_day, mood, city, sentence_fa, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
                params![
                    id,
                    draft.weather.as_stored(),
                    draft.temperature.as_stored(),
                    draft.humidity.as_stored(),
                    draft.wind.as_stored(),
                    draft.time_of_day.as_stored(),
                    draft.mood.map(|m| m.as_str()),
                    draft.city,
                    draft.sentence_fa,
                    created_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })?;

        tracing::debug!(id = %id, "Created situation");
        Ok(Situation {
            id,
            weather: draft.weather,
            temperature: draft.temperature,
            humidity: draft.humidity,
            wind: draft.wind,
            time_of_day: draft.time_of_day,
            mood: draft.mood,
            city: draft.city,
            sentence_fa: draft.sentence_fa,
            created_at,
            music: Vec::new(),
            clothing: Vec::new(),
        })
    }

    pub fn replace_situation(&self, id: &str, draft: &SituationDraft) -> Result<()> {
        let draft = draft.clone().validated()?;
        let changed = self.with_conn(|conn| {
            Ok(conn.execute(
                r#"
                UPDATE situations SET
                    weather = ?1, temperature = ?2, humidity = ?3, wind = ?4,
                    time_of_day = ?5, mood = ?6, city = ?7, sentence_fa = ?8
                WHERE id = ?9
                "#,
                params![
                    draft.weather.as_stored(),
                    draft.temperature.as_stored(),
                    draft.humidity.as_stored(),
                    draft.wind.as_stored(),
                    draft.time_of_day.as_stored(),
                    draft.mood.map(|m| m.as_str()),
                    draft.city,
                    draft.sentence_fa,
                    id,
                ],
            )?)
        })?;
        require_changed(changed, "situation", id)
    }

    pub fn remove_situation(&self, id: &str) -> Result<()> {
        let changed = self.with_conn(|conn| {
            Ok(conn.execute("DELETE FROM situations WHERE id = ?1", [id])?)
        })?;
        require_changed(changed, "situation", id)
    }
}

fn row_to_situation(row: &Row) -> rusqlite::Result<Situation> {
    let created_at: String = row.get("created_at")?;

    Ok(Situation {
        id: row.get("id")?,
        weather: stored_criterion("weather", row.get("weather")?),
        temperature: stored_criterion("temperature", row.get("temperature")?),
        humidity: stored_criterion("humidity", row.get("humidity")?),
        wind: stored_criterion("wind", row.get("wind")?),
        time_of_day: stored_criterion("time_of_day", row.get("time_of_day")?),
        mood: stored_mood(row.get("mood")?),
        city: row.get("city")?,
        sentence_fa: row.get("sentence_fa")?,
        created_at: parse_timestamp(&created_at),
        music: Vec::new(),
        clothing: Vec::new(),
    })
}

fn attach_associations(conn: &Connection, situations: &mut [Situation]) -> Result<()> {
    let mut music_stmt = conn.prepare(
        r#"
        SELECT m.id, m.title, m.artist, m.spotify_link, m.cover_url, m.created_at
        FROM music m
        JOIN situation_music sm ON sm.music_id = m.id
        WHERE sm.situation_id = ?1
        "#,
    )?;
    let mut clothing_stmt = conn.prepare(
        r#"
        SELECT c.id, c.description_fa, c.english_phrase, c.created_at
        FROM clothing c
        JOIN situation_clothing sc ON sc.clothing_id = c.id
        WHERE sc.situation_id = ?1
        "#,
    )?;

    for situation in situations.iter_mut() {
        situation.music = music_stmt
            .query_map([&situation.id], row_to_music)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        situation.clothing = clothing_stmt
            .query_map([&situation.id], row_to_clothing)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
    }
    Ok(())
}

// Music Queries

impl Database {
    pub fn all_music(&self) -> Result<Vec<Music>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, artist, spotify_link, cover_url, created_at FROM music ORDER BY created_at DESC",
            )?;
            let music = stmt
                .query_map([], row_to_music)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(music)
        })
    }

    pub fn insert_music(&self, draft: &MusicDraft) -> Result<Music> {
        let draft = draft.clone().validated()?;
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();

        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO music (id, title, artist, spotify_link, cover_url, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    id,
                    draft.title,
                    draft.artist,
                    draft.spotify_link,
                    draft.cover_url,
                    created_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })?;

        Ok(Music {
            id,
            title: draft.title,
            artist: draft.artist,
            spotify_link: draft.spotify_link,
            cover_url: draft.cover_url,
            created_at,
        })
    }

    pub fn replace_music(&self, id: &str, draft: &MusicDraft) -> Result<()> {
        let draft = draft.clone().validated()?;
        let changed = self.with_conn(|conn| {
            Ok(conn.execute(
                r#"
                UPDATE music SET title = ?1, artist = ?2, spotify_link = ?3, cover_url = ?4
                WHERE id = ?5
                "#,
                params![
                    draft.title,
                    draft.artist,
                    draft.spotify_link,
                    draft.cover_url,
                    id
                ],
            )?)
        })?;
        require_changed(changed, "music", id)
    }

    pub fn remove_music(&self, id: &str) -> Result<()> {
        let changed =
            self.with_conn(|conn| Ok(conn.execute("DELETE FROM music WHERE id = ?1", [id])?))?;
        require_changed(changed, "music", id)
    }
}

fn row_to_music(row: &Row) -> rusqlite::Result<Music> {
    let created_at: String = row.get("created_at")?;

    Ok(Music {
        id: row.get("id")?,
        title: row.get("title")?,
        artist: row.get("artist")?,
        spotify_link: row.get("spotify_link")?,
        cover_url: row.get("cover_url")?,
        created_at: parse_timestamp(&created_at),
    })
}

// Clothing Queries

impl Database {
    pub fn all_clothing(&self) -> Result<Vec<Clothing>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, description_fa, english_phrase, created_at FROM clothing ORDER BY created_at DESC",
            )?;
            let clothing = stmt
                .query_map([], row_to_clothing)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(clothing)
        })
    }

    pub fn insert_clothing(&self, draft: &ClothingDraft) -> Result<Clothing> {
        let draft = draft.clone().validated()?;
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();

        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO clothing (id, description_fa, english_phrase, created_at)
                VALUES (?1, ?2, ?3, ?4)
                "#,
                params![
                    id,
                    draft.description_fa,
                    draft.english_phrase,
                    created_at.to_rfc3339()
                ],
            )?;
            Ok(())
        })?;

        Ok(Clothing {
            id,
            description_fa: draft.description_fa,
            english_phrase: draft.english_phrase,
            created_at,
        })
    }

    pub fn replace_clothing(&self, id: &str, draft: &ClothingDraft) -> Result<()> {
        let draft = draft.clone().validated()?;
        let changed = self.with_conn(|conn| {
            Ok(conn.execute(
                "UPDATE clothing SET description_fa = ?1, english_phrase = ?2 WHERE id = ?3",
                params![draft.description_fa, draft.english_phrase, id],
            )?)
        })?;
        require_changed(changed, "clothing", id)
    }

    pub fn remove_clothing(&self, id: &str) -> Result<()> {
        let changed = self
            .with_conn(|conn| Ok(conn.execute("DELETE FROM clothing WHERE id = ?1", [id])?))?;
        require_changed(changed, "clothing", id)
    }
}

fn row_to_clothing(row: &Row) -> rusqlite::Result<Clothing> {
    let created_at: String = row.get("created_at")?;

    Ok(Clothing {
        id: row.get("id")?,
        description_fa: row.get("description_fa")?,
        english_phrase: row.get("english_phrase")?,
        created_at: parse_timestamp(&created_at),
    })
}

// Association Queries

/// Join tables the association methods may touch, with the item table each
/// one references.
#[derive(Debug, Clone, Copy)]
enum Association {
    Music,
    Clothing,
}

impl Association {
    fn join_table(&self) -> &'static str {
        match self {
            Association::Music => "situation_music",
            Association::Clothing => "situation_clothing",
        }
    }

    fn item_table(&self) -> &'static str {
        match self {
            Association::Music => "music",
            Association::Clothing => "clothing",
        }
    }

    fn item_column(&self) -> &'static str {
        match self {
            Association::Music => "music_id",
            Association::Clothing => "clothing_id",
        }
    }
}

impl Database {
    fn link(&self, kind: Association, situation_id: &str, item_id: &str) -> Result<()> {
        self.with_conn(|conn| {
            if !exists(conn, "situations", situation_id)? {
                return Err(HavaError::NotFound(format!("situation {}", situation_id)));
            }
            if !exists(conn, kind.item_table(), item_id)? {
                return Err(HavaError::NotFound(format!(
                    "{} {}",
                    kind.item_table(),
                    item_id
                )));
            }

            let inserted = conn.execute(
                &format!(
                    "INSERT OR IGNORE INTO {} (situation_id, {}) VALUES (?1, ?2)",
                    kind.join_table(),
                    kind.item_column()
                ),
                [situation_id, item_id],
            )?;
            if inserted == 0 {
                return Err(HavaError::Validation(format!(
                    "{} {} is already assigned to situation {}",
                    kind.item_table(),
                    item_id,
                    situation_id
                )));
            }
            Ok(())
        })
    }

    fn unlink(&self, kind: Association, situation_id: &str, item_id: &str) -> Result<()> {
        let changed = self.with_conn(|conn| {
            Ok(conn.execute(
                &format!(
                    "DELETE FROM {} WHERE situation_id = ?1 AND {} = ?2",
                    kind.join_table(),
                    kind.item_column()
                ),
                [situation_id, item_id],
            )?)
        })?;
        if changed == 0 {
            return Err(HavaError::NotFound(format!(
                "{} {} is not assigned to situation {}",
                kind.item_table(),
                item_id,
                situation_id
            )));
        }
        Ok(())
    }
}

fn exists(conn: &Connection, table: &str, id: &str) -> Result<bool> {
    let found = conn
        .query_row(
            &format!("SELECT 1 FROM {} WHERE id = ?1", table),
            [id],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

fn require_changed(changed: usize, kind: &str, id: &str) -> Result<()> {
    if changed == 0 {
        return Err(HavaError::NotFound(format!("{} {}", kind, id)));
    }
    Ok(())
}

#[async_trait]
impl SituationStore for Database {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn test_connection(&self) -> Result<bool> {
        self.with_conn(|conn| {
            let one: i64 = conn.query_row("SELECT 1", [], |row| row.get(0))?;
            Ok(one == 1)
        })
    }

    async fn fetch_candidates(&self, filter: &CandidateFilter) -> Result<Vec<Situation>> {
        self.candidate_situations(filter)
    }

    async fn list_situations(&self) -> Result<Vec<Situation>> {
        self.all_situations()
    }

    async fn get_situation(&self, id: &str) -> Result<Option<Situation>> {
        self.situation_by_id(id)
    }

    async fn create_situation(&self, draft: &SituationDraft) -> Result<Situation> {
        self.insert_situation(draft)
    }

    async fn update_situation(&self, id: &str, draft: &SituationDraft) -> Result<()> {
        self.replace_situation(id, draft)
    }

    async fn delete_situation(&self, id: &str) -> Result<()> {
        self.remove_situation(id)
    }

    async fn list_music(&self) -> Result<Vec<Music>> {
        self.all_music()
    }

    async fn create_music(&self, draft: &MusicDraft) -> Result<Music> {
        self.insert_music(draft)
    }

    async fn update_music(&self, id: &str, draft: &MusicDraft) -> Result<()> {
        self.replace_music(id, draft)
    }

    async fn delete_music(&self, id: &str) -> Result<()> {
        self.remove_music(id)
    }

    async fn list_clothing(&self) -> Result<Vec<Clothing>> {
        self.all_clothing()
    }

    async fn create_clothing(&self, draft: &ClothingDraft) -> Result<Clothing> {
        self.insert_clothing(draft)
    }

    async fn update_clothing(&self, id: &str, draft: &ClothingDraft) -> Result<()> {
        self.replace_clothing(id, draft)
    }

    async fn delete_clothing(&self, id: &str) -> Result<()> {
        self.remove_clothing(id)
    }

    async fn assign_music(&self, situation_id: &str, music_id: &str) -> Result<()> {
        self.link(Association::Music, situation_id, music_id)
    }

    async fn unassign_music(&self, situation_id: &str, music_id: &str) -> Result<()> {
        self.unlink(Association::Music, situation_id, music_id)
    }

    async fn assign_clothing(&self, situation_id: &str, clothing_id: &str) -> Result<()> {
        self.link(Association::Clothing, situation_id, clothing_id)
    }

    async fn unassign_clothing(&self, situation_id: &str, clothing_id: &str) -> Result<()> {
        self.unlink(Association::Clothing, situation_id, clothing_id)
    }
}

trait OptionalExt<T> {
    fn optional(self) -> rusqlite::Result<Option<T>>;
}

impl<T> OptionalExt<T> for rusqlite::Result<T> {
    fn optional(self) -> rusqlite::Result<Option<T>> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Criterion, HumidityLevel, TemperatureBand, TimeOfDay, WeatherCondition, WindLevel,
    };

    fn music_draft() -> MusicDraft {
        MusicDraft {
            title: "Baran".into(),
            artist: "Shajarian".into(),
            spotify_link: "https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC".into(),
            cover_url: None,
        }
    }

    fn filter(
        weather: WeatherCondition,
        temperature: TemperatureBand,
        time_of_day: TimeOfDay,
    ) -> CandidateFilter {
        CandidateFilter {
            weather: Some(weather),
            temperature: Some(temperature),
            humidity: Some(HumidityLevel::Normal),
            wind: Some(WindLevel::Calm),
            time_of_day: Some(time_of_day),
            limit: 20,
        }
    }

    #[test]
    fn test_situation_crud() {
        let db = Database::open_in_memory().unwrap();

        let created = db
            .insert_situation(
                &SituationDraft::new("  هوا بارانی است  ").with_weather(WeatherCondition::Rainy),
            )
            .unwrap();
        assert_eq!(created.sentence_fa, "هوا بارانی است");

        let loaded = db.situation_by_id(&created.id).unwrap().unwrap();
        assert_eq!(loaded.weather, Criterion::Specific(WeatherCondition::Rainy));
        assert!(loaded.temperature.is_any());

        let mut draft = loaded.to_draft();
        draft.sentence_fa = "باران".into();
        draft.weather = Criterion::Any;
        db.replace_situation(&created.id, &draft).unwrap();

        let updated = db.situation_by_id(&created.id).unwrap().unwrap();
        assert_eq!(updated.sentence_fa, "باران");
        assert!(updated.is_catch_all());

        db.remove_situation(&created.id).unwrap();
        assert!(db.situation_by_id(&created.id).unwrap().is_none());
    }

    #[test]
    fn test_blank_sentence_rejected() {
        let db = Database::open_in_memory().unwrap();
        let err = db.insert_situation(&SituationDraft::new("   ")).unwrap_err();
        assert!(matches!(err, HavaError::Validation(_)));
        assert!(db.all_situations().unwrap().is_empty());
    }

    #[test]
    fn test_missing_ids_are_not_found() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(
            db.remove_situation("nope"),
            Err(HavaError::NotFound(_))
        ));
        assert!(matches!(
            db.replace_music("nope", &music_draft()),
            Err(HavaError::NotFound(_))
        ));
        assert!(matches!(
            db.remove_clothing("nope"),
            Err(HavaError::NotFound(_))
        ));
    }

    #[test]
    fn test_candidates_respect_wildcards() {
        let db = Database::open_in_memory().unwrap();
        db.insert_situation(&SituationDraft::new("هر هوایی")).unwrap();
        db.insert_situation(
            &SituationDraft::new("برف صبحگاهی")
                .with_weather(WeatherCondition::Snowy)
                .with_time_of_day(TimeOfDay::Morning),
        )
        .unwrap();
        db.insert_situation(&SituationDraft::new("آفتاب").with_weather(WeatherCondition::Sunny))
            .unwrap();
        db.insert_situation(
            &SituationDraft::new("برف شبانه")
                .with_weather(WeatherCondition::Snowy)
                .with_time_of_day(TimeOfDay::Night),
        )
        .unwrap();

        let found = db
            .candidate_situations(&filter(
                WeatherCondition::Snowy,
                TemperatureBand::Cold,
                TimeOfDay::Morning,
            ))
            .unwrap();
        let mut sentences: Vec<_> = found.iter().map(|s| s.sentence_fa.as_str()).collect();
        sentences.sort();
        assert_eq!(sentences, vec!["برف صبحگاهی", "هر هوایی"]);
    }

    #[test]
    fn test_candidate_limit_keeps_most_specific() {
        let db = Database::open_in_memory().unwrap();
        for i in 0..5 {
            db.insert_situation(&SituationDraft::new(format!("عمومی {}", i)))
                .unwrap();
        }
        db.insert_situation(
            &SituationDraft::new("دقیق")
                .with_weather(WeatherCondition::Rainy)
                .with_temperature(TemperatureBand::Mild),
        )
        .unwrap();

        let mut f = filter(WeatherCondition::Rainy, TemperatureBand::Mild, TimeOfDay::Noon);
        f.limit = 2;
        let found = db.candidate_situations(&f).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].sentence_fa, "دقیق");
    }

    #[test]
    fn test_associations_load_and_cascade() {
        let db = Database::open_in_memory().unwrap();
        let situation = db.insert_situation(&SituationDraft::new("باران")).unwrap();
        let music = db.insert_music(&music_draft()).unwrap();
        let clothing = db.insert_clothing(&ClothingDraft::new("چتر")).unwrap();

        db.link(Association::Music, &situation.id, &music.id).unwrap();
        db.link(Association::Clothing, &situation.id, &clothing.id)
            .unwrap();

        let loaded = db.situation_by_id(&situation.id).unwrap().unwrap();
        assert_eq!(loaded.music, vec![music.clone()]);
        assert_eq!(loaded.clothing, vec![clothing.clone()]);

        // Deleting the music removes only its association
        db.remove_music(&music.id).unwrap();
        let loaded = db.situation_by_id(&situation.id).unwrap().unwrap();
        assert!(loaded.music.is_empty());
        assert_eq!(loaded.clothing.len(), 1);

        // Deleting the situation removes the remaining association rows
        db.remove_situation(&situation.id).unwrap();
        let remaining: i64 = db
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM situation_clothing", [], |row| {
                    row.get(0)
                })?)
            })
            .unwrap();
        assert_eq!(remaining, 0);
        assert_eq!(db.all_clothing().unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_assignment_rejected() {
        let db = Database::open_in_memory().unwrap();
        let situation = db.insert_situation(&SituationDraft::new("باران")).unwrap();
        let music = db.insert_music(&music_draft()).unwrap();

        db.link(Association::Music, &situation.id, &music.id).unwrap();
        let err = db
            .link(Association::Music, &situation.id, &music.id)
            .unwrap_err();
        assert!(matches!(err, HavaError::Validation(_)));

        let err = db
            .link(Association::Music, &situation.id, "missing")
            .unwrap_err();
        assert!(matches!(err, HavaError::NotFound(_)));

        db.unlink(Association::Music, &situation.id, &music.id)
            .unwrap();
        assert!(matches!(
            db.unlink(Association::Music, &situation.id, &music.id),
            Err(HavaError::NotFound(_))
        ));
    }

    #[test]
    fn test_unknown_stored_value_reads_as_wildcard() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            // Bypass the CHECK constraint the way a hand-edited legacy row would
            conn.execute_batch(
                r#"
                PRAGMA ignore_check_constraints = ON;
                INSERT INTO situations (id, weather, sentence_fa, created_at)
                VALUES ('legacy', 'drizzle', 'قدیمی', 'not a date');
                PRAGMA ignore_check_constraints = OFF;
                "#,
            )?;
            Ok(())
        })
        .unwrap();

        let legacy = db.situation_by_id("legacy").unwrap().unwrap();
        assert!(legacy.weather.is_any());
    }

    #[test]
    fn test_list_newest_first() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            conn.execute_batch(
                r#"
                INSERT INTO situations (id, sentence_fa, created_at)
                VALUES ('old', 'قدیم', '2024-01-01T00:00:00+00:00');
                INSERT INTO situations (id, sentence_fa, created_at)
                VALUES ('new', 'جدید', '2025-06-01T00:00:00+00:00');
                "#,
            )?;
            Ok(())
        })
        .unwrap();

        let ids: Vec<_> = db
            .all_situations()
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["new", "old"]);
    }

    #[tokio::test]
    async fn test_store_trait_roundtrip() {
        let db = Database::open_in_memory().unwrap();
        let store: &dyn SituationStore = &db;

        assert_eq!(store.backend_name(), "sqlite");
        assert!(store.test_connection().await.unwrap());

        let situation = store
            .create_situation(&SituationDraft::new("مه").with_weather(WeatherCondition::Foggy))
            .await
            .unwrap();
        let clothing = store
            .create_clothing(&ClothingDraft::new("کاپشن"))
            .await
            .unwrap();
        store
            .assign_clothing(&situation.id, &clothing.id)
            .await
            .unwrap();

        let listed = store.list_situations().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].clothing[0].description_fa, "کاپشن");

        store
            .unassign_clothing(&situation.id, &clothing.id)
            .await
            .unwrap();
        let listed = store.list_situations().await.unwrap();
        assert!(listed[0].clothing.is_empty());
    }
}
