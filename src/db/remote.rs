use super::{stored_criterion, stored_mood, SituationStore};
use crate::error::{HavaError, Result};
use crate::logic::{CandidateFilter, SqlDialect};
use crate::models::{Category, Clothing, ClothingDraft, Music, MusicDraft, Situation, SituationDraft};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use uuid::Uuid;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS situations (
        id UUID PRIMARY KEY,
        weather TEXT CHECK (weather IN ('sunny', 'cloudy', 'rainy', 'snowy', 'stormy', 'foggy')),
        temperature TEXT CHECK (temperature IN ('cold', 'mild', 'hot')),
        humidity TEXT CHECK (humidity IN ('dry', 'normal', 'humid')),
        wind TEXT CHECK (wind IN ('calm', 'breezy', 'windy')),
        time_of_day TEXT CHECK (time_of_day IN ('morning', 'noon', 'evening', 'night')),
        mood TEXT CHECK (mood IN ('happy', 'sad', 'energetic', 'calm', 'romantic')),
        city TEXT,
        sentence_fa TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS music (
        id UUID PRIMARY KEY,
        title TEXT NOT NULL,
        artist TEXT NOT NULL,
        spotify_link TEXT NOT NULL,
        cover_url TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS clothing (
        id UUID PRIMARY KEY,
        description_fa TEXT NOT NULL,
        english_phrase TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS situation_music (
        situation_id UUID NOT NULL REFERENCES situations(id) ON DELETE CASCADE,
        music_id UUID NOT NULL REFERENCES music(id) ON DELETE CASCADE,
        PRIMARY KEY (situation_id, music_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS situation_clothing (
        situation_id UUID NOT NULL REFERENCES situations(id) ON DELETE CASCADE,
        clothing_id UUID NOT NULL REFERENCES clothing(id) ON DELETE CASCADE,
        PRIMARY KEY (situation_id, clothing_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_situations_weather ON situations(weather)",
    "CREATE INDEX IF NOT EXISTS idx_situations_temperature ON situations(temperature)",
    "CREATE INDEX IF NOT EXISTS idx_situations_time_of_day ON situations(time_of_day)",
];

const SITUATION_COLUMNS: &str = "id::text AS id, weather, temperature, humidity, wind, \
     time_of_day, mood, city, sentence_fa, created_at";

/// Shared Postgres deployment of the situation library.
pub struct PgSituationStore {
    pool: PgPool,
}

impl PgSituationStore {
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(4)
            .connect(url)
            .await
            .map_err(|e| HavaError::DataSourceUnavailable(format!("PostgreSQL: {}", e)))?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn situations_where(
        &self,
        where_clause: &str,
        order_by: &str,
        limit: Option<usize>,
        params: &[&str],
    ) -> Result<Vec<Situation>> {
        let mut sql = format!(
            "SELECT {} FROM situations WHERE {} ORDER BY {}",
            SITUATION_COLUMNS, where_clause, order_by
        );
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        let mut query = sqlx::query(&sql);
        for param in params {
            query = query.bind(*param);
        }
        let rows = query.fetch_all(&self.pool).await?;

        let mut situations = rows
            .iter()
            .map(row_to_situation)
            .collect::<Result<Vec<_>>>()?;
        self.attach_associations(&mut situations).await?;
        Ok(situations)
    }

    async fn attach_associations(&self, situations: &mut [Situation]) -> Result<()> {
        if situations.is_empty() {
            return Ok(());
        }
        let ids: Vec<String> = situations.iter().map(|s| s.id.clone()).collect();

        let music_rows = sqlx::query(
            r#"
            SELECT sm.situation_id::text AS situation_id,
                   m.id::text AS id, m.title, m.artist, m.spotify_link, m.cover_url, m.created_at
            FROM situation_music sm
            JOIN music m ON m.id = sm.music_id
            WHERE sm.situation_id::text = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut music: HashMap<String, Vec<Music>> = HashMap::new();
        for row in &music_rows {
            let situation_id: String = row.try_get("situation_id")?;
            music.entry(situation_id).or_default().push(row_to_music(row)?);
        }

        let clothing_rows = sqlx::query(
            r#"
            SELECT sc.situation_id::text AS situation_id,
                   c.id::text AS id, c.description_fa, c.english_phrase, c.created_at
            FROM situation_clothing sc
            JOIN clothing c ON c.id = sc.clothing_id
            WHERE sc.situation_id::text = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut clothing: HashMap<String, Vec<Clothing>> = HashMap::new();
        for row in &clothing_rows {
            let situation_id: String = row.try_get("situation_id")?;
            clothing
                .entry(situation_id)
                .or_default()
                .push(row_to_clothing(row)?);
        }

        for situation in situations.iter_mut() {
            situation.music = music.remove(&situation.id).unwrap_or_default();
            situation.clothing = clothing.remove(&situation.id).unwrap_or_default();
        }
        Ok(())
    }

    async fn exists(&self, table: &str, id: &str) -> Result<bool> {
        let row = sqlx::query(&format!("SELECT 1 FROM {} WHERE id = $1::uuid", table))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn execute_for_id(&self, sql: &str, kind: &str, id: &str) -> Result<()> {
        let id = parse_id(kind, id)?;
        let result = sqlx::query(sql).bind(&id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(HavaError::NotFound(format!("{} {}", kind, id)));
        }
        Ok(())
    }

    async fn link(
        &self,
        join_table: &str,
        item_table: &str,
        item_column: &str,
        situation_id: &str,
        item_id: &str,
    ) -> Result<()> {
        let situation_id = parse_id("situation", situation_id)?;
        let item_id = parse_id(item_table, item_id)?;
        if !self.exists("situations", &situation_id).await? {
            return Err(HavaError::NotFound(format!("situation {}", situation_id)));
        }
        if !self.exists(item_table, &item_id).await? {
            return Err(HavaError::NotFound(format!("{} {}", item_table, item_id)));
        }

        let result = sqlx::query(&format!(
            "INSERT INTO {} (situation_id, {}) VALUES ($1::uuid, $2::uuid) ON CONFLICT DO NOTHING",
            join_table, item_column
        ))
        .bind(&situation_id)
        .bind(&item_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(HavaError::Validation(format!(
                "{} {} is already assigned to situation {}",
                item_table, item_id, situation_id
            )));
        }
        Ok(())
    }

    async fn unlink(
        &self,
        join_table: &str,
        item_table: &str,
        item_column: &str,
        situation_id: &str,
        item_id: &str,
    ) -> Result<()> {
        let situation_id = parse_id("situation", situation_id)?;
        let item_id = parse_id(item_table, item_id)?;
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE situation_id = $1::uuid AND {} = $2::uuid",
            join_table, item_column
        ))
        .bind(&situation_id)
        .bind(&item_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(HavaError::NotFound(format!(
                "{} {} is not assigned to situation {}",
                item_table, item_id, situation_id
            )));
        }
        Ok(())
    }
}

/// Ids are UUIDs in Postgres. Anything else cannot name a row, so it is
/// reported as not found rather than as a cast error from the server.
fn parse_id(kind: &str, id: &str) -> Result<String> {
    Uuid::parse_str(id.trim())
        .map(|u| u.to_string())
        .map_err(|_| HavaError::NotFound(format!("{} {}", kind, id)))
}

fn row_to_situation(row: &PgRow) -> Result<Situation> {
    Ok(Situation {
        id: row.try_get("id")?,
        weather: stored_criterion("weather", row.try_get("weather")?),
        temperature: stored_criterion("temperature", row.try_get("temperature")?),
        humidity: stored_criterion("humidity", row.try_get("humidity")?),
        wind: stored_criterion("wind", row.try_get("wind")?),
        time_of_day: stored_criterion("time_of_day", row.try_get("time_of_day")?),
        mood: stored_mood(row.try_get("mood")?),
        city: row.try_get("city")?,
        sentence_fa: row.try_get("sentence_fa")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        music: Vec::new(),
        clothing: Vec::new(),
    })
}

fn row_to_music(row: &PgRow) -> Result<Music> {
    Ok(Music {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        artist: row.try_get("artist")?,
        spotify_link: row.try_get("spotify_link")?,
        cover_url: row.try_get("cover_url")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

fn row_to_clothing(row: &PgRow) -> Result<Clothing> {
    Ok(Clothing {
        id: row.try_get("id")?,
        description_fa: row.try_get("description_fa")?,
        english_phrase: row.try_get("english_phrase")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

#[async_trait]
impl SituationStore for PgSituationStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn test_connection(&self) -> Result<bool> {
        let row = sqlx::query("SELECT 1::int4 AS one")
            .fetch_one(&self.pool)
            .await?;
        let one: i32 = row.try_get("one")?;
        Ok(one == 1)
    }

    async fn fetch_candidates(&self, filter: &CandidateFilter) -> Result<Vec<Situation>> {
        let sql = filter.to_sql(SqlDialect::Postgres);
        self.situations_where(
            &sql.where_clause,
            &sql.order_by,
            Some(sql.limit),
            &sql.params,
        )
        .await
    }

    async fn list_situations(&self) -> Result<Vec<Situation>> {
        self.situations_where("TRUE", "created_at DESC", None, &[])
            .await
    }

    async fn get_situation(&self, id: &str) -> Result<Option<Situation>> {
        let Ok(id) = parse_id("situation", id) else {
            return Ok(None);
        };
        let mut found = self
            .situations_where("id = $1::uuid", "created_at DESC", Some(1), &[id.as_str()])
            .await?;
        Ok(found.pop())
    }

    async fn create_situation(&self, draft: &SituationDraft) -> Result<Situation> {
        let draft = draft.clone().validated()?;
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO situations
                (id, weather, temperature, humidity, wind, time_of_day, mood, city, sentence_fa, created_at)
            VALUES ($1::uuid, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(&id)
        .bind(draft.weather.as_stored())
        .bind(draft.temperature.as_stored())
        .bind(draft.humidity.as_stored())
        .bind(draft.wind.as_stored())
        .bind(draft.time_of_day.as_stored())
        .bind(draft.mood.map(|m| m.as_str()))
        .bind(draft.city.as_deref())
        .bind(&draft.sentence_fa)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

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

    async fn update_situation(&self, id: &str, draft: &SituationDraft) -> Result<()> {
        let draft = draft.clone().validated()?;
        let id = parse_id("situation", id)?;

        let result = sqlx::query(
            r#"
            UPDATE situations SET
                weather = $1, temperature = $2, humidity = $3, wind = $4,
                time_of_day = $5, mood = $6, city = $7, sentence_fa = $8
            WHERE id = $9::uuid
            "#,
        )
        .bind(draft.weather.as_stored())
        .bind(draft.temperature.as_stored())
        .bind(draft.humidity.as_stored())
        .bind(draft.wind.as_stored())
        .bind(draft.time_of_day.as_stored())
        .bind(draft.mood.map(|m| m.as_str()))
        .bind(draft.city.as_deref())
        .bind(&draft.sentence_fa)
        .bind(&id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(HavaError::NotFound(format!("situation {}", id)));
        }
        Ok(())
    }

    async fn delete_situation(&self, id: &str) -> Result<()> {
        self.execute_for_id("DELETE FROM situations WHERE id = $1::uuid", "situation", id)
            .await
    }

    async fn list_music(&self) -> Result<Vec<Music>> {
        let rows = sqlx::query(
            r#"
            SELECT id::text AS id, title, artist, spotify_link, cover_url, created_at
            FROM music
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_music).collect()
    }

    async fn create_music(&self, draft: &MusicDraft) -> Result<Music> {
        let draft = draft.clone().validated()?;
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO music (id, title, artist, spotify_link, cover_url, created_at)
            VALUES ($1::uuid, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&id)
        .bind(&draft.title)
        .bind(&draft.artist)
        .bind(&draft.spotify_link)
        .bind(draft.cover_url.as_deref())
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(Music {
            id,
            title: draft.title,
            artist: draft.artist,
            spotify_link: draft.spotify_link,
            cover_url: draft.cover_url,
            created_at,
        })
    }

    async fn update_music(&self, id: &str, draft: &MusicDraft) -> Result<()> {
        let draft = draft.clone().validated()?;
        let id = parse_id("music", id)?;

        let result = sqlx::query(
            r#"
            UPDATE music SET title = $1, artist = $2, spotify_link = $3, cover_url = $4
            WHERE id = $5::uuid
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.artist)
        .bind(&draft.spotify_link)
        .bind(draft.cover_url.as_deref())
        .bind(&id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(HavaError::NotFound(format!("music {}", id)));
        }
        Ok(())
    }

    async fn delete_music(&self, id: &str) -> Result<()> {
        self.execute_for_id("DELETE FROM music WHERE id = $1::uuid", "music", id)
            .await
    }

    async fn list_clothing(&self) -> Result<Vec<Clothing>> {
        let rows = sqlx::query(
            r#"
            SELECT id::text AS id, description_fa, english_phrase, created_at
            FROM clothing
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_clothing).collect()
    }

    async fn create_clothing(&self, draft: &ClothingDraft) -> Result<Clothing> {
        let draft = draft.clone().validated()?;
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO clothing (id, description_fa, english_phrase, created_at)
            VALUES ($1::uuid, $2, $3, $4)
            "#,
        )
        .bind(&id)
        .bind(&draft.description_fa)
        .bind(draft.english_phrase.as_deref())
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(Clothing {
            id,
            description_fa: draft.description_fa,
            english_phrase: draft.english_phrase,
            created_at,
        })
    }

    async fn update_clothing(&self, id: &str, draft: &ClothingDraft) -> Result<()> {
        let draft = draft.clone().validated()?;
        let id = parse_id("clothing", id)?;

        let result = sqlx::query(
            "UPDATE clothing SET description_fa = $1, english_phrase = $2 WHERE id = $3::uuid",
        )
        .bind(&draft.description_fa)
        .bind(draft.english_phrase.as_deref())
        .bind(&id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(HavaError::NotFound(format!("clothing {}", id)));
        }
        Ok(())
    }

    async fn delete_clothing(&self, id: &str) -> Result<()> {
        self.execute_for_id("DELETE FROM clothing WHERE id = $1::uuid", "clothing", id)
            .await
    }

    async fn assign_music(&self, situation_id: &str, music_id: &str) -> Result<()> {
        self.link("situation_music", "music", "music_id", situation_id, music_id)
            .await
    }

    async fn unassign_music(&self, situation_id: &str, music_id: &str) -> Result<()> {
        self.unlink("situation_music", "music", "music_id", situation_id, music_id)
            .await
    }

    async fn assign_clothing(&self, situation_id: &str, clothing_id: &str) -> Result<()> {
        self.link(
            "situation_clothing",
            "clothing",
            "clothing_id",
            situation_id,
            clothing_id,
        )
        .await
    }

    async fn unassign_clothing(&self, situation_id: &str, clothing_id: &str) -> Result<()> {
        self.unlink(
            "situation_clothing",
            "clothing",
            "clothing_id",
            situation_id,
            clothing_id,
        )
        .await
    }
}
