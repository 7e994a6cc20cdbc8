use crate::db::Database;
use crate::error::Result;

const MIGRATIONS: &[&str] = &[
    // Migration 1: Initial schema
    r#"
    CREATE TABLE IF NOT EXISTS situations (
        id TEXT PRIMARY KEY,
        weather TEXT CHECK (weather IN ('sunny', 'cloudy', 'rainy', 'snowy', 'stormy', 'foggy')),
        temperature TEXT CHECK (temperature IN ('cold', 'mild', 'hot')),
        humidity TEXT CHECK (humidity IN ('dry', 'normal', 'humid')),
        wind TEXT CHECK (wind IN ('calm', 'breezy', 'windy')),
        time_of_day TEXT CHECK (time_of_day IN ('morning', 'noon', 'evening', 'night')),
        mood TEXT CHECK (mood IN ('happy', 'sad', 'energetic', 'calm', 'romantic')),
        city TEXT,
        sentence_fa TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
    );

    CREATE TABLE IF NOT EXISTS music (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        artist TEXT NOT NULL,
        spotify_link TEXT NOT NULL,
        cover_url TEXT,
        created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
    );

    CREATE TABLE IF NOT EXISTS clothing (
        id TEXT PRIMARY KEY,
        description_fa TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
    );

    CREATE TABLE IF NOT EXISTS situation_music (
        situation_id TEXT NOT NULL REFERENCES situations(id) ON DELETE CASCADE,
        music_id TEXT NOT NULL REFERENCES music(id) ON DELETE CASCADE,
        PRIMARY KEY (situation_id, music_id)
    );

    CREATE TABLE IF NOT EXISTS situation_clothing (
        situation_id TEXT NOT NULL REFERENCES situations(id) ON DELETE CASCADE,
        clothing_id TEXT NOT NULL REFERENCES clothing(id) ON DELETE CASCADE,
        PRIMARY KEY (situation_id, clothing_id)
    );

    CREATE TABLE IF NOT EXISTS schema_migrations (
        version INTEGER PRIMARY KEY,
        applied_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    // Migration 2: Add indexes
    r#"
    CREATE INDEX IF NOT EXISTS idx_situations_weather ON situations(weather);
    CREATE INDEX IF NOT EXISTS idx_situations_temperature ON situations(temperature);
    CREATE INDEX IF NOT EXISTS idx_situations_time_of_day ON situations(time_of_day);
    CREATE INDEX IF NOT EXISTS idx_situation_music_situation ON situation_music(situation_id);
    CREATE INDEX IF NOT EXISTS idx_situation_clothing_situation ON situation_clothing(situation_id);
    "#,
    // Migration 3: English search phrase for clothing
    r#"
    ALTER TABLE clothing ADD COLUMN english_phrase TEXT;
    "#,
];

pub fn run(db: &Database) -> Result<()> {
    db.with_conn_mut(|conn| {
        // Ensure schema_migrations table exists
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?;

        let current_version: i32 = conn
            .query_row(
                "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
                [],
                |row| row.get(0),
            )
            .unwrap_or(0);

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            let version = (i + 1) as i32;
            if version > current_version {
                tracing::info!("Applying migration {}", version);
                let tx = conn.transaction()?;
                tx.execute_batch(migration)?;
                tx.execute(
                    "INSERT INTO schema_migrations (version) VALUES (?1)",
                    [version],
                )?;
                tx.commit()?;
            }
        }

        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let db = Database::open_in_memory().unwrap();
        run(&db).unwrap();

        let version: i32 = db
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                    row.get(0)
                })?)
            })
            .unwrap();
        assert_eq!(version, MIGRATIONS.len() as i32);
    }

    #[test]
    fn unknown_category_rejected_by_schema() {
        let db = Database::open_in_memory().unwrap();
        let result = db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO situations (id, weather, sentence_fa) VALUES ('x', 'drizzle', 'a')",
                [],
            )?;
            Ok(())
        });
        assert!(result.is_err());
    }
}
