use crate::models::{AppPreferences, FavoritesSet, Language};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;

/// Storage key for the favorites list (JSON array of venue names)
pub const FAVORITES_KEY: &str = "favorite-pizzerias";
/// Storage key for the dark mode flag (JSON bool)
pub const DARK_MODE_KEY: &str = "darkmode-preference";
/// Storage key for the interface language code
pub const LANGUAGE_KEY: &str = "app-language";

/// Errors that can occur with settings storage
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Per-device key-value settings
///
/// Holds favorites and display preferences. Postgres is used when a
/// database is configured; otherwise values live in process memory and are
/// lost on restart.
pub enum SettingsStore {
    Postgres(PgPool),
    Memory(RwLock<HashMap<(String, String), String>>),
}

impl SettingsStore {
    /// Connect to PostgreSQL and run pending migrations
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout_secs: u64,
        idle_timeout_secs: u64,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(idle_timeout_secs))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(SettingsStore::Postgres(pool))
    }

    pub fn in_memory() -> Self {
        SettingsStore::Memory(RwLock::new(HashMap::new()))
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            SettingsStore::Postgres(_) => "postgres",
            SettingsStore::Memory(_) => "memory",
        }
    }

    /// Read a raw stored value
    pub async fn get(&self, device_id: &str, key: &str) -> Result<Option<String>, StoreError> {
        match self {
            SettingsStore::Postgres(pool) => {
                let query = r#"
                    SELECT value
                    FROM device_settings
                    WHERE device_id = $1 AND key = $2
                "#;

                let row = sqlx::query(query)
                    .bind(device_id)
                    .bind(key)
                    .fetch_optional(pool)
                    .await?;

                Ok(row.map(|row| row.get("value")))
            }
            SettingsStore::Memory(map) => {
                let map = map.read().await;
                Ok(map.get(&(device_id.to_string(), key.to_string())).cloned())
            }
        }
    }

    /// Write a raw value, replacing any previous one
    pub async fn set(&self, device_id: &str, key: &str, value: &str) -> Result<(), StoreError> {
        match self {
            SettingsStore::Postgres(pool) => {
                let query = r#"
                    INSERT INTO device_settings (device_id, key, value, updated_at)
                    VALUES ($1, $2, $3, NOW())
                    ON CONFLICT (device_id, key)
                    DO UPDATE SET
                        value = EXCLUDED.value,
                        updated_at = EXCLUDED.updated_at
                "#;

                sqlx::query(query)
                    .bind(device_id)
                    .bind(key)
                    .bind(value)
                    .execute(pool)
                    .await?;
            }
            SettingsStore::Memory(map) => {
                let mut map = map.write().await;
                map.insert((device_id.to_string(), key.to_string()), value.to_string());
            }
        }

        tracing::debug!("Stored {} for device {}", key, device_id);
        Ok(())
    }

    /// Load the favorites of a device; unreadable data counts as empty
    pub async fn load_favorites(&self, device_id: &str) -> Result<FavoritesSet, StoreError> {
        let json = self.get(device_id, FAVORITES_KEY).await?;
        Ok(parse_favorites(device_id, json.as_deref()))
    }

    pub async fn save_favorites(&self, device_id: &str, favorites: &FavoritesSet) -> Result<(), StoreError> {
        let json = serde_json::to_string(favorites)?;
        self.set(device_id, FAVORITES_KEY, &json).await
    }

    /// Toggle `name` in the favorites of a device and persist the result
    ///
    /// The read and the write happen under one lock (memory) or one
    /// row-locking transaction (Postgres), so concurrent toggles for the
    /// same device are all applied.
    pub async fn toggle_favorite(&self, device_id: &str, name: &str) -> Result<FavoritesSet, StoreError> {
        let (favorites, added) = match self {
            SettingsStore::Postgres(pool) => {
                let mut tx = pool.begin().await?;

                // Make sure a row exists so FOR UPDATE has something to lock
                sqlx::query(
                    r#"
                    INSERT INTO device_settings (device_id, key, value, updated_at)
                    VALUES ($1, $2, '[]', NOW())
                    ON CONFLICT (device_id, key) DO NOTHING
                "#,
                )
                .bind(device_id)
                .bind(FAVORITES_KEY)
                .execute(&mut *tx)
                .await?;

                let row = sqlx::query(
                    r#"
                    SELECT value
                    FROM device_settings
                    WHERE device_id = $1 AND key = $2
                    FOR UPDATE
                "#,
                )
                .bind(device_id)
                .bind(FAVORITES_KEY)
                .fetch_one(&mut *tx)
                .await?;

                let current: String = row.get("value");
                let mut favorites = parse_favorites(device_id, Some(&current));
                let added = favorites.toggle(name);

                sqlx::query(
                    r#"
                    UPDATE device_settings
                    SET value = $3, updated_at = NOW()
                    WHERE device_id = $1 AND key = $2
                "#,
                )
                .bind(device_id)
                .bind(FAVORITES_KEY)
                .bind(serde_json::to_string(&favorites)?)
                .execute(&mut *tx)
                .await?;

                tx.commit().await?;
                (favorites, added)
            }
            SettingsStore::Memory(map) => {
                let mut map = map.write().await;
                let key = (device_id.to_string(), FAVORITES_KEY.to_string());

                let mut favorites = parse_favorites(device_id, map.get(&key).map(String::as_str));
                let added = favorites.toggle(name);
                map.insert(key, serde_json::to_string(&favorites)?);
                (favorites, added)
            }
        };

        tracing::debug!(
            "{} favorite {} for device {}",
            if added { "Added" } else { "Removed" },
            name,
            device_id
        );

        Ok(favorites)
    }

    /// Load display preferences, falling back to defaults for anything
    /// missing or unreadable
    pub async fn load_preferences(&self, device_id: &str) -> Result<AppPreferences, StoreError> {
        let mut preferences = AppPreferences::default();

        if let Some(json) = self.get(device_id, DARK_MODE_KEY).await? {
            match serde_json::from_str::<bool>(&json) {
                Ok(dark_mode) => preferences.dark_mode = dark_mode,
                Err(e) => tracing::warn!("Could not load theme preference for {}: {}", device_id, e),
            }
        }

        if let Some(code) = self.get(device_id, LANGUAGE_KEY).await? {
            match code.parse::<Language>() {
                Ok(language) => preferences.language = language,
                Err(e) => tracing::warn!("Could not load language preference for {}: {}", device_id, e),
            }
        }

        Ok(preferences)
    }

    pub async fn save_preferences(&self, device_id: &str, preferences: &AppPreferences) -> Result<(), StoreError> {
        let dark_mode = serde_json::to_string(&preferences.dark_mode)?;
        self.set(device_id, DARK_MODE_KEY, &dark_mode).await?;
        self.set(device_id, LANGUAGE_KEY, preferences.language.code()).await
    }

    /// Health check for the storage backend
    pub async fn health_check(&self) -> Result<bool, StoreError> {
        match self {
            SettingsStore::Postgres(pool) => sqlx::query("SELECT 1")
                .fetch_one(pool)
                .await
                .map(|_| true)
                .map_err(Into::into),
            SettingsStore::Memory(_) => Ok(true),
        }
    }
}

fn parse_favorites(device_id: &str, json: Option<&str>) -> FavoritesSet {
    let Some(json) = json else {
        return FavoritesSet::new();
    };

    match serde_json::from_str::<Vec<String>>(json) {
        Ok(names) => names.into_iter().collect(),
        Err(e) => {
            tracing::warn!("Could not load favorites for {}: {}", device_id, e);
            FavoritesSet::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_toggle_favorite_persists() {
        let store = SettingsStore::in_memory();

        let favorites = store.toggle_favorite("device-1", "Luigi").await.unwrap();
        assert!(favorites.contains("Luigi"));

        let loaded = store.load_favorites("device-1").await.unwrap();
        assert_eq!(loaded, favorites);

        let favorites = store.toggle_favorite("device-1", "Luigi").await.unwrap();
        assert!(favorites.is_empty());

        // Other devices are unaffected
        store.toggle_favorite("device-2", "Mario").await.unwrap();
        assert!(store.load_favorites("device-1").await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_toggles_are_not_lost() {
        let store = Arc::new(SettingsStore::in_memory());

        let handles: Vec<_> = (0..64)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store.toggle_favorite("device-1", &format!("venue-{}", i)).await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let favorites = store.load_favorites("device-1").await.unwrap();
        assert_eq!(favorites.len(), 64);
        assert!(favorites.contains("venue-0"));
        assert!(favorites.contains("venue-63"));
    }

    #[tokio::test]
    async fn test_preferences_default_and_roundtrip() {
        let store = SettingsStore::in_memory();
        assert_eq!(store.load_preferences("d").await.unwrap(), AppPreferences::default());

        let prefs = AppPreferences {
            dark_mode: true,
            language: Language::De,
        };
        store.save_preferences("d", &prefs).await.unwrap();
        assert_eq!(store.load_preferences("d").await.unwrap(), prefs);
        assert_eq!(store.get("d", LANGUAGE_KEY).await.unwrap().as_deref(), Some("de"));
    }

    #[tokio::test]
    async fn test_corrupt_values_fall_back_to_defaults() {
        let store = SettingsStore::in_memory();
        store.set("d", FAVORITES_KEY, "not json").await.unwrap();
        store.set("d", DARK_MODE_KEY, "maybe").await.unwrap();
        store.set("d", LANGUAGE_KEY, "xx").await.unwrap();

        assert!(store.load_favorites("d").await.unwrap().is_empty());
        assert_eq!(store.load_preferences("d").await.unwrap(), AppPreferences::default());
    }

    #[test]
    fn test_memory_health() {
        let store = SettingsStore::in_memory();
        assert_eq!(store.backend_name(), "memory");
        assert!(tokio_test::block_on(store.health_check()).unwrap());
    }
}
