//! Crowdlist Storage
//!
//! Persistence for voted playlists: playlist metadata, track membership in
//! insertion order, and the Vote Store.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: `playlists` and `votes` each own their queries
//! - **`SqliteStore`**: implements the core store traits on a `sqlx` pool
//! - **`MemoryStore`**: same contract behind a single async `RwLock`, for
//!   tests and ephemeral servers
//!
//! # Example
//!
//! ```rust,no_run
//! use crowdlist_core::{CreatePlaylist, PlaylistStore};
//! use crowdlist_storage::{create_pool, run_migrations, SqliteStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://crowdlist.db").await?;
//! run_migrations(&pool).await?;
//!
//! let store = SqliteStore::new(pool);
//! let playlist = store
//!     .create_playlist(CreatePlaylist {
//!         title: "Friday".to_string(),
//!         external_id: None,
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;
mod memory;

// Vertical slices
pub mod playlists;
pub mod votes;

pub use context::SqliteStore;
pub use error::StorageError;
pub use memory::MemoryStore;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;
use tracing::{debug, info};

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// Call once at startup, before the pool is handed to a store.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StorageError> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| StorageError::Migration(e.to_string()))?;
    info!("Database migrations applied");
    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `sqlite://crowdlist.db`)
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, StorageError> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    debug!(url = %database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        // Concurrent voters contend on the same file
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

    info!("SQLite pool created");

    Ok(pool)
}
