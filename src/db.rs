//! MongoDB connection and collection handles.
//!
//! The client is constructed once in `main` and injected through
//! `ApiContext` — no module-level store handle. Connection pooling and
//! per-request I/O scheduling are the driver's concern.

use std::time::Duration;

use mongodb::bson::{doc, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};

use crate::config::Settings;

/// Fixed cap applied to every list query (newest first, no cursors).
pub const LIST_LIMIT: i64 = 50;

/// Server-selection timeout: fail fast when the store is unreachable
/// instead of hanging a request.
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),
}

/// Connect to the configured deployment and select the database.
///
/// The driver connects lazily; the first query performs the actual
/// handshake, bounded by the server-selection timeout.
pub async fn connect(settings: &Settings) -> Result<Database, DatabaseError> {
    let mut options = ClientOptions::parse(&settings.mongodb_uri).await?;
    options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);
    options.app_name = Some(crate::config::APP_NAME.to_string());

    let client = Client::with_options(options)?;
    Ok(client.database(&settings.db_name))
}

/// Named collection handles over one database.
///
/// All collections hold raw `Document`s; the typed boundary is the
/// mapper layer in `models`, not the driver.
#[derive(Clone)]
pub struct Collections {
    db: Database,
}

impl Collections {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn users(&self) -> Collection<Document> {
        self.db.collection("users")
    }

    pub fn doctors(&self) -> Collection<Document> {
        self.db.collection("doctors")
    }

    pub fn appointments(&self) -> Collection<Document> {
        self.db.collection("appointments")
    }

    pub fn prescriptions(&self) -> Collection<Document> {
        self.db.collection("prescriptions")
    }

    pub fn scans(&self) -> Collection<Document> {
        self.db.collection("scans")
    }

    /// Round-trip a ping to the server. Used by the health check only;
    /// `false` means degraded, not fatal.
    pub async fn ping(&self) -> bool {
        self.db.run_command(doc! { "ping": 1 }).await.is_ok()
    }
}
