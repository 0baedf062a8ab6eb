use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;

/// A stored registration as the HTTP surface sees it: the storage-assigned
/// id plus the four payload fields, password included, verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
}

/// Unvalidated registration draft, straight from the request body.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Write rejected by the collection schema: a required field is missing or
/// empty.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("user validation failed: `{0}` is required")]
pub struct SchemaError(pub &'static str);

/// Draft that passed the schema check.
struct Fields {
    name: String,
    phone: String,
    email: String,
    password: String,
}

impl NewUser {
    /// The schema check every store runs before persisting: all four fields
    /// present and non-empty. Nothing else is enforced here, so duplicate
    /// emails and plain-text passwords go through untouched.
    fn validated(self) -> Result<Fields, SchemaError> {
        Ok(Fields {
            name: required("name", self.name)?,
            phone: required("phone", self.phone)?,
            email: required("email", self.email)?,
            password: required("password", self.password)?,
        })
    }
}

fn required(field: &'static str, value: Option<String>) -> Result<String, SchemaError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(SchemaError(field)),
    }
}

/// Document-store seam the handlers talk to. Production runs [`MongoStore`];
/// the test suites run [`MemoryStore`].
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Schema-checks the draft and persists one user document.
    async fn insert(&self, draft: NewUser) -> anyhow::Result<UserRecord>;
    /// Every stored document, in the store's natural order.
    async fn list(&self) -> anyhow::Result<Vec<UserRecord>>;
    /// Storage liveness probe.
    async fn ping(&self) -> anyhow::Result<()>;
}

/// BSON shape of a stored user; `_id` travels as a real ObjectId.
#[derive(Debug, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    phone: String,
    email: String,
    password: String,
}

impl From<UserDocument> for UserRecord {
    fn from(document: UserDocument) -> Self {
        Self {
            id: document.id.to_hex(),
            name: document.name,
            phone: document.phone,
            email: document.email,
            password: document.password,
        }
    }
}

/// The `users` collection of one MongoDB database.
pub struct MongoStore {
    db: Database,
    users: Collection<UserDocument>,
}

impl MongoStore {
    /// Builds the client and picks the collection. The driver connects
    /// lazily, so this succeeds even while the database is down; probe with
    /// [`UserStore::ping`] to find out.
    pub async fn connect(url: &str, db_name: &str) -> anyhow::Result<Self> {
        let client = Client::with_uri_str(url)
            .await
            .context("parse MongoDB connection string")?;
        let db = client.database(db_name);
        let users = db.collection::<UserDocument>("users");
        Ok(Self { db, users })
    }
}

#[async_trait]
impl UserStore for MongoStore {
    async fn insert(&self, draft: NewUser) -> anyhow::Result<UserRecord> {
        let fields = draft.validated()?;
        let document = UserDocument {
            id: ObjectId::new(),
            name: fields.name,
            phone: fields.phone,
            email: fields.email,
            password: fields.password,
        };
        self.users
            .insert_one(&document, None)
            .await
            .context("insert user document")?;
        Ok(document.into())
    }

    async fn list(&self) -> anyhow::Result<Vec<UserRecord>> {
        let cursor = self
            .users
            .find(None, None)
            .await
            .context("query users collection")?;
        let documents: Vec<UserDocument> = cursor
            .try_collect()
            .await
            .context("drain users cursor")?;
        Ok(documents.into_iter().map(UserRecord::from).collect())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.db
            .run_command(doc! { "ping": 1 }, None)
            .await
            .context("ping MongoDB")?;
        Ok(())
    }
}

/// In-memory implementation of [`UserStore`], keeping the collection's
/// insertion order. Backs the test suites and database-less development.
#[derive(Clone, Default)]
pub struct MemoryStore {
    users: Arc<RwLock<Vec<UserRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, draft: NewUser) -> anyhow::Result<UserRecord> {
        let fields = draft.validated()?;
        let record = UserRecord {
            id: ObjectId::new().to_hex(),
            name: fields.name,
            phone: fields.phone,
            email: fields.email,
            password: fields.password,
        };
        self.users.write().await.push(record.clone());
        Ok(record)
    }

    async fn list(&self) -> anyhow::Result<Vec<UserRecord>> {
        Ok(self.users.read().await.clone())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
