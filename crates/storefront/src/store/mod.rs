//! Observable key-value preference store.
//!
//! # Layout
//!
//! A single preference container maps string keys to string values. Every
//! value except the logged-in pointer is a JSON document:
//!
//! - `users` - registered users ([`crate::models::User`] list)
//! - `login_attempts` - append-only attempt log
//! - `products` - locally added catalog products
//! - `logged_in_user_email` - plain email string, absent when logged out
//! - `cart` - cart lines
//!
//! # Consistency
//!
//! Writes go through [`Preferences::edit`], a read-modify-write of one key
//! that runs under an async mutex. Writers never interleave; the last writer
//! wins on the whole value. After the edit commits (and, for file-backed
//! stores, reaches disk) the new container is published on a
//! `tokio::sync::watch` channel, which is what every observation stream
//! reads from. A slow reader sees the newest container, not every
//! intermediate one.
//!
//! # Corrupt data
//!
//! Values that fail to decode are treated as absent and logged at `warn`.
//! They are never reported as errors: the container is a UI cache, not a
//! system of record.

pub mod cart;
pub mod login_attempts;
pub mod products;
pub mod users;

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_stream::stream;
use futures::Stream;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::{Mutex, watch};

pub use cart::CartManager;
pub use login_attempts::LoginAttemptLog;
pub use products::Catalog;
pub use users::UserDirectory;

/// Keys of the preference container.
pub mod keys {
    /// Registered users.
    pub const USERS: &str = "users";

    /// Login attempt log.
    pub const LOGIN_ATTEMPTS: &str = "login_attempts";

    /// Locally added products.
    pub const PRODUCTS: &str = "products";

    /// Email of the logged-in user.
    pub const LOGGED_IN_USER_EMAIL: &str = "logged_in_user_email";

    /// Cart lines.
    pub const CART: &str = "cart";
}

/// Errors that can occur while committing to the store.
///
/// Reads never fail; only durability problems surface here.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A value or the container could not be encoded.
    #[error("encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result of an edit closure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Leave the key untouched; nothing is written or published.
    Keep,
    /// Store a new value.
    Set(String),
    /// Remove the key.
    Remove,
}

/// Immutable view of the whole container.
pub type Snapshot = Arc<BTreeMap<String, String>>;

/// Handle to a preference container.
///
/// Cheaply cloneable; all clones share the same container.
#[derive(Clone)]
pub struct Preferences {
    inner: Arc<PreferencesInner>,
}

struct PreferencesInner {
    /// Backing file, `None` for in-memory containers.
    path: Option<PathBuf>,
    /// Serializes edits.
    write_lock: Mutex<()>,
    /// Latest committed container.
    current: watch::Sender<Snapshot>,
}

impl std::fmt::Debug for Preferences {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preferences")
            .field("path", &self.inner.path)
            .field("keys", &self.inner.current.borrow().len())
            .finish()
    }
}

impl Preferences {
    /// Create an empty container that lives only in memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::with_contents(None, BTreeMap::new())
    }

    /// Open a file-backed container, creating it on first write.
    ///
    /// A missing file opens as an empty container. A file that is not a JSON
    /// object of strings is discarded (logged at `warn`) and the container
    /// starts empty.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the file exists but cannot be read.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "discarding unreadable preference file");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        tracing::debug!(path = %path.display(), keys = contents.len(), "preferences opened");
        Ok(Self::with_contents(Some(path), contents))
    }

    fn with_contents(path: Option<PathBuf>, contents: BTreeMap<String, String>) -> Self {
        let (current, _) = watch::channel(Arc::new(contents));
        Self {
            inner: Arc::new(PreferencesInner {
                path,
                write_lock: Mutex::new(()),
                current,
            }),
        }
    }

    /// The backing file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.inner.path.as_deref()
    }

    /// The latest committed container.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.inner.current.borrow().clone()
    }

    /// Current value of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.current.borrow().get(key).cloned()
    }

    /// Store `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if a file-backed container cannot be written.
    pub async fn set(&self, key: &str, value: impl Into<String>) -> Result<(), StoreError> {
        let value = value.into();
        self.edit(key, |_| Ok(Edit::Set(value))).await.map(drop)
    }

    /// Remove `key`. Removing an absent key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if a file-backed container cannot be written.
    pub async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.edit(key, |_| Ok(Edit::Remove)).await.map(drop)
    }

    /// Atomically read-modify-write `key`.
    ///
    /// `f` receives the current value and decides what to store. Edits are
    /// serialized, so `f` always sees the value committed by the previous
    /// edit. Returns whether the container changed.
    ///
    /// # Errors
    ///
    /// Returns any error produced by `f`, or `StoreError::Io` if a
    /// file-backed container cannot be written. On error nothing is
    /// published.
    pub async fn edit<F>(&self, key: &str, f: F) -> Result<bool, StoreError>
    where
        F: FnOnce(Option<&str>) -> Result<Edit, StoreError>,
    {
        let _guard = self.inner.write_lock.lock().await;
        let current = self.snapshot();
        let existing = current.get(key);

        let next = match f(existing.map(String::as_str))? {
            Edit::Keep => return Ok(false),
            Edit::Set(value) if existing == Some(&value) => return Ok(false),
            Edit::Remove if existing.is_none() => return Ok(false),
            Edit::Set(value) => {
                let mut next = (*current).clone();
                next.insert(key.to_owned(), value);
                next
            }
            Edit::Remove => {
                let mut next = (*current).clone();
                next.remove(key);
                next
            }
        };

        self.persist(&next).await?;
        self.inner.current.send_replace(Arc::new(next));
        tracing::trace!(key, "preference committed");
        Ok(true)
    }

    /// Write the container to the backing file, replacing it atomically.
    async fn persist(&self, contents: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let Some(path) = self.inner.path.as_deref() else {
            return Ok(());
        };

        let encoded = serde_json::to_vec_pretty(contents)?;
        let tmp = temp_path(path);
        let io_err = |source: std::io::Error| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        tokio::fs::write(&tmp, encoded).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, path).await.map_err(io_err)?;
        Ok(())
    }

    /// Stream of committed containers.
    ///
    /// The first item is the container at the time the stream is first
    /// polled; each later item follows a commit. Every call starts a new,
    /// independent subscription. The stream ends once every `Preferences`
    /// handle has been dropped.
    pub fn snapshots(&self) -> impl Stream<Item = Snapshot> + Send + use<> {
        let mut rx = self.inner.current.subscribe();
        stream! {
            let first = rx.borrow_and_update().clone();
            yield first;
            while rx.changed().await.is_ok() {
                let next = rx.borrow_and_update().clone();
                yield next;
            }
        }
    }

    /// Stream of the values of `key`.
    ///
    /// Starts with the current value and then yields each committed change
    /// of that key. Commits that leave the key unchanged are skipped.
    pub fn subscribe(&self, key: &str) -> impl Stream<Item = Option<String>> + Send + use<> {
        let key = key.to_owned();
        let snapshots = self.snapshots();
        stream! {
            let mut last: Option<Option<String>> = None;
            for await snapshot in snapshots {
                let value = snapshot.get(&key).cloned();
                if last.as_ref() != Some(&value) {
                    last = Some(value.clone());
                    yield value;
                }
            }
        }
    }

    /// Decode the JSON value of `key`, or `T::default()` when absent or
    /// unreadable.
    #[must_use]
    pub fn read_json<T>(&self, key: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        decode_or_default(key, self.inner.current.borrow().get(key).map(String::as_str))
    }

    /// Stream of the decoded JSON values of `key`, with the same
    /// degradation policy as [`Preferences::read_json`].
    pub fn observe_json<T>(&self, key: &str) -> impl Stream<Item = T> + Send + use<T>
    where
        T: DeserializeOwned + Default + Send + 'static,
    {
        let key = key.to_owned();
        let values = self.subscribe(&key);
        stream! {
            for await raw in values {
                yield decode_or_default::<T>(&key, raw.as_deref());
            }
        }
    }

    /// Atomically decode, modify and re-encode the JSON value of `key`.
    ///
    /// `f` gets the decoded value (default when absent or unreadable) and
    /// returns whether it changed it; nothing is written when it returns
    /// `false`. Returns whether the container changed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Encode` if the value cannot be encoded, or
    /// `StoreError::Io` if a file-backed container cannot be written.
    pub async fn modify_json<T, F>(&self, key: &str, f: F) -> Result<bool, StoreError>
    where
        T: Serialize + DeserializeOwned + Default,
        F: FnOnce(&mut T) -> bool,
    {
        self.edit(key, |raw| {
            let mut value: T = decode_or_default(key, raw);
            if !f(&mut value) {
                return Ok(Edit::Keep);
            }
            Ok(Edit::Set(serde_json::to_string(&value)?))
        })
        .await
    }
}

/// Sibling file an update is staged in before the rename (`prefs.json.tmp`).
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Decode a stored JSON value, falling back to `T::default()`.
pub(crate) fn decode_or_default<T>(key: &str, raw: Option<&str>) -> T
where
    T: DeserializeOwned + Default,
{
    let Some(raw) = raw else {
        return T::default();
    };

    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!(key, error = %e, "discarding unreadable preference value");
        T::default()
    })
}
