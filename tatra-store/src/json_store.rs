use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tatra_core::{Booking, BookingPatch, BookingRepository, StoreError, StoreResult};
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

/// Booking store backed by a single JSON document.
///
/// One writer task owns the file and runs commands strictly one after the
/// other, each as a full read-modify-write. Handles are cheap to clone and
/// only talk to that task, so concurrent callers cannot overwrite each
/// other's changes.
#[derive(Clone)]
pub struct JsonFileStore {
    tx: mpsc::Sender<Command>,
}

enum Command {
    EnsureInitialized {
        reply: oneshot::Sender<StoreResult<()>>,
    },
    List {
        reply: oneshot::Sender<StoreResult<Vec<Booking>>>,
    },
    Find {
        id: String,
        reply: oneshot::Sender<StoreResult<Booking>>,
    },
    Append {
        payload: Map<String, Value>,
        reply: oneshot::Sender<StoreResult<Booking>>,
    },
    Update {
        id: String,
        patch: BookingPatch,
        reply: oneshot::Sender<StoreResult<Booking>>,
    },
    Delete {
        id: String,
        reply: oneshot::Sender<StoreResult<()>>,
    },
}

impl JsonFileStore {
    /// Initialize the document at `path` and start the writer task.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn open(path: impl Into<PathBuf>, queue_capacity: usize) -> StoreResult<Self> {
        let file = BookingFile::new(path);
        file.load().await?;
        info!("Booking store ready at {}", file.path.display());

        let (tx, rx) = mpsc::channel(queue_capacity.max(1));
        tokio::spawn(run_writer(file, rx));
        Ok(Self { tx })
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<StoreResult<T>>) -> Command,
    ) -> StoreResult<T> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(command(reply))
            .await
            .map_err(|_| StoreError::Unavailable)?;
        rx.await.map_err(|_| StoreError::Unavailable)?
    }
}

#[async_trait]
impl BookingRepository for JsonFileStore {
    async fn ensure_initialized(&self) -> StoreResult<()> {
        self.request(|reply| Command::EnsureInitialized { reply }).await
    }

    async fn list_all(&self) -> Vec<Booking> {
        match self.request(|reply| Command::List { reply }).await {
            Ok(bookings) => bookings,
            Err(e) => {
                error!("Error reading bookings, returning empty list: {}", e);
                Vec::new()
            }
        }
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Booking> {
        let id = id.to_string();
        self.request(|reply| Command::Find { id, reply }).await
    }

    async fn append(&self, payload: Map<String, Value>) -> StoreResult<Booking> {
        self.request(|reply| Command::Append { payload, reply }).await
    }

    async fn update_by_id(&self, id: &str, patch: BookingPatch) -> StoreResult<Booking> {
        let id = id.to_string();
        self.request(|reply| Command::Update { id, patch, reply }).await
    }

    async fn delete_by_id(&self, id: &str) -> StoreResult<()> {
        let id = id.to_string();
        self.request(|reply| Command::Delete { id, reply }).await
    }
}

async fn run_writer(file: BookingFile, mut rx: mpsc::Receiver<Command>) {
    while let Some(command) = rx.recv().await {
        // A dropped receiver only means the caller went away
        match command {
            Command::EnsureInitialized { reply } => {
                let _ = reply.send(file.load().await.map(|_| ()));
            }
            Command::List { reply } => {
                let _ = reply.send(file.load().await);
            }
            Command::Find { id, reply } => {
                let _ = reply.send(file.find(&id).await);
            }
            Command::Append { payload, reply } => {
                let _ = reply.send(file.append(payload).await);
            }
            Command::Update { id, patch, reply } => {
                let _ = reply.send(file.update(&id, patch).await);
            }
            Command::Delete { id, reply } => {
                let _ = reply.send(file.delete(&id).await);
            }
        }
    }
    debug!("Booking writer stopped for {}", file.path.display());
}

/// The on-disk document. Only the writer task touches it.
struct BookingFile {
    path: PathBuf,
}

impl BookingFile {
    fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the collection, initializing the document first when needed.
    ///
    /// A missing or blank file becomes `[]`. A file that is not a JSON array
    /// is renamed to `<file>.corrupt-<millis>` and replaced by `[]`. Records
    /// that are not valid bookings (unknown status, no id) are moved to
    /// `<file>.rejected-<millis>` one by one; the rest stay in service.
    async fn load(&self) -> StoreResult<Vec<Booking>> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("Creating bookings file {}", self.path.display());
                self.save(&[]).await?;
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            self.save(&[]).await?;
            return Ok(Vec::new());
        }

        let records = match serde_json::from_str::<Value>(&content) {
            Ok(Value::Array(records)) => records,
            Ok(_) => {
                self.quarantine("not a JSON array").await?;
                return Ok(Vec::new());
            }
            Err(e) => {
                self.quarantine(&e.to_string()).await?;
                return Ok(Vec::new());
            }
        };

        let mut bookings = Vec::with_capacity(records.len());
        let mut rejected = Vec::new();
        for record in records {
            match serde_json::from_value::<Booking>(record.clone()) {
                Ok(booking) => bookings.push(booking),
                Err(e) => {
                    warn!(
                        "Rejecting booking record {} from {}: {}",
                        record.get("id").unwrap_or(&serde_json::Value::Null),
                        self.path.display(),
                        e
                    );
                    rejected.push(record);
                }
            }
        }

        if !rejected.is_empty() {
            let rejected_path = self.sidecar_path("rejected");
            warn!(
                "Moved {} invalid booking record(s) to {}",
                rejected.len(),
                rejected_path.display()
            );
            self.write_atomic(&rejected_path, &rejected).await?;
            self.save(&bookings).await?;
        }

        Ok(bookings)
    }

    async fn quarantine(&self, reason: &str) -> StoreResult<()> {
        let quarantine = self.sidecar_path("corrupt");
        warn!(
            "Bookings file {} is unreadable ({}), moving it to {}",
            self.path.display(),
            reason,
            quarantine.display()
        );
        tokio::fs::rename(&self.path, &quarantine).await?;
        self.save(&[]).await
    }

    async fn find(&self, id: &str) -> StoreResult<Booking> {
        self.load()
            .await?
            .into_iter()
            .find(|b| b.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn append(&self, payload: Map<String, Value>) -> StoreResult<Booking> {
        let mut bookings = self.load().await?;
        let now = Utc::now();
        let booking = Booking::new(next_id(&bookings, now.timestamp_millis()), payload, now);

        bookings.push(booking.clone());
        self.save(&bookings).await?;
        debug!("Appended booking {} ({} total)", booking.id, bookings.len());
        Ok(booking)
    }

    async fn update(&self, id: &str, patch: BookingPatch) -> StoreResult<Booking> {
        let mut bookings = self.load().await?;
        let booking = bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        booking.apply(patch);
        let updated = booking.clone();
        self.save(&bookings).await?;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut bookings = self.load().await?;
        let before = bookings.len();
        bookings.retain(|b| b.id != id);

        if bookings.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.save(&bookings).await
    }

    async fn save(&self, bookings: &[Booking]) -> StoreResult<()> {
        self.write_atomic(&self.path, bookings).await
    }

    /// Write `value` as pretty JSON to `target` atomically (temp file + rename).
    async fn write_atomic<T: Serialize + ?Sized>(&self, target: &Path, value: &T) -> StoreResult<()> {
        let mut content = serde_json::to_string_pretty(value)?;
        content.push('\n');

        let tmp_path = self.tmp_path();
        let write_result = async {
            let mut file = tokio::fs::File::create(&tmp_path).await?;
            file.write_all(content.as_bytes()).await?;
            file.flush().await?;
            file.sync_all().await?;
            drop(file);
            match tokio::fs::rename(&tmp_path, target).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    tokio::fs::remove_file(target).await?;
                    tokio::fs::rename(&tmp_path, target).await?;
                }
                Err(e) => return Err(e),
            }
            Ok::<(), std::io::Error>(())
        }
        .await;

        if let Err(e) = write_result {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(StoreError::Io(e));
        }
        Ok(())
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "bookings.json".to_string())
    }

    fn tmp_path(&self) -> PathBuf {
        sibling(
            &self.path,
            format!(".{}.{}.tmp", self.file_name(), uuid::Uuid::new_v4().simple()),
        )
    }

    fn sidecar_path(&self, kind: &str) -> PathBuf {
        sibling(
            &self.path,
            format!("{}.{}-{}", self.file_name(), kind, Utc::now().timestamp_millis()),
        )
    }
}

fn sibling(path: &Path, name: String) -> PathBuf {
    match path.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

/// Millisecond timestamp id, bumped until it does not collide.
fn next_id(bookings: &[Booking], now_millis: i64) -> String {
    let taken: HashSet<&str> = bookings.iter().map(|b| b.id.as_str()).collect();
    let mut candidate = now_millis;
    while taken.contains(candidate.to_string().as_str()) {
        candidate += 1;
    }
    candidate.to_string()
}
