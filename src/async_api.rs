use crate::design::{DesignDocument, DesignType};
use crate::editor::{self, Command, Effect, Screen, Session};
use crate::library::{self, LibraryEntry};
use crate::store::{DesignStore, FileStore, Record};
use crate::{generate_design, rendering, Error, Result, StudioConfig};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;
use tokio::sync::oneshot;

#[cfg(feature = "client")]
use crate::client::DesignClient;

enum Request {
    Dispatch(Command, oneshot::Sender<Result<(Session, Vec<Effect>)>>),
    Snapshot(oneshot::Sender<Session>),
    Close(oneshot::Sender<()>),
}

/// Where the worker persists designs
enum Persistence {
    Local(FileStore),
    #[cfg(feature = "client")]
    Remote(DesignClient),
}

impl Persistence {
    fn open(config: &StudioConfig) -> Result<Self> {
        match Self::remote(config) {
            Some(remote) => remote,
            None => Ok(Persistence::Local(FileStore::open(&config.designs_dir)?)),
        }
    }

    #[cfg(feature = "client")]
    fn remote(config: &StudioConfig) -> Option<Result<Self>> {
        let url = config.api_url.as_ref()?;
        Some(DesignClient::new(url.clone()).map(Persistence::Remote))
    }

    #[cfg(not(feature = "client"))]
    fn remote(config: &StudioConfig) -> Option<Result<Self>> {
        if config.api_url.is_some() {
            log::warn!("api_url is set but the client feature is disabled; using the local store");
        }
        None
    }

    fn save(&self, doc: &DesignDocument) -> Result<DesignDocument> {
        match self {
            Persistence::Local(store) => {
                let record = match serde_json::to_value(doc)? {
                    serde_json::Value::Object(record) => record,
                    _ => return Err(Error::Serialization("design is not a JSON object".into())),
                };
                let saved = match doc.id.as_deref() {
                    Some(id) => store.update(id, record)?,
                    None => store.create(record)?,
                };
                Ok(serde_json::from_value(serde_json::Value::Object(saved))?)
            }
            #[cfg(feature = "client")]
            Persistence::Remote(client) => client.save(doc),
        }
    }

    fn delete(&self, id: &str) -> Result<()> {
        match self {
            Persistence::Local(store) => store.delete(id),
            #[cfg(feature = "client")]
            Persistence::Remote(client) => client.delete(id),
        }
    }

    fn list(&self) -> Result<Vec<DesignDocument>> {
        match self {
            Persistence::Local(store) => Ok(store.list()?.into_iter().filter_map(parse_record).collect()),
            #[cfg(feature = "client")]
            Persistence::Remote(client) => client.list(),
        }
    }
}

fn parse_record(record: Record) -> Option<DesignDocument> {
    serde_json::from_value(serde_json::Value::Object(record))
        .map_err(|e| log::warn!("skipping unparseable design: {}", e))
        .ok()
}

fn export(doc: &DesignDocument, dir: &Path) -> Result<PathBuf> {
    let image = rendering::export_png(doc)?;
    std::fs::create_dir_all(dir)?;
    let path = dir.join(doc.export_file_name(chrono::Utc::now()));
    std::fs::write(&path, &image.png_data)?;
    Ok(path)
}

/// Run every effect that needs I/O and feed its outcome back into the reducer.
/// Generation is returned to the caller, which owns the async delay.
fn run_effects(session: &mut Session, persistence: &Persistence, export_dir: &Path, effects: Vec<Effect>) -> Vec<Effect> {
    let mut queue: VecDeque<Effect> = effects.into();
    let mut deferred = Vec::new();
    while let Some(effect) = queue.pop_front() {
        let follow_up = match effect {
            Effect::Generate { .. } => {
                deferred.push(effect);
                continue;
            }
            Effect::Persist(doc) => Command::SaveCompleted(persistence.save(&doc).map_err(|e| e.to_string())),
            Effect::Delete(id) => Command::DeleteCompleted(persistence.delete(&id).map_err(|e| e.to_string())),
            Effect::LoadLibrary => match persistence.list() {
                Ok(docs) => Command::LibraryLoaded(docs),
                Err(e) => {
                    log::error!("Error loading designs: {}", e);
                    continue;
                }
            },
            Effect::Export(doc) => {
                match export(&doc, export_dir) {
                    Ok(path) => log::info!("exported {:?}", path),
                    Err(e) => log::error!("export failed: {}", e),
                }
                continue;
            }
        };
        queue.extend(editor::update(session, follow_up));
    }
    deferred
}

/// An async-friendly design session backed by a dedicated worker thread.
///
/// The worker owns the [`Session`] and the persistence backend (a blocking
/// HTTP client or a local [`FileStore`]) and runs every command through the
/// reducer. Generation is simulated with a delay on the async side, so
/// awaiting [`Studio::dispatch`] never blocks the runtime.
#[derive(Clone)]
pub struct Studio {
    cmd_tx: Sender<Request>,
    delay: Duration,
}

impl Studio {
    /// Create a studio (spawns a background thread that owns the session).
    pub async fn new(config: Option<StudioConfig>) -> Result<Self> {
        let config = config.unwrap_or_default();
        let delay = Duration::from_millis(config.generation_delay_ms);

        let (cmd_tx, cmd_rx) = mpsc::channel::<Request>();
        let (init_tx, init_rx): (oneshot::Sender<Result<()>>, oneshot::Receiver<Result<()>>) = oneshot::channel();

        thread::spawn(move || {
            // The persistence backend lives on the worker thread
            let persistence = match Persistence::open(&config) {
                Ok(p) => p,
                Err(err) => {
                    let _ = init_tx.send(Err(err));
                    return;
                }
            };
            let _ = init_tx.send(Ok(()));

            let mut session = Session::new();
            while let Ok(req) = cmd_rx.recv() {
                match req {
                    Request::Dispatch(cmd, resp) => {
                        let effects = editor::update(&mut session, cmd);
                        let pending = run_effects(&mut session, &persistence, &config.export_dir, effects);
                        let _ = resp.send(Ok((session.clone(), pending)));
                    }
                    Request::Snapshot(resp) => {
                        let _ = resp.send(session.clone());
                    }
                    Request::Close(resp) => {
                        let _ = resp.send(());
                        break;
                    }
                }
            }
        });

        init_rx
            .await
            .map_err(|e| Error::Other(format!("Worker init canceled: {}", e)))??;

        Ok(Self { cmd_tx, delay })
    }

    async fn send(&self, cmd: Command) -> Result<(Session, Vec<Effect>)> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Request::Dispatch(cmd, tx))
            .map_err(|_| Error::Other("studio worker has stopped".into()))?;
        rx.await
            .map_err(|e| Error::Other(format!("Dispatch canceled: {}", e)))?
    }

    /// Apply a command and every effect it triggers; returns the resulting session.
    pub async fn dispatch(&self, cmd: Command) -> Result<Session> {
        let (mut session, mut pending) = self.send(cmd).await?;
        while let Some(effect) = pending.pop() {
            if let Effect::Generate { prompt, design_type } = effect {
                tokio::time::sleep(self.delay).await;
                let doc = generate_design(&prompt, design_type);
                let (next, more) = self.send(Command::DesignGenerated(doc)).await?;
                session = next;
                pending.extend(more);
            }
        }
        Ok(session)
    }

    /// Convenience: set the prompt and type, generate, and return the new document.
    pub async fn generate(&self, prompt: &str, design_type: DesignType) -> Result<DesignDocument> {
        self.dispatch(Command::DismissNotice).await?;
        self.dispatch(Command::PromptChanged(prompt.to_string())).await?;
        self.dispatch(Command::DesignTypeChanged(design_type)).await?;
        let session = self.dispatch(Command::GenerateRequested).await?;
        if let Some(notice) = &session.notice {
            return Err(Error::Other(notice.message().to_string()));
        }
        session
            .document()
            .cloned()
            .ok_or_else(|| Error::Other("generation produced no design".into()))
    }

    /// Open the library screen (reloading it from storage) and return its entries
    pub async fn library(&self) -> Result<Vec<LibraryEntry>> {
        let session = self.dispatch(Command::Navigate(Screen::Library)).await?;
        Ok(library::entries(&session.library))
    }

    /// Current session state
    pub async fn snapshot(&self) -> Result<Session> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Request::Snapshot(tx))
            .map_err(|_| Error::Other("studio worker has stopped".into()))?;
        rx.await
            .map_err(|e| Error::Other(format!("Snapshot canceled: {}", e)))
    }

    /// Shutdown the background worker.
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Request::Close(tx));
        rx.await
            .map_err(|e| Error::Other(format!("Close canceled: {}", e)))
    }
}
