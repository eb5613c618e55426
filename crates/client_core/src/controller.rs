use std::{
    fmt,
    future::Future,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard,
    },
};

use shared::{
    domain::CharacterId,
    protocol::{Character, NewCharacter},
};
use tokio::{sync::broadcast, task::JoinSet};
use tracing::{debug, error, info, warn};

use crate::{
    api::CharacterApi,
    error::{ApiError, ControllerError},
    store::{CharacterStore, StoreEvent, StoreSnapshot},
    view::ListView,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    Create,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Load => "load",
            Self::Create => "create",
            Self::Delete => "delete",
        })
    }
}

#[derive(Debug, Clone)]
pub enum ControllerEvent {
    Loaded { count: usize },
    Created(Character),
    Deleted(CharacterId),
    Failed { operation: Operation, message: String },
}

#[derive(Default)]
struct Lifecycle {
    torn_down: bool,
    tasks: JoinSet<()>,
}

/// Mirrors the remote character collection into a [`CharacterStore`].
///
/// The store only changes after the server confirms an operation. Failures
/// are logged and reported as [`ControllerEvent::Failed`]; they never roll
/// back or retry anything.
pub struct CharacterListController {
    api: Arc<dyn CharacterApi>,
    store: Arc<CharacterStore>,
    mounted: AtomicBool,
    lifecycle: Mutex<Lifecycle>,
    events: broadcast::Sender<ControllerEvent>,
}

impl CharacterListController {
    pub fn new(api: Arc<dyn CharacterApi>, store: Arc<CharacterStore>) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            api,
            store,
            mounted: AtomicBool::new(false),
            lifecycle: Mutex::new(Lifecycle::default()),
            events,
        })
    }

    pub fn store(&self) -> &Arc<CharacterStore> {
        &self.store
    }

    pub fn characters(&self) -> Vec<Character> {
        self.store.characters()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    pub fn render(&self, view: &dyn ListView) {
        view.render(self.store.snapshot().characters.as_slice());
    }

    /// Runs the initial load. Only the first call per controller reaches the
    /// server; later calls return `Ok(false)`.
    pub async fn mount(&self) -> Result<bool, ControllerError> {
        self.ensure_alive()?;
        if self.mounted.swap(true, Ordering::SeqCst) {
            debug!("controller already mounted");
            return Ok(false);
        }
        self.load().await?;
        Ok(true)
    }

    /// Fetches the collection again and replaces the local list with it.
    pub async fn reload(&self) -> Result<usize, ControllerError> {
        self.ensure_alive()?;
        self.load().await
    }

    pub async fn create(&self, record: NewCharacter) -> Result<Character, ControllerError> {
        self.ensure_alive()?;
        let created = match self.api.create(&record).await {
            Ok(created) => created,
            Err(err) => return Err(self.report(Operation::Create, err)),
        };

        let snapshot = self.commit(StoreEvent::Inserted(created.clone()))?;
        info!(
            id = %created.id,
            revision = snapshot.revision,
            "character created"
        );
        let _ = self.events.send(ControllerEvent::Created(created.clone()));
        Ok(created)
    }

    /// Deletes the character currently at `index`.
    ///
    /// The identifier is resolved from the freshest list when the call starts
    /// and removal on success matches that identifier, so a list that changed
    /// while the request was in flight still loses the intended element.
    pub async fn delete(&self, index: usize) -> Result<Character, ControllerError> {
        self.ensure_alive()?;
        let snapshot = self.store.snapshot();
        let Some(target) = snapshot.characters.get(index).cloned() else {
            let len = snapshot.characters.len();
            warn!(index, len, "delete requested for missing position");
            let _ = self.events.send(ControllerEvent::Failed {
                operation: Operation::Delete,
                message: format!("no character at index {index}"),
            });
            return Err(ControllerError::IndexOutOfRange { index, len });
        };

        if let Err(err) = self.api.delete(&target.id).await {
            return Err(self.report(Operation::Delete, err));
        }

        let snapshot = self.commit(StoreEvent::Removed(target.id.clone()))?;
        info!(
            index,
            id = %target.id,
            revision = snapshot.revision,
            "character deleted"
        );
        let _ = self.events.send(ControllerEvent::Deleted(target.id.clone()));
        Ok(target)
    }

    /// Starts the initial load in the background. Returns `false` once the
    /// controller has been torn down.
    pub fn spawn_mount(self: &Arc<Self>) -> bool {
        let controller = Arc::clone(self);
        self.spawn_tracked(async move {
            let _ = controller.mount().await;
        })
    }

    pub fn spawn_create(self: &Arc<Self>, record: NewCharacter) -> bool {
        let controller = Arc::clone(self);
        self.spawn_tracked(async move {
            let _ = controller.create(record).await;
        })
    }

    pub fn spawn_delete(self: &Arc<Self>, index: usize) -> bool {
        let controller = Arc::clone(self);
        self.spawn_tracked(async move {
            let _ = controller.delete(index).await;
        })
    }

    /// Background operations that have not finished yet.
    pub fn in_flight(&self) -> usize {
        let mut lifecycle = self.lifecycle();
        while lifecycle.tasks.try_join_next().is_some() {}
        lifecycle.tasks.len()
    }

    /// Cancels every background operation and turns later operations and
    /// late completions into no-ops. Returns how many tasks were aborted.
    pub fn teardown(&self) -> usize {
        let mut tasks = {
            let mut lifecycle = self.lifecycle();
            lifecycle.torn_down = true;
            while lifecycle.tasks.try_join_next().is_some() {}
            std::mem::take(&mut lifecycle.tasks)
        };
        let pending = tasks.len();
        tasks.abort_all();
        info!(pending, "character list controller torn down");
        pending
    }

    pub fn is_torn_down(&self) -> bool {
        self.lifecycle().torn_down
    }

    async fn load(&self) -> Result<usize, ControllerError> {
        let characters = match self.api.list().await {
            Ok(characters) => characters,
            Err(err) => return Err(self.report(Operation::Load, err)),
        };

        let count = characters.len();
        let snapshot = self.commit(StoreEvent::Replaced(characters))?;
        info!(count, revision = snapshot.revision, "character list replaced");
        let _ = self.events.send(ControllerEvent::Loaded { count });
        Ok(count)
    }

    fn spawn_tracked<F>(&self, task: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut lifecycle = self.lifecycle();
        if lifecycle.torn_down {
            debug!("ignoring intent after teardown");
            return false;
        }
        while lifecycle.tasks.try_join_next().is_some() {}
        lifecycle.tasks.spawn(task);
        true
    }

    /// Applies `event` unless teardown already happened. Holding the lifecycle
    /// lock keeps teardown from interleaving with the store update.
    fn commit(&self, event: StoreEvent) -> Result<StoreSnapshot, ControllerError> {
        let lifecycle = self.lifecycle();
        if lifecycle.torn_down {
            debug!("dropping completion that arrived after teardown");
            return Err(ControllerError::TornDown);
        }
        Ok(self.store.dispatch(event))
    }

    fn ensure_alive(&self) -> Result<(), ControllerError> {
        if self.is_torn_down() {
            return Err(ControllerError::TornDown);
        }
        Ok(())
    }

    fn report(&self, operation: Operation, err: ApiError) -> ControllerError {
        match &err {
            ApiError::UnexpectedStatus { actual, body, .. } => {
                warn!(%operation, status = actual.as_u16(), %body, "unexpected response status");
            }
            other => error!(%operation, "character request failed: {other}"),
        }
        let _ = self.events.send(ControllerEvent::Failed {
            operation,
            message: err.to_string(),
        });
        ControllerError::Api(err)
    }

    fn lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
        self.lifecycle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
