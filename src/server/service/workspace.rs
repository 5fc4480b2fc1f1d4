//! Per-session workspaces.
//!
//! A workspace holds what one client session is looking at: the loaded comet with its
//! windows and summary index, the selected window and the generation state. Workspaces
//! live in the [`WorkspaceHub`] keyed by the identifier stored in the session.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicI32, AtomicI64, Ordering},
        Arc,
    },
    time::Duration,
};

use chrono::Utc;

use sea_orm::DatabaseConnection;
use tokio::{
    sync::{broadcast::error::RecvError, Mutex, MutexGuard, RwLock},
    task::JoinHandle,
};

use crate::{
    model::window::{CometWindowsDto, SummaryDto, WindowDto},
    server::{
        error::{comet::CometError, Error},
        model::db::{CometModel, FlybyModel, SummaryModel},
        service::{
            change::ChangeFeed,
            comet::{flyby_dto, CometService},
            index::SummaryIndex,
            orchestrator::{poll::CancelHandle, state::GenerationState},
            window::{FlybyWindow, WindowKey},
        },
    },
};

const NO_COMET: i32 = 0;

/// A comet as seen by a workspace.
#[derive(Clone, Debug)]
pub struct CometView {
    pub comet: CometModel,
    pub flybys: Vec<FlybyModel>,
    pub windows: Vec<FlybyWindow>,
    pub index: SummaryIndex,
}

impl CometView {
    pub fn window(&self, key: &WindowKey) -> Option<&FlybyWindow> {
        self.windows.iter().find(|window| window.key == *key)
    }
}

pub(crate) fn summary_dto(summary: &SummaryModel) -> SummaryDto {
    SummaryDto {
        id: summary.id,
        title: summary.title.clone(),
        body: summary.body.clone(),
        image_url: summary.image_url.clone(),
        model: summary.model.clone(),
        generated_at: summary.generated_at,
    }
}

/// Mutable part of a workspace, guarded by the workspace lock.
#[derive(Debug)]
pub struct WorkspaceState {
    pub view: Option<CometView>,
    pub selected: Option<WindowKey>,
    pub generation: GenerationState,
    /// Cancellation handle of the generation in flight, if any
    pub cancel: Option<CancelHandle>,
}

impl Default for WorkspaceState {
    fn default() -> Self {
        Self {
            view: None,
            selected: None,
            generation: GenerationState::Idle,
            cancel: None,
        }
    }
}

impl WorkspaceState {
    pub fn to_dto(&self) -> Option<CometWindowsDto> {
        let view = self.view.as_ref()?;

        let windows = view
            .windows
            .iter()
            .map(|window| WindowDto {
                key: window.key.to_string(),
                earlier: flyby_dto(&window.earlier),
                later: flyby_dto(&window.later),
                summary: view.index.get(&window.key).map(summary_dto),
                selected: self.selected == Some(window.key),
            })
            .collect();

        Some(CometWindowsDto {
            comet_id: view.comet.id,
            designation: view.comet.designation.clone(),
            windows,
            selected_window: self.selected.map(|key| key.to_string()),
            generation: self.generation.to_dto(),
        })
    }
}

struct WorkspaceInner {
    id: String,
    state: Mutex<WorkspaceState>,
    /// Comet currently loaded, readable without taking the lock
    viewing: AtomicI32,
    stale: AtomicBool,
    /// Unix timestamp in milliseconds of the last session access
    touched: AtomicI64,
}

/// Handle to one session's workspace. Cheap to clone.
#[derive(Clone)]
pub struct Workspace {
    inner: Arc<WorkspaceInner>,
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("id", &self.inner.id)
            .field("viewing", &self.inner.viewing.load(Ordering::SeqCst))
            .field("stale", &self.inner.stale.load(Ordering::SeqCst))
            .finish()
    }
}

impl Workspace {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(WorkspaceInner {
                id: id.into(),
                state: Mutex::new(WorkspaceState::default()),
                viewing: AtomicI32::new(NO_COMET),
                stale: AtomicBool::new(false),
                touched: AtomicI64::new(Utc::now().timestamp_millis()),
            }),
        }
    }

    fn touch(&self) {
        self.inner
            .touched
            .store(Utc::now().timestamp_millis(), Ordering::SeqCst);
    }

    fn idle_for(&self, now_millis: i64) -> Duration {
        let idle = now_millis - self.inner.touched.load(Ordering::SeqCst);
        Duration::from_millis(idle.max(0) as u64)
    }

    /// Whether the workspace is locked or has a generation in flight.
    fn is_busy(&self) -> bool {
        match self.inner.state.try_lock() {
            Ok(state) => state.generation.is_in_flight(),
            Err(_) => true,
        }
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub async fn lock(&self) -> MutexGuard<'_, WorkspaceState> {
        self.inner.state.lock().await
    }

    pub fn is_stale(&self) -> bool {
        self.inner.stale.load(Ordering::SeqCst)
    }

    fn mark_stale_if_viewing(&self, comet_id: i32) {
        if self.inner.viewing.load(Ordering::SeqCst) == comet_id {
            self.inner.stale.store(true, Ordering::SeqCst);
        }
    }

    fn mark_stale(&self) {
        self.inner.stale.store(true, Ordering::SeqCst);
    }

    /// Makes sure `state` shows an up-to-date view of `comet_id`.
    ///
    /// The comet is loaded when the workspace shows another comet or nothing, and reloaded
    /// when a store change made the current view stale. The selection is kept only if the
    /// same comet is reloaded and the window still exists.
    pub async fn ensure_view(
        &self,
        state: &mut WorkspaceState,
        db: &DatabaseConnection,
        changes: &ChangeFeed,
        comet_id: i32,
    ) -> Result<(), Error> {
        let current = state.view.as_ref().map(|view| view.comet.id);
        if current == Some(comet_id) && !self.is_stale() {
            return Ok(());
        }

        self.reload(state, db, changes, comet_id).await
    }

    /// Full reconciliation: reloads the comet and rebuilds its summary index from the store.
    pub async fn reload(
        &self,
        state: &mut WorkspaceState,
        db: &DatabaseConnection,
        changes: &ChangeFeed,
        comet_id: i32,
    ) -> Result<(), Error> {
        // Cleared first so changes landing during the load mark the new view stale
        self.inner.stale.store(false, Ordering::SeqCst);

        let view = match CometService::new(db, changes).load_view(comet_id).await {
            Ok(view) => view,
            Err(e) => {
                // The old view was never replaced, so it is still out of date
                self.inner.stale.store(true, Ordering::SeqCst);
                return Err(e);
            }
        };

        let same_comet = state.view.as_ref().map(|view| view.comet.id) == Some(comet_id);
        if !same_comet || state.selected.is_some_and(|key| view.window(&key).is_none()) {
            state.selected = None;
        }

        tracing::debug!(
            workspace = %self.inner.id,
            comet_id,
            windows = view.windows.len(),
            summaries = view.index.len(),
            "Reconciled workspace"
        );

        state.view = Some(view);
        self.inner.viewing.store(comet_id, Ordering::SeqCst);

        Ok(())
    }

    /// Selects one of the loaded comet's windows.
    pub fn select(
        &self,
        state: &mut WorkspaceState,
        comet_id: i32,
        key: WindowKey,
    ) -> Result<(), Error> {
        let exists = state
            .view
            .as_ref()
            .is_some_and(|view| view.comet.id == comet_id && view.window(&key).is_some());

        if !exists {
            return Err(CometError::WindowNotFound {
                comet_id,
                window: key.to_string(),
            }
            .into());
        }

        state.selected = Some(key);

        Ok(())
    }
}

/// Registry of all workspaces, keyed by session workspace identifier.
#[derive(Clone, Default)]
pub struct WorkspaceHub {
    workspaces: Arc<RwLock<HashMap<String, Workspace>>>,
}

impl WorkspaceHub {
    pub async fn get_or_create(&self, workspace_id: &str) -> Workspace {
        if let Some(workspace) = self.get(workspace_id).await {
            return workspace;
        }

        self.workspaces
            .write()
            .await
            .entry(workspace_id.to_string())
            .or_insert_with(|| {
                tracing::debug!(workspace = %workspace_id, "Creating workspace");
                Workspace::new(workspace_id)
            })
            .clone()
    }

    /// Returns an existing workspace without creating one.
    pub async fn get(&self, workspace_id: &str) -> Option<Workspace> {
        let workspace = self.workspaces.read().await.get(workspace_id).cloned()?;
        workspace.touch();
        Some(workspace)
    }

    pub async fn count(&self) -> usize {
        self.workspaces.read().await.len()
    }

    /// Drops workspaces whose session has not touched them for longer than `max_idle`.
    ///
    /// Workspaces with a generation in flight are kept so the task can still report back.
    ///
    /// # Returns
    /// The number of evicted workspaces
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let now = Utc::now().timestamp_millis();
        let mut workspaces = self.workspaces.write().await;
        let before = workspaces.len();

        workspaces.retain(|_, workspace| workspace.idle_for(now) <= max_idle || workspace.is_busy());

        let evicted = before - workspaces.len();
        if evicted > 0 {
            tracing::debug!(evicted, remaining = workspaces.len(), "Evicted idle workspaces");
        }

        evicted
    }

    /// Runs [`Self::evict_idle`] every `interval` in the background.
    pub fn spawn_eviction_sweeper(&self, interval: Duration, max_idle: Duration) -> JoinHandle<()> {
        let hub = self.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // First tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                hub.evict_idle(max_idle).await;
            }
        })
    }

    pub async fn mark_stale(&self, comet_id: i32) {
        for workspace in self.workspaces.read().await.values() {
            workspace.mark_stale_if_viewing(comet_id);
        }
    }

    pub async fn mark_all_stale(&self) {
        for workspace in self.workspaces.read().await.values() {
            workspace.mark_stale();
        }
    }

    /// Marks workspaces stale as store changes arrive.
    ///
    /// A receiver that falls behind cannot tell which comets changed, so every workspace is
    /// marked stale.
    pub fn spawn_change_listener(&self, changes: &ChangeFeed) -> JoinHandle<()> {
        let hub = self.clone();
        let mut receiver = changes.subscribe();

        tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(change) => hub.mark_stale(change.comet_id()).await,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Change listener lagged, marking all workspaces stale");
                        hub.mark_all_stale().await;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}
