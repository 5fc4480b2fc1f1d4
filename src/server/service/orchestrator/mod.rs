//! Generation orchestrator: drives one summary generation from admission to cache update.
//!
//! A call to [`GenerationOrchestrator::generate`] validates the request, makes sure the
//! session's workspace shows the comet, and either returns the cached summary, rejects the
//! call because the session already has a generation in flight, or moves the workspace to
//! `Requesting` and hands the work to a background task. The task submits the job, polls it,
//! parses the output, writes the record back and updates the workspace.

pub mod poll;
pub mod state;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    model::generation::GenerateSummaryDto,
    server::{
        data::summary::{NewSummary, SummaryRepository},
        error::{comet::CometError, generation::GenerationError, Error},
        generation::{
            model::{JobKind, JobRequest},
            GenerationClient,
        },
        model::db::{CometModel, SummaryModel},
        service::{
            change::{ChangeFeed, StoreChange},
            image::ImageService,
            orchestrator::{
                poll::{CancelHandle, JobPoller, PollSettings},
                state::GenerationState,
            },
            retry::RetryContext,
            summary::{illustration_prompt, summary_prompt, SummaryDraft},
            window::{FlybyWindow, WindowKey},
            workspace::{Workspace, WorkspaceState},
        },
    },
};

/// Identifying fields and options of a generation call.
#[derive(Clone, Debug, Default)]
pub struct GenerationRequest {
    pub comet_id: Option<i32>,
    pub previous_flyby_id: Option<i32>,
    pub next_flyby_id: Option<i32>,
    pub focus: Option<String>,
    pub with_image: bool,
}

impl From<GenerateSummaryDto> for GenerationRequest {
    fn from(dto: GenerateSummaryDto) -> Self {
        Self {
            comet_id: dto.comet_id,
            previous_flyby_id: dto.previous_flyby_id,
            next_flyby_id: dto.next_flyby_id,
            focus: dto.focus,
            with_image: dto.with_image,
        }
    }
}

impl GenerationRequest {
    fn window(&self) -> Option<WindowKey> {
        match (self.previous_flyby_id, self.next_flyby_id) {
            (Some(previous), Some(next)) => Some(WindowKey::new(previous, next)),
            _ => None,
        }
    }
}

/// Outcome of an admitted generation call.
#[derive(Clone, Debug)]
pub enum Admission {
    /// A background generation was started; the state is `Requesting`
    Started(GenerationState),
    /// The window already has a summary; nothing was sent
    AlreadySummarized(SummaryModel),
}

/// Work handed to the background task.
struct GenerationJob {
    comet: CometModel,
    window: FlybyWindow,
    focus: Option<String>,
    with_image: bool,
}

struct Completed {
    summary: SummaryModel,
    illustration_error: Option<String>,
}

struct OrchestratorInner {
    db: DatabaseConnection,
    client: GenerationClient,
    changes: ChangeFeed,
    settings: PollSettings,
    public_base_url: String,
}

#[derive(Clone)]
pub struct GenerationOrchestrator {
    inner: Arc<OrchestratorInner>,
}

impl GenerationOrchestrator {
    pub fn new(
        db: DatabaseConnection,
        client: GenerationClient,
        changes: ChangeFeed,
        settings: PollSettings,
        public_base_url: String,
    ) -> Self {
        Self {
            inner: Arc::new(OrchestratorInner {
                db,
                client,
                changes,
                settings,
                public_base_url,
            }),
        }
    }

    /// Entry point for generating the summary of one window.
    ///
    /// The admission check and the move to `Requesting` happen under the workspace lock, so a
    /// session never has two generations in flight.
    ///
    /// # Returns
    /// - `Ok(Admission::Started)` - Generation runs in the background
    /// - `Ok(Admission::AlreadySummarized)` - Cached summary returned, nothing sent
    /// - `Err(GenerationError::MissingField | NotConfigured)` - Rejected before any I/O
    /// - `Err(CometError::CometNotFound | WindowNotFound)` - Comet or window does not exist
    /// - `Err(GenerationError::InFlight)` - Another window of the session is being generated
    /// - `Err(Error::DbErr)` - Comet data could not be loaded
    pub async fn generate(
        &self,
        workspace: &Workspace,
        request: GenerationRequest,
    ) -> Result<Admission, Error> {
        let mut state = workspace.lock().await;

        let result = self.admit(workspace, &mut state, &request).await;

        if let Err(err) = &result {
            let rejected = matches!(
                err,
                Error::GenerationError(GenerationError::InFlight { .. })
            );
            if !rejected && !state.generation.is_in_flight() {
                state.generation = GenerationState::failed(request.window(), err);
            }
        }

        result
    }

    async fn admit(
        &self,
        workspace: &Workspace,
        state: &mut WorkspaceState,
        request: &GenerationRequest,
    ) -> Result<Admission, Error> {
        let comet_id = request
            .comet_id
            .ok_or(GenerationError::MissingField("comet_id"))?;
        let previous_flyby_id = request
            .previous_flyby_id
            .ok_or(GenerationError::MissingField("previous_flyby_id"))?;
        let next_flyby_id = request
            .next_flyby_id
            .ok_or(GenerationError::MissingField("next_flyby_id"))?;
        let key = WindowKey::new(previous_flyby_id, next_flyby_id);

        // A rejected request must not replace the loaded view
        if state.generation.is_in_flight() {
            let busy = state.generation.window().unwrap_or(key);
            tracing::info!(
                workspace = %workspace.id(),
                requested = %key,
                in_flight = %busy,
                "Rejecting generation while another is in flight"
            );
            return Err(GenerationError::InFlight {
                window: busy.to_string(),
            }
            .into());
        }

        if !self.inner.client.is_configured() {
            return Err(GenerationError::NotConfigured.into());
        }

        workspace
            .ensure_view(state, &self.inner.db, &self.inner.changes, comet_id)
            .await?;

        let view = state
            .view
            .as_ref()
            .ok_or_else(|| Error::InternalError("workspace has no view after loading".to_string()))?;
        let window = view
            .window(&key)
            .cloned()
            .ok_or_else(|| CometError::WindowNotFound {
                comet_id,
                window: key.to_string(),
            })?;

        if let Some(summary) = view.index.get(&key) {
            let summary = summary.clone();
            state.selected = Some(key);
            tracing::debug!(window = %key, summary_id = summary.id, "Window already summarized");
            return Ok(Admission::AlreadySummarized(summary));
        }

        let job = GenerationJob {
            comet: view.comet.clone(),
            window,
            focus: request.focus.clone(),
            with_image: request.with_image,
        };
        let cancel = CancelHandle::default();

        state.generation = GenerationState::Requesting { window: key };
        state.selected = Some(key);
        state.cancel = Some(cancel.clone());

        tracing::info!(workspace = %workspace.id(), comet_id, window = %key, "Starting summary generation");

        tokio::spawn(self.clone().run(workspace.clone(), job, cancel));

        Ok(Admission::Started(state.generation.clone()))
    }

    /// Signals the in-flight generation of the workspace to stop.
    ///
    /// Returns whether a generation was in flight. The task ends in `Failed` once it observes
    /// the signal.
    pub async fn cancel(&self, workspace: &Workspace) -> bool {
        let state = workspace.lock().await;

        match (&state.cancel, state.generation.is_in_flight()) {
            (Some(cancel), true) => {
                tracing::info!(workspace = %workspace.id(), "Cancelling summary generation");
                cancel.cancel();
                true
            }
            _ => false,
        }
    }

    async fn run(self, workspace: Workspace, job: GenerationJob, cancel: CancelHandle) {
        let key = job.window.key;
        let comet_id = job.comet.id;
        let outcome = self.execute(&workspace, &job, &cancel).await;

        let mut guard = workspace.lock().await;
        let state = &mut *guard;
        state.cancel = None;

        match outcome {
            Ok(Completed {
                summary,
                illustration_error,
            }) => {
                let summary_id = summary.id;
                if let Some(view) = state.view.as_mut().filter(|view| view.comet.id == comet_id) {
                    view.index.insert(key, summary);
                    state.selected = Some(key);
                }

                let message = match illustration_error {
                    Some(err) => format!("Summary ready for window {key}; illustration failed: {err}"),
                    None => format!("Summary ready for window {key}"),
                };
                tracing::info!(window = %key, summary_id, "Summary generation succeeded");

                state.generation = GenerationState::Succeeded {
                    window: key,
                    summary_id,
                    message,
                };
            }
            Err(err) => {
                tracing::warn!(window = %key, "Summary generation failed: {}", err);
                state.generation = GenerationState::failed(Some(key), &err);

                if matches!(err, Error::GenerationError(GenerationError::Unparseable(_))) {
                    if let Err(reload_err) = workspace
                        .reload(state, &self.inner.db, &self.inner.changes, comet_id)
                        .await
                    {
                        tracing::error!(
                            comet_id,
                            "Fallback reconciliation after unparseable summary failed: {}",
                            reload_err
                        );
                    }
                }
            }
        }
    }

    async fn execute(
        &self,
        workspace: &Workspace,
        job: &GenerationJob,
        cancel: &CancelHandle,
    ) -> Result<Completed, Error> {
        let key = job.window.key;
        let client = &self.inner.client;
        let max_attempts = self.inner.settings.max_attempts;

        if cancel.is_cancelled() {
            return Err(GenerationError::Cancelled.into());
        }

        let request = JobRequest {
            model: client.text_model().to_string(),
            kind: JobKind::Text,
            prompt: summary_prompt(&job.comet, &job.window, job.focus.as_deref()),
        };
        let submitted = client.submit(&request).await?;

        let finished = JobPoller::new(client, self.inner.settings, cancel)
            .poll(submitted, |attempt| {
                let workspace = workspace.clone();
                async move {
                    workspace.lock().await.generation = GenerationState::Polling {
                        window: key,
                        attempt,
                        max_attempts,
                    };
                }
            })
            .await?;

        let text = finished
            .output
            .and_then(|output| output.text)
            .ok_or(GenerationError::EmptyContent)?;
        let draft = SummaryDraft::parse(&text)?;

        let summary = self.write_back(job, draft).await?;

        let mut completed = Completed {
            summary,
            illustration_error: None,
        };

        if job.with_image {
            match self.illustrate(job, &completed.summary, cancel).await {
                Ok(Some(updated)) => completed.summary = updated,
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(window = %key, "Illustration failed: {}", err);
                    completed.illustration_error = Some(err.to_string());
                }
            }
        }

        Ok(completed)
    }

    async fn write_back(&self, job: &GenerationJob, draft: SummaryDraft) -> Result<SummaryModel, Error> {
        let new_summary = NewSummary {
            comet_id: job.comet.id,
            previous_flyby_id: job.window.earlier.id,
            next_flyby_id: job.window.later.id,
            title: draft.title,
            body: draft.body,
            model: self.inner.client.text_model().to_string(),
        };

        let db = self.inner.db.clone();
        let mut ctx: RetryContext<()> = RetryContext::new();

        let summary = ctx
            .execute_with_retry("summary write-back", |_| {
                let db = db.clone();
                let new_summary = new_summary.clone();

                Box::pin(async move { Ok(SummaryRepository::new(&db).create(new_summary).await?) })
            })
            .await
            .map_err(|err| GenerationError::WriteBack(err.to_string()))?;

        self.inner.changes.publish(StoreChange::SummaryCreated {
            comet_id: summary.comet_id,
            summary_id: summary.id,
        });

        Ok(summary)
    }

    /// Generates, stores and attaches an illustration.
    ///
    /// Returns the updated record, or `None` if the record already had an image.
    async fn illustrate(
        &self,
        job: &GenerationJob,
        summary: &SummaryModel,
        cancel: &CancelHandle,
    ) -> Result<Option<SummaryModel>, Error> {
        let client = &self.inner.client;

        let request = JobRequest {
            model: client.image_model().to_string(),
            kind: JobKind::Image,
            prompt: illustration_prompt(&job.comet, &job.window, &summary.title),
        };
        let submitted = client.submit(&request).await?;

        let finished = JobPoller::new(client, self.inner.settings, cancel)
            .poll(submitted, |_| async {})
            .await?;

        let image = finished
            .output
            .and_then(|output| output.image)
            .ok_or_else(|| GenerationError::InvalidImage("job returned no image".to_string()))?;

        let db = self.inner.db.clone();
        let public_base_url = self.inner.public_base_url.clone();
        let summary_id = summary.id;
        // Cache holds the stored image id so a retry does not store the blob twice
        let mut ctx: RetryContext<Option<i32>> = RetryContext::new();

        let updated = ctx
            .execute_with_retry("illustration write-back", |stored_image_id| {
                let db = db.clone();
                let image = image.clone();
                let public_base_url = public_base_url.clone();

                Box::pin(async move {
                    let images = ImageService::new(&db, &public_base_url);

                    let image_id = match *stored_image_id {
                        Some(image_id) => image_id,
                        None => {
                            let stored = images.store_inline(&image).await?;
                            *stored_image_id = Some(stored.id);
                            stored.id
                        }
                    };

                    Ok(SummaryRepository::new(&db)
                        .set_image_url(summary_id, images.image_url(image_id))
                        .await?)
                })
            })
            .await?;

        if let Some(updated) = &updated {
            self.inner.changes.publish(StoreChange::SummaryUpdated {
                comet_id: updated.comet_id,
                summary_id: updated.id,
            });
        }

        Ok(updated)
    }
}
