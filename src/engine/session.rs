// src/engine/session.rs
//
// One active allocation screen: the feed snapshot, the bucket being viewed, the
// batch selection, the chosen assignee and any pass awaiting confirmation.
//
// Every transition the hosting shell can cause (focus, blur, bucket switch,
// refresh, selection edits, pass confirm/cancel) is an explicit method here.
// Snapshot replacement and selection clearing happen under a single lock, so
// no reader ever sees a selection that points at targets from an older feed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::directory::{OfficerDirectory, OfficerIdentity};
use super::feed::{spawn_poller, BucketCounts, FeedSnapshot, TargetFeed};
use super::pass::{build_request, ConfirmationSummary, PassConfirmation, PassTransaction};
use super::selection::{SelectionMode, SelectionSet, ToggleOutcome};
use super::status::{classify, Bucket, DisplayLocale, ItemView};
use crate::api::{DistributionApi, FeedSource};
use crate::config::Config;
use crate::error::AllocationError;
use crate::models::{AssignableOfficer, WorkItem};

#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Officer currently holding the targets; passes are made from them and
    /// they are never offered as an assignee.
    pub holder: OfficerIdentity,
    pub source: FeedSource,
    pub locale: DisplayLocale,
    pub poll_interval: Duration,
}

impl SessionSettings {
    pub fn from_config(config: &Config) -> Self {
        let (holder, source) = match config.view_officer_id {
            Some(viewed) => (OfficerIdentity::new(viewed, None), FeedSource::Officer(viewed)),
            None => (
                OfficerIdentity::new(config.officer_id, config.officer_emp_id.clone()),
                FeedSource::Own,
            ),
        };
        Self {
            holder,
            source,
            locale: config.locale,
            poll_interval: config.poll_interval,
        }
    }
}

#[derive(Debug, Default)]
struct SessionState {
    snapshot: Option<FeedSnapshot>,
    applied_ticket: u64,
    bucket: Bucket,
    selection: SelectionSet,
    officers: Option<Vec<AssignableOfficer>>,
    assignee: Option<AssignableOfficer>,
    pending: Option<PassConfirmation>,
    /// Submission id of the pass currently on the wire.
    in_flight: Option<Uuid>,
}

impl SessionState {
    fn items(&self) -> &[WorkItem] {
        self.snapshot.as_ref().map(|s| s.items.as_slice()).unwrap_or(&[])
    }

    fn check_revision(&self, revision: Option<&str>) -> Result<(), AllocationError> {
        match (revision, self.snapshot.as_ref()) {
            (None, _) => Ok(()),
            (Some(r), Some(s)) if s.revision == r => Ok(()),
            (Some(r), _) => Err(AllocationError::StaleSnapshot(r.to_owned())),
        }
    }

    /// A failed pass leaves its confirmation in place only while the user's
    /// choices still describe the same batch.
    fn still_describes(&self, confirmation: &PassConfirmation) -> bool {
        let same_items = self.selection.len() == confirmation.request.len()
            && confirmation
                .request
                .item_ids()
                .iter()
                .all(|id| self.selection.contains(*id));
        let same_assignee = self.assignee.as_ref().map(|a| a.id) == Some(confirmation.assignee.id);
        same_items && same_assignee
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectionView {
    #[serde(flatten)]
    pub mode: SelectionMode,
    pub item_ids: Vec<i64>,
    pub all_selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub revision: Option<String>,
    pub fetched_at: Option<DateTime<Utc>>,
    pub bucket: Bucket,
    pub counts: BucketCounts,
    pub items: Vec<ItemView>,
    pub selection: SelectionView,
    pub assignee: Option<AssignableOfficer>,
    pub awaiting_confirmation: bool,
    pub submission_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassReceipt {
    pub submission_id: Uuid,
    pub item_count: usize,
    pub assignee_id: i64,
    pub refreshed: bool,
}

pub struct AllocationSession {
    feed: TargetFeed,
    directory: OfficerDirectory,
    pass: PassTransaction,
    holder: OfficerIdentity,
    locale: DisplayLocale,
    poll_interval: Duration,
    issued: AtomicU64,
    state: Mutex<SessionState>,
    poller: Mutex<Option<JoinHandle<()>>>,
}

impl AllocationSession {
    pub fn new(api: Arc<dyn DistributionApi>, settings: SessionSettings) -> Self {
        Self {
            feed: TargetFeed::new(api.clone(), settings.source),
            directory: OfficerDirectory::new(api.clone(), settings.locale),
            pass: PassTransaction::new(api),
            holder: settings.holder,
            locale: settings.locale,
            poll_interval: settings.poll_interval,
            issued: AtomicU64::new(0),
            state: Mutex::new(SessionState::default()),
            poller: Mutex::new(None),
        }
    }

    pub fn holder(&self) -> &OfficerIdentity {
        &self.holder
    }

    pub async fn subscribe_selection(&self) -> watch::Receiver<SelectionMode> {
        self.state.lock().await.selection.subscribe()
    }

    pub async fn view(&self) -> SessionView {
        let state = self.state.lock().await;
        self.render(&state)
    }

    pub async fn submission_enabled(&self) -> bool {
        self.state.lock().await.in_flight.is_none()
    }

    // ───────────────────────────────────────
    // Feed lifecycle
    // ───────────────────────────────────────

    /// Fetches the feed and swaps it in, unless a newer fetch has already been
    /// applied. On failure the previous snapshot and selection stay untouched.
    pub async fn refresh(&self) -> Result<SessionView, AllocationError> {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let fetched = self.feed.fetch().await;

        let mut state = self.state.lock().await;
        let snapshot = fetched?;
        if ticket <= state.applied_ticket {
            debug!(ticket, applied = state.applied_ticket, "dropping superseded target feed");
            return Ok(self.render(&state));
        }

        let counts = snapshot.counts();
        state.applied_ticket = ticket;
        state.selection.clear();
        state.pending = None;
        state.snapshot = Some(snapshot);
        info!(ticket, todo = counts.todo, completed = counts.completed, "target feed applied");
        Ok(self.render(&state))
    }

    /// Host regained focus: refetch now and keep polling until `blur`.
    pub async fn focus(self: &Arc<Self>) -> Result<SessionView, AllocationError> {
        {
            let mut poller = self.poller.lock().await;
            if poller.as_ref().map_or(true, |h| h.is_finished()) {
                let weak: Weak<Self> = Arc::downgrade(self);
                *poller = Some(spawn_poller(self.poll_interval, move || {
                    let weak = weak.clone();
                    async move {
                        let Some(session) = weak.upgrade() else {
                            return false;
                        };
                        if let Err(e) = session.refresh().await {
                            warn!(error = %e, "scheduled target refresh failed");
                        }
                        true
                    }
                }));
                debug!(period = ?self.poll_interval, "target poller started");
            }
        }
        self.refresh().await
    }

    /// Host lost focus: stop polling and forget everything screen-local.
    /// A pass already submitted still runs to completion.
    pub async fn blur(&self) {
        if let Some(handle) = self.poller.lock().await.take() {
            handle.abort();
        }
        let mut state = self.state.lock().await;
        state.applied_ticket = self.issued.load(Ordering::SeqCst);
        state.snapshot = None;
        state.bucket = Bucket::Todo;
        state.selection.clear();
        state.officers = None;
        state.assignee = None;
        state.pending = None;
        debug!("allocation session reset on blur");
    }

    pub async fn set_bucket(&self, bucket: Bucket) -> SessionView {
        let mut state = self.state.lock().await;
        if state.bucket != bucket {
            state.bucket = bucket;
            state.selection.clear();
            state.pending = None;
        }
        self.render(&state)
    }

    // ───────────────────────────────────────
    // Selection
    // ───────────────────────────────────────

    pub async fn toggle(
        &self,
        item_id: i64,
        revision: Option<&str>,
    ) -> Result<(ToggleOutcome, SessionView), AllocationError> {
        let mut state = self.state.lock().await;
        state.check_revision(revision)?;

        let SessionState {
            snapshot,
            bucket,
            selection,
            pending,
            ..
        } = &mut *state;
        let items = snapshot.as_ref().map(|s| s.items.as_slice()).unwrap_or(&[]);
        let outcome = selection.toggle(item_id, items, *bucket);
        if outcome != ToggleOutcome::Ignored {
            *pending = None;
        }
        Ok((outcome, self.render(&state)))
    }

    pub async fn toggle_all(&self, revision: Option<&str>) -> Result<SessionView, AllocationError> {
        let mut state = self.state.lock().await;
        state.check_revision(revision)?;

        let SessionState {
            snapshot,
            bucket,
            selection,
            pending,
            ..
        } = &mut *state;
        let items = snapshot.as_ref().map(|s| s.items.as_slice()).unwrap_or(&[]);
        selection.toggle_all(items, *bucket);
        *pending = None;
        Ok(self.render(&state))
    }

    pub async fn clear_selection(&self) -> SessionView {
        let mut state = self.state.lock().await;
        state.selection.clear();
        state.pending = None;
        self.render(&state)
    }

    // ───────────────────────────────────────
    // Directory & assignee
    // ───────────────────────────────────────

    pub async fn load_officers(&self) -> Result<Vec<AssignableOfficer>, AllocationError> {
        let result = self.directory.list_assignable_officers(&self.holder).await;

        let mut state = self.state.lock().await;
        match result {
            Ok(officers) => {
                let keep = state
                    .assignee
                    .as_ref()
                    .is_some_and(|a| officers.iter().any(|o| o.id == a.id));
                if !keep {
                    state.assignee = None;
                    state.pending = None;
                }
                state.officers = Some(officers.clone());
                Ok(officers)
            }
            Err(e) => {
                state.officers = None;
                state.assignee = None;
                state.pending = None;
                Err(e)
            }
        }
    }

    pub async fn choose_assignee(&self, officer_id: i64) -> Result<AssignableOfficer, AllocationError> {
        let mut state = self.state.lock().await;
        let officers = state.officers.as_ref().ok_or_else(|| {
            AllocationError::DirectoryUnavailable("officer directory has not been loaded".into())
        })?;
        let officer = officers
            .iter()
            .find(|o| o.id == officer_id)
            .cloned()
            .ok_or(AllocationError::UnknownAssignee(officer_id))?;

        state.assignee = Some(officer.clone());
        state.pending = None;
        Ok(officer)
    }

    // ───────────────────────────────────────
    // Pass
    // ───────────────────────────────────────

    /// First half of the confirmation gate. Nothing is sent.
    pub async fn prepare_pass(&self) -> Result<ConfirmationSummary, AllocationError> {
        let mut state = self.state.lock().await;
        if state.in_flight.is_some() {
            return Err(AllocationError::PassInFlight);
        }
        if state.selection.is_empty() {
            return Err(AllocationError::NoSelection);
        }
        if state.assignee.is_some() && state.officers.as_ref().map_or(true, |o| o.is_empty()) {
            return Err(AllocationError::DirectoryUnavailable(
                "officer directory is empty; reload it before passing targets".into(),
            ));
        }

        let confirmation = build_request(&state.selection, state.items(), state.assignee.as_ref())?;
        let summary = confirmation.summary();
        debug!(submission_id = %summary.submission_id, items = summary.item_count, "pass awaiting confirmation");
        state.pending = Some(confirmation);
        Ok(summary)
    }

    /// User backed out of the confirmation. Clears the selection.
    pub async fn cancel_pass(&self) -> SessionView {
        let mut state = self.state.lock().await;
        if state.pending.take().is_some() {
            debug!("pass confirmation cancelled");
        }
        state.selection.clear();
        self.render(&state)
    }

    /// Second half of the confirmation gate. The submission runs on its own task
    /// so it completes even if the caller goes away.
    pub async fn confirm_pass(self: &Arc<Self>) -> Result<PassReceipt, AllocationError> {
        let confirmation = {
            let mut state = self.state.lock().await;
            if state.in_flight.is_some() {
                return Err(AllocationError::PassInFlight);
            }
            let confirmation = state
                .pending
                .take()
                .ok_or(AllocationError::ConfirmationRequired)?;
            state.in_flight = Some(confirmation.request.submission_id());
            confirmation
        };
        let submission_id = confirmation.request.submission_id();

        let session = Arc::clone(self);
        match tokio::spawn(async move { session.run_pass(confirmation).await }).await {
            Ok(result) => result,
            Err(e) => {
                error!(%submission_id, error = %e, "pass submission task aborted");
                let mut state = self.state.lock().await;
                if state.in_flight == Some(submission_id) {
                    state.in_flight = None;
                }
                Err(AllocationError::TransactionTransportFailure(format!(
                    "pass submission aborted: {e}"
                )))
            }
        }
    }

    async fn run_pass(&self, confirmation: PassConfirmation) -> Result<PassReceipt, AllocationError> {
        let result = self
            .pass
            .submit(self.holder.id, &confirmation.request)
            .await;

        {
            let mut state = self.state.lock().await;
            state.in_flight = None;
            match &result {
                Ok(()) => {
                    state.selection.clear();
                    state.pending = None;
                }
                Err(_) => {
                    if state.still_describes(&confirmation) {
                        state.pending = Some(confirmation.clone());
                    }
                }
            }
        }
        result?;

        let refreshed = match self.refresh().await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "refresh after target pass failed");
                false
            }
        };
        Ok(PassReceipt {
            submission_id: confirmation.request.submission_id(),
            item_count: confirmation.request.len(),
            assignee_id: confirmation.assignee.id,
            refreshed,
        })
    }

    fn render(&self, state: &SessionState) -> SessionView {
        let items = state.items();
        let views: Vec<ItemView> = state
            .snapshot
            .as_ref()
            .map(|s| {
                s.in_bucket(state.bucket)
                    .map(|item| {
                        let mut view = classify(item, state.bucket, self.locale);
                        view.selected = state.selection.contains(item.item_id);
                        view
                    })
                    .collect()
            })
            .unwrap_or_default();

        SessionView {
            revision: state.snapshot.as_ref().map(|s| s.revision.clone()),
            fetched_at: state.snapshot.as_ref().map(|s| s.fetched_at),
            bucket: state.bucket,
            counts: state.snapshot.as_ref().map(|s| s.counts()).unwrap_or_default(),
            items: views,
            selection: SelectionView {
                mode: state.selection.mode(),
                item_ids: state.selection.ids().collect(),
                all_selected: state.selection.is_all_selected(items, state.bucket),
            },
            assignee: state.assignee.clone(),
            awaiting_confirmation: state.pending.is_some(),
            submission_enabled: state.in_flight.is_none(),
        }
    }
}
