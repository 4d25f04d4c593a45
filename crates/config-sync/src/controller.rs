use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use hypr_bot_config::{ConfigSection, RemoteState, SectionName};
use tokio_util::sync::CancellationToken;

use crate::client::ConfigSyncClient;
use crate::error::Error;
use crate::form::{FormError, FormInputs, build_section};
use crate::retry::{RetryConfig, with_retry};
use crate::view::{StateView, refresh_view};

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Sync(#[from] Error),
}

impl ActionError {
    pub fn user_message(&self) -> String {
        match self {
            ActionError::Form(e) => e.to_string(),
            ActionError::Sync(e) => e.user_message(),
        }
    }

    pub fn is_recoverable(&self) -> bool {
        match self {
            ActionError::Form(_) => true,
            ActionError::Sync(e) => e.is_recoverable(),
        }
    }
}

/// Something the user should see, without blocking further input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Acknowledged {
        section: SectionName,
        message: &'static str,
    },
    Busy {
        section: SectionName,
    },
    Failed {
        section: Option<SectionName>,
        message: String,
        recoverable: bool,
    },
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

#[derive(Debug)]
pub enum ActionOutcome {
    Submitted(SectionName),
    AlreadyInFlight(SectionName),
    Cancelled(SectionName),
    Failed(ActionError),
}

impl ActionOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, ActionOutcome::Submitted(_))
    }
}

#[derive(Debug)]
pub enum RefreshOutcome {
    Fetched(RefreshTicket, RemoteState),
    Cancelled,
    Failed(Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRoute {
    /// `/api/update` with a merge-patch payload.
    Update,
    /// `/api/personality` and `/api/stream` where they apply.
    Legacy,
}

/// Sections with a submission currently outstanding.
#[derive(Debug, Clone, Default)]
pub struct InFlight(Arc<Mutex<HashSet<SectionName>>>);

impl InFlight {
    pub fn try_begin(&self, section: SectionName) -> Option<InFlightGuard> {
        let mut set = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        if !set.insert(section) {
            return None;
        }
        Some(InFlightGuard {
            set: Arc::clone(&self.0),
            section,
        })
    }

    pub fn is_busy(&self, section: SectionName) -> bool {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&section)
    }
}

#[derive(Debug)]
pub struct InFlightGuard {
    set: Arc<Mutex<HashSet<SectionName>>>,
    section: SectionName,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.section);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

/// Orders refreshes by issue time: a response is applied only if no
/// later-issued refresh has been applied already.
#[derive(Debug, Clone, Default)]
pub struct RefreshSequencer {
    issued: Arc<AtomicU64>,
    applied: Arc<AtomicU64>,
}

impl RefreshSequencer {
    pub fn issue(&self) -> RefreshTicket {
        RefreshTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn apply<V: StateView + ?Sized>(
        &self,
        ticket: RefreshTicket,
        state: &RemoteState,
        view: &mut V,
    ) -> bool {
        let previous = self.applied.fetch_max(ticket.0, Ordering::SeqCst);
        if previous >= ticket.0 {
            tracing::debug!(ticket = ticket.0, latest = previous, "stale_refresh_dropped");
            return false;
        }
        refresh_view(state, view);
        true
    }
}

/// Entry point for user actions.
///
/// Every failure is turned into a [`Notice`] here; callers get an outcome
/// value back and never have to handle an error themselves.
#[derive(Clone)]
pub struct SyncController {
    client: ConfigSyncClient,
    notifier: Arc<dyn Notifier>,
    in_flight: InFlight,
    refreshes: RefreshSequencer,
    retry: RetryConfig,
    shutdown: CancellationToken,
}

impl SyncController {
    pub fn new(client: ConfigSyncClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            notifier,
            in_flight: InFlight::default(),
            refreshes: RefreshSequencer::default(),
            retry: RetryConfig::default(),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn client(&self) -> &ConfigSyncClient {
        &self.client
    }

    pub fn is_busy(&self, section: SectionName) -> bool {
        self.in_flight.is_busy(section)
    }

    /// Cancels every request started through this controller (and its clones).
    pub fn cancel_all(&self) {
        self.shutdown.cancel();
    }

    pub async fn submit_form(
        &self,
        name: SectionName,
        form: &(dyn FormInputs + Sync),
        route: SubmitRoute,
    ) -> ActionOutcome {
        match build_section(name, form) {
            Ok(section) => self.submit(section, route).await,
            Err(e) => {
                tracing::warn!(section = %name, error = %e, "form_rejected");
                self.fail(Some(name), ActionError::Form(e))
            }
        }
    }

    pub async fn submit(&self, section: ConfigSection, route: SubmitRoute) -> ActionOutcome {
        let name = section.name();
        let Some(_guard) = self.in_flight.try_begin(name) else {
            tracing::debug!(section = %name, "submit_already_in_flight");
            self.notifier.notify(Notice::Busy { section: name });
            return ActionOutcome::AlreadyInFlight(name);
        };

        let token = self.shutdown.child_token();
        let client = &self.client;
        let section = &section;
        let token_ref = &token;
        let result = with_retry(&self.retry, move || async move {
            match route {
                SubmitRoute::Update => client.submit_section_with_cancel(section, token_ref).await,
                SubmitRoute::Legacy => client.submit_legacy_with_cancel(section, token_ref).await,
            }
        })
        .await;

        match result {
            Ok(()) => {
                self.notifier.notify(Notice::Acknowledged {
                    section: name,
                    message: name.acknowledgment(),
                });
                ActionOutcome::Submitted(name)
            }
            Err(Error::Cancelled) => ActionOutcome::Cancelled(name),
            Err(e) => {
                tracing::error!(section = %name, error = %e, "submit_failed");
                self.fail(Some(name), ActionError::Sync(e))
            }
        }
    }

    pub async fn refresh(&self) -> RefreshOutcome {
        let ticket = self.refreshes.issue();
        let token = self.shutdown.child_token();
        let client = &self.client;
        let token_ref = &token;
        let result = with_retry(&self.retry, move || client.fetch_state_with_cancel(token_ref)).await;

        match result {
            Ok(state) => RefreshOutcome::Fetched(ticket, state),
            Err(Error::Cancelled) => RefreshOutcome::Cancelled,
            Err(e) => {
                tracing::error!(error = %e, "refresh_failed");
                self.notifier.notify(Notice::Failed {
                    section: None,
                    message: e.user_message(),
                    recoverable: e.is_recoverable(),
                });
                RefreshOutcome::Failed(e)
            }
        }
    }

    /// Applies a fetched state unless a newer one has been applied since.
    pub fn apply_refresh<V: StateView + ?Sized>(
        &self,
        ticket: RefreshTicket,
        state: &RemoteState,
        view: &mut V,
    ) -> bool {
        self.refreshes.apply(ticket, state, view)
    }

    /// Submit, then refresh into `view` if the submit went through.
    pub async fn submit_then_refresh<V: StateView + ?Sized>(
        &self,
        section: ConfigSection,
        route: SubmitRoute,
        view: &mut V,
    ) -> ActionOutcome {
        let outcome = self.submit(section, route).await;
        if outcome.is_submitted() {
            if let RefreshOutcome::Fetched(ticket, state) = self.refresh().await {
                self.apply_refresh(ticket, &state, view);
            }
        }
        outcome
    }

    fn fail(&self, section: Option<SectionName>, error: ActionError) -> ActionOutcome {
        self.notifier.notify(Notice::Failed {
            section,
            message: error.user_message(),
            recoverable: error.is_recoverable(),
        });
        ActionOutcome::Failed(error)
    }
}
