//! Lookup orchestration: validation → remote query → normalization → handoff.
//!
//! Front-ends (CLI and TUI) drive a single `Coordinator`. It tracks the lookup
//! state, owns the current `DisplayModel` and chart handles, and uses a
//! monotonically increasing sequence token so that a slow response to an old
//! submission can never overwrite the result of a newer one.

use std::sync::mpsc::Sender;
use std::thread;

use crate::app::charts::ChartSet;
use crate::data::LookupTransport;
use crate::domain::{Cups, DisplayModel, LookupResponse};
use crate::error::LookupError;
use crate::normalize::normalize_response;

/// Where the current lookup is.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupState {
    Idle,
    Validating,
    Querying { cups: Cups },
    Normalizing,
    Ready,
    Error(LookupError),
}

/// Permission to run one remote query. `seq` must be handed back to
/// [`Coordinator::complete`] together with the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    pub seq: u64,
    pub cups: Cups,
}

/// A finished remote query, as sent back by a worker thread.
#[derive(Debug)]
pub struct QueryReply {
    pub seq: u64,
    pub result: Result<LookupResponse, LookupError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The result belonged to the latest submission and was applied.
    Applied,
    /// A newer submission exists; the result was dropped.
    Discarded,
}

#[derive(Debug)]
pub struct Coordinator {
    state: LookupState,
    latest_seq: u64,
    model: Option<DisplayModel>,
    charts: Option<ChartSet>,
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl Coordinator {
    pub fn new() -> Self {
        Self {
            state: LookupState::Idle,
            latest_seq: 0,
            model: None,
            charts: None,
        }
    }

    pub fn state(&self) -> &LookupState {
        &self.state
    }

    /// Last successful result. Errors never clear it.
    pub fn model(&self) -> Option<&DisplayModel> {
        self.model.as_ref()
    }

    pub fn charts(&self) -> Option<&ChartSet> {
        self.charts.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        matches!(
            self.state,
            LookupState::Querying { .. } | LookupState::Normalizing
        )
    }

    /// Message for the error line, if the latest lookup failed.
    pub fn error_message(&self) -> Option<String> {
        match &self.state {
            LookupState::Error(err) => Some(err.to_string()),
            _ => None,
        }
    }

    /// Start a lookup for user input.
    ///
    /// Every submission supersedes whatever was in flight, including one that
    /// then fails validation.
    pub fn submit(&mut self, raw: &str) -> Result<QueryTicket, LookupError> {
        self.latest_seq += 1;
        let seq = self.latest_seq;
        self.transition(LookupState::Validating);

        match Cups::parse(raw) {
            Ok(cups) => {
                self.transition(LookupState::Querying { cups: cups.clone() });
                Ok(QueryTicket { seq, cups })
            }
            Err(err) => {
                tracing::info!(seq, error = %err, "lookup rejected by validation");
                self.transition(LookupState::Error(err.clone()));
                Err(err)
            }
        }
    }

    /// Feed back the result of the query issued for `seq`.
    pub fn complete(
        &mut self,
        seq: u64,
        result: Result<LookupResponse, LookupError>,
    ) -> Completion {
        if seq != self.latest_seq {
            tracing::warn!(seq, latest = self.latest_seq, "discarding stale lookup response");
            return Completion::Discarded;
        }

        match result {
            Ok(response) => {
                self.transition(LookupState::Normalizing);
                let model = normalize_response(response);
                // Previous chart handles are torn down before the new ones exist.
                self.charts = None;
                self.charts = Some(ChartSet::from_model(&model));
                self.model = Some(model);
                self.transition(LookupState::Ready);
            }
            Err(err) => {
                tracing::warn!(seq, error = %err, "lookup failed");
                self.transition(LookupState::Error(err));
            }
        }
        Completion::Applied
    }

    /// Run a whole lookup synchronously on the current thread.
    pub fn lookup<T: LookupTransport + ?Sized>(
        &mut self,
        raw: &str,
        transport: &T,
    ) -> Result<&DisplayModel, LookupError> {
        let ticket = self.submit(raw)?;
        let result = transport.search(&ticket.cups);
        self.complete(ticket.seq, result);

        match (&self.state, &self.model) {
            (LookupState::Ready, Some(model)) => Ok(model),
            (LookupState::Error(err), _) => Err(err.clone()),
            (state, _) => Err(LookupError::Transport {
                status: None,
                message: format!("Estado inesperado tras la consulta: {state:?}"),
            }),
        }
    }

    fn transition(&mut self, next: LookupState) {
        tracing::debug!(from = ?self.state, to = ?next, "lookup state");
        self.state = next;
    }
}

/// Run the query for `ticket` on a worker thread and send the reply to `tx`.
///
/// The receiver feeds it to [`Coordinator::complete`]; if the receiver is gone
/// the reply is dropped.
pub fn spawn_query<T>(
    transport: T,
    ticket: QueryTicket,
    tx: Sender<QueryReply>,
) -> thread::JoinHandle<()>
where
    T: LookupTransport + Send + 'static,
{
    thread::spawn(move || {
        let result = transport.search(&ticket.cups);
        let _ = tx.send(QueryReply {
            seq: ticket.seq,
            result,
        });
    })
}
