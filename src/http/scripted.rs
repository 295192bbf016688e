//! In-memory transport for unit tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::{OptionSet, RawResult, Transport, TransportHandle, TransferInfo, TransportOption};

#[derive(Debug, Clone)]
pub(crate) enum Outcome {
    Respond { status: u16, body: String },
    Fail { code: u32, message: String },
}

#[derive(Debug, Default)]
struct Ledger {
    outcomes: VecDeque<Outcome>,
    applied: Vec<OptionSet>,
    opened: usize,
    closed: usize,
}

/// Replays queued outcomes and records every option batch it receives
#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedTransport {
    ledger: Arc<Mutex<Ledger>>,
}

impl ScriptedTransport {
    pub(crate) fn respond(status: u16, body: &str) -> Self {
        Self::default().then_respond(status, body)
    }

    pub(crate) fn failing(code: u32, message: &str) -> Self {
        Self::default().then_fail(code, message)
    }

    pub(crate) fn then_respond(self, status: u16, body: &str) -> Self {
        self.push(Outcome::Respond {
            status,
            body: body.to_string(),
        })
    }

    pub(crate) fn then_fail(self, code: u32, message: &str) -> Self {
        self.push(Outcome::Fail {
            code,
            message: message.to_string(),
        })
    }

    fn push(self, outcome: Outcome) -> Self {
        self.ledger
            .lock()
            .expect("ledger lock")
            .outcomes
            .push_back(outcome);
        self
    }

    /// Option batches seen by each performed handle, oldest first
    pub(crate) fn applied(&self) -> Vec<OptionSet> {
        self.ledger.lock().expect("ledger lock").applied.clone()
    }

    pub(crate) fn opened(&self) -> usize {
        self.ledger.lock().expect("ledger lock").opened
    }

    pub(crate) fn closed(&self) -> usize {
        self.ledger.lock().expect("ledger lock").closed
    }
}

impl Transport for ScriptedTransport {
    type Handle = ScriptedHandle;

    fn init(&self, url: Option<&str>) -> ScriptedHandle {
        self.ledger.lock().expect("ledger lock").opened += 1;
        let mut options = OptionSet::new();
        if let Some(url) = url {
            options.set(TransportOption::Url, url);
        }
        ScriptedHandle {
            ledger: Arc::clone(&self.ledger),
            options,
            info: TransferInfo::default(),
            error: None,
        }
    }
}

#[derive(Debug)]
pub(crate) struct ScriptedHandle {
    ledger: Arc<Mutex<Ledger>>,
    options: OptionSet,
    info: TransferInfo,
    error: Option<(u32, String)>,
}

impl TransportHandle for ScriptedHandle {
    fn set_options(&mut self, options: &OptionSet) {
        self.options
            .extend(options.iter().map(|(key, value)| (*key, value.clone())));
    }

    fn perform(&mut self) -> RawResult {
        let outcome = {
            let mut ledger = self.ledger.lock().expect("ledger lock");
            ledger.applied.push(self.options.clone());
            ledger.outcomes.pop_front()
        };
        self.info.url = self
            .options
            .get(TransportOption::Url)
            .map(|url| url.as_text())
            .unwrap_or_default();

        match outcome.unwrap_or(Outcome::Respond {
            status: 200,
            body: String::new(),
        }) {
            Outcome::Respond { status, body } => {
                self.info.http_code = status;
                self.info.size_download = body.len() as u64;
                RawResult::Body(body)
            }
            Outcome::Fail { code, message } => {
                self.error = Some((code, message));
                RawResult::Failed
            }
        }
    }

    fn info(&self) -> TransferInfo {
        self.info.clone()
    }

    fn error_code(&self) -> u32 {
        self.error.as_ref().map(|(code, _)| *code).unwrap_or(0)
    }

    fn error_message(&self) -> String {
        self.error
            .as_ref()
            .map(|(_, message)| message.clone())
            .unwrap_or_default()
    }

    fn close(self) {
        self.ledger.lock().expect("ledger lock").closed += 1;
    }
}
