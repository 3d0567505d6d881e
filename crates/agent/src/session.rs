//! Per-conversation run state.
//!
//! A session tracks one generation conversation: which personas were
//! requested, how far each one has progressed, and any refined records added
//! afterwards. All state lives in the session value itself; two sessions
//! never share anything. Progress updates are keyed by persona term, so
//! results landing out of order can never overwrite the wrong slot.

use chrono::{DateTime, Utc};
use promptforge_core::record::GeneratedPromptRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Where one persona's generation currently stands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PersonaRunState {
    Queued,
    Generating { started_at: DateTime<Utc> },
    Complete {
        record: GeneratedPromptRecord,
        finished_at: DateTime<Utc>,
    },
    Failed {
        message: String,
        finished_at: DateTime<Utc>,
    },
}

impl PersonaRunState {
    /// Finished, one way or the other.
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            PersonaRunState::Complete { .. } | PersonaRunState::Failed { .. }
        )
    }
}

/// One generation conversation and its accumulated results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptSession {
    run_id: Uuid,
    /// Display order: the personas as originally requested, plus any the
    /// model produced that were never asked for.
    order: Vec<String>,
    states: HashMap<String, PersonaRunState>,
    refined: Vec<GeneratedPromptRecord>,
    started_at: DateTime<Utc>,
}

impl PromptSession {
    pub fn new(personas: &[String]) -> Self {
        let order: Vec<String> = personas.to_vec();
        let states = order
            .iter()
            .map(|term| (term.clone(), PersonaRunState::Queued))
            .collect();
        Self {
            run_id: Uuid::new_v4(),
            order,
            states,
            refined: Vec::new(),
            started_at: Utc::now(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn personas(&self) -> &[String] {
        &self.order
    }

    pub fn state(&self, term: &str) -> Option<&PersonaRunState> {
        self.states.get(term)
    }

    /// Every tracked persona has settled.
    pub fn is_settled(&self) -> bool {
        self.order
            .iter()
            .all(|term| self.states.get(term).is_some_and(PersonaRunState::is_settled))
    }

    pub fn mark_generating(&mut self, term: &str) {
        self.upsert(
            term,
            PersonaRunState::Generating {
                started_at: Utc::now(),
            },
        );
    }

    pub fn complete(&mut self, term: &str, record: GeneratedPromptRecord) {
        self.upsert(
            term,
            PersonaRunState::Complete {
                record,
                finished_at: Utc::now(),
            },
        );
    }

    pub fn fail(&mut self, term: &str, message: impl Into<String>) {
        self.upsert(
            term,
            PersonaRunState::Failed {
                message: message.into(),
                finished_at: Utc::now(),
            },
        );
    }

    /// File a batch of finished records, each under its own persona slot.
    pub fn ingest(&mut self, records: Vec<GeneratedPromptRecord>) {
        for record in records {
            let term = record.persona_used.clone();
            self.complete(&term, record);
        }
    }

    /// Add a refinement result. Refinements only ever grow the collection;
    /// the record they were derived from is untouched.
    pub fn append_refined(&mut self, record: GeneratedPromptRecord) {
        self.refined.push(record);
    }

    pub fn refined(&self) -> &[GeneratedPromptRecord] {
        &self.refined
    }

    /// All completed records: persona results in display order, then
    /// refinements in arrival order.
    pub fn records(&self) -> Vec<&GeneratedPromptRecord> {
        let mut out: Vec<&GeneratedPromptRecord> = self
            .order
            .iter()
            .filter_map(|term| match self.states.get(term) {
                Some(PersonaRunState::Complete { record, .. }) => Some(record),
                _ => None,
            })
            .collect();
        out.extend(self.refined.iter());
        out
    }

    /// Keyed update. A term the session has never seen gets tracked rather
    /// than dropped, so an unexpected persona in the model's output still
    /// shows up somewhere.
    fn upsert(&mut self, term: &str, state: PersonaRunState) {
        if !self.states.contains_key(term) {
            self.order.push(term.to_string());
        }
        self.states.insert(term.to_string(), state);
    }
}
