use chrono::{ DateTime, Utc };
use log::{ debug, info, warn };
use uuid::Uuid;

use crate::history::ConversationStore;
use crate::lead::{ Lead, LeadStore };
use crate::models::chat::{ Role, Turn };
use crate::responder::{ ResponderError, ResponderGateway };

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingInput,
    ProcessingTurn,
    LeadCaptured,
    NoLeadThisTurn,
    AwaitingAssistantReply,
}

#[derive(Debug, Clone, Copy)]
pub struct SessionLimits {
    pub max_turns: Option<usize>,
    pub max_leads: Option<usize>,
    pub excerpt_len: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            max_turns: Some(200),
            max_leads: Some(500),
            excerpt_len: 30,
        }
    }
}

/// Result of one user turn, ready for the transport to render.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub reply: String,
    pub lead: Option<Lead>,
    /// Set when the responder failed and `reply` is the retry notice.
    pub failure: Option<ResponderError>,
}

impl TurnOutcome {
    pub fn is_degraded(&self) -> bool {
        self.failure.is_some()
    }
}

/// One visitor's conversation and captured leads. Owned by exactly one
/// connection; never shared.
#[derive(Debug)]
pub struct Session {
    id: String,
    created_at: DateTime<Utc>,
    conversation: ConversationStore,
    leads: LeadStore,
    state: SessionState,
    excerpt_len: usize,
}

impl Session {
    pub fn new(limits: SessionLimits) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            conversation: ConversationStore::new(limits.max_turns),
            leads: LeadStore::new(limits.max_leads),
            state: SessionState::Idle,
            excerpt_len: limits.excerpt_len,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn history(&self) -> Vec<Turn> {
        self.conversation.history()
    }

    pub fn leads(&self) -> &LeadStore {
        &self.leads
    }

    /// Marks the session ready for its first message.
    pub fn begin(&mut self) {
        if self.state == SessionState::Idle {
            self.transition(SessionState::AwaitingInput);
        }
    }

    fn transition(&mut self, next: SessionState) {
        debug!("Session {}: {:?} -> {:?}", self.id, self.state, next);
        self.state = next;
    }

    /// Runs one full turn: record the user message, capture a lead if the
    /// message carries a phone number, then ask the responder for a reply.
    ///
    /// On responder failure the user turn stays recorded, no assistant turn is
    /// appended and `retry_notice` is returned instead.
    pub async fn submit(
        &mut self,
        text: &str,
        responder: &dyn ResponderGateway,
        retry_notice: &str
    ) -> TurnOutcome {
        if !matches!(self.state, SessionState::Idle | SessionState::AwaitingInput) {
            warn!("Session {}: previous turn did not complete (state {:?})", self.id, self.state);
        }
        self.transition(SessionState::ProcessingTurn);
        self.conversation.append(Role::User, text);

        let lead = Lead::capture(text, self.excerpt_len);
        match &lead {
            Some(l) => {
                info!("Session {}: lead captured ({})", self.id, l.normalized_phone);
                self.leads.append(l.clone());
                self.transition(SessionState::LeadCaptured);
            }
            None => self.transition(SessionState::NoLeadThisTurn),
        }

        self.transition(SessionState::AwaitingAssistantReply);
        let history = self.conversation.history();
        let outcome = match responder.produce_reply(&history).await {
            Ok(reply) => {
                self.conversation.append(Role::Assistant, reply.clone());
                TurnOutcome { reply, lead, failure: None }
            }
            Err(e) => {
                warn!("Session {}: {} responder failed: {}", self.id, responder.name(), e);
                TurnOutcome { reply: retry_notice.to_string(), lead, failure: Some(e) }
            }
        };
        self.transition(SessionState::Idle);
        outcome
    }

    /// Operator action: drop every captured lead.
    pub fn clear_leads(&mut self) {
        info!("Session {}: clearing {} leads", self.id, self.leads.len());
        self.leads.clear();
    }

    /// Visitor action: drops the transcript and leads and starts over under
    /// the same id.
    pub fn reset(&mut self) {
        if !self.conversation.is_empty() {
            info!(
                "Session {}: reset, discarding {} turns and {} leads",
                self.id,
                self.conversation.len(),
                self.leads.len()
            );
        }
        self.conversation.clear();
        self.leads.clear();
        self.transition(SessionState::Idle);
        self.begin();
    }
}
