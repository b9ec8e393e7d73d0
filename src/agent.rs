use chrono::Local;
use log::{ info, warn, error };
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use crate::admin::{ render_dashboard, AdminGate, AdminView };
use crate::cli::Args;
use crate::config::prompt::{ self, PromptConfig };
use crate::lead::ContactLinkBuilder;
use crate::lead::export::{ export_filename, leads_to_csv, CSV_CONTENT_TYPE };
use crate::llm::{ new_client as new_chat_client, LlmConfig, LlmError, LlmType };
use crate::responder::{
    LocalResponder,
    RemoteResponder,
    ResponderGateway,
    ResponderType,
};
use crate::session::{ Session, SessionLimits, TurnOutcome };

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadsExport {
    pub filename: String,
    pub content_type: String,
    pub content: String,
}

/// Process-wide, read-only wiring shared by every session: the responder
/// chosen at startup, the persona text and the admin secret.
pub struct ConciergeAgent {
    responder: Arc<dyn ResponderGateway>,
    prompts: Arc<PromptConfig>,
    admin_gate: AdminGate,
    contact_links: ContactLinkBuilder,
    contact_message: String,
    limits: SessionLimits,
    config_error: Option<String>,
}

impl ConciergeAgent {
    fn initialize_responder(
        args: &Args,
        prompts: &Arc<PromptConfig>
    ) -> Result<(Arc<dyn ResponderGateway>, Option<String>), Box<dyn Error + Send + Sync>> {
        let responder_type: ResponderType = args.responder_type.parse()?;
        match responder_type {
            ResponderType::Local => {
                info!("Local keyword responder configured");
                let delay = Duration::from_millis(args.local_reply_delay_ms);
                let responder: Arc<dyn ResponderGateway> = Arc::new(
                    LocalResponder::new(Arc::clone(prompts), delay)
                );
                Ok((responder, None))
            }
            ResponderType::Remote => {
                let llm_type: LlmType = args.chat_llm_type.parse()?;
                let chat_config = LlmConfig {
                    llm_type,
                    api_key: args.resolved_api_key(),
                    completion_model: args.chat_model.clone(),
                    base_url: args.chat_base_url.clone(),
                    temperature: args.chat_temperature,
                    max_tokens: args.chat_max_tokens,
                    timeout: Duration::from_secs(args.chat_timeout_secs),
                };
                match new_chat_client(&chat_config) {
                    Ok(client) => {
                        info!(
                            "Chat client configured: Type={}, Model={}, BaseURL={}",
                            llm_type,
                            client.get_model(),
                            client.get_base_url()
                        );
                        let responder: Arc<dyn ResponderGateway> = Arc::new(
                            RemoteResponder::new(client, Arc::clone(prompts))
                        );
                        Ok((responder, None))
                    }
                    Err(e @ LlmError::MissingApiKey(_)) => {
                        error!("Configuration error: {}. Remote replies are disabled.", e);
                        let responder: Arc<dyn ResponderGateway> = Arc::new(
                            RemoteResponder::unconfigured(Arc::clone(prompts))
                        );
                        Ok((responder, Some(prompts.config_error_notice.clone())))
                    }
                    Err(e) => Err(e.into()),
                }
            }
        }
    }

    pub fn new(args: &Args) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let prompts = prompt::resolve_prompts(args.prompts_path.as_deref())?;
        let (responder, config_error) = Self::initialize_responder(args, &prompts)?;

        if args.admin_code.is_empty() {
            warn!("ADMIN_CODE is empty; the leads dashboard cannot be unlocked.");
        }

        Ok(
            Self::from_parts(
                responder,
                prompts,
                AdminGate::new(args.admin_code.clone()),
                ContactLinkBuilder::new(args.contact_domain.clone()),
                args.contact_message.clone(),
                args.session_limits(),
                config_error
            )
        )
    }

    pub fn from_parts(
        responder: Arc<dyn ResponderGateway>,
        prompts: Arc<PromptConfig>,
        admin_gate: AdminGate,
        contact_links: ContactLinkBuilder,
        contact_message: String,
        limits: SessionLimits,
        config_error: Option<String>
    ) -> Self {
        Self {
            responder,
            prompts,
            admin_gate,
            contact_links,
            contact_message,
            limits,
            config_error,
        }
    }

    pub fn responder_name(&self) -> &'static str {
        self.responder.name()
    }

    /// Blocking banner shown to every new session when startup found a
    /// configuration problem.
    pub fn banner(&self) -> Option<&str> {
        self.config_error.as_deref()
    }

    pub fn presentation_delay(&self) -> Duration {
        self.responder.presentation_delay()
    }

    pub fn open_session(&self) -> Session {
        let mut session = Session::new(self.limits);
        session.begin();
        session
    }

    pub async fn process_message(&self, session: &mut Session, message: &str) -> TurnOutcome {
        session.submit(message, self.responder.as_ref(), &self.prompts.retry_notice).await
    }

    pub fn dashboard(&self, session: &Session, code: &str) -> AdminView {
        let view = render_dashboard(
            &self.admin_gate,
            code,
            session.leads(),
            &self.contact_links,
            &self.contact_message
        );
        if matches!(view, AdminView::Denied { .. }) {
            warn!("Session {}: incorrect admin code", session.id());
        }
        view
    }

    /// Clears the session's leads when `code` is authorized; returns the
    /// dashboard as it looks afterwards.
    pub fn clear_leads(&self, session: &mut Session, code: &str) -> AdminView {
        if self.admin_gate.authorize(code) {
            session.clear_leads();
        }
        self.dashboard(session, code)
    }

    pub fn export_leads(&self, session: &Session, code: &str) -> Result<LeadsExport, AdminView> {
        if !self.admin_gate.authorize(code) {
            return Err(self.dashboard(session, code));
        }
        info!("Session {}: exporting {} leads", session.id(), session.leads().len());
        Ok(LeadsExport {
            filename: export_filename(Local::now()),
            content_type: CSV_CONTENT_TYPE.to_string(),
            content: leads_to_csv(session.leads().iter()),
        })
    }
}
