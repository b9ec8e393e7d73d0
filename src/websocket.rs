use crate::{ agent::ConciergeAgent, models::websocket::{ ClientMessage, ServerMessage }, session::Session };
use chrono::Utc;
use futures::{ Sink, SinkExt, StreamExt };
use log::{ info, warn, error };
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{ AsyncRead, AsyncWrite };
use tokio_tungstenite::{ tungstenite::protocol::Message, WebSocketStream };

pub const MAX_MESSAGE_SIZE: usize = 1 * 1024 * 1024;

async fn send_message<T>(tx: &mut T, peer: SocketAddr, msg: &ServerMessage) -> bool
    where T: Sink<Message> + Unpin, T::Error: std::fmt::Display
{
    let json = match serde_json::to_string(msg) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize message for {}: {}", peer, e);
            return true;
        }
    };
    match tx.send(Message::Text(json)).await {
        Ok(()) => true,
        Err(e) => {
            error!("Error sending message to {}: {}", peer, e);
            false
        }
    }
}

/// Runs one client message against the session and returns the frames to
/// send back, in order.
pub async fn handle_client_message(
    agent: &ConciergeAgent,
    session: &mut Session,
    message: ClientMessage
) -> Vec<ServerMessage> {
    match message {
        ClientMessage::Chat { content } => {
            let outcome = agent.process_message(session, &content).await;
            let mut replies = Vec::with_capacity(2);
            if let Some(lead) = &outcome.lead {
                replies.push(ServerMessage::LeadCaptured { phone: lead.normalized_phone.clone() });
            }
            if outcome.is_degraded() {
                replies.push(ServerMessage::Error { message: outcome.reply });
            } else {
                replies.push(ServerMessage::Response {
                    content: outcome.reply,
                    timestamp: Utc::now().timestamp(),
                });
            }
            replies
        }
        ClientMessage::Admin { code } => {
            vec![ServerMessage::Dashboard { view: agent.dashboard(session, &code) }]
        }
        ClientMessage::ClearLeads { code } => {
            vec![ServerMessage::Dashboard { view: agent.clear_leads(session, &code) }]
        }
        ClientMessage::Reset => {
            session.reset();
            vec![ServerMessage::SessionReset]
        }
        ClientMessage::ExportLeads { code } =>
            match agent.export_leads(session, &code) {
                Ok(export) =>
                    vec![ServerMessage::LeadsExport {
                        filename: export.filename,
                        content_type: export.content_type,
                        content: export.content,
                    }],
                Err(view) => vec![ServerMessage::Dashboard { view }],
            }
    }
}

pub async fn handle_connection<S>(
    peer: SocketAddr,
    websocket: WebSocketStream<S>,
    agent: Arc<ConciergeAgent>
)
    where S: AsyncRead + AsyncWrite + Unpin
{
    let (mut tx, mut rx) = websocket.split();
    let mut session = agent.open_session();
    info!("Opened session {} for {}", session.id(), peer);

    if let Some(banner) = agent.banner() {
        let msg = ServerMessage::Banner { message: banner.to_string() };
        if !send_message(&mut tx, peer, &msg).await {
            return;
        }
    }

    while let Some(msg) = rx.next().await {
        let message = match msg {
            Ok(message) => message,
            Err(e) => {
                match e {
                    | tokio_tungstenite::tungstenite::Error::ConnectionClosed
                    | tokio_tungstenite::tungstenite::Error::Protocol(_)
                    | tokio_tungstenite::tungstenite::Error::Utf8 => {
                        info!("WebSocket connection closed or protocol error for {}: {}", peer, e);
                    }
                    tokio_tungstenite::tungstenite::Error::Io(ref io_err) if
                        io_err.kind() == std::io::ErrorKind::ConnectionReset
                    => {
                        info!("WebSocket connection reset by peer {}", peer);
                    }
                    _ => {
                        error!("Error receiving message from {}: {}", peer, e);
                    }
                }
                break;
            }
        };

        if message.len() > MAX_MESSAGE_SIZE {
            warn!("Message from {} exceeds size limit ({} > {})", peer, message.len(), MAX_MESSAGE_SIZE);
            let error_msg = ServerMessage::Error { message: "Message too large".to_string() };
            send_message(&mut tx, peer, &error_msg).await;
            break;
        }

        match message {
            Message::Text(text) => {
                let client_msg = match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(m) => m,
                    Err(e) => {
                        warn!("Failed to parse message from {}: {}", peer, e);
                        let error_msg = ServerMessage::Error {
                            message: format!("Failed to parse message: {}", e),
                        };
                        if !send_message(&mut tx, peer, &error_msg).await {
                            break;
                        }
                        continue;
                    }
                };

                let is_chat = matches!(client_msg, ClientMessage::Chat { .. });
                if is_chat && !send_message(&mut tx, peer, &ServerMessage::Processing).await {
                    break;
                }

                let replies = handle_client_message(&agent, &mut session, client_msg).await;

                let delay = agent.presentation_delay();
                if is_chat && !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }

                let mut sent_all = true;
                for reply in &replies {
                    if !send_message(&mut tx, peer, reply).await {
                        sent_all = false;
                        break;
                    }
                }
                if !sent_all {
                    break;
                }
            }
            Message::Close(_) => {
                info!("Received close frame from {}", peer);
                break;
            }
            Message::Ping(ping_data) => {
                if tx.send(Message::Pong(ping_data)).await.is_err() {
                    error!("Failed to send pong to {}", peer);
                    break;
                }
            }
            Message::Pong(_) => {}
            Message::Binary(_) => {
                warn!("Ignoring binary message from {}", peer);
            }
            Message::Frame(_) => {}
        }
    }

    info!(
        "WebSocket connection closed for {} (session {}, open {}s, {} leads discarded)",
        peer,
        session.id(),
        (Utc::now() - session.created_at()).num_seconds(),
        session.leads().len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::{ AdminGate, AdminView };
    use crate::config::prompt::default_prompts;
    use crate::lead::ContactLinkBuilder;
    use crate::responder::LocalResponder;
    use crate::session::SessionLimits;
    use std::time::Duration;

    fn agent() -> ConciergeAgent {
        let prompts = default_prompts().unwrap();
        ConciergeAgent::from_parts(
            Arc::new(LocalResponder::new(prompts.clone(), Duration::ZERO)),
            prompts,
            AdminGate::new("open-sesame"),
            ContactLinkBuilder::default(),
            "Hi".to_string(),
            SessionLimits::default(),
            None
        )
    }

    #[tokio::test]
    async fn chat_with_phone_reports_lead_then_response() {
        let agent = agent();
        let mut session = agent.open_session();
        let replies = handle_client_message(&agent, &mut session, ClientMessage::Chat {
            content: "+96891234567".into(),
        }).await;

        assert_eq!(replies.len(), 2);
        assert!(matches!(&replies[0], ServerMessage::LeadCaptured { phone } if phone == "96891234567"));
        assert!(matches!(&replies[1], ServerMessage::Response { .. }));
    }

    #[tokio::test]
    async fn admin_message_returns_dashboard_with_link() {
        let agent = agent();
        let mut session = agent.open_session();
        handle_client_message(&agent, &mut session, ClientMessage::Chat {
            content: "call 91234567".into(),
        }).await;

        let replies = handle_client_message(&agent, &mut session, ClientMessage::Admin {
            code: "open-sesame".into(),
        }).await;
        match &replies[0] {
            ServerMessage::Dashboard { view: AdminView::Authorized { contact: Some(c), .. } } => {
                assert_eq!(c.url, "https://wa.me/91234567?text=Hi");
            }
            other => panic!("unexpected reply: {:?}", other),
        }
    }

    #[tokio::test]
    async fn reset_starts_the_session_over() {
        let agent = agent();
        let mut session = agent.open_session();
        handle_client_message(&agent, &mut session, ClientMessage::Chat {
            content: "call 91234567".into(),
        }).await;

        let replies = handle_client_message(&agent, &mut session, ClientMessage::Reset).await;
        assert!(matches!(replies.as_slice(), [ServerMessage::SessionReset]));
        assert!(session.history().is_empty());
        assert!(session.leads().is_empty());

        let json = serde_json::to_string(&replies[0]).unwrap();
        assert_eq!(json, r#"{"type":"session_reset"}"#);
    }

    #[tokio::test]
    async fn export_with_wrong_code_returns_denied_dashboard() {
        let agent = agent();
        let mut session = agent.open_session();
        let replies = handle_client_message(&agent, &mut session, ClientMessage::ExportLeads {
            code: "nope".into(),
        }).await;
        assert!(matches!(&replies[0], ServerMessage::Dashboard { view: AdminView::Denied { .. } }));

        let json = serde_json::to_value(&replies[0]).unwrap();
        assert_eq!(json["type"], "dashboard");
        assert_eq!(json["view"]["state"], "denied");
    }
}
