pub mod admin;
pub mod agent;
pub mod cli;
pub mod config;
pub mod history;
pub mod lead;
pub mod llm;
pub mod models;
pub mod responder;
pub mod server;
pub mod session;
pub mod websocket;

use agent::ConciergeAgent;
use cli::Args;
use log::info;
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Responder Type: {}", args.responder_type);
    info!("Chat LLM Type: {}", args.chat_llm_type);
    info!("Prompts Path: {}", args.prompts_path.as_deref().unwrap_or("built-in"));
    info!("Contact Domain: {}", args.contact_domain);
    info!("Admin Dashboard: {}", if args.admin_code.is_empty() { "locked" } else { "enabled" });
    info!("Session Limits: {} turns, {} leads (0 = unbounded)", args.max_turns, args.max_leads);
    info!("-------------------------");

    let agent = Arc::new(ConciergeAgent::new(&args)?);
    info!("Responder ready: {}", agent.responder_name());
    if let Some(banner) = agent.banner() {
        info!("Sessions will start with banner: {}", banner);
    }
    let server = Server::new(args.server_addr.clone(), agent);
    server.run().await?;

    Ok(())
}
