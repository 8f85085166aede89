//! Session demo
//!
//! Binds two sessions on one origin, emits on both, simulates the link
//! coming up and an inbound event, then prints what a transport would write.

use anyhow::{Context, Result};
use pushline::bin_common::{load_config_from_env, ConfigType};
use pushline::logging::init_tracing;
use pushline::sessionmux::*;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

struct LoggingSink {
    name: &'static str,
}

impl EventSink for LoggingSink {
    fn on_connect(&self) {
        info!("[{}] connected", self.name);
    }

    fn on_disconnect(&self) {
        info!("[{}] disconnected", self.name);
    }

    fn on_message(&self, payload: Payload) {
        info!("[{}] message: {:?}", self.name, payload);
    }

    fn on_event(&self, event: &str, args: &[Value]) {
        info!("[{}] event '{}': {:?}", self.name, event, args);
    }

    fn on_error(&self, message: &str) {
        warn!("[{}] error: {}", self.name, message);
    }
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let config_path = load_config_from_env(ConfigType::Session);
    let config = match SessionConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            warn!("Using default config ({}: {})", config_path.display(), e);
            SessionConfig::default()
        }
    };

    let factory = Arc::new(QueuedFactory::from_config(&config));
    let registry = Arc::new(ConnectionRegistry::with_factory(factory.clone()));

    // Address first, callback later
    let chat = Session::builder(Arc::clone(&registry))
        .config(&config)
        .address("http://localhost:3000/chat")
        .build()?;
    chat.bind_callback(Arc::new(LoggingSink { name: "chat" }))?;

    // Callback only, on the configured default address
    let lobby = Session::builder(Arc::clone(&registry))
        .config(&config)
        .callback(LoggingSink { name: "lobby" })
        .build();
    let lobby = match lobby {
        Ok(session) => Some(session),
        Err(e) => {
            warn!("Lobby session not created: {}", e);
            None
        }
    };

    chat.emit("join", [json!({"room": "general"})])?;
    chat.send("hello")?;
    if let Some(lobby) = &lobby {
        lobby.send(json!({"status": "online"}))?;
    }

    info!(
        "{} session(s) share {} connection(s)",
        1 + lobby.is_some() as usize,
        registry.len()
    );

    let connection = factory
        .get("http://localhost:3000")
        .context("no connection was created for http://localhost:3000")?;

    connection.mark_connected();
    connection.dispatch_event("chat", "welcome", &[json!("general")]);

    chat.disconnect()?;
    if let Some(lobby) = &lobby {
        lobby.disconnect()?;
    }

    for frame in connection.drain_outbound() {
        info!("outbound: {:?}", frame);
    }
    info!("Metrics: {:?}", connection.metrics());

    Ok(())
}
