//! Interactive mode for the server.
//!
//! Prompts for bind address, port, and backend URL before starting the
//! server. Everything else comes from the environment.

use dialoguer::{Confirm, Input};

use crate::config::ServerConfig;

/// Runs the server in interactive mode, prompting for configuration.
///
/// Starts from [`ServerConfig::from_env`], lets the user override the
/// bind address, port, and backend URL, and delegates to
/// [`super::run_server`].
///
/// # Errors
///
/// Returns an `std::io::Result` error if the environment holds invalid
/// configuration or the underlying server fails to start.
#[allow(clippy::future_not_send)]
pub async fn run() -> std::io::Result<()> {
    println!("ShopGuard Server");
    println!();

    let mut config = ServerConfig::from_env().map_err(std::io::Error::other)?;

    config.bind_addr = Input::new()
        .with_prompt("Bind address")
        .default(config.bind_addr.clone())
        .interact_text()
        .unwrap_or_else(|_| config.bind_addr.clone());

    config.port = Input::new()
        .with_prompt("Port")
        .default(config.port)
        .interact_text()
        .unwrap_or(config.port);

    config.backend_url = Input::new()
        .with_prompt("Inference backend URL")
        .default(config.backend_url.clone())
        .validate_with(|url: &String| {
            if url.starts_with("http://") || url.starts_with("https://") {
                Ok(())
            } else {
                Err("expected an http:// or https:// URL")
            }
        })
        .interact_text()
        .unwrap_or_else(|_| config.backend_url.clone());

    if !Confirm::new()
        .with_prompt(format!(
            "Start server on {}:{} (backend {})?",
            config.bind_addr, config.port, config.backend_url
        ))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server(config).await
}
