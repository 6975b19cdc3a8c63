#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! `ShopGuard` API server binary.
//!
//! Reads configuration from the environment. Pass `--interactive` to be
//! prompted for the bind address, port, and backend URL instead.

use shopguard_server::config::ServerConfig;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    if std::env::args().skip(1).any(|arg| arg == "--interactive") {
        shopguard_server::interactive::run().await?;
        return Ok(());
    }

    let config = ServerConfig::from_env()?;
    shopguard_server::run_server(config).await?;

    Ok(())
}
