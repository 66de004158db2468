// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Gateway Service
//!
//! Accepts contact form submissions at `POST /api/contact`, rate limited per
//! client address and validated before delivery.
//!
//! ## Configuration
//!
//! Configuration is loaded from an optional file and environment variables:
//!
//! - `CONTACT_CONFIG`: Path to a TOML/YAML/JSON config file
//! - `CONTACT__BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `CONTACT__MAX_BODY_BYTES`: Request body cap (default: 65536)
//! - `CONTACT__RATE_LIMIT__MAX_ATTEMPTS`: Attempts per window (default: 5)
//! - `CONTACT__RATE_LIMIT__WINDOW_SECS`: Window length (default: 60)
//! - `CONTACT__SINK__KIND`: `log` or `webhook` (default: log)
//! - `CONTACT__SINK__WEBHOOK_URL`: Webhook target
//! - `CONTACT__CORS__ALLOWED_ORIGINS`: Comma-separated origins

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{debug, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use contact_gateway::{
    config::Config,
    handlers::{router, AppState},
    limiter::{FixedWindowLimiter, RateLimitStore},
    sink,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = Config::load()?;
    info!(
        bind_addr = %config.bind_addr,
        max_attempts = config.rate_limit.max_attempts,
        window_secs = config.rate_limit.window_secs,
        sink = ?config.sink.kind,
        "Starting contact gateway"
    );

    let limiter: Arc<dyn RateLimitStore> =
        Arc::new(FixedWindowLimiter::from_config(&config.rate_limit));
    let sink = sink::from_config(&config.sink)?;
    let state = Arc::new(AppState::new(config.clone(), limiter, sink)?);

    // Spawn sweep task
    let sweep_state = state.clone();
    let sweep_every = config.rate_limit.sweep_interval();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_every);
        loop {
            interval.tick().await;
            let removed = sweep_state.limiter.sweep(Instant::now()).await;
            if removed > 0 {
                debug!(removed, "Swept expired rate limit entries");
            }
        }
    });

    let app = router(state);

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
