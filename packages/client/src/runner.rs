//! Client execution logic with reconnection support.

use std::{sync::Arc, time::Instant};

use tokio::sync::Mutex;

use crate::{
    error::ClientError, player::PlayerView, reconnect::ReconnectPolicy, session::run_client_session,
    ui::spawn_readline,
};

/// Run the watch party client, reconnecting when the connection drops
pub async fn run_client(url: String, name: String) -> Result<(), ClientError> {
    let policy = ReconnectPolicy::default();
    let player = Arc::new(Mutex::new(PlayerView::new(Instant::now())));
    let mut input_rx = spawn_readline(&name);
    let mut failures = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} as '{}' (attempt {}/{})",
            url,
            name,
            failures + 1,
            policy.max_attempts
        );

        let error = match run_client_session(&url, &name, &mut input_rx, &player).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                return Ok(());
            }
            Err(e) => e,
        };

        // A session that got connected starts a fresh run of attempts
        if matches!(error, ClientError::ConnectionLost(_)) {
            failures = 0;
        }
        failures += 1;
        tracing::warn!("{}", error);

        let Some(delay) = policy.next_delay(&error, failures) else {
            tracing::error!("Giving up after {} failed attempt(s)", failures);
            return Err(error);
        };

        tracing::info!(
            "Reconnecting in {} seconds... (attempt {}/{})",
            delay.as_secs(),
            failures + 1,
            policy.max_attempts
        );
        tokio::time::sleep(delay).await;
    }
}
