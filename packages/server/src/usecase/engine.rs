//! Relay Engine: one entry point per connection lifecycle event.
//!
//! The transport layer calls these methods; they never fail and never panic
//! on per-connection problems. Every error is logged here and stays isolated
//! to the connection or message that caused it.

use std::sync::Arc;

use crate::domain::{
    CloseInfo, ConnectionId, ConnectionRegistry, PlaybackStateRepository, PusherChannel,
};

use super::{
    ConnectClientUseCase, DisconnectClientUseCase, GetRelayStateUseCase,
    HandleTransportErrorUseCase, RelayError, RelayMessageUseCase, RelayOutcome, RelayState,
    StateReplay, sequencer::PlaybackSequencer,
};

pub struct RelayEngine {
    connect_client_usecase: ConnectClientUseCase,
    relay_message_usecase: RelayMessageUseCase,
    disconnect_client_usecase: DisconnectClientUseCase,
    handle_transport_error_usecase: HandleTransportErrorUseCase,
    get_relay_state_usecase: GetRelayStateUseCase,
}

impl RelayEngine {
    /// Build an engine around its registry and playback state slot.
    ///
    /// Each engine owns its state; two engines never share a cached command.
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        playback_repository: Arc<dyn PlaybackStateRepository>,
    ) -> Self {
        let sequencer = Arc::new(PlaybackSequencer::new());
        Self {
            connect_client_usecase: ConnectClientUseCase::new(
                registry.clone(),
                playback_repository.clone(),
                sequencer.clone(),
            ),
            relay_message_usecase: RelayMessageUseCase::new(
                registry.clone(),
                playback_repository.clone(),
                sequencer,
            ),
            disconnect_client_usecase: DisconnectClientUseCase::new(registry.clone()),
            handle_transport_error_usecase: HandleTransportErrorUseCase::new(registry.clone()),
            get_relay_state_usecase: GetRelayStateUseCase::new(registry, playback_repository),
        }
    }

    pub async fn on_connect(
        &self,
        connection_id: ConnectionId,
        channel: PusherChannel,
    ) -> StateReplay {
        tracing::info!("Connection '{}' established", connection_id);
        self.connect_client_usecase
            .execute(connection_id, channel)
            .await
    }

    pub async fn on_message(
        &self,
        connection_id: &ConnectionId,
        raw: &str,
    ) -> Result<RelayOutcome, RelayError> {
        tracing::debug!("Received from '{}': {}", connection_id, raw);
        let result = self.relay_message_usecase.execute(connection_id, raw).await;
        match &result {
            Err(RelayError::MalformedMessage(e)) => {
                tracing::warn!("Dropped message from '{}': {}: {}", connection_id, e, raw);
            }
            Err(RelayError::UnknownCommand(tag)) => {
                tracing::warn!(
                    "Unknown command '{}' received from '{}', ignored",
                    tag,
                    connection_id
                );
            }
            Ok(_) => {}
        }
        result
    }

    pub async fn on_disconnect(
        &self,
        connection_id: &ConnectionId,
        close_info: &CloseInfo,
    ) -> bool {
        self.disconnect_client_usecase
            .execute(connection_id, close_info)
            .await
    }

    pub async fn on_transport_error(&self, connection_id: &ConnectionId, error: &str) -> bool {
        self.handle_transport_error_usecase
            .execute(connection_id, error)
            .await
    }

    pub async fn state(&self) -> RelayState {
        self.get_relay_state_usecase.execute().await
    }
}
