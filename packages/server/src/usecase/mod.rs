//! UseCase layer: the relay engine and the use cases it is made of.

mod connect_client;
mod disconnect_client;
mod engine;
mod error;
mod get_relay_state;
mod handle_transport_error;
mod relay_message;
mod sequencer;

pub use connect_client::{ConnectClientUseCase, StateReplay};
pub use disconnect_client::DisconnectClientUseCase;
pub use engine::RelayEngine;
pub use error::RelayError;
pub use get_relay_state::{GetRelayStateUseCase, RelayState};
pub use handle_transport_error::HandleTransportErrorUseCase;
pub use relay_message::{RelayMessageUseCase, RelayOutcome};
pub use sequencer::PlaybackSequencer;
