//! WebSocket client session management.

use std::{sync::Arc, time::Instant};

use futures_util::{SinkExt, StreamExt, stream::SplitSink};
use tokio::{
    net::TcpStream,
    sync::{Mutex, mpsc},
};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{Error as WsError, protocol::Message},
};
use watchparty_server::{
    domain::{Command, CommandType},
    infrastructure::dto::conversion::{decode_command, encode_command},
};
use watchparty_shared::time::get_jst_timestamp;

use crate::{
    error::ClientError,
    formatter::MessageFormatter,
    input::{UserInput, parse_input},
    player::PlayerView,
    ui::redisplay_prompt,
};

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Run one connection to the relay.
///
/// Returns `Ok(())` when the user quits and an error when the connection
/// could not be made or dropped.
pub async fn run_client_session(
    url: &str,
    name: &str,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
    player: &Arc<Mutex<PlayerView>>,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url).await.map_err(|e| match e {
        WsError::Http(response) => ClientError::Rejected(response.status().as_u16()),
        other => ClientError::ConnectionError(other.to_string()),
    })?;

    tracing::info!("Connected to watch party relay!");
    println!(
        "\nYou are '{}'. Type to chat, /help for playback commands, Ctrl+C to exit.\n",
        name
    );
    redisplay_prompt(name);

    let (mut write, mut read) = ws_stream.split();

    let name_for_read = name.to_string();
    let player_for_read = player.clone();

    // Spawn a task to handle incoming messages; it ends only when the connection does
    let mut read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let received_at = get_jst_timestamp();
                    let output = match decode_command(text.as_str()) {
                        Ok(command) if command.command_type == CommandType::Chat => {
                            MessageFormatter::format_chat(&command, &name_for_read, received_at)
                        }
                        Ok(command) => {
                            player_for_read.lock().await.apply(&command, Instant::now());
                            MessageFormatter::format_playback(&command, received_at)
                        }
                        Err(e) => {
                            tracing::debug!("Unrecognized frame: {}", e);
                            MessageFormatter::format_raw_message(text.as_str())
                        }
                    };
                    print!("{}", output);
                    redisplay_prompt(&name_for_read);
                }
                Ok(Message::Binary(data)) => {
                    print!("{}", MessageFormatter::format_binary_message(data.len()));
                    redisplay_prompt(&name_for_read);
                }
                Ok(Message::Close(_)) => {
                    return "server closed the connection".to_string();
                }
                Err(e) => return e.to_string(),
                _ => {}
            }
        }
        "connection ended".to_string()
    });

    let result = tokio::select! {
        reason = &mut read_task => {
            Err(ClientError::ConnectionLost(reason.unwrap_or_else(|e| e.to_string())))
        }
        result = input_loop(input_rx, &mut write, player, name) => {
            read_task.abort();
            result
        }
    };

    if result.is_ok() {
        // Best effort; the process is about to exit
        let _ = write.send(Message::Close(None)).await;
    }

    result
}

/// Turn typed lines into frames until the user quits or input closes
async fn input_loop(
    input_rx: &mut mpsc::UnboundedReceiver<String>,
    write: &mut WsSink,
    player: &Arc<Mutex<PlayerView>>,
    name: &str,
) -> Result<(), ClientError> {
    while let Some(line) = input_rx.recv().await {
        let input = match parse_input(&line) {
            Ok(input) => input,
            Err(e) => {
                print!("{}", MessageFormatter::format_input_error(&e));
                redisplay_prompt(name);
                continue;
            }
        };

        let command = match input {
            UserInput::Quit => return Ok(()),
            UserInput::State => {
                let view = player.lock().await;
                print!(
                    "{}",
                    MessageFormatter::format_player_view(&view, Instant::now())
                );
                redisplay_prompt(name);
                continue;
            }
            UserInput::Help => {
                print!("{}", MessageFormatter::format_help());
                redisplay_prompt(name);
                continue;
            }
            UserInput::Chat(message) => Command::chat(name, message),
            playback => {
                let view = player.lock().await;
                match view.command_for(&playback, Instant::now()) {
                    Some(command) => command,
                    None => continue,
                }
            }
        };

        let frame = match encode_command(&command) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!("Failed to serialize command: {}", e);
                continue;
            }
        };

        // The relay echoes every command back, so nothing is printed here
        write
            .send(Message::Text(frame.into()))
            .await
            .map_err(|e| ClientError::ConnectionLost(e.to_string()))?;
    }

    // Ctrl+C / Ctrl+D closed the input
    Ok(())
}
