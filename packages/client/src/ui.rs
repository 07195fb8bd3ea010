//! Terminal I/O for the client.

use std::io::Write;

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

pub fn prompt(name: &str) -> String {
    format!("{}> ", name)
}

/// Redisplay the prompt after printing an incoming message
pub fn redisplay_prompt(name: &str) {
    print!("{}", prompt(name));
    std::io::stdout().flush().ok();
}

/// Read lines on a blocking thread and forward them to the returned channel.
///
/// The channel closes when the user presses Ctrl+C or Ctrl+D. The thread
/// outlives reconnects, so the prompt keeps its history.
pub fn spawn_readline(name: &str) -> mpsc::UnboundedReceiver<String> {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();
    let prompt = prompt(name);

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                tracing::error!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line).ok();
                    if input_tx.send(line.to_string()).is_err() {
                        // Receiver dropped, the client is shutting down
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    input_rx
}
