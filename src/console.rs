use crate::domain::commands::Command;
use crate::domain::controller_registry;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::LinesStream;
use tracing::{error, instrument, warn};

/// Reads `<device> fan on|off` and `<device> sync` lines and dispatches them to the device's
/// controller until the input ends.
#[instrument(skip_all)]
pub async fn console<R>(input: R)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = LinesStream::new(input.lines());

    while let Some(line) = lines.next().await {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("❌ Unable to read from the console: {}", e);
                return;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        match parse_line(&line) {
            Ok((device, command)) => dispatch(&device, command).await,
            Err(e) => warn!("⚠️ {}", e),
        }
    }
}

async fn dispatch(device: &str, command: Command) {
    match controller_registry::get(device) {
        Some(controller) => controller.execute(command).await,
        None => warn!(device, "⚠️ Device '{}' is not tied to a controller", device),
    }
}

fn parse_line(line: &str) -> Result<(String, Command), ConsoleError> {
    let words: Vec<&str> = line.split_whitespace().collect();

    let command = match words.as_slice() {
        [_, "fan", state] => match state.to_lowercase().as_str() {
            "on" => Command::SetExhaustFan { on: true },
            "off" => Command::SetExhaustFan { on: false },
            _ => return Err(ConsoleError::UnknownCommand { line: line.to_string() }),
        },
        [_, "sync"] => Command::SyncMultiFunctionModule,
        _ => return Err(ConsoleError::UnknownCommand { line: line.to_string() }),
    };

    Ok((words[0].to_string(), command))
}

#[derive(Error, Debug, PartialEq)]
pub enum ConsoleError {
    #[error("unknown command '{line}', expected '<device> fan on|off' or '<device> sync'")]
    UnknownCommand { line: String },
}
