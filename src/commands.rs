//! Line commands typed into the console while the monitor runs.
use crate::actions::{exit_match, find_gamemode, select_gamemode, ActionContext, Gamemode};
use crate::config::{save_config, AppConfig};
use crate::errors::HudResult;
use crate::height::MonitorHandle;

const HELP: &str = "\
commands:
  exit          leave the current match (quick menu must be open)
  modes         list game modes
  mode <name>   select a game mode
  height        report whether the height indicator is visible
  save-config   write the active configuration to config.toml
  quit          stop";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ExitMatch,
    ListModes,
    SelectMode(String),
    Height,
    SaveConfig,
    Help,
    Quit,
    Unknown(String),
}

/// Blank lines yield `None`.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let cmd = match word.to_ascii_lowercase().as_str() {
        "exit" => Command::ExitMatch,
        "modes" => Command::ListModes,
        "mode" if !rest.is_empty() => Command::SelectMode(rest.to_string()),
        "height" => Command::Height,
        "save-config" => Command::SaveConfig,
        "help" | "?" => Command::Help,
        "quit" | "q" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    };
    Some(cmd)
}

pub struct Console {
    pub ctx: ActionContext,
    pub config: AppConfig,
    pub modes: Vec<Gamemode>,
    pub monitor: Option<MonitorHandle>,
}

impl Console {
    /// Runs one command. Returns `false` once the console should stop.
    pub async fn execute(&mut self, cmd: Command) -> HudResult<bool> {
        match cmd {
            Command::ExitMatch => {
                let outcome = exit_match(&self.ctx, &self.config.exit_match).await?;
                tracing::info!(?outcome, "exit match finished");
            }
            Command::ListModes => {
                if self.modes.is_empty() {
                    println!("no game modes loaded from {}", self.config.gamemode.folder.display());
                }
                for mode in &self.modes {
                    println!("{} (teams: {})", mode.name, mode.team_sizes.join(", "));
                }
            }
            Command::SelectMode(name) => match find_gamemode(&self.modes, &name) {
                Some(mode) => {
                    let outcome = select_gamemode(&self.ctx, &self.config.gamemode, mode).await?;
                    tracing::info!(mode = %mode.name, ?outcome, "select gamemode finished");
                }
                None => {
                    tracing::warn!(name = %name, "unknown game mode");
                    self.ctx.speaker.speak(&format!("No game mode named {name}"));
                }
            },
            Command::Height => match &self.monitor {
                Some(handle) if handle.is_running() => {
                    let state = if handle.is_visible() { "visible" } else { "not visible" };
                    println!("height indicator {state}");
                }
                Some(_) => println!("height monitor stopped"),
                None => println!("height monitor disabled"),
            },
            Command::SaveConfig => {
                let path = save_config(&self.config)?;
                println!("saved {}", path.display());
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => return Ok(false),
            Command::Unknown(line) => println!("unknown command: {line} (try help)"),
        }
        Ok(true)
    }

    /// Stops the height monitor, if one was started.
    pub async fn shutdown(self) -> HudResult<()> {
        match self.monitor {
            Some(handle) => handle.shutdown().await,
            None => Ok(()),
        }
    }
}
