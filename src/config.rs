use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{HudError, HudResult};
use crate::perception::types::{ColorTriple, ScreenPoint};
use crate::speech::SpeechBackend;

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub height: HeightConfig,
    #[serde(default)]
    pub exit_match: ExitMatchConfig,
    #[serde(default)]
    pub gamemode: GamemodeConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
}

/// One (pixel-row, meters) endpoint of an interpolation segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationPoint {
    pub row: u32,
    pub meters: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightConfig {
    pub enabled: bool,
    /// Exact color of the HUD frame and of the indicator marker.
    pub indicator_color: ColorTriple,
    /// Frame pixels that must all show `indicator_color` before the strip is read.
    pub calibration_pixels: Vec<ScreenPoint>,
    pub strip_column: u32,
    /// First and last row of the strip, both inclusive.
    pub strip_top: u32,
    pub strip_bottom: u32,
    /// Must be ordered by row with non-increasing meters.
    pub calibration_points: Vec<CalibrationPoint>,
    pub poll_interval_ms: u64,
    pub announce_new_match: bool,
    /// Consecutive polls without the indicator before a new match is announced.
    pub new_match_stability: u32,
}

impl Default for HeightConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            indicator_color: [255, 255, 255],
            calibration_pixels: vec![
                ScreenPoint::new(1576, 319),
                ScreenPoint::new(1586, 319),
                ScreenPoint::new(1596, 319),
                ScreenPoint::new(1599, 23),
            ],
            strip_column: 1583,
            strip_top: 47,
            strip_bottom: 299,
            calibration_points: vec![
                CalibrationPoint { row: 47, meters: 750.0 },
                CalibrationPoint { row: 173, meters: 325.0 },
                CalibrationPoint { row: 299, meters: 0.0 },
            ],
            poll_interval_ms: 2500,
            announce_new_match: true,
            new_match_stability: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExitMatchConfig {
    /// Pixel that is highlighted while the quick menu is open.
    pub quick_menu_pixel: ScreenPoint,
    pub quick_menu_color: ColorTriple,
    pub tolerance: u8,
    pub leave_button: ScreenPoint,
    pub confirm_button: ScreenPoint,
}

impl Default for ExitMatchConfig {
    fn default() -> Self {
        Self {
            quick_menu_pixel: ScreenPoint::new(1315, 640),
            quick_menu_color: [14, 24, 52],
            tolerance: 10,
            leave_button: ScreenPoint::new(1320, 1010),
            confirm_button: ScreenPoint::new(1500, 1025),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GamemodeConfig {
    /// Folder of `<name>.txt` files: line 1 search text, line 2 team sizes.
    pub folder: PathBuf,
    /// Seen at this pixel only when the client is NOT in the lobby.
    pub lobby_check_pixel: ScreenPoint,
    pub lobby_check_color: ColorTriple,
    pub lobby_check_tolerance: u8,
    pub search_field: ScreenPoint,
    pub ready_pixel: ScreenPoint,
    pub ready_color: ColorTriple,
    pub ready_timeout_ms: u64,
    pub first_result: ScreenPoint,
    pub play_button: ScreenPoint,
}

impl Default for GamemodeConfig {
    fn default() -> Self {
        Self {
            folder: PathBuf::from("GAMEMODES"),
            lobby_check_pixel: ScreenPoint::new(1310, 1012),
            lobby_check_color: [149, 18, 19],
            lobby_check_tolerance: 15,
            search_field: ScreenPoint::new(172, 67),
            ready_pixel: ScreenPoint::new(84, 328),
            ready_color: [255, 255, 255],
            ready_timeout_ms: 10_000,
            first_result: ScreenPoint::new(300, 515),
            play_button: ScreenPoint::new(285, 910),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub backend: SpeechBackend,
}

fn resolve_config_path() -> HudResult<PathBuf> {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(parent) = exe.parent() {
            let candidate = parent.join(CONFIG_FILE);
            if candidate.exists() {
                tracing::debug!(path = %candidate.display(), "config found next to executable");
                return Ok(candidate);
            }
        }
    }

    let cwd = std::env::current_dir()?;
    let candidate = cwd.join(CONFIG_FILE);
    if candidate.exists() {
        tracing::debug!(path = %candidate.display(), "config found in working directory");
        return Ok(candidate);
    }

    if let Some(dir) = dirs::config_dir() {
        let candidate = dir.join("hudcall").join(CONFIG_FILE);
        if candidate.exists() {
            tracing::debug!(path = %candidate.display(), "config found in user config dir");
            return Ok(candidate);
        }
    }

    Err(HudError::Config(
        "config.toml not found next to executable, in working directory or in user config dir"
            .into(),
    ))
}

pub fn parse_config(content: &str) -> HudResult<AppConfig> {
    Ok(toml::from_str(content)?)
}

pub fn load_config() -> HudResult<AppConfig> {
    let path = resolve_config_path()?;
    let content = std::fs::read_to_string(&path)?;
    let config = parse_config(&content)?;
    tracing::info!(path = %path.display(), backend = ?config.speech.backend, "config loaded");
    Ok(config)
}

/// Writes to the resolved config.toml, or creates one in the working directory.
pub fn save_config(config: &AppConfig) -> HudResult<PathBuf> {
    let path = match resolve_config_path() {
        Ok(path) => path,
        Err(_) => std::env::current_dir()?.join(CONFIG_FILE),
    };
    save_config_to(&path, config)?;
    Ok(path)
}

/// Refuses to replace an existing file that does not parse, so a hand edit
/// with a typo is never swapped for defaults.
pub fn save_config_to(path: &Path, config: &AppConfig) -> HudResult<()> {
    if path.exists() {
        let existing = std::fs::read_to_string(path)?;
        if let Err(e) = parse_config(&existing) {
            return Err(HudError::Config(format!(
                "{} is not valid config ({e}); fix or remove it before saving",
                path.display()
            )));
        }
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}
