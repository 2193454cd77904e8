use std::fs;
use std::path::Path;

use engine::{LoopConfig, Scene};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::gameplay::{self, GameConfig};

const CONFIG_ENV_VAR: &str = "MEADOW_CONFIG";
const SEED_ENV_VAR: &str = "MEADOW_SEED";

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: Box<dyn Scene>,
}

pub(crate) fn build_app() -> Result<AppWiring, String> {
    init_tracing();

    let game_config = load_game_config_from_env()?;
    info!(
        world_width = game_config.world_width,
        world_height = game_config.world_height,
        player_speed = game_config.player_speed,
        collectible_target = game_config.collectible_target,
        "game_config"
    );

    let loop_config = LoopConfig {
        surface_width: game_config.world_width as u32,
        surface_height: game_config.world_height as u32,
        ..LoopConfig::default()
    };
    let scene = gameplay::build_scene(game_config, build_rng_from_env());

    Ok(AppWiring {
        config: loop_config,
        scene,
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn load_game_config_from_env() -> Result<GameConfig, String> {
    let Some(path) = std::env::var_os(CONFIG_ENV_VAR) else {
        return Ok(GameConfig::default());
    };
    let config = load_game_config(Path::new(&path))?;
    info!(path = %Path::new(&path).display(), "config_loaded");
    Ok(config)
}

fn load_game_config(path: &Path) -> Result<GameConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|error| format!("failed to read config file {}: {error}", path.display()))?;
    parse_game_config(&raw)
        .map_err(|error| format!("invalid config file {}: {error}", path.display()))
}

fn parse_game_config(raw: &str) -> Result<GameConfig, String> {
    let deserializer = &mut serde_json::Deserializer::from_str(raw);
    let config: GameConfig =
        serde_path_to_error::deserialize(deserializer).map_err(|error| error.to_string())?;
    config.validate()?;
    Ok(config)
}

/// Entropy-seeded by default; `MEADOW_SEED` pins the run for reproduction.
fn build_rng_from_env() -> SmallRng {
    match std::env::var(SEED_ENV_VAR) {
        Ok(value) => match value.parse::<u64>() {
            Ok(seed) => {
                info!(seed, "rng_seeded");
                SmallRng::seed_from_u64(seed)
            }
            Err(_) => {
                warn!(
                    env_var = SEED_ENV_VAR,
                    value = value.as_str(),
                    "invalid seed value; seeding from entropy"
                );
                SmallRng::from_entropy()
            }
        },
        Err(std::env::VarError::NotPresent) => SmallRng::from_entropy(),
        Err(error) => {
            warn!(
                env_var = SEED_ENV_VAR,
                error = %error,
                "unable to read seed env var; seeding from entropy"
            );
            SmallRng::from_entropy()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = parse_game_config("{}").expect("parse");
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn known_fields_override_defaults() {
        let config =
            parse_game_config(r#"{"world_width": 1024.0, "collectible_target": 25}"#).expect("parse");
        assert_eq!(config.world_width, 1024.0);
        assert_eq!(config.collectible_target, 25);
        assert_eq!(config.world_height, GameConfig::default().world_height);
    }

    #[test]
    fn error_message_names_the_bad_field() {
        let error = parse_game_config(r#"{"world_width": "wide"}"#).expect_err("must fail");
        assert!(error.contains("world_width"), "got: {error}");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let error = parse_game_config(r#"{"wrold_width": 800.0}"#).expect_err("must fail");
        assert!(error.contains("wrold_width"), "got: {error}");
    }

    #[test]
    fn semantic_validation_runs_after_parsing() {
        let error = parse_game_config(r#"{"collectible_target": 0}"#).expect_err("must fail");
        assert!(error.contains("collectible_target"), "got: {error}");
    }

    #[test]
    fn config_file_round_trips_through_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("meadow.json");
        fs::write(&path, r#"{"player_speed": 6.5}"#).expect("write config");

        let config = load_game_config(&path).expect("load");
        assert_eq!(config.player_speed, 6.5);
    }

    #[test]
    fn missing_config_file_is_a_readable_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nope.json");
        let error = load_game_config(&path).expect_err("must fail");
        assert!(error.contains("nope.json"), "got: {error}");
    }
}
