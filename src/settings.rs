use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use sn754410::{
    Direction, DriverConfig, Motor, MotorPins, MotorSelector, Platform, PwmCapablePinSet,
    SharedEnablePin, DEFAULT_PERIOD_US,
};
use tracing::{error, info};

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
const CONFIG_PATH_VAR: &str = "SN754410_CONFIG";

/// Bench settings, read from TOML plus `SN754410__*` environment overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub board: BoardSettings,
    #[serde(default)]
    pub motor1: MotorPins,
    #[serde(default)]
    pub motor2: MotorPins,
    #[serde(default)]
    pub sequence: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoardSettings {
    pub platform: Platform,
    /// Explicit PWM-capable pins, replacing the platform's set.
    #[serde(default)]
    pub pwm_pins: Option<PwmCapablePinSet>,
    #[serde(default = "default_period")]
    pub period_us: u32,
    #[serde(default)]
    pub shared_enable: SharedEnablePin,
}

fn default_period() -> u32 {
    DEFAULT_PERIOD_US
}

/// One entry of the scripted run.
#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    pub motors: Vec<Motor>,
    #[serde(default)]
    pub speed: Option<i32>,
    #[serde(default)]
    pub direction: Option<Direction>,
    #[serde(default)]
    pub hold_ms: u64,
}

impl Step {
    pub fn selector(&self) -> MotorSelector {
        self.motors.iter().copied().collect()
    }
}

impl Settings {
    pub fn driver_config(&self) -> DriverConfig {
        let pwm_pins = self.board.pwm_pins.unwrap_or_else(|| self.board.platform.pwm_pins());
        DriverConfig::new(pwm_pins)
            .with_period_us(self.board.period_us)
            .with_shared_enable(self.board.shared_enable)
    }

    /// Whether anything is wired to motor 2.
    pub fn is_dual(&self) -> bool {
        self.motor2 != MotorPins::UNASSIGNED
    }
}

pub fn load_settings() -> Result<Settings, ConfigError> {
    let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    info!("Attempting to load configuration from {}", path);

    let settings = Config::builder()
        .add_source(File::new(&path, FileFormat::Toml).required(true))
        .add_source(
            Environment::with_prefix("SN754410")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .and_then(|config| config.try_deserialize::<Settings>());

    match settings {
        Ok(settings) => {
            info!("Successfully loaded configuration: {:?}", settings);
            Ok(settings)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}
