// Topics, timing, CAN IDs and motor power levels
use std::time::Duration;

// Control tick period (VESC duty cycle commands are re-sent every tick)
pub const TICK_PERIOD: Duration = Duration::from_millis(500);

// Log one decoded status frame out of this many
pub const STATUS_LOG_INTERVAL: u32 = 60;

// Zenoh topics
pub const TOPIC_DRIVE_POWER: &str = "drive_power"; // drivetrain commands
pub const TOPIC_CMD_ACTUATORS: &str = "cmd_actuators"; // actuator tokens
pub const TOPIC_CAN_TRANSMIT: &str = "CAN/can0/transmit"; // frames to the bus bridge
pub const TOPIC_CAN_RECEIVE: &str = "CAN/can1/receive"; // VESC status frames
pub const TOPIC_IMU: &str = "imu/data";

// CAN IDs of the VESC motor controllers
pub const FRONT_LEFT_DRIVE: u32 = 0x001;
pub const BACK_LEFT_DRIVE: u32 = 0x002;
pub const FRONT_RIGHT_DRIVE: u32 = 0x003;
pub const BACK_RIGHT_DRIVE: u32 = 0x004;
pub const DIGGER_DEPTH_MOTOR: u32 = 0x005;
pub const DIGGER_ROTATION_MOTOR: u32 = 0x006;
pub const DIGGER_DRUM_BELT_MOTOR: u32 = 0x007;
pub const CONVEYOR_BELT_MOTOR: u32 = 0x008;
pub const OFFLOAD_BELT_MOTOR: u32 = 0x009;

// Default motor powers (duty cycle, -1.0 to 1.0)
// The digger depth motor has none: it is held at 0 until depth position control exists
pub const DIGGER_ROTATION_POWER: f32 = 0.5;
pub const DRUM_BELT_POWER: f32 = 0.5;
pub const CONVEYOR_BELT_POWER: f32 = 0.5;
pub const OFFLOAD_BELT_POWER: f32 = 0.5;

/// Duty cycle used for each actuator motor while it is running
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorPowers {
    pub digger_rotation: f32,
    pub drum_belt: f32,
    pub conveyor_belt: f32,
    pub offload_belt: f32,
}

impl Default for MotorPowers {
    fn default() -> Self {
        Self {
            digger_rotation: DIGGER_ROTATION_POWER,
            drum_belt: DRUM_BELT_POWER,
            conveyor_belt: CONVEYOR_BELT_POWER,
            offload_belt: OFFLOAD_BELT_POWER,
        }
    }
}

/// Runtime-tunable settings of the motor control node
#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    pub tick_period: Option<Duration>,
    pub powers: MotorPowers,
    /// Zenoh session config file; `None` uses `zenoh::Config::default()`
    pub zenoh_config: Option<std::path::PathBuf>,
}

impl NodeConfig {
    pub fn tick_period(&self) -> Duration {
        self.tick_period.unwrap_or(TICK_PERIOD)
    }
}

/// Open a zenoh session config, from a file when one is given
pub fn load_zenoh_config(
    path: Option<&std::path::Path>,
) -> Result<zenoh::Config, Box<dyn std::error::Error + Send + Sync>> {
    match path {
        Some(path) => zenoh::Config::from_file(path),
        None => Ok(zenoh::Config::default()),
    }
}
