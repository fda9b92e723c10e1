use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use rovr_motor_control::config::{MotorPowers, NodeConfig, TICK_PERIOD};
use tracing_subscriber::EnvFilter;

/// Translates drive power and actuator commands into VESC CAN frames
#[derive(Debug, Parser)]
#[command(name = "motor-control-node")]
struct Args {
    /// Control tick period in milliseconds
    #[arg(long, default_value_t = TICK_PERIOD.as_millis() as u64)]
    tick_ms: u64,

    /// Zenoh session config file
    #[arg(long)]
    zenoh_config: Option<PathBuf>,

    #[arg(long, default_value_t = MotorPowers::default().digger_rotation)]
    rotation_power: f32,

    #[arg(long, default_value_t = MotorPowers::default().drum_belt)]
    drum_belt_power: f32,

    #[arg(long, default_value_t = MotorPowers::default().conveyor_belt)]
    conveyor_belt_power: f32,

    #[arg(long, default_value_t = MotorPowers::default().offload_belt)]
    offload_belt_power: f32,
}

impl From<Args> for NodeConfig {
    fn from(args: Args) -> Self {
        Self {
            tick_period: Some(Duration::from_millis(args.tick_ms.max(1))),
            powers: MotorPowers {
                digger_rotation: args.rotation_power,
                drum_belt: args.drum_belt_power,
                conveyor_belt: args.conveyor_belt_power,
                offload_belt: args.offload_belt_power,
            },
            zenoh_config: args.zenoh_config,
        }
    }
}

#[tokio::main]
async fn main() {
    // Setup logging (set RUST_LOG=info or debug)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    let config = NodeConfig::from(Args::parse());

    if let Err(e) = rovr_motor_control::runtime::run(config).await {
        eprintln!("Motor control error: {}", e);
        std::process::exit(1);
    }
}
