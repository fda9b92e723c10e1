// IMU subscriber: logs orientation, angular velocity and acceleration from the navX
use std::path::PathBuf;

use clap::Parser;
use rovr_motor_control::config::{TOPIC_IMU, load_zenoh_config};
use rovr_motor_control::messages::Imu;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "imu-subscriber")]
struct Args {
    /// Key expression the IMU driver publishes on
    #[arg(long, default_value = TOPIC_IMU)]
    topic: String,

    /// Zenoh session config file
    #[arg(long)]
    zenoh_config: Option<PathBuf>,
}

fn log_reading(imu: &Imu) {
    let o = imu.orientation;
    let v = imu.angular_velocity;
    let a = imu.linear_acceleration;
    info!("Orientation: ({}, {}, {})", o.x, o.y, o.z);
    info!("Velocity: ({}, {}, {})", v.x, v.y, v.z);
    info!("Acceleration: ({}, {}, {})", a.x, a.y, a.z);
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Opening Zenoh session...");
    let session = zenoh::open(load_zenoh_config(args.zenoh_config.as_deref())?).await?;
    let subscriber = session.declare_subscriber(args.topic.as_str()).await?;
    info!("Subscribed to: {}", args.topic);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            sample = subscriber.recv_async() => {
                let sample = sample?;
                match serde_json::from_slice::<Imu>(&sample.payload().to_bytes()) {
                    Ok(imu) => log_reading(&imu),
                    Err(e) => warn!("Failed to parse IMU reading: {}", e),
                }
            }
            _ = &mut shutdown => break,
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    if let Err(e) = run(Args::parse()).await {
        eprintln!("IMU subscriber error: {}", e);
        std::process::exit(1);
    }
}
