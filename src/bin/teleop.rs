// Keyboard teleop: W/S drive, A/D turn, R/F power level, G digger, O offloader,
// Space emergency stop, Q quit
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use rovr_motor_control::actuators::{ActuatorState, ActuatorToken};
use rovr_motor_control::config::{TOPIC_CMD_ACTUATORS, TOPIC_DRIVE_POWER, load_zenoh_config};
use rovr_motor_control::messages::{StringMsg, Twist};
use tracing::info;

const POWERS: [f64; 3] = [0.25, 0.5, 1.0]; // duty cycle
const INPUT_TIMEOUT_MS: u64 = 100; // Zero drive power after this much time with no input
const ACTUATOR_PERIOD: Duration = Duration::from_millis(50);

#[derive(Debug, Parser)]
#[command(name = "teleop")]
struct Args {
    /// Zenoh session config file
    #[arg(long)]
    zenoh_config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    info!("Opening Zenoh session...");
    let session = zenoh::open(load_zenoh_config(args.zenoh_config.as_deref())?).await?;
    let pub_drive = session.declare_publisher(TOPIC_DRIVE_POWER).await?;
    let pub_actuators = session.declare_publisher(TOPIC_CMD_ACTUATORS).await?;

    info!("Controls: W/S=drive, A/D=turn, R/F=power, G=digger, O=offloader, Space=e-stop, Q=quit");
    print_power(0);

    enable_raw_mode()?;
    let result = run_teleop(&pub_drive, &pub_actuators).await;
    disable_raw_mode()?;

    result
}

async fn run_teleop(
    pub_drive: &zenoh::pubsub::Publisher<'_>,
    pub_actuators: &zenoh::pubsub::Publisher<'_>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut power_idx: usize = 0;

    let mut drive_power = 0.0;
    let mut turn_power = 0.0;
    let mut last_movement_input = Instant::now();

    let mut actuators = ActuatorState::default();
    let mut emergency_stop = false;
    let mut last_actuator_pub = Instant::now();

    loop {
        // Poll for key with 20ms timeout (50Hz effective rate)
        if event::poll(Duration::from_millis(20))? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                let pressed = kind == KeyEventKind::Press;
                let held = pressed || kind == KeyEventKind::Repeat;

                match code {
                    KeyCode::Char('w') if held && !emergency_stop => {
                        drive_power = POWERS[power_idx];
                        last_movement_input = Instant::now();
                    }
                    KeyCode::Char('s') if held && !emergency_stop => {
                        drive_power = -POWERS[power_idx];
                        last_movement_input = Instant::now();
                    }
                    KeyCode::Char('a') if held && !emergency_stop => {
                        turn_power = POWERS[power_idx];
                        last_movement_input = Instant::now();
                    }
                    KeyCode::Char('d') if held && !emergency_stop => {
                        turn_power = -POWERS[power_idx];
                        last_movement_input = Instant::now();
                    }

                    KeyCode::Char('r') if pressed => {
                        power_idx = (power_idx + 1).min(POWERS.len() - 1);
                        print_power(power_idx);
                    }
                    KeyCode::Char('f') if pressed => {
                        power_idx = power_idx.saturating_sub(1);
                        print_power(power_idx);
                    }

                    // Toggles only change on a fresh press, not on key repeat
                    KeyCode::Char('g') if pressed && !emergency_stop => {
                        actuators.digging = !actuators.digging;
                        info!("Digger: {}", on_off(actuators.digging));
                    }
                    KeyCode::Char('o') if pressed && !emergency_stop => {
                        actuators.offloading = !actuators.offloading;
                        info!("Offloader: {}", on_off(actuators.offloading));
                    }

                    KeyCode::Char(' ') if pressed => {
                        emergency_stop = !emergency_stop;
                        // Leaving the stop always starts with everything off
                        actuators = ActuatorState::default();
                        drive_power = 0.0;
                        turn_power = 0.0;
                        info!("Emergency stop: {}", on_off(emergency_stop));
                    }

                    KeyCode::Char('q') | KeyCode::Esc if pressed => break,

                    _ => {}
                }
            }
        }

        if last_movement_input.elapsed() > Duration::from_millis(INPUT_TIMEOUT_MS) {
            drive_power = 0.0;
            turn_power = 0.0;
        }

        let twist = Twist::drive(drive_power, turn_power);
        pub_drive.put(serde_json::to_string(&twist)?).await?;

        if last_actuator_pub.elapsed() >= ACTUATOR_PERIOD {
            let data = if emergency_stop {
                ActuatorToken::StopAll.as_str().to_string()
            } else {
                actuators.to_command()
            };
            pub_actuators
                .put(serde_json::to_string(&StringMsg { data })?)
                .await?;
            last_actuator_pub = Instant::now();
        }
    }

    // Leave the robot stopped
    pub_drive
        .put(serde_json::to_string(&Twist::default())?)
        .await?;
    let stop = StringMsg {
        data: ActuatorToken::StopAll.as_str().to_string(),
    };
    pub_actuators.put(serde_json::to_string(&stop)?).await?;

    Ok(())
}

fn on_off(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}

fn print_power(idx: usize) {
    info!("Power: {}", POWERS[idx]);
}
