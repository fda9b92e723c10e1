// Motor control node: zenoh subscriptions + fixed-period control tick
// Every handler and the tick run on one task, so the node state needs no locking.

use serde::de::DeserializeOwned;
use std::time::Duration;

use tokio::time::{Interval, MissedTickBehavior, interval};
use tracing::{debug, info, warn};

// local imports
use crate::actuators::ActuatorState;
use crate::config::{
    NodeConfig, TOPIC_CAN_RECEIVE, TOPIC_CAN_TRANSMIT, TOPIC_CMD_ACTUATORS, TOPIC_DRIVE_POWER,
    load_zenoh_config,
};
use crate::messages::{CanFrameMsg, StringMsg, Twist};
use crate::motor::{ControlFrame, DriveCommand, MotorDispatcher, StatusReport};
use crate::telemetry::TelemetryLogger;

pub struct MotorControlNode {
    drive: DriveCommand,
    actuators: ActuatorState,
    dispatcher: MotorDispatcher,
    telemetry: TelemetryLogger,
}

impl MotorControlNode {
    pub fn new(config: &NodeConfig) -> Self {
        Self {
            drive: DriveCommand::default(),
            actuators: ActuatorState::default(), // Everything off until told otherwise
            dispatcher: MotorDispatcher::new(config.powers),
            telemetry: TelemetryLogger::new(),
        }
    }

    pub fn actuators(&self) -> ActuatorState {
        self.actuators
    }

    /// Latest drive power replaces the previous one
    pub fn on_drive_power(&mut self, msg: &Twist) {
        self.drive = DriveCommand::from(msg);
        debug!(
            "Drive power: linear={} angular={}",
            self.drive.linear, self.drive.angular
        );
    }

    pub fn on_actuator_command(&mut self, msg: &StringMsg) {
        info!("I heard this actuator command: '{}'", msg.data);
        self.actuators.apply_command(&msg.data);
    }

    /// Returns the decoded report when it was logged
    pub fn on_status_frame(&mut self, msg: &CanFrameMsg) -> Option<StatusReport> {
        // Errors are already logged by the telemetry logger
        self.telemetry.record(msg.id, msg.dlc, &msg.data).ok().flatten()
    }

    /// Frames to send this tick
    pub fn tick(&self) -> Vec<ControlFrame> {
        self.dispatcher.tick(self.drive, self.actuators)
    }

    /// Frames that bring every motor to rest
    pub fn stop_frames(&self) -> Vec<ControlFrame> {
        self.dispatcher
            .tick(DriveCommand::default(), ActuatorState::default())
    }
}

/// Control tick timer; a late tick is sent once and the period restarts from it
fn control_interval(period: Duration) -> Interval {
    let mut tick = interval(period);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tick
}

/// Parse a JSON payload, logging and dropping anything malformed
fn parse_payload<T: DeserializeOwned>(topic: &str, payload: &[u8]) -> Option<T> {
    match serde_json::from_slice::<T>(payload) {
        Ok(msg) => Some(msg),
        Err(e) => {
            warn!("Failed to parse message on {}: {}", topic, e);
            None
        }
    }
}

async fn publish_frames(
    publisher: &zenoh::pubsub::Publisher<'_>,
    frames: &[ControlFrame],
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    for frame in frames {
        let json = serde_json::to_string(&CanFrameMsg::from(frame))?;
        // Fire-and-forget: a failed send is not retried
        if let Err(e) = publisher.put(json).await {
            warn!("Failed to publish frame for CAN ID {}: {}", frame.id, e);
        }
    }
    Ok(())
}

pub async fn run(config: NodeConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Opening Zenoh session...");
    let zenoh_config = load_zenoh_config(config.zenoh_config.as_deref())?;
    let session = zenoh::open(zenoh_config).await?;

    info!("Setting up publishers and subscribers...");
    let drive_sub = session.declare_subscriber(TOPIC_DRIVE_POWER).await?;
    let actuator_sub = session.declare_subscriber(TOPIC_CMD_ACTUATORS).await?;
    let status_sub = session.declare_subscriber(TOPIC_CAN_RECEIVE).await?;
    let pub_can = session.declare_publisher(TOPIC_CAN_TRANSMIT).await?;

    let mut node = MotorControlNode::new(&config);
    let mut tick = control_interval(config.tick_period());

    info!(
        "Motor control started: {}ms tick, powers {:?}",
        config.tick_period().as_millis(),
        config.powers
    );
    info!(
        "Subscribed to: {}, {}, {}",
        TOPIC_DRIVE_POWER, TOPIC_CMD_ACTUATORS, TOPIC_CAN_RECEIVE
    );
    info!("Publishing to: {}", TOPIC_CAN_TRANSMIT);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = tick.tick() => {
                publish_frames(&pub_can, &node.tick()).await?;
            }
            Ok(sample) = drive_sub.recv_async() => {
                if let Some(msg) = parse_payload::<Twist>(TOPIC_DRIVE_POWER, &sample.payload().to_bytes()) {
                    node.on_drive_power(&msg);
                }
            }
            Ok(sample) = actuator_sub.recv_async() => {
                if let Some(msg) = parse_payload::<StringMsg>(TOPIC_CMD_ACTUATORS, &sample.payload().to_bytes()) {
                    node.on_actuator_command(&msg);
                }
            }
            Ok(sample) = status_sub.recv_async() => {
                if let Some(msg) = parse_payload::<CanFrameMsg>(TOPIC_CAN_RECEIVE, &sample.payload().to_bytes()) {
                    node.on_status_frame(&msg);
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown requested, stopping all motors");
                break;
            }
        }
    }

    publish_frames(&pub_can, &node.stop_frames()).await?;
    Ok(())
}
