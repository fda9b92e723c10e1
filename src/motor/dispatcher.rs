// Per-tick motor command dispatch
//
// Combines drivetrain mixing, actuator state and the VESC protocol into
// one duty cycle frame per motor.

use tracing::debug;

use super::mixing::differential_mix;
use super::vesc::{self, ControlFrame};
use crate::actuators::ActuatorState;
use crate::config::{self, MotorPowers};
use crate::messages::Twist;

/// Logical motors on the robot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motor {
    FrontLeftDrive,
    BackLeftDrive,
    FrontRightDrive,
    BackRightDrive,
    DiggerDepth,
    DiggerRotation,
    DiggerDrumBelt,
    ConveyorBelt,
    OffloadBelt,
}

impl Motor {
    /// All motors, in the order frames are sent each tick
    pub const ALL: [Motor; 9] = [
        Motor::FrontLeftDrive,
        Motor::BackLeftDrive,
        Motor::FrontRightDrive,
        Motor::BackRightDrive,
        Motor::DiggerDepth,
        Motor::DiggerRotation,
        Motor::DiggerDrumBelt,
        Motor::ConveyorBelt,
        Motor::OffloadBelt,
    ];

    /// CAN ID of the VESC driving this motor
    pub fn can_id(self) -> u32 {
        match self {
            Motor::FrontLeftDrive => config::FRONT_LEFT_DRIVE,
            Motor::BackLeftDrive => config::BACK_LEFT_DRIVE,
            Motor::FrontRightDrive => config::FRONT_RIGHT_DRIVE,
            Motor::BackRightDrive => config::BACK_RIGHT_DRIVE,
            Motor::DiggerDepth => config::DIGGER_DEPTH_MOTOR,
            Motor::DiggerRotation => config::DIGGER_ROTATION_MOTOR,
            Motor::DiggerDrumBelt => config::DIGGER_DRUM_BELT_MOTOR,
            Motor::ConveyorBelt => config::CONVEYOR_BELT_MOTOR,
            Motor::OffloadBelt => config::OFFLOAD_BELT_MOTOR,
        }
    }
}

/// Latest drivetrain command (forward and turn power, duty cycle units)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DriveCommand {
    pub linear: f32,
    pub angular: f32,
}

impl From<&Twist> for DriveCommand {
    fn from(twist: &Twist) -> Self {
        Self {
            linear: twist.linear.x as f32,
            angular: twist.angular.z as f32,
        }
    }
}

/// Builds VESC command frames for every motor
pub struct MotorDispatcher {
    powers: MotorPowers,
}

impl MotorDispatcher {
    pub fn new(powers: MotorPowers) -> Self {
        Self { powers }
    }

    /// Duty cycle each motor should run at for the given state
    pub fn duty_cycles(&self, drive: DriveCommand, actuators: ActuatorState) -> [(Motor, f32); 9] {
        let sides = differential_mix(drive.linear, drive.angular);
        let dig = |power: f32| if actuators.digging { power } else { 0.0 };
        let offload = if actuators.offloading {
            self.powers.offload_belt
        } else {
            0.0
        };

        [
            (Motor::FrontLeftDrive, sides.left),
            (Motor::BackLeftDrive, sides.left),
            (Motor::FrontRightDrive, sides.right),
            (Motor::BackRightDrive, sides.right),
            // Depth is position controlled; hold it still until that exists
            (Motor::DiggerDepth, 0.0),
            (Motor::DiggerRotation, dig(self.powers.digger_rotation)),
            (Motor::DiggerDrumBelt, dig(self.powers.drum_belt)),
            (Motor::ConveyorBelt, dig(self.powers.conveyor_belt)),
            (Motor::OffloadBelt, offload),
        ]
    }

    /// Frames for one control tick, one per motor
    pub fn tick(&self, drive: DriveCommand, actuators: ActuatorState) -> Vec<ControlFrame> {
        self.duty_cycles(drive, actuators)
            .into_iter()
            .map(|(motor, power)| self.set_duty_cycle(motor, power))
            .collect()
    }

    /// Set the percent power of a motor between -1.0 and 1.0
    pub fn set_duty_cycle(&self, motor: Motor, percent_power: f32) -> ControlFrame {
        let frame = vesc::encode(motor.can_id(), vesc::duty_cycle_to_wire(percent_power));
        debug!(
            "Setting the duty cycle of CAN ID {} ({:?}) to {}",
            motor.can_id(),
            motor,
            percent_power
        );
        frame
    }

    /// Set the current draw of a motor in amps
    pub fn set_current(&self, motor: Motor, amps: f32) -> ControlFrame {
        let frame = vesc::encode(motor.can_id(), vesc::current_to_wire(amps));
        debug!(
            "Setting the current draw of CAN ID {} ({:?}) to {} amps",
            motor.can_id(),
            motor,
            amps
        );
        frame
    }

    /// Set the electrical RPM of a motor
    pub fn set_erpm(&self, motor: Motor, erpm: f32) -> ControlFrame {
        let frame = vesc::encode(motor.can_id(), vesc::erpm_to_wire(erpm));
        debug!(
            "Setting the eRPM of CAN ID {} ({:?}) to {}",
            motor.can_id(),
            motor,
            erpm
        );
        frame
    }
}

impl Default for MotorDispatcher {
    fn default() -> Self {
        Self::new(MotorPowers::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_for(frames: &[ControlFrame], motor: Motor) -> i32 {
        frames
            .iter()
            .find(|f| f.id == motor.can_id())
            .map(|f| f.value())
            .expect("frame for every motor")
    }

    #[test]
    fn test_one_frame_per_motor() {
        let frames = MotorDispatcher::default().tick(DriveCommand::default(), ActuatorState::default());
        assert_eq!(frames.len(), 9);
        let ids: Vec<u32> = frames.iter().map(|f| f.id).collect();
        assert_eq!(ids, (1..=9).collect::<Vec<u32>>());
        assert!(frames.iter().all(|f| f.value() == 0 && f.dlc == 4 && f.is_extended));
    }

    #[test]
    fn test_drivetrain_mixing() {
        let drive = DriveCommand {
            linear: 0.6,
            angular: 0.2,
        };
        let frames = MotorDispatcher::default().tick(drive, ActuatorState::default());
        assert_eq!(value_for(&frames, Motor::FrontLeftDrive), 40_000);
        assert_eq!(value_for(&frames, Motor::BackLeftDrive), 40_000);
        assert_eq!(value_for(&frames, Motor::FrontRightDrive), -80_000);
        assert_eq!(value_for(&frames, Motor::BackRightDrive), -80_000);
    }

    #[test]
    fn test_saturated_mix_is_clamped() {
        let drive = DriveCommand {
            linear: 1.0,
            angular: 1.0,
        };
        let frames = MotorDispatcher::default().tick(drive, ActuatorState::default());
        assert_eq!(value_for(&frames, Motor::FrontLeftDrive), 0);
        assert_eq!(value_for(&frames, Motor::FrontRightDrive), -100_000);
    }

    #[test]
    fn test_digging_motors_follow_state() {
        let dispatcher = MotorDispatcher::new(MotorPowers {
            digger_rotation: 0.3,
            drum_belt: 0.4,
            conveyor_belt: 0.6,
            offload_belt: 0.7,
        });
        let digging = ActuatorState {
            digging: true,
            offloading: false,
        };
        let frames = dispatcher.tick(DriveCommand::default(), digging);
        assert_eq!(value_for(&frames, Motor::DiggerRotation), 30_000);
        assert_eq!(value_for(&frames, Motor::DiggerDrumBelt), 40_000);
        assert_eq!(value_for(&frames, Motor::ConveyorBelt), 60_000);
        assert_eq!(value_for(&frames, Motor::OffloadBelt), 0);
        assert_eq!(value_for(&frames, Motor::DiggerDepth), 0);

        let offloading = ActuatorState {
            digging: false,
            offloading: true,
        };
        let frames = dispatcher.tick(DriveCommand::default(), offloading);
        assert_eq!(value_for(&frames, Motor::DiggerRotation), 0);
        assert_eq!(value_for(&frames, Motor::ConveyorBelt), 0);
        assert_eq!(value_for(&frames, Motor::OffloadBelt), 70_000);
    }

    #[test]
    fn test_digger_depth_held_still() {
        let dispatcher = MotorDispatcher::new(MotorPowers {
            digger_rotation: 1.0,
            drum_belt: 1.0,
            conveyor_belt: 1.0,
            offload_belt: 1.0,
        });
        let drive = DriveCommand {
            linear: 0.8,
            angular: -0.3,
        };
        for (digging, offloading) in [(false, false), (true, false), (false, true), (true, true)] {
            let frames = dispatcher.tick(drive, ActuatorState { digging, offloading });
            assert_eq!(value_for(&frames, Motor::DiggerDepth), 0);
        }
    }

    #[test]
    fn test_tick_is_deterministic() {
        let dispatcher = MotorDispatcher::default();
        let drive = DriveCommand {
            linear: -0.25,
            angular: 0.1,
        };
        let actuators = ActuatorState {
            digging: true,
            offloading: true,
        };
        assert_eq!(dispatcher.tick(drive, actuators), dispatcher.tick(drive, actuators));
    }

    #[test]
    fn test_current_and_erpm_commands() {
        let dispatcher = MotorDispatcher::default();
        let frame = dispatcher.set_current(Motor::ConveyorBelt, 12.5);
        assert_eq!(frame.id, 0x008);
        assert_eq!(frame.value(), 12_500);

        let frame = dispatcher.set_erpm(Motor::BackRightDrive, -3000.0);
        assert_eq!(frame.id, 0x004);
        assert_eq!(frame.value(), -3000);
    }

    #[test]
    fn test_drive_command_from_twist() {
        let drive = DriveCommand::from(&Twist::drive(0.5, -0.25));
        assert_eq!(drive.linear, 0.5);
        assert_eq!(drive.angular, -0.25);
    }
}
