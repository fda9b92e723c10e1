// Motor control module for the VESC-driven drivetrain and digger
//
// Provides:
// - VESC CAN frame encoding/decoding and unit conversion
// - Differential drive mixing (forward/turn power -> side duty cycles)
// - Per-tick command dispatch for all nine motors

mod dispatcher;
pub mod mixing;
pub mod vesc;

pub use dispatcher::{DriveCommand, Motor, MotorDispatcher};
pub use mixing::{SidePowers, differential_mix};
pub use vesc::{ControlFrame, FrameError, StatusReport};
