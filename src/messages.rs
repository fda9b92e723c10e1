// Message types exchanged over zenoh (JSON payloads)

use serde::{Deserialize, Serialize};

use crate::motor::vesc::ControlFrame;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

// Drive power from teleop -> motor control
// Only linear.x (forward power) and angular.z (turn power) are used
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Twist {
    pub linear: Vector3,
    pub angular: Vector3,
}

impl Twist {
    pub fn drive(linear: f64, angular: f64) -> Self {
        Self {
            linear: Vector3 {
                x: linear,
                ..Default::default()
            },
            angular: Vector3 {
                z: angular,
                ..Default::default()
            },
        }
    }
}

/// Free-text message, used for actuator command tokens
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StringMsg {
    pub data: String,
}

/// Raw CAN frame as carried by the CAN bridge topics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanFrameMsg {
    pub id: u32,
    pub is_rtr: bool,
    pub is_error: bool,
    pub is_extended: bool,
    pub dlc: u8,
    pub data: Vec<u8>,
}

impl From<&ControlFrame> for CanFrameMsg {
    fn from(frame: &ControlFrame) -> Self {
        Self {
            id: frame.id,
            is_rtr: frame.is_rtr,
            is_error: frame.is_error,
            is_extended: frame.is_extended,
            dlc: frame.dlc,
            data: frame.data.to_vec(),
        }
    }
}

/// IMU reading published by the navX driver
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Imu {
    pub orientation: Quaternion,
    pub angular_velocity: Vector3,
    pub linear_acceleration: Vector3,
}
