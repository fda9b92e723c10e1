// VESC CAN protocol: command frame encoding and status frame decoding
//
// Command frames: extended ID = motor ID, 4 data bytes = big-endian i32
// Status frames:  8 data bytes = [eRPM u32 BE][avg current x10 u16 BE][duty x1000 u16 BE]

/// Number of data bytes in a command frame
pub const COMMAND_DLC: u8 = 4;

/// Number of data bytes in a status frame
pub const STATUS_DLC: usize = 8;

/// Wire scaling factors
const DUTY_CYCLE_SCALE: f32 = 100_000.0;
const CURRENT_SCALE: f32 = 1_000.0;
const STATUS_CURRENT_DIVISOR: u32 = 10;
const STATUS_DUTY_DIVISOR: u32 = 1_000;

/// Error types for VESC frame decoding
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FrameError {
    #[error("Status frame from CAN ID {id} too short: {len} of 8 bytes")]
    Truncated { id: u32, len: usize },
}

/// Outbound command frame for a single VESC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlFrame {
    pub id: u32,
    pub is_rtr: bool,
    pub is_error: bool,
    pub is_extended: bool,
    pub dlc: u8,
    pub data: [u8; 4],
}

impl ControlFrame {
    /// The command value carried by this frame
    pub fn value(&self) -> i32 {
        i32::from_be_bytes(self.data)
    }
}

/// Decoded VESC status frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReport {
    pub id: u32,
    pub erpm: u32,
    /// Average motor current in whole amps
    pub avg_current: u32,
    /// Latest duty cycle, truncated to a whole number
    pub duty_cycle: u32,
}

/// Build a command frame carrying `value` for motor `id`
pub fn encode(id: u32, value: i32) -> ControlFrame {
    ControlFrame {
        id,
        is_rtr: false,
        is_error: false,
        is_extended: true,
        dlc: COMMAND_DLC,
        data: value.to_be_bytes(),
    }
}

/// Decode a status frame
///
/// `dlc` is the length advertised by the sender; frames shorter than
/// [`STATUS_DLC`] either by `dlc` or by actual payload are rejected.
pub fn decode(id: u32, dlc: u8, data: &[u8]) -> Result<StatusReport, FrameError> {
    let len = data.len().min(dlc as usize);
    if len < STATUS_DLC {
        return Err(FrameError::Truncated { id, len });
    }

    let erpm = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
    let current = u16::from_be_bytes([data[4], data[5]]) as u32;
    let duty = u16::from_be_bytes([data[6], data[7]]) as u32;

    Ok(StatusReport {
        id: id & 0xFF,
        erpm,
        avg_current: current / STATUS_CURRENT_DIVISOR,
        duty_cycle: duty / STATUS_DUTY_DIVISOR,
    })
}

/// Convert a duty cycle (-1.0 to 1.0) to the wire integer
///
/// Values outside the valid range are clamped to it.
pub fn duty_cycle_to_wire(percent: f32) -> i32 {
    // `as` saturates and maps NaN to 0
    (percent.clamp(-1.0, 1.0) * DUTY_CYCLE_SCALE).round() as i32
}

/// Convert a current in amps to the wire integer (milliamps)
pub fn current_to_wire(amps: f32) -> i32 {
    (amps * CURRENT_SCALE).round() as i32
}

/// Convert electrical RPM to the wire integer
/// eRPM = RPM * (number of motor poles / 2)
pub fn erpm_to_wire(erpm: f32) -> i32 {
    erpm as i32
}
