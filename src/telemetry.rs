// Rate-limited logging of VESC status frames

use tracing::{info, warn};

use crate::config::STATUS_LOG_INTERVAL;
use crate::motor::vesc::{self, FrameError, StatusReport};

/// Decodes every status frame, logs one in `interval`
///
/// The counter is shared by all motors, so the logged frame is from
/// whichever motor happened to send the Nth frame.
pub struct TelemetryLogger {
    interval: u32,
    count: u32,
}

impl TelemetryLogger {
    pub fn new() -> Self {
        Self::with_interval(STATUS_LOG_INTERVAL)
    }

    pub fn with_interval(interval: u32) -> Self {
        Self {
            interval: interval.max(1),
            count: 0,
        }
    }

    /// Decode a status frame; returns the report when it was logged
    ///
    /// Malformed frames are logged and do not advance the counter.
    pub fn record(
        &mut self,
        id: u32,
        dlc: u8,
        data: &[u8],
    ) -> Result<Option<StatusReport>, FrameError> {
        let report = vesc::decode(id, dlc, data).inspect_err(|e| {
            warn!("Discarding status frame: {}", e);
        })?;

        self.count += 1;
        if self.count < self.interval {
            return Ok(None);
        }
        self.count = 0;

        info!("Received status frame from CAN ID {}", report.id);
        info!(
            "eRPM: {} average motor current: {} latest duty cycle: {}",
            report.erpm, report.avg_current, report.duty_cycle
        );
        Ok(Some(report))
    }
}

impl Default for TelemetryLogger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: [u8; 8] = [0, 0, 0x27, 0x10, 0, 55, 0, 0];

    #[test]
    fn test_logs_once_per_sixty_frames() {
        let mut logger = TelemetryLogger::new();
        let mut logged = 0;
        for i in 0..180u32 {
            // Cycle through all nine motors
            let id = 0x900 | (i % 9 + 1);
            if logger.record(id, 8, &FRAME).unwrap().is_some() {
                logged += 1;
            }
        }
        assert_eq!(logged, 3);
    }

    #[test]
    fn test_reports_sixtieth_frame() {
        let mut logger = TelemetryLogger::new();
        for _ in 0..59 {
            assert_eq!(logger.record(0x001, 8, &FRAME).unwrap(), None);
        }
        let report = logger.record(0x004, 8, &FRAME).unwrap().unwrap();
        assert_eq!(report.id, 0x004);
        assert_eq!(report.erpm, 10_000);
        assert_eq!(report.avg_current, 5);
    }

    #[test]
    fn test_malformed_frames_not_counted() {
        let mut logger = TelemetryLogger::with_interval(2);
        assert!(logger.record(0x001, 8, &FRAME).unwrap().is_none());
        assert!(logger.record(0x001, 3, &FRAME[..3]).is_err());
        assert!(logger.record(0x001, 8, &FRAME).unwrap().is_some());
    }
}
