// Actuator command tokens and digger/offloader state
//
// Commands arrive as free text on `cmd_actuators`; every known token found in
// the text is applied, in the order of `ActuatorToken::ALL`.

use tracing::debug;

/// Tokens understood on the actuator command topic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorToken {
    StopAll,
    DiggerOn,
    OffloaderOn,
    DiggerOff,
    OffloaderOff,
    ExtendDigger,
    RetractDigger,
    BeginDigProcedure,
}

impl ActuatorToken {
    /// Evaluation order; a later token overrides an earlier one
    pub const ALL: [ActuatorToken; 8] = [
        ActuatorToken::StopAll,
        ActuatorToken::DiggerOn,
        ActuatorToken::OffloaderOn,
        ActuatorToken::DiggerOff,
        ActuatorToken::OffloaderOff,
        ActuatorToken::ExtendDigger,
        ActuatorToken::RetractDigger,
        ActuatorToken::BeginDigProcedure,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActuatorToken::StopAll => "STOP_ALL_ACTUATORS",
            ActuatorToken::DiggerOn => "DIGGER_ON",
            ActuatorToken::OffloaderOn => "OFFLOADER_ON",
            ActuatorToken::DiggerOff => "DIGGER_OFF",
            ActuatorToken::OffloaderOff => "OFFLOADER_OFF",
            ActuatorToken::ExtendDigger => "EXTEND_DIGGER",
            ActuatorToken::RetractDigger => "RETRACT_DIGGER",
            ActuatorToken::BeginDigProcedure => "BEGIN_DIG_PROCEDURE",
        }
    }

    /// All tokens contained in `text` (case-sensitive), in evaluation order
    pub fn parse(text: &str) -> Vec<ActuatorToken> {
        Self::ALL
            .into_iter()
            .filter(|token| text.contains(token.as_str()))
            .collect()
    }
}

/// On/off state of the digging and offloading motors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActuatorState {
    pub digging: bool,
    pub offloading: bool,
}

impl ActuatorState {
    pub fn apply(&mut self, token: ActuatorToken) {
        match token {
            ActuatorToken::StopAll => {
                self.digging = false;
                self.offloading = false;
            }
            ActuatorToken::DiggerOn => self.digging = true,
            ActuatorToken::OffloaderOn => self.offloading = true,
            ActuatorToken::DiggerOff => self.digging = false,
            ActuatorToken::OffloaderOff => self.offloading = false,
            // Needs digger depth position control
            ActuatorToken::ExtendDigger
            | ActuatorToken::RetractDigger
            | ActuatorToken::BeginDigProcedure => {
                debug!("Actuator command {} not implemented", token.as_str());
            }
        }
    }

    /// Apply every token found in a command string
    pub fn apply_command(&mut self, text: &str) {
        for token in ActuatorToken::parse(text) {
            self.apply(token);
        }
    }

    /// Command string that reproduces this state
    pub fn to_command(self) -> String {
        let digger = if self.digging {
            ActuatorToken::DiggerOn
        } else {
            ActuatorToken::DiggerOff
        };
        let offloader = if self.offloading {
            ActuatorToken::OffloaderOn
        } else {
            ActuatorToken::OffloaderOff
        };
        format!("{} {}", digger.as_str(), offloader.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(commands: &[&str]) -> ActuatorState {
        let mut state = ActuatorState::default();
        for cmd in commands {
            state.apply_command(cmd);
        }
        state
    }

    #[test]
    fn test_starts_idle() {
        assert_eq!(ActuatorState::default(), run(&[]));
    }

    #[test]
    fn test_on_then_off() {
        let state = run(&["DIGGER_ON", "DIGGER_OFF"]);
        assert!(!state.digging);
    }

    #[test]
    fn test_stop_all_then_digger_on() {
        let state = run(&["OFFLOADER_ON", "STOP_ALL_ACTUATORS", "DIGGER_ON"]);
        assert!(state.digging);
        assert!(!state.offloading);
    }

    #[test]
    fn test_combined_message_stop_checked_first() {
        let state = run(&["OFFLOADER_ON", "STOP_ALL_ACTUATORS DIGGER_ON"]);
        assert!(state.digging);
        assert!(!state.offloading);
    }

    #[test]
    fn test_contradictory_tokens_off_wins() {
        // OFF is evaluated after ON regardless of position in the text
        let state = run(&["DIGGER_OFF DIGGER_ON OFFLOADER_OFF OFFLOADER_ON"]);
        assert!(!state.digging);
        assert!(!state.offloading);
    }

    #[test]
    fn test_unknown_and_lowercase_ignored() {
        let state = run(&["DIGGER_ON", "digger_off", "LAUNCH_ROCKET"]);
        assert!(state.digging);
    }

    #[test]
    fn test_position_tokens_do_not_change_state() {
        let state = run(&["DIGGER_ON", "EXTEND_DIGGER RETRACT_DIGGER BEGIN_DIG_PROCEDURE"]);
        assert_eq!(
            state,
            ActuatorState {
                digging: true,
                offloading: false
            }
        );
    }

    #[test]
    fn test_parse_keeps_evaluation_order() {
        let tokens = ActuatorToken::parse(" OFFLOADER_OFF DIGGER_ON STOP_ALL_ACTUATORS");
        assert_eq!(
            tokens,
            vec![
                ActuatorToken::StopAll,
                ActuatorToken::DiggerOn,
                ActuatorToken::OffloaderOff
            ]
        );
    }

    #[test]
    fn test_to_command_reproduces_state() {
        let state = ActuatorState {
            digging: true,
            offloading: false,
        };
        assert_eq!(state.to_command(), "DIGGER_ON OFFLOADER_OFF");
        assert_eq!(run(&[state.to_command().as_str()]), state);
    }
}
