// Differential drive mixing for the four-wheel skid-steer drivetrain
// Converts forward/turn power into per-side duty cycles.

/// Duty cycle commands for the two drivetrain sides
/// Front and back wheels on one side always receive the same command.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SidePowers {
    pub left: f32,
    pub right: f32,
}

impl SidePowers {
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Mix forward and turn power into side duty cycles
///
/// The right side motors are mounted mirrored, so their command is inverted.
pub fn differential_mix(linear: f32, angular: f32) -> SidePowers {
    SidePowers {
        left: linear - angular,
        right: -(linear + angular),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_zero_power() {
        assert_eq!(differential_mix(0.0, 0.0), SidePowers::zero());
    }

    #[test]
    fn test_forward_and_turn() {
        let sides = differential_mix(0.6, 0.2);
        assert!(approx(sides.left, 0.4), "left = {}", sides.left);
        assert!(approx(sides.right, -0.8), "right = {}", sides.right);
    }

    #[test]
    fn test_straight_forward_sides_oppose() {
        // Mirrored mounting: driving straight spins the sides in opposite directions
        let sides = differential_mix(0.5, 0.0);
        assert!(approx(sides.left, 0.5));
        assert!(approx(sides.right, -0.5));
    }

    #[test]
    fn test_turn_in_place() {
        let sides = differential_mix(0.0, 0.3);
        assert!(approx(sides.left, -0.3));
        assert!(approx(sides.right, -0.3));
    }
}
