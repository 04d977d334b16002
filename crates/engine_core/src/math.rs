//! Scalar interpolation helpers used by per-frame gameplay updates.

/// Move `current` toward `target` with exponential decay.
///
/// `value += (target - value) * (1 - exp(-rate * dt))`. The result never passes the
/// target, and a non-positive `dt` leaves the value untouched.
pub fn interp_to(current: f32, target: f32, dt: f32, rate: f32) -> f32 {
    if dt <= 0.0 || rate <= 0.0 {
        return current;
    }
    let alpha = 1.0 - (-rate * dt).exp();
    current + (target - current) * alpha
}

/// Linearly map `value` from `input` range to `output` range, clamped to the output range.
pub fn map_range_clamped(input: (f32, f32), output: (f32, f32), value: f32) -> f32 {
    let span = input.1 - input.0;
    if span.abs() <= f32::EPSILON {
        return if value >= input.1 { output.1 } else { output.0 };
    }
    let t = ((value - input.0) / span).clamp(0.0, 1.0);
    output.0 + (output.1 - output.0) * t
}

/// Wrap an angle in degrees into `(-180, 180]`.
pub fn normalize_degrees(angle: f32) -> f32 {
    let mut a = angle % 360.0;
    if a > 180.0 {
        a -= 360.0;
    } else if a <= -180.0 {
        a += 360.0;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interp_to_moves_toward_target_without_overshoot() {
        let mut v = 0.0;
        for _ in 0..200 {
            let next = interp_to(v, 2.25, 1.0 / 60.0, 2.25);
            assert!(next > v);
            assert!(next < 2.25);
            v = next;
        }
    }

    #[test]
    fn interp_to_large_step_stays_below_target() {
        let v = interp_to(0.0, 1.0, 10.0, 35.0);
        assert!(v <= 1.0);
        assert!((v - 1.0).abs() < 1e-4);
    }

    #[test]
    fn interp_to_zero_dt_is_identity() {
        assert_eq!(interp_to(0.7, 0.0, 0.0, 30.0), 0.7);
    }

    #[test]
    fn map_range_clamped_clamps_both_ends() {
        assert_eq!(map_range_clamped((0.0, 600.0), (0.0, 1.0), 300.0), 0.5);
        assert_eq!(map_range_clamped((0.0, 600.0), (0.0, 1.0), 1200.0), 1.0);
        assert_eq!(map_range_clamped((0.0, 600.0), (0.0, 1.0), -5.0), 0.0);
    }

    #[test]
    fn normalize_degrees_wraps() {
        assert_eq!(normalize_degrees(190.0), -170.0);
        assert_eq!(normalize_degrees(-190.0), 170.0);
        assert_eq!(normalize_degrees(180.0), 180.0);
        assert_eq!(normalize_degrees(720.0), 0.0);
    }
}
