// Module for the timing math behind stat count-ups and progress-bar fills
use std::time::Duration;

use crate::format;

/// Length of the stats count-up.
pub const COUNT_UP_MS: u64 = 2000;
/// Pause before a progress bar starts filling.
pub const FILL_DELAY_MS: u64 = 500;
/// Length of a progress-bar fill once it starts.
pub const FILL_MS: u64 = 2000;

/// Value shown `elapsed` into a linear count-up toward `target`.
pub fn count_up_value(target: f64, elapsed: Duration) -> f64 {
    let t = (elapsed.as_secs_f64() / (COUNT_UP_MS as f64 / 1000.0)).clamp(0.0, 1.0);
    target * t
}

/// Display string for one count-up frame.
///
/// Whole-number targets floor while running and land exactly on the target;
/// fractional targets always show one decimal place.
pub fn count_up_display(target: f64, elapsed: Duration) -> String {
    let value = count_up_value(target, elapsed);
    if target.fract() == 0.0 {
        if value >= target {
            format::thousands(target as i64)
        } else {
            format::thousands(value.floor() as i64)
        }
    } else {
        format!("{value:.1}")
    }
}

pub fn count_up_done(elapsed: Duration) -> bool {
    elapsed >= Duration::from_millis(COUNT_UP_MS)
}

/// Eased fill fraction for a progress bar, given time since it appeared.
///
/// Holds at zero through the start delay, then eases in and out toward the
/// full width.
pub fn eased_fill(elapsed: Duration) -> f32 {
    let delay = Duration::from_millis(FILL_DELAY_MS);
    if elapsed <= delay {
        return 0.0;
    }
    let t = ((elapsed - delay).as_secs_f32() / (FILL_MS as f32 / 1000.0)).clamp(0.0, 1.0);
    egui::emath::ease_in_ease_out(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_up_is_linear() {
        assert!((count_up_value(100.0, Duration::from_millis(1000)) - 50.0).abs() < 1e-9);
        assert!((count_up_value(100.0, Duration::from_millis(500)) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn count_up_clamps_at_target() {
        assert_eq!(count_up_value(100.0, Duration::from_secs(5)), 100.0);
        assert!(count_up_done(Duration::from_secs(2)));
        assert!(!count_up_done(Duration::from_millis(1999)));
    }

    #[test]
    fn whole_targets_floor_then_land_exactly() {
        assert_eq!(count_up_display(85.0, Duration::from_millis(1000)), "42");
        assert_eq!(count_up_display(85.0, Duration::from_secs(3)), "85");
        assert_eq!(count_up_display(4900.0, Duration::from_secs(3)), "4,900");
    }

    #[test]
    fn fractional_targets_show_one_decimal() {
        assert_eq!(count_up_display(7.5, Duration::from_secs(3)), "7.5");
        let mid = count_up_display(7.5, Duration::from_millis(1000));
        assert!(mid.contains('.'), "expected a decimal, got {mid}");
    }

    #[test]
    fn fill_waits_out_the_delay() {
        assert_eq!(eased_fill(Duration::from_millis(0)), 0.0);
        assert_eq!(eased_fill(Duration::from_millis(400)), 0.0);
    }

    #[test]
    fn fill_eases_to_full() {
        let mid = eased_fill(Duration::from_millis(1500));
        assert!((mid - 0.5).abs() < 1e-5);
        assert_eq!(eased_fill(Duration::from_secs(10)), 1.0);

        let mut last = -1.0f32;
        for ms in (0..3000).step_by(100) {
            let fill = eased_fill(Duration::from_millis(ms));
            assert!(fill >= last);
            last = fill;
        }
    }
}
