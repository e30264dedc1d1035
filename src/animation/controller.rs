/// How animation time behaves past the controller's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatMode {
    Clamp,
    Wrap,
    Cycle,
}

/// Maps application (wall-clock) time to animation-local time.
///
/// Pure: `control_time` mutates nothing, so a controller can be read every
/// frame without bookkeeping.
#[derive(Debug, Clone, Copy)]
pub struct TimeController {
    repeat: RepeatMode,
    min_time: f64,
    max_time: f64,
    active: bool,
}

impl Default for TimeController {
    fn default() -> Self {
        Self {
            repeat: RepeatMode::Clamp,
            min_time: 0.0,
            max_time: 0.0,
            active: false,
        }
    }
}

impl TimeController {
    pub fn new(repeat: RepeatMode, min_time: f64, max_time: f64) -> Self {
        Self {
            repeat,
            min_time,
            max_time,
            active: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    /// Converts `application_time` into the `[min_time, max_time]` interval
    /// according to the repeat mode.
    ///
    /// Wrap and Cycle extract the fractional part of the elapsed multiple of
    /// the range via `floor`, so negative application times wrap forward
    /// rather than producing a negative fraction. A zero-length range always
    /// yields `min_time`.
    pub fn control_time(&self, application_time: f64) -> f64 {
        if self.repeat == RepeatMode::Clamp {
            if application_time < self.min_time {
                return self.min_time;
            }
            if application_time > self.max_time {
                return self.max_time;
            }
            return application_time;
        }

        let time_range = self.max_time - self.min_time;
        if time_range > 0.0 {
            let multiples = (application_time - self.min_time) / time_range;
            let integer_time = multiples.floor();
            let fraction_time = multiples - integer_time;
            if self.repeat == RepeatMode::Wrap {
                return self.min_time + fraction_time * time_range;
            }

            // RepeatMode::Cycle: odd multiples run backward (ping-pong).
            if (integer_time as i64) & 1 == 1 {
                return self.max_time - fraction_time * time_range;
            }
            return self.min_time + fraction_time * time_range;
        }

        self.min_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_saturates_to_bounds() {
        let ctl = TimeController::new(RepeatMode::Clamp, 2.0, 8.0);
        assert_eq!(ctl.control_time(-5.0), 2.0);
        assert_eq!(ctl.control_time(100.0), 8.0);
        assert_eq!(ctl.control_time(5.0), 5.0);
    }

    #[test]
    fn wrap_repeats_forward() {
        let ctl = TimeController::new(RepeatMode::Wrap, 0.0, 10.0);
        assert_eq!(ctl.control_time(0.0), 0.0);
        assert_eq!(ctl.control_time(10.0), 0.0);
        assert!((ctl.control_time(25.0) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn wrap_handles_negative_time() {
        let ctl = TimeController::new(RepeatMode::Wrap, 0.0, 10.0);
        assert!((ctl.control_time(-3.0) - 7.0).abs() < 1e-9);
    }

    #[test]
    fn cycle_ping_pongs() {
        let ctl = TimeController::new(RepeatMode::Cycle, 0.0, 10.0);
        // 15 is one full cycle plus 5 backward: max - f * range.
        assert!((ctl.control_time(15.0) - 5.0).abs() < 1e-9);
        assert!((ctl.control_time(3.0) - 3.0).abs() < 1e-9);
        assert!((ctl.control_time(23.0) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_range_yields_min() {
        let ctl = TimeController::new(RepeatMode::Wrap, 4.0, 4.0);
        assert_eq!(ctl.control_time(123.0), 4.0);
        let ctl = TimeController::new(RepeatMode::Cycle, 4.0, 4.0);
        assert_eq!(ctl.control_time(-1.0), 4.0);
    }

    #[test]
    fn default_controller_is_inactive() {
        let ctl = TimeController::default();
        assert!(!ctl.is_active());
        assert_eq!(ctl.control_time(99.0), 0.0);
    }
}
