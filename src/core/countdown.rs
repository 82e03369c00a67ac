use std::fmt;

/// Remaining time until the drawing deadline, derived from wall-clock time.
/// Purely a view derivation; the ticking interval lives in the component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    Ended,
    Remaining {
        days: u64,
        hours: u64,
        minutes: u64,
        seconds: u64,
    },
}

impl Countdown {
    /// Evaluate the countdown for a target unix timestamp (seconds) at the
    /// given wall-clock instant (milliseconds, as from `js_sys::Date::now`).
    /// The target is an absolute instant; no timezone conversion.
    pub fn at(target_secs: u64, now_ms: f64) -> Self {
        let now_secs = (now_ms / 1000.0).floor() as i64;
        let delta = target_secs as i64 - now_secs;

        if delta <= 0 {
            return Countdown::Ended;
        }

        let delta = delta as u64;
        Countdown::Remaining {
            days: delta / 86_400,
            hours: (delta % 86_400) / 3_600,
            minutes: (delta % 3_600) / 60,
            seconds: delta % 60,
        }
    }

    pub fn is_ended(&self) -> bool {
        matches!(self, Countdown::Ended)
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Countdown::Ended => write!(f, "Drawing has ended"),
            Countdown::Remaining {
                days,
                hours,
                minutes,
                seconds,
            } => write!(f, "{}d {}h {}m {}s", days, hours, minutes, seconds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: u64 = 1_700_000_000;

    fn ms(secs: u64) -> f64 {
        secs as f64 * 1000.0
    }

    #[test]
    fn breakdown_uses_floor_division() {
        // 2 days, 3 hours, 4 minutes, 5 seconds before the target
        let now = TARGET - (2 * 86_400 + 3 * 3_600 + 4 * 60 + 5);
        assert_eq!(
            Countdown::at(TARGET, ms(now)),
            Countdown::Remaining {
                days: 2,
                hours: 3,
                minutes: 4,
                seconds: 5
            }
        );
    }

    #[test]
    fn boundary_values() {
        assert_eq!(Countdown::at(TARGET, ms(TARGET)), Countdown::Ended);
        assert_eq!(Countdown::at(TARGET, ms(TARGET + 1)), Countdown::Ended);
        assert_eq!(
            Countdown::at(TARGET, ms(TARGET - 1)),
            Countdown::Remaining {
                days: 0,
                hours: 0,
                minutes: 0,
                seconds: 1
            }
        );
    }

    #[test]
    fn sub_second_now_is_floored() {
        // 999ms past the whole second still counts as that second
        let now_ms = ms(TARGET - 1) + 999.0;
        assert_eq!(
            Countdown::at(TARGET, now_ms),
            Countdown::Remaining {
                days: 0,
                hours: 0,
                minutes: 0,
                seconds: 1
            }
        );
    }

    #[test]
    fn remaining_never_increases_and_stays_in_range() {
        let mut last_total = u64::MAX;
        // walk now forward in time toward the target
        for offset in (0..=172_800u64).rev().step_by(7) {
            let now = TARGET - offset;
            match Countdown::at(TARGET, ms(now)) {
                Countdown::Ended => assert_eq!(offset, 0),
                Countdown::Remaining {
                    days,
                    hours,
                    minutes,
                    seconds,
                } => {
                    assert!(hours < 24);
                    assert!(minutes < 60);
                    assert!(seconds < 60);
                    let total = days * 86_400 + hours * 3_600 + minutes * 60 + seconds;
                    assert_eq!(total, offset);
                    assert!(total <= last_total);
                    last_total = total;
                }
            }
        }
    }

    #[test]
    fn display_format() {
        let now = TARGET - (86_400 + 60);
        assert_eq!(Countdown::at(TARGET, ms(now)).to_string(), "1d 0h 1m 0s");
        assert_eq!(Countdown::Ended.to_string(), "Drawing has ended");
    }
}
