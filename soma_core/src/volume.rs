//! Energy-based volume scaling.

/// Adjusted sets and reps for one exercise
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Volume {
    pub sets: u32,
    pub reps: u32,
}

pub const MIN_SETS: u32 = 1;
pub const MIN_REPS: u32 = 4;

/// Adjust sets/reps based on energy level
///
/// Multiplier is `0.6 + energy * 0.13`: about 0.73 at level 1, 0.99 at
/// level 3 and 1.25 at level 5. Any integer level is accepted; keeping it
/// in 1..=5 is the caller's job.
pub fn adjust_for_energy(base_sets: u32, base_reps: u32, energy_level: i32) -> Volume {
    let multiplier = 0.6 + f64::from(energy_level) * 0.13;

    Volume {
        sets: scale(base_sets, multiplier).max(MIN_SETS),
        reps: scale(base_reps, multiplier).max(MIN_REPS),
    }
}

/// Round half up, saturating into `u32`
fn scale(base: u32, multiplier: f64) -> u32 {
    let rounded = (f64::from(base) * multiplier + 0.5).floor();
    if rounded <= 0.0 {
        0
    } else if rounded >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        rounded as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_energy_reduces_volume() {
        let v = adjust_for_energy(3, 12, 1);
        assert!(v.sets < 3);
        assert!(v.reps < 12);
        assert_eq!(v, Volume { sets: 2, reps: 9 });
    }

    #[test]
    fn test_high_energy_increases_volume() {
        let v = adjust_for_energy(3, 12, 5);
        assert!(v.sets >= 3);
        assert!(v.reps >= 12);
        assert_eq!(v, Volume { sets: 4, reps: 15 });
    }

    #[test]
    fn test_medium_energy_near_baseline() {
        let v = adjust_for_energy(3, 12, 3);
        assert_eq!(v, Volume { sets: 3, reps: 12 });
    }

    #[test]
    fn test_floors_hold_at_lowest_energy() {
        let v = adjust_for_energy(1, 4, 1);
        assert!(v.sets >= MIN_SETS);
        assert!(v.reps >= MIN_REPS);

        let v = adjust_for_energy(0, 0, 1);
        assert_eq!(v, Volume { sets: 1, reps: 4 });
    }

    #[test]
    fn test_monotonic_in_energy() {
        for (sets, reps) in [(1, 4), (2, 8), (3, 10), (3, 12), (4, 30), (5, 20)] {
            let mut prev = adjust_for_energy(sets, reps, 1);
            for level in 2..=5 {
                let next = adjust_for_energy(sets, reps, level);
                assert!(next.sets >= prev.sets, "sets dropped at level {}", level);
                assert!(next.reps >= prev.reps, "reps dropped at level {}", level);
                prev = next;
            }
        }
    }

    #[test]
    fn test_out_of_range_energy_does_not_panic() {
        let v = adjust_for_energy(3, 12, -50);
        assert_eq!(v, Volume { sets: 1, reps: 4 });

        let v = adjust_for_energy(u32::MAX, u32::MAX, i32::MAX);
        assert_eq!(v.sets, u32::MAX);
    }
}
