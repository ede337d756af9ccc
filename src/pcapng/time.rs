use std::convert::TryFrom;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::PcapError;

/// Resolution assumed when an interface has no `if_tsresol` option (microseconds)
pub const DEFAULT_TS_RESOLUTION: u8 = 6;

/// Tick value of 1970-01-01T00:00:00, counted in 100 ns ticks from 0001-01-01
pub const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;

/// Decimal exponent of the tick unit (10^7 ticks per second)
const TICK_EXPONENT: u8 = 7;
const TICKS_PER_SECOND: u128 = 10_000_000;

/// Converts raw packet timestamps to 100 ns ticks
///
/// A timestamp is a count of units since the Unix epoch, where the unit is given by the
/// resolution byte of the capturing interface. If bit 7 is clear, the unit is
/// `10^-e` seconds, `e` being the low 7 bits. Power-of-two units (bit 7 set) are not
/// supported.
///
/// Units coarser than or equal to a tick convert exactly by multiplication. Finer units
/// are divided, and the result is truncated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TimestampTransformer {
    operand: u64,
    is_multiplier: bool,
}

impl TimestampTransformer {
    /// Build the transformer for resolution byte `ts_resol`
    pub fn new(ts_resol: u8) -> Result<TimestampTransformer, PcapError> {
        if ts_resol & 0x80 != 0 {
            return Err(PcapError::UnsupportedResolution(ts_resol));
        }
        let e = ts_resol & 0x7f;
        let transformer = if e <= TICK_EXPONENT {
            TimestampTransformer {
                operand: 10u64.pow(u32::from(TICK_EXPONENT - e)),
                is_multiplier: true,
            }
        } else {
            // beyond 10^19 every raw value divides to zero anyway
            TimestampTransformer {
                operand: 10u64.saturating_pow(u32::from(e - TICK_EXPONENT)),
                is_multiplier: false,
            }
        };
        Ok(transformer)
    }

    /// Value raw timestamps are multiplied or divided by
    #[inline]
    pub fn operand(&self) -> u64 {
        self.operand
    }

    #[inline]
    pub fn is_multiplier(&self) -> bool {
        self.is_multiplier
    }

    /// Returns true if conversion truncates (resolution finer than 100 ns)
    #[inline]
    pub fn precision_loss(&self) -> bool {
        !self.is_multiplier
    }

    /// Number of ticks since the Unix epoch
    fn ticks_since_unix_epoch(&self, raw: u64) -> u128 {
        if self.is_multiplier {
            u128::from(raw) * u128::from(self.operand)
        } else {
            u128::from(raw / self.operand)
        }
    }

    /// Convert a raw timestamp to 100 ns ticks since 0001-01-01
    ///
    /// Values that do not fit are saturated to `i64::MAX`.
    pub fn to_ticks(&self, raw: u64) -> i64 {
        let ticks = UNIX_EPOCH_TICKS as u128 + self.ticks_since_unix_epoch(raw);
        i64::try_from(ticks).unwrap_or(i64::MAX)
    }

    /// Convert a raw timestamp to a `SystemTime`, truncated to 100 ns
    ///
    /// Returns `None` if the value cannot be represented on this platform.
    pub fn to_system_time(&self, raw: u64) -> Option<SystemTime> {
        let ticks = self.ticks_since_unix_epoch(raw);
        let secs = u64::try_from(ticks / TICKS_PER_SECOND).ok()?;
        let nanos = (ticks % TICKS_PER_SECOND) as u32 * 100;
        UNIX_EPOCH.checked_add(Duration::new(secs, nanos))
    }
}

impl Default for TimestampTransformer {
    fn default() -> Self {
        TimestampTransformer {
            operand: 10,
            is_multiplier: true,
        }
    }
}

/// Convert a raw timestamp with the default resolution
pub(crate) fn default_ticks(raw: u64) -> i64 {
    TimestampTransformer::default().to_ticks(raw)
}

/// Convert a raw timestamp with the resolution of `ts_resol`, also returning whether
/// precision was lost
pub(crate) fn ticks_with_resolution(raw: u64, ts_resol: u8) -> Result<(i64, bool), PcapError> {
    let transformer = TimestampTransformer::new(ts_resol)?;
    Ok((transformer.to_ticks(raw), transformer.precision_loss()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_microseconds() {
        let default = TimestampTransformer::default();
        assert_eq!(
            TimestampTransformer::new(DEFAULT_TS_RESOLUTION).unwrap(),
            default
        );
        assert_eq!(default.operand(), 10);
        assert!(default.is_multiplier());
    }

    #[test]
    fn known_microsecond_values() {
        let t = TimestampTransformer::new(6).unwrap();
        let cases = [
            (1_434_416_300_606_680u64, 635_700_131_006_066_800i64),
            (1_434_416_300_625_354, 635_700_131_006_253_540),
            (1_434_416_301_126_820, 635_700_131_011_268_200),
            (1_434_416_308_690_049, 635_700_131_086_900_490),
        ];
        for (raw, ticks) in cases.iter() {
            assert_eq!(t.to_ticks(*raw), *ticks);
            assert_eq!(default_ticks(*raw), *ticks);
        }
    }

    #[test]
    fn base2_rejected() {
        assert!(matches!(
            TimestampTransformer::new(0x80),
            Err(PcapError::UnsupportedResolution(0x80))
        ));
        assert!(TimestampTransformer::new(0x8a).is_err());
    }

    #[test]
    fn nanoseconds_lose_precision() {
        let t = TimestampTransformer::new(9).unwrap();
        assert_eq!(t.operand(), 100);
        assert!(t.precision_loss());
        assert_eq!(t.to_ticks(1_234), UNIX_EPOCH_TICKS + 12);
        let (ticks, lossy) = ticks_with_resolution(1_234, 9).unwrap();
        assert_eq!(ticks, UNIX_EPOCH_TICKS + 12);
        assert!(lossy);
    }

    #[test]
    fn seconds_and_tick_resolutions() {
        let t = TimestampTransformer::new(0).unwrap();
        assert_eq!(t.operand(), 10_000_000);
        assert_eq!(t.to_ticks(1), UNIX_EPOCH_TICKS + 10_000_000);
        let t = TimestampTransformer::new(7).unwrap();
        assert_eq!(t.operand(), 1);
        assert!(!t.precision_loss());
    }

    #[test]
    fn huge_exponent_saturates() {
        let t = TimestampTransformer::new(0x7f).unwrap();
        assert_eq!(t.operand(), u64::MAX);
        assert_eq!(t.to_ticks(u64::MAX - 1), UNIX_EPOCH_TICKS);
        let t = TimestampTransformer::new(0).unwrap();
        assert_eq!(t.to_ticks(u64::MAX), i64::MAX);
    }

    #[test]
    fn system_time() {
        let t = TimestampTransformer::new(6).unwrap();
        let st = t.to_system_time(1_500_000).unwrap();
        let d = st.duration_since(UNIX_EPOCH).unwrap();
        assert_eq!(d, Duration::new(1, 500_000_000));
    }
}
