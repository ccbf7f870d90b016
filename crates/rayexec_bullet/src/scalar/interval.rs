use std::fmt;

/// An interval made up of a number of days and a number of milliseconds.
///
/// The physical representation is a single 64-bit value with `days` in the
/// low 32 bits and `millis` in the high 32 bits, matching the little-endian
/// layout of a `[days, millis]` pair of 32-bit integers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct IntervalDayTime {
    pub days: i32,
    pub millis: i32,
}

impl IntervalDayTime {
    pub const fn new(days: i32, millis: i32) -> Self {
        IntervalDayTime { days, millis }
    }

    /// Pack into the 64-bit storage representation.
    pub const fn to_storage(self) -> u64 {
        (self.days as u32 as u64) | ((self.millis as u32 as u64) << 32)
    }

    /// Unpack from the 64-bit storage representation.
    pub const fn from_storage(storage: u64) -> Self {
        IntervalDayTime {
            days: storage as u32 as i32,
            millis: (storage >> 32) as u32 as i32,
        }
    }
}

impl fmt::Display for IntervalDayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} days {} ms", self.days, self.millis)
    }
}
