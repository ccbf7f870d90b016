use rayexec_bullet::array::Array;
use rayexec_bullet::bitmap::Bitmap;
use rayexec_bullet::datatype::DataType;
use rayexec_bullet::scalar::interval::IntervalDayTime;
use rayexec_bullet::scalar::ScalarValue;

use super::primitive::{PrimitiveAccumulator, PrimitiveSlot, SlotInput};
use super::{Extremum, ExtremumKind, Max, Min};

/// Key that orders day-time intervals with a single signed comparison.
///
/// Storage keeps days in the low half and millis in the high half. The key
/// puts days in the high half so they dominate, and flips the sign bit of
/// millis so the low half compares as unsigned without sign-extending into
/// the days.
#[inline]
pub const fn comparison_key(storage: u64) -> i64 {
    let days = storage as u32 as i32;
    let millis = (storage >> 32) as u32;
    ((days as i64) << 32) | ((millis ^ 0x8000_0000) as i64)
}

const fn identity_storage<E: Extremum>() -> u64 {
    match E::KIND {
        // Key of i64::MAX
        ExtremumKind::Min => IntervalDayTime::new(i32::MAX, i32::MAX).to_storage(),
        // Key of i64::MIN
        ExtremumKind::Max => IntervalDayTime::new(i32::MIN, i32::MIN).to_storage(),
    }
}

/// Interval input mapped to its storage representation.
#[derive(Debug, Clone, Copy)]
pub struct IntervalInput<'a>(&'a [IntervalDayTime]);

impl SlotInput<u64> for IntervalInput<'_> {
    #[inline]
    fn get(&self, row: usize) -> u64 {
        self.0[row].to_storage()
    }
}

/// Day-time intervals, compared days first and then millis.
///
/// Slots hold the storage representation. Only comparisons use the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalDayTimeSlot;

impl PrimitiveSlot for IntervalDayTimeSlot {
    type Value = u64;
    type Input<'a> = IntervalInput<'a>;

    const NAME: &'static str = "interval_daytime";

    fn accepts(datatype: &DataType) -> bool {
        matches!(datatype, DataType::IntervalDayTime)
    }

    fn input(array: &Array) -> Option<(Self::Input<'_>, Option<&Bitmap>)> {
        match array {
            Array::IntervalDayTime(arr) => Some((IntervalInput(arr.values()), arr.validity())),
            _ => None,
        }
    }

    fn identity<E: Extremum>() -> u64 {
        identity_storage::<E>()
    }

    #[inline]
    fn fold<E: Extremum>(current: u64, incoming: u64, valid: u32) -> u64 {
        let b = valid as i64;
        let key = comparison_key(incoming)
            .wrapping_mul(b)
            .wrapping_add(comparison_key(identity_storage::<E>()).wrapping_mul(b ^ 1));

        // Strict comparisons so ties and null rows keep the current payload.
        let replace = match E::KIND {
            ExtremumKind::Min => key < comparison_key(current),
            ExtremumKind::Max => key > comparison_key(current),
        };

        if replace {
            incoming
        } else {
            current
        }
    }

    fn to_scalar(value: u64) -> ScalarValue {
        ScalarValue::IntervalDayTime(IntervalDayTime::from_storage(value))
    }
}

pub type MinIntervalDayTimeAccumulator = PrimitiveAccumulator<IntervalDayTimeSlot, Min>;
pub type MaxIntervalDayTimeAccumulator = PrimitiveAccumulator<IntervalDayTimeSlot, Max>;
