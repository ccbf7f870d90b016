//! Slots for integer, float and decimal inputs.
//!
//! Integers substitute nulls arithmetically: `v * b + IDENTITY * (1 - b)` is
//! folded on every row, so a null row folds the identity and can't change the
//! slot. Floats can't use the same trick (NaN and infinities poison the
//! multiply), so they branch on the validity bit instead.

use rayexec_bullet::array::Array;
use rayexec_bullet::bitmap::Bitmap;
use rayexec_bullet::datatype::DataType;
use rayexec_bullet::scalar::ScalarValue;

use super::primitive::{bounded_identity, PrimitiveAccumulator, PrimitiveSlot, SlotInput};
use super::{Extremum, ExtremumKind, Max, Min};

macro_rules! int_slot {
    ($name:ident, $native:ty, $variant:ident, $slot_name:expr) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name;

        impl PrimitiveSlot for $name {
            type Value = $native;
            type Input<'a> = &'a [$native];

            const NAME: &'static str = $slot_name;

            fn accepts(datatype: &DataType) -> bool {
                matches!(datatype, DataType::$variant)
            }

            fn input(array: &Array) -> Option<(Self::Input<'_>, Option<&Bitmap>)> {
                match array {
                    Array::$variant(arr) => Some((arr.values(), arr.validity())),
                    _ => None,
                }
            }

            #[inline]
            fn identity<E: Extremum>() -> $native {
                bounded_identity::<$native, E>()
            }

            #[inline]
            fn fold<E: Extremum>(current: $native, incoming: $native, valid: u32) -> $native {
                let b = valid as $native;
                let v = incoming
                    .wrapping_mul(b)
                    .wrapping_add(Self::identity::<E>().wrapping_mul(b ^ 1));
                match E::KIND {
                    ExtremumKind::Min => current.min(v),
                    ExtremumKind::Max => current.max(v),
                }
            }

            fn to_scalar(value: $native) -> ScalarValue {
                ScalarValue::$variant(value)
            }
        }
    };
}

macro_rules! float_slot {
    ($name:ident, $native:ty, $variant:ident, $slot_name:expr) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name;

        impl PrimitiveSlot for $name {
            type Value = $native;
            type Input<'a> = &'a [$native];

            const NAME: &'static str = $slot_name;

            fn accepts(datatype: &DataType) -> bool {
                matches!(datatype, DataType::$variant)
            }

            fn input(array: &Array) -> Option<(Self::Input<'_>, Option<&Bitmap>)> {
                match array {
                    Array::$variant(arr) => Some((arr.values(), arr.validity())),
                    _ => None,
                }
            }

            #[inline]
            fn identity<E: Extremum>() -> $native {
                bounded_identity::<$native, E>()
            }

            #[inline]
            fn fold<E: Extremum>(current: $native, incoming: $native, valid: u32) -> $native {
                fold_float::<$native, E>(current, incoming, valid)
            }

            fn to_scalar(value: $native) -> ScalarValue {
                ScalarValue::$variant(value)
            }
        }
    };
}

#[inline]
fn fold_float<T: num_traits::Float, E: Extremum>(current: T, incoming: T, valid: u32) -> T {
    if valid != 1 {
        return current;
    }

    // NaN on either side wins, and once a slot is NaN it stays NaN.
    if current.is_nan() || incoming.is_nan() {
        return T::nan();
    }

    match E::KIND {
        ExtremumKind::Min => current.min(incoming),
        ExtremumKind::Max => current.max(incoming),
    }
}

int_slot!(Int32Slot, i32, Int32, "int32");
int_slot!(Int64Slot, i64, Int64, "int64");
float_slot!(Float32Slot, f32, Float32, "float32");
float_slot!(Float64Slot, f64, Float64, "float64");

/// Unscaled decimal values read as doubles.
///
/// The unscaled value is rounded to the nearest f64 first and then divided by
/// `10^scale`, so there are two roundings. For unscaled values above 2^53
/// the result can be one ulp away from the correctly rounded decimal.
#[derive(Debug, Clone, Copy)]
pub struct DecimalAsF64<'a> {
    values: &'a [i128],
    divisor: f64,
}

impl<'a> DecimalAsF64<'a> {
    pub fn new(values: &'a [i128], scale: i8) -> Self {
        DecimalAsF64 {
            values,
            divisor: 10_f64.powi(scale as i32),
        }
    }
}

impl SlotInput<f64> for DecimalAsF64<'_> {
    #[inline]
    fn get(&self, row: usize) -> f64 {
        self.values[row] as f64 / self.divisor
    }
}

/// Decimal inputs accumulated as double approximations.
///
/// Precision past what an f64 mantissa holds is lost. Results are Float64.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decimal128Slot;

impl PrimitiveSlot for Decimal128Slot {
    type Value = f64;
    type Input<'a> = DecimalAsF64<'a>;

    const NAME: &'static str = "decimal128";

    fn accepts(datatype: &DataType) -> bool {
        matches!(datatype, DataType::Decimal128(_))
    }

    fn input(array: &Array) -> Option<(Self::Input<'_>, Option<&Bitmap>)> {
        match array {
            Array::Decimal128(arr) => {
                let primitive = arr.get_primitive();
                Some((
                    DecimalAsF64::new(primitive.values(), arr.scale()),
                    primitive.validity(),
                ))
            }
            _ => None,
        }
    }

    #[inline]
    fn identity<E: Extremum>() -> f64 {
        bounded_identity::<f64, E>()
    }

    #[inline]
    fn fold<E: Extremum>(current: f64, incoming: f64, valid: u32) -> f64 {
        fold_float::<f64, E>(current, incoming, valid)
    }

    fn to_scalar(value: f64) -> ScalarValue {
        ScalarValue::Float64(value)
    }
}

pub type MinInt32Accumulator = PrimitiveAccumulator<Int32Slot, Min>;
pub type MaxInt32Accumulator = PrimitiveAccumulator<Int32Slot, Max>;
pub type MinInt64Accumulator = PrimitiveAccumulator<Int64Slot, Min>;
pub type MaxInt64Accumulator = PrimitiveAccumulator<Int64Slot, Max>;
pub type MinFloat32Accumulator = PrimitiveAccumulator<Float32Slot, Min>;
pub type MaxFloat32Accumulator = PrimitiveAccumulator<Float32Slot, Max>;
pub type MinFloat64Accumulator = PrimitiveAccumulator<Float64Slot, Min>;
pub type MaxFloat64Accumulator = PrimitiveAccumulator<Float64Slot, Max>;
pub type MinDecimal128Accumulator = PrimitiveAccumulator<Decimal128Slot, Min>;
pub type MaxDecimal128Accumulator = PrimitiveAccumulator<Decimal128Slot, Max>;
