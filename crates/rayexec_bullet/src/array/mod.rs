pub mod boolean;
pub use boolean::*;
pub mod decimal;
pub use decimal::*;
pub mod primitive;
pub use primitive::*;

use crate::bitmap::Bitmap;
use crate::datatype::{DataType, DecimalTypeMeta};

/// Helper for determining if a value at a given index should be considered
/// valid.
///
/// If the bitmap is None, it's assumed that all values, regardless of the
/// index, are valid.
pub(crate) fn is_valid(validity: Option<&Bitmap>, idx: usize) -> bool {
    validity.map(|bm| bm.value(idx)).unwrap_or(true)
}

#[derive(Debug, PartialEq)]
pub enum Array {
    Null(NullArray),
    Boolean(BooleanArray),
    Int32(Int32Array),
    Int64(Int64Array),
    Float32(Float32Array),
    Float64(Float64Array),
    Decimal128(Decimal128Array),
    IntervalDayTime(IntervalDayTimeArray),
}

impl Array {
    pub fn datatype(&self) -> DataType {
        match self {
            Self::Null(_) => DataType::Null,
            Self::Boolean(_) => DataType::Boolean,
            Self::Int32(_) => DataType::Int32,
            Self::Int64(_) => DataType::Int64,
            Self::Float32(_) => DataType::Float32,
            Self::Float64(_) => DataType::Float64,
            Self::Decimal128(arr) => {
                DataType::Decimal128(DecimalTypeMeta::new(arr.precision(), arr.scale()))
            }
            Self::IntervalDayTime(_) => DataType::IntervalDayTime,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Null(arr) => arr.len(),
            Self::Boolean(arr) => arr.len(),
            Self::Int32(arr) => arr.len(),
            Self::Int64(arr) => arr.len(),
            Self::Float32(arr) => arr.len(),
            Self::Float64(arr) => arr.len(),
            Self::Decimal128(arr) => arr.get_primitive().len(),
            Self::IntervalDayTime(arr) => arr.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the validity bitmap for the array, if any.
    ///
    /// Null arrays have no bitmap but report every row as invalid through
    /// `is_valid`.
    pub fn validity(&self) -> Option<&Bitmap> {
        match self {
            Self::Null(_) => None,
            Self::Boolean(arr) => arr.validity(),
            Self::Int32(arr) => arr.validity(),
            Self::Int64(arr) => arr.validity(),
            Self::Float32(arr) => arr.validity(),
            Self::Float64(arr) => arr.validity(),
            Self::Decimal128(arr) => arr.get_primitive().validity(),
            Self::IntervalDayTime(arr) => arr.validity(),
        }
    }

    pub fn is_valid(&self, idx: usize) -> Option<bool> {
        match self {
            Self::Null(arr) => arr.is_valid(idx),
            Self::Boolean(arr) => arr.is_valid(idx),
            Self::Int32(arr) => arr.is_valid(idx),
            Self::Int64(arr) => arr.is_valid(idx),
            Self::Float32(arr) => arr.is_valid(idx),
            Self::Float64(arr) => arr.is_valid(idx),
            Self::Decimal128(arr) => arr.get_primitive().is_valid(idx),
            Self::IntervalDayTime(arr) => arr.is_valid(idx),
        }
    }
}

/// A logical array for representing some number of Nulls.
#[derive(Debug, PartialEq)]
pub struct NullArray {
    len: usize,
}

impl NullArray {
    pub fn new(len: usize) -> Self {
        NullArray { len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_valid(&self, idx: usize) -> Option<bool> {
        if idx >= self.len {
            return None;
        }
        Some(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::interval::IntervalDayTime;

    #[test]
    fn is_valid_respects_validity() {
        let arr = Array::Int32(Int32Array::from_iter([Some(1), None, Some(3)]));

        assert_eq!(Some(true), arr.is_valid(0));
        assert_eq!(Some(false), arr.is_valid(1));
        assert_eq!(None, arr.is_valid(3));
        assert_eq!(3, arr.validity().unwrap().len());
    }

    #[test]
    fn decimal_datatype_carries_meta() {
        let arr = Array::Decimal128(Decimal128Array::new(
            18,
            2,
            PrimitiveArray::from_iter([150_i128, -25]),
        ));

        assert_eq!(
            DataType::Decimal128(DecimalTypeMeta::new(18, 2)),
            arr.datatype()
        );
        assert_eq!(2, arr.len());
        assert!(arr.validity().is_none());
    }

    #[test]
    fn interval_datatype() {
        let arr = Array::IntervalDayTime(IntervalDayTimeArray::from_iter([
            IntervalDayTime::new(1, 20),
        ]));
        assert_eq!(DataType::IntervalDayTime, arr.datatype());
        assert_eq!(Some(true), arr.is_valid(0));
    }

    #[test]
    fn null_array_all_invalid() {
        let arr = Array::Null(NullArray::new(2));
        assert_eq!(Some(false), arr.is_valid(1));
        assert_eq!(None, arr.is_valid(2));
        assert!(arr.validity().is_none());
    }
}
