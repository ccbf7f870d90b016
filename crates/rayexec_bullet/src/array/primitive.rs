use crate::bitmap::Bitmap;
use crate::scalar::interval::IntervalDayTime;

use super::is_valid;

/// Array for storing primitive values.
#[derive(Debug, PartialEq)]
pub struct PrimitiveArray<T> {
    /// Validity bitmap.
    ///
    /// "True" values indicate the value at index is valid, "false" indicates
    /// null.
    validity: Option<Bitmap>,

    /// Underlying primitive values.
    values: Vec<T>,
}

pub type Int32Array = PrimitiveArray<i32>;
pub type Int64Array = PrimitiveArray<i64>;
pub type Float32Array = PrimitiveArray<f32>;
pub type Float64Array = PrimitiveArray<f64>;
pub type IntervalDayTimeArray = PrimitiveArray<IntervalDayTime>;

impl<T> PrimitiveArray<T> {
    /// Create a new array.
    ///
    /// If a validity bitmap is provided, it must be the same length as the
    /// values.
    pub fn new(values: Vec<T>, validity: Option<Bitmap>) -> Self {
        if let Some(validity) = &validity {
            assert_eq!(validity.len(), values.len());
        }
        PrimitiveArray { values, validity }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the validity at the given index.
    pub fn is_valid(&self, idx: usize) -> Option<bool> {
        if idx >= self.len() {
            return None;
        }

        Some(is_valid(self.validity.as_ref(), idx))
    }

    /// Get a reference to the underlying validity bitmap.
    pub fn validity(&self) -> Option<&Bitmap> {
        self.validity.as_ref()
    }

    /// Get a reference to the underlying primitive values.
    pub fn values(&self) -> &[T] {
        &self.values
    }
}

impl<A> FromIterator<A> for PrimitiveArray<A> {
    fn from_iter<T: IntoIterator<Item = A>>(iter: T) -> Self {
        PrimitiveArray {
            validity: None,
            values: iter.into_iter().collect(),
        }
    }
}

impl<A: Default> FromIterator<Option<A>> for PrimitiveArray<A> {
    fn from_iter<T: IntoIterator<Item = Option<A>>>(iter: T) -> Self {
        let mut validity = Bitmap::default();
        let mut values = Vec::new();

        for item in iter {
            match item {
                Some(value) => {
                    validity.push(true);
                    values.push(value);
                }
                None => {
                    validity.push(false);
                    values.push(A::default());
                }
            }
        }

        PrimitiveArray {
            validity: Some(validity),
            values,
        }
    }
}

impl<T> From<Vec<T>> for PrimitiveArray<T> {
    fn from(value: Vec<T>) -> Self {
        PrimitiveArray {
            values: value,
            validity: None,
        }
    }
}
