use crate::bitmap::Bitmap;

use super::is_valid;

/// A logical array for representing bools.
#[derive(Debug, PartialEq)]
pub struct BooleanArray {
    validity: Option<Bitmap>,
    values: Bitmap,
}

impl BooleanArray {
    pub fn new(values: Bitmap, validity: Option<Bitmap>) -> Self {
        if let Some(validity) = &validity {
            assert_eq!(validity.len(), values.len());
        }
        BooleanArray { validity, values }
    }

    pub fn new_with_values(values: Bitmap) -> Self {
        BooleanArray {
            validity: None,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_valid(&self, idx: usize) -> Option<bool> {
        if idx >= self.len() {
            return None;
        }

        Some(is_valid(self.validity.as_ref(), idx))
    }

    pub fn validity(&self) -> Option<&Bitmap> {
        self.validity.as_ref()
    }

    pub fn values(&self) -> &Bitmap {
        &self.values
    }
}

impl FromIterator<bool> for BooleanArray {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        Self::new_with_values(Bitmap::from_iter(iter))
    }
}

impl FromIterator<Option<bool>> for BooleanArray {
    fn from_iter<T: IntoIterator<Item = Option<bool>>>(iter: T) -> Self {
        let mut validity = Bitmap::default();
        let mut bools = Bitmap::default();

        for item in iter {
            match item {
                Some(value) => {
                    validity.push(true);
                    bools.push(value);
                }
                None => {
                    validity.push(false);
                    bools.push(false);
                }
            }
        }

        BooleanArray {
            validity: Some(validity),
            values: bools,
        }
    }
}
