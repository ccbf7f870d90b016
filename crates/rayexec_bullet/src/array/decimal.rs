use super::PrimitiveArray;

/// Array of 128-bit fixed-point decimals.
///
/// Values are stored unscaled, e.g. `1.50` with scale 2 is stored as `150`.
#[derive(Debug, PartialEq)]
pub struct Decimal128Array {
    precision: u8,
    scale: i8,
    array: PrimitiveArray<i128>,
}

impl Decimal128Array {
    pub fn new(precision: u8, scale: i8, array: PrimitiveArray<i128>) -> Self {
        Decimal128Array {
            precision,
            scale,
            array,
        }
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn scale(&self) -> i8 {
        self.scale
    }

    pub fn get_primitive(&self) -> &PrimitiveArray<i128> {
        &self.array
    }
}
