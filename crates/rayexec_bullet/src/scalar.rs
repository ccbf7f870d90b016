pub mod interval;

use std::fmt;

use interval::IntervalDayTime;

/// A single scalar value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarValue {
    /// Represents `DataType::Null` (castable to/from any other type)
    Null,

    /// True or false value
    Boolean(bool),

    /// 32bit float
    Float32(f32),

    /// 64bit float
    Float64(f64),

    /// Signed 32bit int
    Int32(i32),

    /// Signed 64bit int
    Int64(i64),

    /// Day/millisecond interval.
    IntervalDayTime(IntervalDayTime),
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Float32(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::IntervalDayTime(v) => write!(f, "{v}"),
        }
    }
}
