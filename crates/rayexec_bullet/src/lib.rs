//! A suspiciously Arrow-like columnar input representation.
//!
//! Only the pieces needed to feed grouped accumulators live here: LSB
//! bitmaps, fixed-width arrays with optional validity, and batches.
pub mod array;
pub mod batch;
pub mod bitmap;
pub mod datatype;
pub mod scalar;
