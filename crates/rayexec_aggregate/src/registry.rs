use std::sync::Arc;

use rayexec_bullet::datatype::DataType;
use rayexec_error::{RayexecError, Result};

use crate::kernel::boolean::BooleanAccumulator;
use crate::kernel::interval::IntervalDayTimeSlot;
use crate::kernel::numeric::{Decimal128Slot, Float32Slot, Float64Slot, Int32Slot, Int64Slot};
use crate::kernel::primitive::PrimitiveAccumulator;
use crate::kernel::{Extremum, ExtremumKind, GroupedAccumulator, Max, Min};
use crate::layout::ChunkLayout;
use crate::memory::MemoryTracker;

/// Create the accumulator for an input type.
///
/// Each supported type maps to exactly one kernel. Errors for types without
/// a MIN/MAX kernel.
pub fn new_grouped_accumulator(
    kind: ExtremumKind,
    datatype: DataType,
    layout: ChunkLayout,
    memory: &Arc<MemoryTracker>,
) -> Result<Box<dyn GroupedAccumulator>> {
    match kind {
        ExtremumKind::Min => new_for_extremum::<Min>(datatype, layout, memory),
        ExtremumKind::Max => new_for_extremum::<Max>(datatype, layout, memory),
    }
}

fn new_for_extremum<E: Extremum>(
    datatype: DataType,
    layout: ChunkLayout,
    memory: &Arc<MemoryTracker>,
) -> Result<Box<dyn GroupedAccumulator>> {
    let memory = memory.clone();
    let acc: Box<dyn GroupedAccumulator> = match datatype {
        DataType::Boolean => Box::new(BooleanAccumulator::<E>::try_new(datatype, layout, memory)?),
        DataType::Int32 => Box::new(PrimitiveAccumulator::<Int32Slot, E>::try_new(
            datatype, layout, memory,
        )?),
        DataType::Int64 => Box::new(PrimitiveAccumulator::<Int64Slot, E>::try_new(
            datatype, layout, memory,
        )?),
        DataType::Float32 => Box::new(PrimitiveAccumulator::<Float32Slot, E>::try_new(
            datatype, layout, memory,
        )?),
        DataType::Float64 => Box::new(PrimitiveAccumulator::<Float64Slot, E>::try_new(
            datatype, layout, memory,
        )?),
        DataType::Decimal128(_) => Box::new(PrimitiveAccumulator::<Decimal128Slot, E>::try_new(
            datatype, layout, memory,
        )?),
        DataType::IntervalDayTime => Box::new(
            PrimitiveAccumulator::<IntervalDayTimeSlot, E>::try_new(datatype, layout, memory)?,
        ),
        other => {
            return Err(RayexecError::new(format!(
                "No {} accumulator for {other}",
                E::KIND.name()
            )))
        }
    };

    Ok(acc)
}
