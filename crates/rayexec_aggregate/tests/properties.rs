use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayexec_aggregate::kernel::boolean::MinBooleanAccumulator;
use rayexec_aggregate::kernel::numeric::MinInt64Accumulator;
use rayexec_aggregate::{
    new_grouped_accumulator, ChunkLayout, ExtremumKind, GroupedAccumulator, MemoryTracker,
};
use rayexec_bullet::array::{
    Array, BooleanArray, Decimal128Array, Float32Array, Float64Array, Int32Array, Int64Array,
    IntervalDayTimeArray,
};
use rayexec_bullet::datatype::{DataType, DecimalTypeMeta};
use rayexec_bullet::scalar::interval::IntervalDayTime;
use rayexec_bullet::scalar::ScalarValue;
use similar_asserts::assert_eq;

const NUM_GROUPS: u32 = 100;
const NUM_ROWS: usize = 500;

fn layout() -> ChunkLayout {
    ChunkLayout::try_new(5).unwrap()
}

/// Create an accumulator with every group's chunk allocated.
fn new_acc(kind: ExtremumKind, datatype: DataType) -> Box<dyn GroupedAccumulator> {
    let mut acc =
        new_grouped_accumulator(kind, datatype, layout(), &MemoryTracker::new_unlimited())
            .unwrap();
    acc.resize(layout().chunks_for_groups(NUM_GROUPS as usize))
        .unwrap();
    acc
}

/// A row of input, the value is None for null rows.
#[derive(Debug, Clone, Copy)]
struct Row<T> {
    ordinal: u32,
    value: Option<T>,
}

fn gen_rows<T>(rng: &mut StdRng, mut gen_value: impl FnMut(&mut StdRng) -> T) -> Vec<Row<T>> {
    (0..NUM_ROWS)
        .map(|_| {
            let ordinal = rng.gen_range(0..NUM_GROUPS);
            let value = if rng.gen_bool(0.2) {
                None
            } else {
                Some(gen_value(rng))
            };
            Row { ordinal, value }
        })
        .collect()
}

/// Accumulate rows in batches of `batch_size`, returning the scalar for every
/// group.
///
/// Scalars are returned in their debug form since NaN results never compare
/// equal to themselves.
fn run<T: Copy>(
    acc: &mut dyn GroupedAccumulator,
    rows: &[Row<T>],
    batch_size: usize,
    to_array: impl Fn(Vec<Option<T>>) -> Array,
) -> Vec<String> {
    for batch in rows.chunks(batch_size) {
        let ordinals: Vec<_> = batch.iter().map(|r| r.ordinal).collect();
        let input = to_array(batch.iter().map(|r| r.value).collect());
        acc.accumulate(&input, &ordinals).unwrap();
    }

    (0..NUM_GROUPS)
        .map(|o| format!("{:?}", acc.scalar(o).unwrap()))
        .collect()
}

fn check_order_independent<T: Copy>(
    datatype: DataType,
    rows: Vec<Row<T>>,
    to_array: impl Fn(Vec<Option<T>>) -> Array + Copy,
) {
    for kind in [ExtremumKind::Min, ExtremumKind::Max] {
        let mut acc = new_acc(kind, datatype);
        let expected = run(&mut *acc, &rows, NUM_ROWS, to_array);

        let mut rows = rows.clone();
        for seed in 0..5 {
            let mut rng = StdRng::seed_from_u64(seed);
            rows.shuffle(&mut rng);

            let mut acc = new_acc(kind, datatype);
            let got = run(&mut *acc, &rows, 7 + seed as usize * 31, to_array);
            assert_eq!(expected, got, "kind: {kind:?}, seed: {seed}");
        }
    }
}

#[test]
fn order_independent_int64() {
    let _ = logutil::configure_test_logger();
    let mut rng = StdRng::seed_from_u64(42);
    let rows = gen_rows(&mut rng, |rng| rng.gen_range(-1000_i64..1000));

    check_order_independent(DataType::Int64, rows, |vals| {
        Array::Int64(Int64Array::from_iter(vals))
    });
}

#[test]
fn order_independent_int32() {
    let mut rng = StdRng::seed_from_u64(46);
    let rows = gen_rows(&mut rng, |rng| rng.gen_range(i32::MIN..=i32::MAX));

    check_order_independent(DataType::Int32, rows, |vals| {
        Array::Int32(Int32Array::from_iter(vals))
    });
}

#[test]
fn order_independent_float32() {
    let mut rng = StdRng::seed_from_u64(47);
    let rows = gen_rows(&mut rng, |rng| {
        if rng.gen_bool(0.02) {
            f32::NAN
        } else {
            rng.gen_range(-50.0_f32..50.0)
        }
    });

    check_order_independent(DataType::Float32, rows, |vals| {
        Array::Float32(Float32Array::from_iter(vals))
    });
}

#[test]
fn order_independent_float64() {
    let mut rng = StdRng::seed_from_u64(43);
    let rows = gen_rows(&mut rng, |rng| {
        if rng.gen_bool(0.02) {
            f64::NAN
        } else {
            rng.gen_range(-50.0_f64..50.0)
        }
    });

    check_order_independent(DataType::Float64, rows, |vals| {
        Array::Float64(Float64Array::from_iter(vals))
    });
}

#[test]
fn float_nan_groups_are_nan() {
    let mut rng = StdRng::seed_from_u64(48);
    let rows = gen_rows(&mut rng, |rng| {
        if rng.gen_bool(0.05) {
            f64::NAN
        } else {
            rng.gen_range(-50.0_f64..50.0)
        }
    });

    for kind in [ExtremumKind::Min, ExtremumKind::Max] {
        let mut acc = new_acc(kind, DataType::Float64);
        let ordinals: Vec<_> = rows.iter().map(|r| r.ordinal).collect();
        let input = Array::Float64(Float64Array::from_iter(rows.iter().map(|r| r.value)));
        acc.accumulate(&input, &ordinals).unwrap();

        for ordinal in 0..NUM_GROUPS {
            let has_nan = rows
                .iter()
                .any(|r| r.ordinal == ordinal && r.value.is_some_and(f64::is_nan));
            match acc.scalar(ordinal).unwrap() {
                ScalarValue::Float64(v) => assert_eq!(has_nan, v.is_nan(), "ordinal: {ordinal}"),
                ScalarValue::Null => assert!(!has_nan),
                other => panic!("unexpected scalar: {other:?}"),
            }
        }
    }
}

#[test]
fn order_independent_decimal128() {
    let mut rng = StdRng::seed_from_u64(49);
    let rows = gen_rows(&mut rng, |rng| rng.gen_range(-1_000_000_i128..1_000_000));

    check_order_independent(
        DataType::Decimal128(DecimalTypeMeta::new(18, 2)),
        rows,
        |vals| Array::Decimal128(Decimal128Array::new(18, 2, vals.into_iter().collect())),
    );
}

#[test]
fn order_independent_boolean() {
    let mut rng = StdRng::seed_from_u64(44);
    // Mostly true so some groups stay true under MIN.
    let rows = gen_rows(&mut rng, |rng| rng.gen_bool(0.9));

    check_order_independent(DataType::Boolean, rows, |vals| {
        Array::Boolean(BooleanArray::from_iter(vals))
    });
}

#[test]
fn order_independent_interval() {
    let mut rng = StdRng::seed_from_u64(45);
    let rows = gen_rows(&mut rng, |rng| {
        IntervalDayTime::new(rng.gen_range(-3..3), rng.gen_range(-100_000..100_000))
    });

    check_order_independent(DataType::IntervalDayTime, rows, |vals| {
        Array::IntervalDayTime(IntervalDayTimeArray::from_iter(vals))
    });
}

#[test]
fn untouched_slots_hold_identity() {
    let mut acc = MinInt64Accumulator::try_new(
        DataType::Int64,
        layout(),
        MemoryTracker::new_unlimited(),
    )
    .unwrap();

    // Only even ordinals are ever targeted.
    let ordinals: Vec<u32> = (0..64).map(|o| o * 2).collect();
    let input = Array::Int64(Int64Array::from_iter(ordinals.iter().map(|o| *o as i64)));
    acc.accumulate(&input, &ordinals).unwrap();

    assert_eq!(4, acc.num_chunks());
    for ordinal in (1..128).step_by(2) {
        let addr = layout().address(ordinal);
        assert_eq!(
            i64::MAX,
            acc.value_chunk(addr.chunk_idx).unwrap()[addr.chunk_offset]
        );
        assert!(!acc.is_valid(ordinal));
    }
    for chunk_idx in 0..4 {
        assert_eq!(
            &[0x5555_5555_u32][..],
            acc.validity_chunk(chunk_idx).unwrap()
        );
    }
}

#[test]
fn validity_is_monotonic() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut acc = new_acc(ExtremumKind::Max, DataType::Int64);

    let ordinals: Vec<u32> = (0..200).map(|_| rng.gen_range(0..NUM_GROUPS)).collect();
    let values: Vec<_> = (0..200)
        .map(|_| rng.gen_bool(0.5).then(|| rng.gen_range(0_i64..10)))
        .collect();
    acc.accumulate(&Array::Int64(Int64Array::from_iter(values)), &ordinals)
        .unwrap();

    let before: Vec<bool> = (0..NUM_GROUPS).map(|o| acc.is_valid(o)).collect();

    // All-null batches over every group.
    let all: Vec<u32> = (0..NUM_GROUPS).collect();
    let nulls = Array::Int64(Int64Array::from_iter(all.iter().map(|_| None::<i64>)));
    acc.accumulate(&nulls, &all).unwrap();

    let after: Vec<bool> = (0..NUM_GROUPS).map(|o| acc.is_valid(o)).collect();
    assert_eq!(before, after);

    // Valid values only ever add bits.
    let ones = Array::Int64(Int64Array::from_iter(all.iter().map(|_| 1_i64)));
    acc.accumulate(&ones, &all).unwrap();
    assert!((0..NUM_GROUPS).all(|o| acc.is_valid(o)));
}

#[test]
fn reset_is_idempotent() {
    let mut acc = MinBooleanAccumulator::try_new(
        DataType::Boolean,
        layout(),
        MemoryTracker::new_unlimited(),
    )
    .unwrap();

    let input = Array::Boolean(BooleanArray::from_iter([false, true, false]));
    acc.accumulate(&input, &[3, 40, 90]).unwrap();
    let num_chunks = acc.num_chunks();

    let snapshot = |acc: &MinBooleanAccumulator| {
        (0..num_chunks)
            .map(|idx| {
                (
                    acc.value_chunk(idx).unwrap().to_vec(),
                    acc.validity_chunk(idx).unwrap().to_vec(),
                )
            })
            .collect::<Vec<_>>()
    };

    acc.reset();
    let once = snapshot(&acc);
    acc.reset();
    let twice = snapshot(&acc);

    assert_eq!(once, twice);
    assert_eq!(num_chunks, acc.num_chunks());
    for (values, validity) in once {
        assert!(values.iter().all(|w| *w == u32::MAX));
        assert!(validity.iter().all(|w| *w == 0));
    }
}
