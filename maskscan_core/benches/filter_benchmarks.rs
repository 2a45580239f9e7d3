use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

use maskscan_core::{
    Backend, FilterParams,
    configuration::Configuration,
    core::{
        generate::generate_lineitem,
        kernel::{filter_rows_scalar, filter_with_backend},
        mask::selected_positions,
        parallel::filter_parallel,
    },
};

const ROWS: usize = 1024 * 1024;

// Short-circuit baseline; the branchy form the kernel avoids.
#[allow(clippy::needless_range_loop)]
fn filter_rows_branchy(
    ship_date: &[i32],
    discount: &[i32],
    quantity: &[i32],
    p: &FilterParams,
    result: &mut [u8],
) {
    for i in 0..result.len() {
        let d = ship_date[i];
        let x = i64::from(discount[i]);
        result[i] = (d >= p.min_date
            && d < p.max_date
            && x >= p.min_discount
            && x < p.max_discount
            && i64::from(quantity[i]) < p.max_quantity) as u8;
    }
}

fn criterion_benchmark_filter(c: &mut Criterion) {
    let columns = generate_lineitem(ROWS, 1);
    let view = columns.as_columns();
    let params = FilterParams::tpch_q6();
    let mut mask = vec![0u8; ROWS];

    let mut group = c.benchmark_group("lineitem_filter");
    group.throughput(Throughput::Elements(ROWS as u64));

    group.bench_function("branchy", |b| {
        b.iter(|| {
            filter_rows_branchy(
                black_box(&columns.ship_date),
                black_box(&columns.discount),
                black_box(&columns.quantity),
                black_box(&params),
                black_box(&mut mask),
            )
        })
    });

    group.bench_function("scalar_branchless", |b| {
        b.iter(|| {
            filter_rows_scalar(
                black_box(&columns.ship_date),
                black_box(&columns.discount),
                black_box(&columns.quantity),
                black_box(&params),
                black_box(&mut mask),
            )
        })
    });

    for backend in Backend::available() {
        group.bench_function(format!("backend_{}", backend.name()), |b| {
            b.iter(|| {
                filter_with_backend(backend, ROWS, black_box(&view), black_box(&params), black_box(&mut mask))
                    .unwrap()
            })
        });
    }

    let config = Configuration {
        min_parallel_rows: Some(0),
        ..Default::default()
    };
    group.bench_function("parallel", |b| {
        b.iter(|| {
            filter_parallel(ROWS, black_box(&view), black_box(&params), black_box(&mut mask), &config).unwrap()
        })
    });

    group.finish();
}

fn criterion_benchmark_dense_to_sparse(c: &mut Criterion) {
    let columns = generate_lineitem(ROWS, 2);
    let mut mask = vec![0u8; ROWS];
    filter_with_backend(
        Backend::detect(),
        ROWS,
        &columns.as_columns(),
        &FilterParams::tpch_q6(),
        &mut mask,
    )
    .unwrap();

    c.bench_function("selected_positions", |b| {
        b.iter(|| selected_positions(black_box(&mask)).unwrap())
    });
}

criterion_group!(benches, criterion_benchmark_filter, criterion_benchmark_dense_to_sparse);
criterion_main!(benches);
