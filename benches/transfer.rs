use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use streamify::{pump, RangedReader, ThresholdWriter, TransferRange};

const SOURCE_LEN: usize = 4 * 1024 * 1024;

fn bench_chunk_sizes(c: &mut Criterion) {
    let data: Vec<u8> = (0..SOURCE_LEN).map(|i| (i % 251) as u8).collect();
    let mut group = c.benchmark_group("pump_full");
    group.throughput(Throughput::Bytes(SOURCE_LEN as u64));

    for chunk_size in [512usize, 4 * 1024, 64 * 1024, 1024 * 1024] {
        group.bench_with_input(
            BenchmarkId::from_parameter(chunk_size),
            &chunk_size,
            |b, &chunk_size| {
                b.iter(|| {
                    let mut reader =
                        RangedReader::from_handle("src", Cursor::new(&data), None, chunk_size)
                            .unwrap();
                    let mut writer =
                        ThresholdWriter::from_handle("dst", Vec::with_capacity(SOURCE_LEN), chunk_size)
                            .unwrap();
                    black_box(pump(&mut reader, &mut writer).unwrap())
                })
            },
        );
    }
    group.finish();
}

fn bench_range(c: &mut Criterion) {
    let data: Vec<u8> = vec![7u8; SOURCE_LEN];
    let range = TransferRange::new(1024, (SOURCE_LEN / 2) as u64).unwrap();

    c.bench_function("pump_range_64k", |b| {
        b.iter(|| {
            let mut reader =
                RangedReader::from_handle("src", Cursor::new(&data), Some(range), 64 * 1024)
                    .unwrap();
            let mut writer = ThresholdWriter::from_handle("dst", Vec::new(), 64 * 1024).unwrap();
            black_box(pump(&mut reader, &mut writer).unwrap())
        })
    });
}

criterion_group!(benches, bench_chunk_sizes, bench_range);
criterion_main!(benches);
