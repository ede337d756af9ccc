use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pcapng_decode::{parse_block_le, EnhancedPacketBlock, PcapNGReader};
use std::fs;
use std::io::Cursor;

fn bench_parse_blocks(c: &mut Criterion) {
    let bytes = fs::read("assets/sample-le.pcapng").unwrap();
    c.bench_function("parse_block_le sample-le", |b| {
        b.iter(|| {
            let mut i = &bytes[..];
            let mut num_blocks = 0;
            while !i.is_empty() {
                let (rem, _block) = parse_block_le(i).unwrap();
                i = rem;
                num_blocks += 1;
            }
            num_blocks
        })
    });
}

fn do_all_blocks(bytes: &[u8], buffer_size: usize) {
    let mut reader = PcapNGReader::new(buffer_size, Cursor::new(bytes)).expect("PcapNGReader");
    let num_blocks = reader.all_blocks().filter(|b| b.is_ok()).count();
    assert_eq!(num_blocks, 11);
}

fn do_skip_scan(bytes: &[u8], buffer_size: usize) {
    let mut reader = PcapNGReader::new(buffer_size, Cursor::new(bytes)).expect("PcapNGReader");
    let num_blocks = reader
        .blocks_of_type::<EnhancedPacketBlock>()
        .filter(|b| b.is_ok())
        .count();
    assert_eq!(num_blocks, 4);
}

fn bench_reader(c: &mut Criterion) {
    let bytes = fs::read("assets/sample-le.pcapng").unwrap();
    c.bench_function("all_blocks sample-le", |b| {
        b.iter(|| do_all_blocks(&bytes, 65536))
    });
    c.bench_function("blocks_of_type sample-le", |b| {
        b.iter(|| do_skip_scan(&bytes, 65536))
    });
}

fn bench_reader_buffer_size(c: &mut Criterion) {
    let bytes = fs::read("assets/sample-le.pcapng").unwrap();
    let mut group = c.benchmark_group("all_blocks buffer_size");
    for buffer_size in [64usize, 256, 1024, 4096].iter() {
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(buffer_size),
            buffer_size,
            |b, &size| b.iter(|| do_all_blocks(&bytes, size)),
        );
    }
}

criterion_group!(
    benches,
    bench_parse_blocks,
    bench_reader,
    bench_reader_buffer_size
);
criterion_main!(benches);
