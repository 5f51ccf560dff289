use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hammer::ecc::{
    simulate, BinaryMatrix, ErrorCorrection, ErrorPolicy, ExtendedHamming, SimulationConfig,
};

fn bench_codewords(c: &mut Criterion) {
    let code = ExtendedHamming::new();
    let mut group = c.benchmark_group("codeword");

    group.bench_function("encode_nibble", |b| {
        b.iter(|| code.encode_nibble(black_box(0b1011)))
    });

    let codeword = code.encode_nibble(0b1011).unwrap();
    group.bench_function("correct_clean", |b| {
        b.iter(|| code.correct(black_box(codeword)))
    });
    group.bench_function("correct_single_error", |b| {
        b.iter(|| code.correct(black_box(codeword ^ 0b0001_0000)))
    });

    group.finish();
}

fn bench_matrix_multiply(c: &mut Criterion) {
    let vector = BinaryMatrix::row_vector(&[1, 0, 1, 1, 0, 1, 0, 0]).unwrap();
    let square = BinaryMatrix::from_rows(&[
        [1, 0, 0, 0, 0, 1, 1, 1],
        [0, 1, 0, 0, 1, 0, 1, 1],
        [0, 0, 1, 0, 1, 1, 0, 1],
        [0, 0, 0, 1, 1, 1, 1, 0],
        [0, 1, 1, 1, 1, 0, 0, 0],
        [1, 0, 1, 1, 0, 1, 0, 0],
        [1, 1, 0, 1, 0, 0, 1, 0],
        [1, 1, 1, 0, 0, 0, 0, 1],
    ])
    .unwrap();

    c.bench_function("matrix_multiply_1x8_8x8", |b| {
        b.iter(|| black_box(&vector).multiply(black_box(&square)))
    });
}

fn bench_buffers(c: &mut Criterion) {
    let code = ExtendedHamming::new();
    let mut group = c.benchmark_group("buffer");

    for size in [64usize, 1024, 16 * 1024].iter() {
        let data: Vec<u8> = (0..*size).map(|i| i as u8).collect();
        let encoded = code.encode(&data).unwrap();

        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::new("encode", size), &data, |b, data| {
            b.iter(|| code.encode(black_box(data)))
        });
        group.bench_with_input(BenchmarkId::new("decode", size), &encoded, |b, encoded| {
            b.iter(|| code.decode(black_box(encoded)))
        });
    }

    group.finish();
}

fn bench_simulation(c: &mut Criterion) {
    let code = ExtendedHamming::new();
    let config = SimulationConfig {
        trials: 100_000,
        policy: ErrorPolicy::Normal,
        seed: 1,
    };

    c.bench_function("simulate_100k_normal", |b| {
        b.iter(|| simulate(&code, black_box(&config)))
    });
}

criterion_group!(
    benches,
    bench_codewords,
    bench_matrix_multiply,
    bench_buffers,
    bench_simulation
);
criterion_main!(benches);
