use bytes::Bytes;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use oscwire::{Argument, Bundle, DecodeConfig, Message, Packet, TimeTag, decode_with, encode};

fn control_message() -> Packet {
    Packet::from(
        Message::new("/mixer/channel/3/fader")
            .arg(0.75_f32)
            .arg(3_i32)
            .arg("main")
            .arg(true),
    )
}

fn blob_message(size: usize) -> Packet {
    Packet::from(Message::new("/data").arg(vec![0u8; size]))
}

fn bundle_of(count: usize) -> Packet {
    let mut bundle = Bundle::new(TimeTag::new(3_900_000_000, 0));
    for i in 0..count {
        bundle.push(
            Message::new(format!("/voice/{i}/freq"))
                .arg(440.0_f32)
                .arg(vec![Argument::Int32(1), Argument::Float64(0.5)]),
        );
    }
    Packet::from(bundle)
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    let control = control_message();
    group.bench_function("encode_control", |b| {
        b.iter(|| {
            black_box(encode(&control).unwrap());
        });
    });

    for size in [64, 1024, 64 * 1024] {
        let packet = blob_message(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("encode_blob", size), &packet, |b, p| {
            b.iter(|| {
                black_box(encode(p).unwrap());
            });
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let config = DecodeConfig::default();

    let control: Bytes = encode(&control_message()).unwrap();
    group.bench_function("decode_control", |b| {
        b.iter(|| {
            black_box(decode_with(control.clone(), &config).unwrap());
        });
    });

    for size in [64, 1024, 64 * 1024] {
        let encoded = encode(&blob_message(size)).unwrap();
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("decode_blob", size), &encoded, |b, e| {
            b.iter(|| {
                black_box(decode_with(e.clone(), &config).unwrap());
            });
        });
    }

    group.finish();
}

fn bench_bundle(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let config = DecodeConfig::default();

    for count in [4, 64] {
        let packet = bundle_of(count);
        group.bench_with_input(BenchmarkId::new("roundtrip_bundle", count), &packet, |b, p| {
            b.iter(|| {
                let encoded = encode(p).unwrap();
                black_box(decode_with(encoded, &config).unwrap());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_bundle);
criterion_main!(benches);
