use std::fmt::Write;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use f64conv::{parse_number_f64, render_number_f64, Buffer, ParseOptions, RenderOptions};
use rand::{random, thread_rng, Rng};

/// Random finite `f64`s, roughly uniform over their bit patterns.
fn finite_f64s(n: usize) -> Vec<f64> {
    let mut rng = thread_rng();
    (0..n)
        .map(|_| f64::from_bits(rng.gen_range(0..0x7FF0_0000_0000_0000)))
        .collect()
}

fn bench_parse(c: &mut Criterion) {
    let short: Vec<String> = (0..1 << 12)
        .map(|_| format!("{}", random::<f64>() * 1e6))
        .collect();
    let shortest: Vec<String> = finite_f64s(1 << 12)
        .into_iter()
        .map(|x| format!("{x:e}"))
        .collect();
    // Too many digits for the fast path.
    let long: Vec<String> = finite_f64s(1 << 10)
        .into_iter()
        .map(|x| format!("{x:.40e}"))
        .collect();

    for (name, data) in [("short", &short), ("shortest", &shortest), ("long", &long)] {
        let mut group = c.benchmark_group(format!("parse/{name}"));
        group.bench_function("rust", |b| {
            let mut i = 0;
            b.iter(|| {
                let s = &data[i % data.len()];
                black_box(parse_number_f64(black_box(s.as_bytes()), ParseOptions::empty()))
                    .unwrap();
                i += 1;
            });
        });
        group.bench_function("core", |b| {
            let mut i = 0;
            b.iter(|| {
                let s = &data[i % data.len()];
                black_box(black_box(s.as_str()).parse::<f64>()).unwrap();
                i += 1;
            });
        });
        group.finish();
    }
}

fn bench_render(c: &mut Criterion) {
    let data = finite_f64s(1 << 12);

    let tests = [
        ("shortest", 0, RenderOptions::JUST_ENOUGH_PRECISION),
        ("fixed/6", 6, RenderOptions::EXPONENT_ABSENT),
        ("exp/17", 17, RenderOptions::EXPONENT_PRESENT),
    ];
    for (name, precision, options) in tests {
        let mut group = c.benchmark_group(format!("render/{name}"));
        group.bench_function("rust", |b| {
            let mut buf = Buffer::new();
            let mut i = 0;
            b.iter(|| {
                let x = data[i % data.len()];
                black_box(buf.format(black_box(x), precision, options));
                i += 1;
            });
        });
        group.bench_function("core", |b| {
            let mut s = String::with_capacity(512);
            let p = precision as usize;
            let mut i = 0;
            b.iter(|| {
                let x = black_box(data[i % data.len()]);
                s.clear();
                let _ = if options.contains(RenderOptions::JUST_ENOUGH_PRECISION) {
                    write!(s, "{x:e}")
                } else if options.contains(RenderOptions::EXPONENT_PRESENT) {
                    write!(s, "{x:.p$e}")
                } else {
                    write!(s, "{x:.p$}")
                };
                black_box(&s);
                i += 1;
            });
        });
        group.finish();
    }

    let mut group = c.benchmark_group("render/slice");
    group.bench_function("align_right", |b| {
        let mut buf = [0u8; 32];
        let mut i = 0;
        b.iter(|| {
            let x = data[i % data.len()];
            black_box(render_number_f64(
                &mut buf,
                black_box(x),
                6,
                RenderOptions::JUST_ENOUGH_PRECISION | RenderOptions::ALIGN_RIGHT,
            ));
            i += 1;
        });
    });
    group.finish();
}

criterion_group!(benches, bench_parse, bench_render);
criterion_main!(benches);
