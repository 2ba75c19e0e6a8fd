use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::path::PathBuf;
use wiresmith::prelude::*;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn bench_synthesize(c: &mut Criterion) {
    let parts = wiresmith::load_parts(&fixture_path("weather_station.json"))
        .expect("fixture should load");
    let options = SynthesisOptions::default();

    c.bench_function("synthesize_weather_station", |b| {
        b.iter(|| WiresmithCore::synthesize(black_box(&parts), black_box(&options)));
    });
}

fn bench_progressive(c: &mut Criterion) {
    let mut parts = vec![Part::new("wokwi-arduino-mega", "mega")];
    for i in 0..24 {
        let part_type = match i % 4 {
            0 => "wokwi-led",
            1 => "wokwi-pushbutton",
            2 => "wokwi-buzzer",
            _ => "wokwi-potentiometer",
        };
        parts.push(Part::new(part_type, format!("p{}", i)));
    }
    let options = SynthesisOptions::default();

    c.bench_function("progressive_25_parts", |b| {
        b.iter(|| wiresmith::progressive_steps(black_box(&parts), black_box(&options)));
    });
}

criterion_group!(benches, bench_synthesize, bench_progressive);
criterion_main!(benches);
