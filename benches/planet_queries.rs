use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use celestial::{celestial::Celestial, config::CelestialConfig, planet::Planet};

fn standish() -> Celestial {
    Celestial::new(
        CelestialConfig::default()
            .with_ephemeris("standish")
            .with_auto_download(false),
    )
}

/// Random planet and site, fixed evening.
fn bench_position(c: &mut Criterion) {
    let celestial = standish();
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);

    c.bench_function("planet_position/random_site", |b| {
        b.iter_batched(
            || {
                let planet = Planet::ALL[rng.random_range(0..Planet::ALL.len())];
                let lat = rng.random_range(-80.0..80.0);
                let lon = rng.random_range(-180.0..180.0);
                (planet, lat, lon)
            },
            |(planet, lat, lon)| {
                let response = celestial
                    .get_planet_position(planet.name(), "2024-3-15", "21:00", lat, lon, None)
                    .unwrap();
                black_box(response);
            },
            BatchSize::SmallInput,
        )
    });
}

/// One full day of rise/set/transit search.
fn bench_events(c: &mut Criterion) {
    let celestial = standish();

    c.bench_function("planet_events/jupiter_paris", |b| {
        b.iter(|| {
            let response = celestial
                .get_planet_events(
                    black_box("Jupiter"),
                    "2024-3-15",
                    48.8566,
                    2.3522,
                    Some(1.0),
                    false,
                )
                .unwrap();
            black_box(response);
        })
    });
}

fn bench_seasons(c: &mut Criterion) {
    let celestial = standish();

    c.bench_function("earth_seasons/2024", |b| {
        b.iter(|| black_box(celestial.get_earth_seasons(black_box(2024), None, false).ok()))
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default().sample_size(20);
    targets = bench_position, bench_events, bench_seasons
);
criterion_main!(benches);
