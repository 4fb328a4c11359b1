use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use safeshelter_core::prelude::*;
use serde_json::json;

/// Grid of shelters around Kristiansand
fn build_facilities(count: usize) -> Vec<Facility> {
    (0..count)
        .map(|i| {
            let lat = 58.0 + (i % 100) as f64 * 0.004;
            let lng = 7.8 + (i / 100) as f64 * 0.004;
            let location = GeoPoint::new(lat, lng).expect("grid stays in range");
            Facility::new(i.to_string(), FacilityKind::Shelter, location)
        })
        .collect()
}

fn bench_find_nearest(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_nearest");
    let user = GeoPoint::new(58.1599, 8.0182).expect("valid point");

    for &count in &[100usize, 1_000, 10_000] {
        let facilities = build_facilities(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &facilities, |b, facilities| {
            b.iter(|| find_nearest(black_box(user), black_box(facilities)).map(|n| n.distance_km))
        });
    }
    group.finish();
}

fn bench_parse_fire_stations(c: &mut Criterion) {
    let rows: Vec<_> = (0..500)
        .map(|i| {
            json!({
                "gid": i,
                "sted": format!("Stasjon {i}"),
                "brannvesen": "Kristiansand brannvesen",
                "stasjonstype": "Heltid",
                "geom": {
                    "type": "Point",
                    "coordinates": [442226.758 + f64::from(i), 6446933.069]
                }
            })
        })
        .collect();

    c.bench_function("parse_fire_stations_utm", |b| {
        b.iter(|| parse_facilities(FacilityKind::FireStation, black_box(&rows)).facilities.len())
    });
}

criterion_group!(benches, bench_find_nearest, bench_parse_fire_stations);
criterion_main!(benches);
