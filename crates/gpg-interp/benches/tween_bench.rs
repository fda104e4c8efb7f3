use criterion::{black_box, criterion_group, criterion_main, Criterion};

use gpg_geom::{Line, Point};
use gpg_interp::alink::{AlKey, AlLink};
use gpg_interp::frame::TimeGrid;
use gpg_interp::tween::tween_link;
use gpg_link::MemberType;

fn ring(n: usize, r: f64) -> Line {
    let pts = (0..n)
        .map(|i| {
            let t = std::f64::consts::TAU * i as f64 / n as f64;
            Point::new(r * t.cos(), r * t.sin())
        })
        .collect();
    Line::closed(pts)
}

fn bench_tween(c: &mut Criterion) {
    let mut link = AlLink::new(0, MemberType::Bound, 2, 0, 1, 0, 0);
    link.keys[0] = Some(AlKey::new(0, MemberType::Bound, 0, ring(360, 10.0), Point::new(0.0, 0.0)));
    link.keys[1] = Some(AlKey::new(0, MemberType::Bound, 0, ring(360, 20.0), Point::new(0.0, 0.0)));
    let grid = TimeGrid { key_mplus: vec![0, 60], dtween: 1, num_tween: 60 };

    c.bench_function("tween_link_360pt_60frames", |b| {
        b.iter(|| black_box(tween_link(black_box(&link), black_box(&grid))))
    });
}

criterion_group!(benches, bench_tween);
criterion_main!(benches);
