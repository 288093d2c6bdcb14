use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use glam::IVec2;

use oripath::cancel::CancelToken;
use oripath::{Algorithm, Cell, ElevationSampler, Grid2d, Heuristic, find_path};

fn patchwork_grid(size: u32) -> Grid2d<Cell> {
    let mut cells = vec![Cell::OPEN; (size as usize) * (size as usize)];
    for (i, cell) in cells.iter_mut().enumerate() {
        let x = i % size as usize;
        let y = i / size as usize;
        if (x / 8 + y / 8) % 5 == 0 {
            *cell = Cell::new(5.0, 1, 0);
        }
    }
    Grid2d::new(size, size, cells).unwrap()
}

fn bench_find_path(c: &mut Criterion) {
    let grid = patchwork_grid(256);
    let sampler = ElevationSampler::uniform(256, 256, 1.0);
    let cancel = CancelToken::new();
    let start = IVec2::new(2, 2);
    let end = IVec2::new(253, 253);

    for (name, algorithm) in [
        ("astar_min_cost_256", Algorithm::AStar),
        ("dijkstra_256", Algorithm::Dijkstra),
        ("theta_star_256", Algorithm::ThetaStar),
        ("lazy_theta_star_256", Algorithm::LazyThetaStar),
    ] {
        c.bench_function(name, |b| {
            b.iter(|| {
                let path = find_path(
                    black_box(&grid),
                    &sampler,
                    start,
                    end,
                    algorithm,
                    Heuristic::MinCost,
                    &cancel,
                )
                .unwrap()
                .unwrap();
                black_box(path.len());
            });
        });
    }
}

criterion_group!(benches, bench_find_path);
criterion_main!(benches);
