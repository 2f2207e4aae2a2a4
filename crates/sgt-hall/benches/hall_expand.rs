use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sgt_hall::{symops_from_hall, BasisSolver};

const SYMBOLS: &[&str] = &[
    "P 1",
    "-P 2ybc",
    "P 2ac 2ab",
    "-I 4bd 2",
    "P 65 2 (0 0 1)",
    "-R 3 2\"",
    "-F 4vw 2vw 3",
    "I 2 2 3 (x+1/4,y+1/4,z+1/4)",
];

fn bench_expand(c: &mut Criterion) {
    c.bench_function("hall_expand_mixed", |b| {
        b.iter(|| {
            for hall in SYMBOLS {
                let ops = symops_from_hall(black_box(hall)).expect("expand");
                black_box(ops);
            }
        })
    });
}

fn bench_basis(c: &mut Criterion) {
    let solver = BasisSolver::new();
    let reference = symops_from_hall("P 2 2 -1n").expect("reference");
    let target = symops_from_hall("-P 2ab 2bc").expect("target");
    c.bench_function("basis_origin_shift", |b| {
        b.iter(|| black_box(solver.find(black_box(&reference), black_box(&target))))
    });
}

criterion_group!(benches, bench_expand, bench_basis);
criterion_main!(benches);
