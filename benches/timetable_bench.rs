//! Criterion benchmarks for the timetable solver.
//!
//! Uses seeded random schools so runs are comparable across builds.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use u_timetable::cp::{BranchAndBoundSolver, CpSolver, SolverConfig};
use u_timetable::model::{ModelBuilder, Subject, TimetableConfig};
use u_timetable::timetable::TimetableSolver;

// ===========================================================================
// Instances
// ===========================================================================

/// A school week with one dedicated room and teacher per subject.
fn random_school(students: usize, seed: u64) -> TimetableConfig {
    let mut rng = StdRng::seed_from_u64(seed);
    let days: Vec<String> = ["Mon", "Tue", "Wed", "Thu", "Fri"]
        .iter()
        .map(|d| d.to_string())
        .collect();
    let mut config = TimetableConfig::new(days, 5);
    for s in 0..students {
        config = config.with_student(format!("S{s}"));
    }
    for j in 0..5 {
        let room = format!("Room_{j}");
        config = config
            .with_subject(Subject::new(
                format!("J{j}"),
                rng.random_range(1..=3),
                format!("T{j}"),
                room.as_str(),
            ))
            .with_room(room);
    }
    let off = rng.random_range(0..5);
    config.with_teacher_days("T0", (0..5).filter(|&d| d != off))
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_model_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("model_build");
    group.sample_size(10);

    for students in [2, 4, 8] {
        let config = random_school(students, 7);
        group.bench_with_input(BenchmarkId::from_parameter(students), &config, |b, cfg| {
            b.iter(|| black_box(ModelBuilder::new(cfg).build()))
        });
    }
    group.finish();
}

fn bench_first_solution(c: &mut Criterion) {
    let mut group = c.benchmark_group("first_solution");
    group.sample_size(10);

    for students in [2, 4, 8] {
        let config = random_school(students, 11);
        let solver = SolverConfig::default()
            .with_time_limit_secs(5)
            .with_stop_after_first(true);
        group.bench_with_input(
            BenchmarkId::from_parameter(students),
            &(config, solver),
            |b, (cfg, sc)| b.iter(|| black_box(TimetableSolver::solve(cfg, sc))),
        );
    }
    group.finish();
}

fn bench_branch_and_bound(c: &mut Criterion) {
    let mut group = c.benchmark_group("branch_and_bound");
    group.sample_size(10);

    for nodes in [1_000u64, 10_000] {
        let config = random_school(3, 23);
        let Ok(model) = ModelBuilder::new(&config).build() else {
            continue;
        };
        let solver = SolverConfig::default()
            .with_time_limit_secs(5)
            .with_node_limit(nodes);
        group.bench_with_input(
            BenchmarkId::from_parameter(nodes),
            &(model, solver),
            |b, (m, sc)| b.iter(|| black_box(BranchAndBoundSolver::new().solve(m, sc))),
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_model_build,
    bench_first_solution,
    bench_branch_and_bound
);
criterion_main!(benches);
