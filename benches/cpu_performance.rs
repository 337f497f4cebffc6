use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use glam::Vec2;
use liquid_ether::stages::{ForceImpulse, advect, diffuse, divergence, solve_pressure};
use liquid_ether::{AdvectionMode, BoundaryMode, FieldSet, SimulationParams, simulate_frame};

fn stirred_fields(size: usize, params: &SimulationParams) -> FieldSet {
    let mut fields = FieldSet::new(size, size);
    let impulse = ForceImpulse::new(Vec2::ZERO, Vec2::new(0.05, 0.02));
    for _ in 0..5 {
        simulate_frame(&mut fields, params, &impulse);
    }
    fields
}

fn benchmark_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate_frame");
    let params = SimulationParams::default();
    let impulse = ForceImpulse::new(Vec2::new(0.1, -0.2), Vec2::new(0.01, 0.0));

    for size in [64, 128, 256].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let mut fields = stirred_fields(size, &params);
            b.iter(|| {
                simulate_frame(&mut fields, &params, black_box(&impulse));
            });
        });
    }
    group.finish();
}

fn benchmark_advection(c: &mut Criterion) {
    let mut group = c.benchmark_group("advection");
    let params = SimulationParams::default();
    let fields = stirred_fields(128, &params);

    for mode in [AdvectionMode::Simple, AdvectionMode::Bfecc] {
        group.bench_function(format!("{mode:?}"), |b| {
            let mut out = fields.advected.clone();
            b.iter(|| {
                advect(&fields.velocity, &mut out, params.timestep, mode, BoundaryMode::Wrap);
                black_box(&out);
            });
        });
    }
    group.finish();
}

fn benchmark_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("stages");
    let params = SimulationParams::default();
    let mut fields = stirred_fields(128, &params);
    let dt = params.timestep;

    divergence(&fields.velocity, &mut fields.divergence, dt, BoundaryMode::Wrap);

    group.bench_function("divergence", |b| {
        let mut out = fields.divergence.clone();
        b.iter(|| {
            divergence(&fields.velocity, &mut out, dt, BoundaryMode::Wrap);
            black_box(&out);
        });
    });

    group.bench_function("pressure_32", |b| {
        let mut pressure = fields.pressure.clone();
        b.iter(|| black_box(solve_pressure(&fields.divergence, &mut pressure, 32, BoundaryMode::Wrap)));
    });

    group.bench_function("viscosity_32", |b| {
        let mut viscous = fields.viscous.clone();
        b.iter(|| {
            black_box(diffuse(&fields.velocity, &mut viscous, 30.0, dt, 32, BoundaryMode::Wrap))
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_frame, benchmark_advection, benchmark_stages);
criterion_main!(benches);
