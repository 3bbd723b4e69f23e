use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use orbitflow::equations_of_motion::{
    cowell::Cowell, equinoctial_vop::EquinoctialVop, keplerian_vop::KeplerianVop,
    two_body::TwoBody, DegeneracyPolicy, EquationsOfMotion,
};
use orbitflow::forces::{oblateness::OblatenessForce, ForceModel};
use orbitflow::integrator::{params::IntegratorParams, Integrator, StepMethod};
use orbitflow::orbit_type::anomaly::mean_to_eccentric;
use orbitflow::orbit_type::keplerian_element::KeplerianElements;
use orbitflow::orbit_type::{ElementSet, OrbitalElements};
use orbitflow::state::State;
use orbitflow::system::AstrodynamicsSystem;
use orbitflow::time::{days, j2000};
use orbitflow::vehicle::{spacecraft::Spacecraft, Vehicle};

fn inclined_orbit() -> KeplerianElements {
    KeplerianElements::new(8000.0, 0.1, 0.5, 1.0, 0.7, 2.0)
}

fn vehicle() -> Vehicle {
    Vehicle::new(Spacecraft::new(State::new(inclined_orbit(), j2000())))
}

/// One day of J2 propagation for each Runge-Kutta pair.
fn bench_step_methods(c: &mut Criterion) {
    let sys = AstrodynamicsSystem::default();
    let mut forces = ForceModel::default();
    forces.add(OblatenessForce);
    let eom = Cowell::new(&sys, &forces);

    for method in [StepMethod::Rkf45, StepMethod::Dop45, StepMethod::Rkf78] {
        let params = IntegratorParams::builder()
            .step_method(method)
            .abs_tol(1e-10)
            .rel_tol(1e-10)
            .build()
            .unwrap();
        c.bench_function(&format!("propagate/cowell_j2_1day/{method}"), |b| {
            b.iter_batched(
                vehicle,
                |mut vehicle| {
                    let mut integrator = Integrator::new(params.clone());
                    let history = integrator
                        .propagate_for(days(1.0), &eom, &mut vehicle, false)
                        .unwrap();
                    black_box(history);
                },
                BatchSize::SmallInput,
            )
        });
    }
}

/// Single derivative evaluation of every strategy under J2.
fn bench_evaluations(c: &mut Criterion) {
    let sys = AstrodynamicsSystem::default();
    let mut forces = ForceModel::default();
    forces.add(OblatenessForce);
    let vehicle = vehicle();
    let kep = OrbitalElements::from(inclined_orbit());

    let strategies: [(&str, Box<dyn EquationsOfMotion + '_>); 4] = [
        ("two_body", Box::new(TwoBody::new(&sys))),
        ("cowell", Box::new(Cowell::new(&sys, &forces))),
        (
            "keplerian_vop",
            Box::new(KeplerianVop::new(&sys, &forces, DegeneracyPolicy::Warn)),
        ),
        ("equinoctial_vop", Box::new(EquinoctialVop::new(&sys, &forces))),
    ];
    for (label, eom) in strategies.iter() {
        let state = kep.convert_to(eom.expected_set(), &sys);
        c.bench_function(&format!("evaluate/{label}"), |b| {
            b.iter(|| black_box(eom.evaluate(black_box(&state), &vehicle).unwrap()))
        });
    }
}

/// Element set conversions and the Kepler solver on random orbits.
fn bench_conversions(c: &mut Criterion) {
    let sys = AstrodynamicsSystem::default();
    let mut rng = StdRng::seed_from_u64(0xDEADBEEF);
    let samples = 10_000usize;

    c.bench_function("convert/keplerian_cartesian_equinoctial", |b| {
        b.iter_batched(
            || {
                (0..samples)
                    .map(|_| {
                        OrbitalElements::from(KeplerianElements::new(
                            rng.random_range(6600.0..50_000.0),
                            rng.random_range(0.0..0.9),
                            rng.random_range(0.01..3.0),
                            rng.random_range(0.0..std::f64::consts::TAU),
                            rng.random_range(0.0..std::f64::consts::TAU),
                            rng.random_range(0.0..std::f64::consts::TAU),
                        ))
                    })
                    .collect::<Vec<_>>()
            },
            |cases| {
                for elements in cases {
                    let cartesian = elements.convert_to(ElementSet::Cartesian, &sys);
                    black_box(cartesian.convert_to(ElementSet::Equinoctial, &sys));
                }
            },
            BatchSize::LargeInput,
        )
    });

    c.bench_function("kepler_equation/e<=0.9", |b| {
        b.iter_batched(
            || {
                (0..samples)
                    .map(|_| {
                        (
                            rng.random_range(0.0..std::f64::consts::TAU),
                            rng.random_range(0.0..0.9),
                        )
                    })
                    .collect::<Vec<_>>()
            },
            |cases| {
                for (mean_anomaly, ecc) in cases {
                    let _ = black_box(mean_to_eccentric(black_box(mean_anomaly), ecc));
                }
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_step_methods,
    bench_evaluations,
    bench_conversions
);
criterion_main!(benches);
