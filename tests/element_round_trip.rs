mod common;

use std::f64::consts::PI;

use orbitflow::orbit_type::keplerian_element::KeplerianElements;
use orbitflow::orbit_type::{ElementSet, OrbitalElements};
use orbitflow::system::AstrodynamicsSystem;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::common::assert_cartesian_close;

const N_SAMPLES: usize = 500;

fn random_elements(rng: &mut StdRng) -> KeplerianElements {
    KeplerianElements::new(
        rng.random_range(6600.0..50_000.0),
        rng.random_range(1e-3..0.9),
        rng.random_range(1e-2..PI - 1e-1),
        rng.random_range(0.0..2.0 * PI),
        rng.random_range(0.0..2.0 * PI),
        rng.random_range(0.0..2.0 * PI),
    )
}

#[test]
fn test_cartesian_keplerian_cartesian() {
    let sys = AstrodynamicsSystem::default();
    let mut rng = StdRng::seed_from_u64(42_u64); // seed for reproducibility

    for _ in 0..N_SAMPLES {
        let cartesian = random_elements(&mut rng).to_cartesian(sys.mu());
        let back = cartesian.to_keplerian(sys.mu()).to_cartesian(sys.mu());
        assert_cartesian_close(&back, &cartesian, 1e-6);
    }
}

#[test]
fn test_keplerian_equinoctial_keplerian() {
    let sys = AstrodynamicsSystem::default();
    let mut rng = StdRng::seed_from_u64(7_u64);

    for _ in 0..N_SAMPLES {
        let kep = OrbitalElements::from(random_elements(&mut rng));
        let back = kep
            .convert_to(ElementSet::Equinoctial, &sys)
            .convert_to(ElementSet::Keplerian, &sys);
        assert!(
            kep.nearly_equal(&back, false, 1e-6, 1e-9),
            "round trip drifted:\n{kep}\n{back}"
        );
    }
}

#[test]
fn test_equinoctial_cartesian_equinoctial() {
    let sys = AstrodynamicsSystem::default();
    let mut rng = StdRng::seed_from_u64(1234_u64);

    for _ in 0..N_SAMPLES {
        let eq = OrbitalElements::from(random_elements(&mut rng).to_equinoctial());
        let back = eq
            .convert_to(ElementSet::Cartesian, &sys)
            .convert_to(ElementSet::Equinoctial, &sys);
        assert!(
            eq.nearly_equal(&back, false, 1e-6, 1e-9),
            "round trip drifted:\n{eq}\n{back}"
        );
    }
}
