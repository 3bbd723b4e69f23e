use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use hifitime::Epoch;
use nalgebra::Vector3;

use crate::{
    propagation_errors::PropagationError,
    state::State,
    state_history::StateHistory,
    system::AstrodynamicsSystem,
    vehicle::{thruster::Thruster, VehicleModel},
};

pub const DEFAULT_MASS: f64 = 1000.0;
pub const DEFAULT_COEFFICIENT_OF_DRAG: f64 = 2.2;
pub const DEFAULT_COEFFICIENT_OF_LIFT: f64 = 0.9;
pub const DEFAULT_COEFFICIENT_OF_REFLECTIVITY: f64 = 1.1;
pub const DEFAULT_AREA: f64 = 1.0;

/// Spacecraft with aerodynamic and radiation properties, thrusters and the history of its
/// last propagation.
///
/// The identifier is a hash of the initial elements and of the physical properties; it is
/// refreshed every time one of them changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Spacecraft {
    id: u64,
    name: String,
    state: State,
    initial_state: State,
    mass: f64,
    coefficient_of_drag: f64,
    coefficient_of_lift: f64,
    coefficient_of_reflectivity: f64,
    ram_area: f64,
    lift_area: f64,
    solar_area: f64,
    thrusters: Vec<Thruster>,
    history: StateHistory,
}

impl Spacecraft {
    pub fn new(initial_state: State) -> Self {
        let mut spacecraft = Spacecraft {
            id: 0,
            name: "Unnamed".to_string(),
            state: initial_state,
            initial_state,
            mass: DEFAULT_MASS,
            coefficient_of_drag: DEFAULT_COEFFICIENT_OF_DRAG,
            coefficient_of_lift: DEFAULT_COEFFICIENT_OF_LIFT,
            coefficient_of_reflectivity: DEFAULT_COEFFICIENT_OF_REFLECTIVITY,
            ram_area: DEFAULT_AREA,
            lift_area: DEFAULT_AREA,
            solar_area: DEFAULT_AREA,
            thrusters: Vec::new(),
            history: StateHistory::default(),
        };
        spacecraft.refresh_id();
        spacecraft
    }

    fn refresh_id(&mut self) {
        let mut hasher = DefaultHasher::new();
        for value in self.initial_state.elements.to_vector().iter().chain(&[
            self.mass,
            self.coefficient_of_drag,
            self.coefficient_of_lift,
            self.coefficient_of_reflectivity,
            self.ram_area,
            self.lift_area,
            self.solar_area,
        ]) {
            value.to_bits().hash(&mut hasher);
        }
        self.id = hasher.finish();
        self.history.set_object_id(self.id);
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_mass(&mut self, mass: f64) {
        self.mass = mass;
        self.refresh_id();
    }

    pub fn set_coefficient_of_drag(&mut self, cd: f64) {
        self.coefficient_of_drag = cd;
        self.refresh_id();
    }

    pub fn set_coefficient_of_lift(&mut self, cl: f64) {
        self.coefficient_of_lift = cl;
        self.refresh_id();
    }

    pub fn set_coefficient_of_reflectivity(&mut self, cr: f64) {
        self.coefficient_of_reflectivity = cr;
        self.refresh_id();
    }

    pub fn set_ram_area(&mut self, area: f64) {
        self.ram_area = area;
        self.refresh_id();
    }

    pub fn set_lift_area(&mut self, area: f64) {
        self.lift_area = area;
        self.refresh_id();
    }

    pub fn set_solar_area(&mut self, area: f64) {
        self.solar_area = area;
        self.refresh_id();
    }

    pub fn attach_thruster(&mut self, thruster: Thruster) {
        self.thrusters.push(thruster);
    }

    pub fn thrusters(&self) -> &[Thruster] {
        &self.thrusters
    }

    pub fn state_history(&self) -> &StateHistory {
        &self.history
    }

    fn cartesian_at(
        &self,
        epoch: Epoch,
        system: &AstrodynamicsSystem,
    ) -> Result<(Vector3<f64>, Vector3<f64>), PropagationError> {
        let state = self.history.state_at(epoch, system)?;
        let cartesian = state.elements.to_cartesian(system);
        Ok((cartesian.position, cartesian.velocity))
    }
}

impl VehicleModel for Spacecraft {
    fn state(&self) -> &State {
        &self.state
    }

    fn update_state(&mut self, state: State) {
        self.state = state;
    }

    fn initial_state(&self) -> &State {
        &self.initial_state
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> u64 {
        self.id
    }

    fn mass(&self) -> f64 {
        self.mass
    }

    fn ram_area(&self) -> f64 {
        self.ram_area
    }

    fn lift_area(&self) -> f64 {
        self.lift_area
    }

    fn solar_area(&self) -> f64 {
        self.solar_area
    }

    fn coefficient_of_drag(&self) -> f64 {
        self.coefficient_of_drag
    }

    fn coefficient_of_lift(&self) -> f64 {
        self.coefficient_of_lift
    }

    fn coefficient_of_reflectivity(&self) -> f64 {
        self.coefficient_of_reflectivity
    }

    fn impulsive_delta_v(&self) -> f64 {
        self.thrusters
            .iter()
            .map(|t| t.impulsive_delta_v(self.mass))
            .sum()
    }

    fn store_state_history(&mut self, mut history: StateHistory) {
        history.set_object_id(self.id);
        self.history = history;
    }

    fn inertial_position(
        &self,
        epoch: Epoch,
        system: &AstrodynamicsSystem,
    ) -> Result<Vector3<f64>, PropagationError> {
        Ok(self.cartesian_at(epoch, system)?.0)
    }

    fn inertial_velocity(
        &self,
        epoch: Epoch,
        system: &AstrodynamicsSystem,
    ) -> Result<Vector3<f64>, PropagationError> {
        Ok(self.cartesian_at(epoch, system)?.1)
    }

    fn clone_box(&self) -> Box<dyn VehicleModel> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod spacecraft_test {
    use super::*;
    use crate::orbit_type::keplerian_element::KeplerianElements;
    use crate::time::j2000;

    #[test]
    fn test_defaults() {
        let sat = Spacecraft::new(State::new(KeplerianElements::leo(), j2000()));
        assert_eq!(sat.mass(), 1000.0);
        assert_eq!(sat.coefficient_of_drag(), 2.2);
        assert_eq!(sat.coefficient_of_lift(), 0.9);
        assert_eq!(sat.coefficient_of_reflectivity(), 1.1);
        assert_eq!(sat.ram_area(), 1.0);
        assert_eq!(sat.lift_area(), 1.0);
        assert_eq!(sat.solar_area(), 1.0);
        assert_eq!(sat.impulsive_delta_v(), 0.0);
    }

    #[test]
    fn test_id_depends_on_properties() {
        let state = State::new(KeplerianElements::leo(), j2000());
        let a = Spacecraft::new(state);
        let b = Spacecraft::new(state);
        assert_eq!(a.id(), b.id());

        let mut heavy = Spacecraft::new(state);
        heavy.set_mass(2000.0);
        assert_ne!(heavy.id(), a.id());

        let other = Spacecraft::new(State::new(KeplerianElements::geo(), j2000()));
        assert_ne!(other.id(), a.id());
    }

    #[test]
    fn test_thrusters_sum_delta_v() {
        let mut sat = Spacecraft::new(State::new(KeplerianElements::leo(), j2000()));
        sat.attach_thruster(Thruster::new(500.0, 10.0));
        sat.attach_thruster(Thruster::new(1000.0, 5.0));
        // 2 * 5000 N.s / 1000 kg = 10 m/s
        assert!((sat.impulsive_delta_v() - 0.01).abs() < 1e-15);
        assert_eq!(sat.thrusters().len(), 2);
    }
}
