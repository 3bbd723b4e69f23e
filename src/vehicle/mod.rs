//! # Vehicles
//!
//! A vehicle is anything with an orbital state and the physical properties the forces need
//! (mass, areas, aerodynamic and optical coefficients).
//!
//! - [`VehicleModel`] is the open trait concrete vehicles implement.
//! - [`Vehicle`] owns exactly one boxed model and caches its properties, so the force models
//!   read plain fields in the integration loop.
//!
//! Two models are provided: [`Spacecraft`](crate::vehicle::spacecraft::Spacecraft) and
//! [`NullVehicle`](crate::vehicle::null_vehicle::NullVehicle).
use std::fmt;

use hifitime::Epoch;
use nalgebra::Vector3;

use crate::{
    propagation_errors::PropagationError, state::State, state_history::StateHistory,
    system::AstrodynamicsSystem, vehicle::null_vehicle::NullVehicle,
};

/// Massive point without surfaces.
pub mod null_vehicle;

/// Spacecraft with drag, lift and radiation properties.
pub mod spacecraft;

/// Impulsive thrusters.
pub mod thruster;

/// Behavior every vehicle model provides to the propagator.
///
/// Areas are in m², mass in kg. Models without surfaces keep the zero defaults.
pub trait VehicleModel: Send + Sync + fmt::Debug {
    fn state(&self) -> &State;

    fn update_state(&mut self, state: State);

    fn initial_state(&self) -> &State;

    fn name(&self) -> &str;

    fn id(&self) -> u64 {
        0
    }

    fn mass(&self) -> f64;

    fn ram_area(&self) -> f64 {
        0.0
    }

    fn lift_area(&self) -> f64 {
        0.0
    }

    fn solar_area(&self) -> f64 {
        0.0
    }

    fn coefficient_of_drag(&self) -> f64 {
        0.0
    }

    fn coefficient_of_lift(&self) -> f64 {
        0.0
    }

    fn coefficient_of_reflectivity(&self) -> f64 {
        0.0
    }

    /// Total Δv (km/s) the model can deliver impulsively.
    fn impulsive_delta_v(&self) -> f64 {
        0.0
    }

    /// Keep the result of a propagation; models without storage ignore it.
    fn store_state_history(&mut self, _history: StateHistory) {}

    fn inertial_position(
        &self,
        epoch: Epoch,
        system: &AstrodynamicsSystem,
    ) -> Result<Vector3<f64>, PropagationError>;

    fn inertial_velocity(
        &self,
        epoch: Epoch,
        system: &AstrodynamicsSystem,
    ) -> Result<Vector3<f64>, PropagationError>;

    fn inertial_acceleration(
        &self,
        _epoch: Epoch,
        _system: &AstrodynamicsSystem,
    ) -> Result<Vector3<f64>, PropagationError> {
        Ok(Vector3::zeros())
    }

    fn clone_box(&self) -> Box<dyn VehicleModel>;
}

impl Clone for Box<dyn VehicleModel> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Owning handle over a [`VehicleModel`].
///
/// The physical properties are copied out of the model at construction, the state is kept in
/// sync with the model by [`Vehicle::update_state`]. Cloning deep-copies the model.
#[derive(Debug, Clone)]
pub struct Vehicle {
    model: Box<dyn VehicleModel>,
    state: State,
    mass: f64,
    ram_area: f64,
    lift_area: f64,
    solar_area: f64,
    coefficient_of_drag: f64,
    coefficient_of_lift: f64,
    coefficient_of_reflectivity: f64,
}

impl Vehicle {
    pub fn new<V: VehicleModel + 'static>(model: V) -> Self {
        Vehicle::from_box(Box::new(model))
    }

    pub fn from_box(model: Box<dyn VehicleModel>) -> Self {
        Vehicle {
            state: *model.state(),
            mass: model.mass(),
            ram_area: model.ram_area(),
            lift_area: model.lift_area(),
            solar_area: model.solar_area(),
            coefficient_of_drag: model.coefficient_of_drag(),
            coefficient_of_lift: model.coefficient_of_lift(),
            coefficient_of_reflectivity: model.coefficient_of_reflectivity(),
            model,
        }
    }

    pub fn model(&self) -> &dyn VehicleModel {
        self.model.as_ref()
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn update_state(&mut self, state: State) {
        self.state = state;
        self.model.update_state(state);
    }

    pub fn initial_state(&self) -> &State {
        self.model.initial_state()
    }

    pub fn name(&self) -> &str {
        self.model.name()
    }

    pub fn id(&self) -> u64 {
        self.model.id()
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn ram_area(&self) -> f64 {
        self.ram_area
    }

    pub fn lift_area(&self) -> f64 {
        self.lift_area
    }

    pub fn solar_area(&self) -> f64 {
        self.solar_area
    }

    pub fn coefficient_of_drag(&self) -> f64 {
        self.coefficient_of_drag
    }

    pub fn coefficient_of_lift(&self) -> f64 {
        self.coefficient_of_lift
    }

    pub fn coefficient_of_reflectivity(&self) -> f64 {
        self.coefficient_of_reflectivity
    }

    pub fn impulsive_delta_v(&self) -> f64 {
        self.model.impulsive_delta_v()
    }

    pub fn store_state_history(&mut self, history: StateHistory) {
        self.model.store_state_history(history);
    }

    pub fn inertial_position(
        &self,
        epoch: Epoch,
        system: &AstrodynamicsSystem,
    ) -> Result<Vector3<f64>, PropagationError> {
        self.model.inertial_position(epoch, system)
    }

    pub fn inertial_velocity(
        &self,
        epoch: Epoch,
        system: &AstrodynamicsSystem,
    ) -> Result<Vector3<f64>, PropagationError> {
        self.model.inertial_velocity(epoch, system)
    }

    pub fn inertial_acceleration(
        &self,
        epoch: Epoch,
        system: &AstrodynamicsSystem,
    ) -> Result<Vector3<f64>, PropagationError> {
        self.model.inertial_acceleration(epoch, system)
    }
}

impl Default for Vehicle {
    fn default() -> Self {
        Vehicle::new(NullVehicle::default())
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Vehicle {} (id {})", self.name(), self.id())?;
        writeln!(f, "  mass = {} kg", self.mass)?;
        write!(f, "{}", self.state)
    }
}
