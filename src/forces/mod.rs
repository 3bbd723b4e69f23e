//! # Perturbing forces
//!
//! A [`Force`] maps a Cartesian state and a vehicle to an inertial acceleration (km/s²) in
//! the frame of the central body. A [`ForceModel`] is the set of forces applied by the
//! perturbed equations of motion; it holds **at most one force per concrete type** and sums
//! them component-wise.
//!
//! Registered forces are retrieved either through the typed [`ForceHandle`] returned at
//! registration, through their type, or through their name:
//!
//! ```rust, no_run
//! use orbitflow::forces::{ForceModel, oblateness::OblatenessForce};
//!
//! let mut model = ForceModel::default();
//! let handle = model.add(OblatenessForce);
//! assert!(model.get(&handle).is_ok());
//! assert!(model.get_by_type::<OblatenessForce>().is_ok());
//! assert!(model.at("OblatenessForce").is_ok());
//! ```
//!
//! ## Provided forces
//!
//! - [`oblateness::OblatenessForce`] – J2 zonal harmonic of the central body.
//! - [`atmospheric::AtmosphericForce`] – Exponential-atmosphere drag and lift.
//! - [`solar_radiation::SolarRadiationPressure`] – Cannonball radiation pressure with shadowing.
//! - [`n_body::NBodyForce`] – Third-body perturbations of the secondary bodies.
use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::marker::PhantomData;

use hifitime::Epoch;
use log::debug;
use nalgebra::Vector3;

use crate::{
    orbit_type::cartesian_element::CartesianElements, propagation_errors::PropagationError,
    system::AstrodynamicsSystem, vehicle::Vehicle,
};

pub mod atmospheric;
pub mod n_body;
pub mod oblateness;
pub mod solar_radiation;

/// Upcast to [`Any`], implemented for every `'static` type.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Acceleration contribution of a physical effect.
pub trait Force: AsAny + Send + Sync + fmt::Debug {
    /// Acceleration (km/s²) at `epoch` for the given state and vehicle.
    fn compute_force(
        &self,
        epoch: Epoch,
        state: &CartesianElements,
        vehicle: &Vehicle,
        system: &AstrodynamicsSystem,
    ) -> Result<Vector3<f64>, PropagationError>;

    fn name(&self) -> &'static str;
}

/// Typed key of a force registered in a [`ForceModel`].
pub struct ForceHandle<T> {
    index: usize,
    _force: PhantomData<fn() -> T>,
}

impl<T> ForceHandle<T> {
    fn new(index: usize) -> Self {
        ForceHandle {
            index,
            _force: PhantomData,
        }
    }
}

impl<T> Clone for ForceHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ForceHandle<T> {}

impl<T> PartialEq for ForceHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> fmt::Debug for ForceHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ForceHandle<{}>({})", type_name::<T>(), self.index)
    }
}

#[derive(Debug, Default)]
pub struct ForceModel {
    forces: Vec<(TypeId, Box<dyn Force>)>,
}

impl ForceModel {
    pub fn new() -> Self {
        ForceModel::default()
    }

    fn index_of<T: Force + 'static>(&self) -> Option<usize> {
        let id = TypeId::of::<T>();
        self.forces.iter().position(|(type_id, _)| *type_id == id)
    }

    /// Register a force.
    ///
    /// If a force of the same type is already present the new value is dropped and the
    /// handle of the registered one is returned.
    pub fn add<T: Force + 'static>(&mut self, force: T) -> ForceHandle<T> {
        if let Some(index) = self.index_of::<T>() {
            debug!("{} already registered, keeping the existing one", force.name());
            return ForceHandle::new(index);
        }
        debug!("Registering {}", force.name());
        self.forces.push((TypeId::of::<T>(), Box::new(force)));
        ForceHandle::new(self.forces.len() - 1)
    }

    pub fn add_default<T: Force + Default + 'static>(&mut self) -> ForceHandle<T> {
        self.add(T::default())
    }

    pub fn get<T: Force + 'static>(&self, handle: &ForceHandle<T>) -> Result<&T, PropagationError> {
        self.forces
            .get(handle.index)
            .and_then(|(_, force)| force.as_ref().as_any().downcast_ref::<T>())
            .ok_or_else(|| PropagationError::ForceNotRegistered(type_name::<T>().to_string()))
    }

    pub fn get_by_type<T: Force + 'static>(&self) -> Result<&T, PropagationError> {
        self.index_of::<T>()
            .and_then(|index| self.forces[index].1.as_ref().as_any().downcast_ref::<T>())
            .ok_or_else(|| PropagationError::ForceNotRegistered(type_name::<T>().to_string()))
    }

    /// Lookup by [`Force::name`].
    pub fn at(&self, name: &str) -> Result<&dyn Force, PropagationError> {
        self.forces
            .iter()
            .find(|(_, force)| force.name() == name)
            .map(|(_, force)| force.as_ref())
            .ok_or_else(|| PropagationError::ForceNotRegistered(name.to_string()))
    }

    pub fn contains<T: Force + 'static>(&self) -> bool {
        self.index_of::<T>().is_some()
    }

    pub fn len(&self) -> usize {
        self.forces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forces.is_empty()
    }

    /// Sum of the accelerations (km/s²) of every registered force, zero when empty.
    pub fn compute_forces(
        &self,
        epoch: Epoch,
        state: &CartesianElements,
        vehicle: &Vehicle,
        system: &AstrodynamicsSystem,
    ) -> Result<Vector3<f64>, PropagationError> {
        self.forces
            .iter()
            .try_fold(Vector3::zeros(), |acc, (_, force)| {
                Ok(acc + force.compute_force(epoch, state, vehicle, system)?)
            })
    }

    /// Contribution of each force, in registration order.
    pub fn acceleration_breakdown(
        &self,
        epoch: Epoch,
        state: &CartesianElements,
        vehicle: &Vehicle,
        system: &AstrodynamicsSystem,
    ) -> Result<Vec<(&'static str, Vector3<f64>)>, PropagationError> {
        self.forces
            .iter()
            .map(|(_, force)| {
                Ok((
                    force.name(),
                    force.compute_force(epoch, state, vehicle, system)?,
                ))
            })
            .collect()
    }
}
