//! # orbitflow
//!
//! Numerical propagation of spacecraft orbits around a central body.
//!
//! A propagation combines four pieces:
//!
//! - a [`Vehicle`](crate::vehicle::Vehicle) carrying the current [`State`](crate::state::State)
//!   and its history,
//! - an [`AstrodynamicsSystem`](crate::system::AstrodynamicsSystem) naming the central and
//!   perturbing bodies,
//! - an [`EquationsOfMotion`](crate::equations_of_motion::EquationsOfMotion) strategy, optionally
//!   fed by a [`ForceModel`](crate::forces::ForceModel),
//! - an [`Integrator`](crate::integrator::Integrator) with its
//!   [`IntegratorParams`](crate::integrator::params::IntegratorParams) and events.
//!
//! ```rust, no_run
//! use orbitflow::equations_of_motion::cowell::Cowell;
//! use orbitflow::forces::{oblateness::OblatenessForce, ForceModel};
//! use orbitflow::integrator::Integrator;
//! use orbitflow::orbit_type::keplerian_element::KeplerianElements;
//! use orbitflow::state::State;
//! use orbitflow::system::AstrodynamicsSystem;
//! use orbitflow::time::{days, j2000};
//! use orbitflow::vehicle::{spacecraft::Spacecraft, Vehicle};
//!
//! let system = AstrodynamicsSystem::default();
//! let mut forces = ForceModel::default();
//! forces.add(OblatenessForce);
//!
//! let state = State::new(KeplerianElements::gps(), j2000());
//! let mut vehicle = Vehicle::new(Spacecraft::new(state));
//!
//! let mut integrator = Integrator::default();
//! let history = integrator
//!     .propagate_for(days(1.0), &Cowell::new(&system, &forces), &mut vehicle, true)
//!     .unwrap();
//! println!("{} samples, last: {}", history.len(), history.last().unwrap());
//! ```
pub mod celestial_body;
pub mod constants;
pub mod equations_of_motion;
pub mod events;
pub mod forces;
pub mod integrator;
pub mod orbit_type;
pub mod propagation_errors;
pub mod state;
pub mod state_history;
pub mod system;
pub mod time;
pub mod vehicle;
