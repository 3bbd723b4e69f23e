use std::fmt;

use crate::{celestial_body::CelestialBody, propagation_errors::PropagationError};

/// The gravitational context of a propagation: one central body plus secondary bodies.
///
/// The system is only read during a propagation call, so a single instance can be shared by
/// several integrators running on different threads.
#[derive(Debug, Clone)]
pub struct AstrodynamicsSystem {
    central_body: CelestialBody,
    secondary_bodies: Vec<CelestialBody>,
}

impl AstrodynamicsSystem {
    pub fn new(central_body: CelestialBody, secondary_bodies: Vec<CelestialBody>) -> Self {
        AstrodynamicsSystem {
            central_body,
            secondary_bodies,
        }
    }

    /// Earth-centered system with the Moon and the Sun as secondary bodies.
    pub fn earth_moon_sun() -> Self {
        AstrodynamicsSystem::new(
            CelestialBody::earth(),
            vec![CelestialBody::moon(), CelestialBody::sun()],
        )
    }

    /// Gravitational parameter of the central body (km³/s²)
    pub fn mu(&self) -> f64 {
        self.central_body.mu
    }

    pub fn central_body(&self) -> &CelestialBody {
        &self.central_body
    }

    pub fn center(&self) -> &str {
        &self.central_body.name
    }

    /// Lookup a body of the system by name, central body included.
    pub fn get(&self, name: &str) -> Result<&CelestialBody, PropagationError> {
        if self.central_body.name == name {
            return Ok(&self.central_body);
        }
        self.secondary_bodies
            .iter()
            .find(|body| body.name == name)
            .ok_or_else(|| PropagationError::UnknownBody(name.to_string()))
    }

    pub fn secondary_bodies(&self) -> impl Iterator<Item = &CelestialBody> {
        self.secondary_bodies.iter()
    }

    /// Add a secondary body, replacing any body with the same name.
    pub fn add_body(&mut self, body: CelestialBody) {
        self.secondary_bodies.retain(|b| b.name != body.name);
        self.secondary_bodies.push(body);
    }
}

/// Earth-centered system with the Moon as secondary body.
impl Default for AstrodynamicsSystem {
    fn default() -> Self {
        AstrodynamicsSystem::new(CelestialBody::earth(), vec![CelestialBody::moon()])
    }
}

impl fmt::Display for AstrodynamicsSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.central_body.name)?;
        for body in &self.secondary_bodies {
            write!(f, " + {}", body.name)?;
        }
        Ok(())
    }
}
