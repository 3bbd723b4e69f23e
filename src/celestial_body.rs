//! # Celestial bodies and their narrow ephemeris interface
//!
//! A [`CelestialBody`] bundles the physical constants the propagation core needs from a body
//! (gravitational parameter, J2, radii, rotation rate) together with two optional models:
//!
//! - an [`ExponentialAtmosphere`] used by the drag force,
//! - a [`BodyEphemeris`] giving the body position relative to the central body of the system.
//!
//! High-fidelity ephemerides are not part of this crate. [`MeanCircularEphemeris`] and
//! [`TabulatedEphemeris`] are simple providers so that third-body and radiation pressure forces
//! can be exercised; any other provider can be plugged in through the trait.
use std::fmt;
use std::sync::Arc;

use hifitime::Epoch;
use itertools::Itertools;
use nalgebra::Vector3;

use crate::{
    constants::{
        AU, DPI, EARTH_EQUATORIAL_RADIUS, EARTH_J2, EARTH_MU, EARTH_POLAR_RADIUS,
        EARTH_ROTATION_RATE, MOON_EQUATORIAL_RADIUS, MOON_J2, MOON_MEAN_DISTANCE,
        MOON_MEAN_LONGITUDE_J2000_DEG, MOON_MU, MOON_ORBIT_INCLINATION_DEG, MOON_ROTATION_RATE,
        MOON_SIDEREAL_PERIOD_DAYS, OBLIQUITY_J2000_DEG, RADEG, SECONDS_PER_DAY,
        SIDEREAL_YEAR_DAYS, SUN_EQUATORIAL_RADIUS, SUN_MEAN_LONGITUDE_J2000_DEG, SUN_MU,
        SUN_ROTATION_RATE,
    },
    propagation_errors::PropagationError,
    time::{j2000, seconds_between},
};

/// Position provider for a celestial body.
///
/// Positions are expressed in kilometers, in the inertial frame of the central body of the
/// system the body belongs to. `None` means the epoch lies outside the validity window of the
/// provider.
pub trait BodyEphemeris: Send + Sync + fmt::Debug {
    fn position(&self, epoch: Epoch) -> Option<Vector3<f64>>;
}

/// Uniform circular motion on an inclined plane, rotated from the ecliptic to the equator.
#[derive(Debug, Clone, PartialEq)]
pub struct MeanCircularEphemeris {
    pub radius: f64,
    pub period: f64,
    pub longitude_at_reference: f64,
    pub inclination: f64,
    pub obliquity: f64,
    pub reference_epoch: Epoch,
    pub validity: Option<(Epoch, Epoch)>,
}

impl MeanCircularEphemeris {
    /// Geocentric mean lunar orbit
    pub fn moon() -> Self {
        MeanCircularEphemeris {
            radius: MOON_MEAN_DISTANCE,
            period: MOON_SIDEREAL_PERIOD_DAYS * SECONDS_PER_DAY,
            longitude_at_reference: MOON_MEAN_LONGITUDE_J2000_DEG * RADEG,
            inclination: MOON_ORBIT_INCLINATION_DEG * RADEG,
            obliquity: OBLIQUITY_J2000_DEG * RADEG,
            reference_epoch: j2000(),
            validity: None,
        }
    }

    /// Apparent geocentric mean solar orbit
    pub fn sun() -> Self {
        MeanCircularEphemeris {
            radius: AU,
            period: SIDEREAL_YEAR_DAYS * SECONDS_PER_DAY,
            longitude_at_reference: SUN_MEAN_LONGITUDE_J2000_DEG * RADEG,
            inclination: 0.0,
            obliquity: OBLIQUITY_J2000_DEG * RADEG,
            reference_epoch: j2000(),
            validity: None,
        }
    }

    /// Restrict the model to `[start, end]`.
    pub fn with_validity(mut self, start: Epoch, end: Epoch) -> Self {
        self.validity = Some((start, end));
        self
    }
}

impl BodyEphemeris for MeanCircularEphemeris {
    fn position(&self, epoch: Epoch) -> Option<Vector3<f64>> {
        if let Some((start, end)) = self.validity {
            if epoch < start || epoch > end {
                return None;
            }
        }

        let elapsed = seconds_between(self.reference_epoch, epoch);
        let lon = self.longitude_at_reference + DPI * elapsed / self.period;

        // orbit plane -> ecliptic
        let (sin_lon, cos_lon) = lon.sin_cos();
        let (sin_inc, cos_inc) = self.inclination.sin_cos();
        let ecliptic = Vector3::new(
            self.radius * cos_lon,
            self.radius * sin_lon * cos_inc,
            self.radius * sin_lon * sin_inc,
        );

        // ecliptic -> equator
        let (sin_eps, cos_eps) = self.obliquity.sin_cos();
        Some(Vector3::new(
            ecliptic.x,
            ecliptic.y * cos_eps - ecliptic.z * sin_eps,
            ecliptic.y * sin_eps + ecliptic.z * cos_eps,
        ))
    }
}

/// Linearly interpolated position table. Valid between its first and last sample.
#[derive(Debug, Clone, PartialEq)]
pub struct TabulatedEphemeris {
    samples: Vec<(Epoch, Vector3<f64>)>,
}

impl TabulatedEphemeris {
    /// Build a table from samples sorted by strictly increasing epoch.
    ///
    /// Return
    /// ------
    /// * `PropagationError::InvalidEphemerisTable` if fewer than two samples are given or if the
    ///   epochs are not strictly ascending.
    pub fn new(samples: Vec<(Epoch, Vector3<f64>)>) -> Result<Self, PropagationError> {
        if samples.len() < 2 {
            return Err(PropagationError::InvalidEphemerisTable(format!(
                "at least two samples are required, got {}",
                samples.len()
            )));
        }
        if let Some(((t0, _), (t1, _))) = samples
            .iter()
            .tuple_windows()
            .find(|((t0, _), (t1, _))| t0 >= t1)
        {
            return Err(PropagationError::InvalidEphemerisTable(format!(
                "epochs must be strictly ascending ({t0} followed by {t1})"
            )));
        }
        Ok(TabulatedEphemeris { samples })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl BodyEphemeris for TabulatedEphemeris {
    fn position(&self, epoch: Epoch) -> Option<Vector3<f64>> {
        let (first, _) = self.samples.first()?;
        let (last, _) = self.samples.last()?;
        if epoch < *first || epoch > *last {
            return None;
        }

        let upper = self
            .samples
            .partition_point(|(t, _)| *t < epoch)
            .max(1);
        let (t0, p0) = &self.samples[upper - 1];
        let (t1, p1) = &self.samples[upper];

        let fraction = seconds_between(*t0, epoch) / seconds_between(*t0, *t1);
        Some(p0 + (p1 - p0) * fraction)
    }
}

/// One layer of a piecewise exponential density model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtmosphereLayer {
    /// Base altitude (km)
    pub base_altitude: f64,
    /// Density at the base altitude (kg/m³)
    pub base_density: f64,
    /// Scale height (km)
    pub scale_height: f64,
}

/// Piecewise exponential atmosphere, layers sorted by base altitude.
#[derive(Debug, Clone, PartialEq)]
pub struct ExponentialAtmosphere {
    layers: Vec<AtmosphereLayer>,
}

impl ExponentialAtmosphere {
    pub fn new(mut layers: Vec<AtmosphereLayer>) -> Self {
        layers.sort_by(|a, b| a.base_altitude.total_cmp(&b.base_altitude));
        ExponentialAtmosphere { layers }
    }

    /// Exponential model of the terrestrial atmosphere (Vallado, table 8-4).
    pub fn vallado() -> Self {
        const TABLE: [(f64, f64, f64); 28] = [
            (0.0, 1.225, 7.249),
            (25.0, 3.899e-2, 6.349),
            (30.0, 1.774e-2, 6.682),
            (40.0, 3.972e-3, 7.554),
            (50.0, 1.057e-3, 8.382),
            (60.0, 3.206e-4, 7.714),
            (70.0, 8.770e-5, 6.549),
            (80.0, 1.905e-5, 5.799),
            (90.0, 3.396e-6, 5.382),
            (100.0, 5.297e-7, 5.877),
            (110.0, 9.661e-8, 7.263),
            (120.0, 2.438e-8, 9.473),
            (130.0, 8.484e-9, 12.636),
            (140.0, 3.845e-9, 16.149),
            (150.0, 2.070e-9, 22.523),
            (180.0, 5.464e-10, 29.740),
            (200.0, 2.789e-10, 37.105),
            (250.0, 7.248e-11, 45.546),
            (300.0, 2.418e-11, 53.628),
            (350.0, 9.518e-12, 53.298),
            (400.0, 3.725e-12, 58.515),
            (450.0, 1.585e-12, 60.828),
            (500.0, 6.967e-13, 63.822),
            (600.0, 1.454e-13, 71.835),
            (700.0, 3.614e-14, 88.667),
            (800.0, 1.170e-14, 124.64),
            (900.0, 5.245e-15, 181.05),
            (1000.0, 3.019e-15, 268.00),
        ];
        ExponentialAtmosphere::new(
            TABLE
                .iter()
                .map(|&(base_altitude, base_density, scale_height)| AtmosphereLayer {
                    base_altitude,
                    base_density,
                    scale_height,
                })
                .collect(),
        )
    }

    /// Density in kg/m³ at the given altitude in km.
    ///
    /// Altitudes below the first layer use the first layer; altitudes above the last layer
    /// keep decaying with the last scale height.
    pub fn density(&self, altitude: f64) -> f64 {
        let idx = self
            .layers
            .partition_point(|layer| layer.base_altitude <= altitude)
            .saturating_sub(1);
        match self.layers.get(idx) {
            Some(layer) => {
                layer.base_density
                    * (-(altitude - layer.base_altitude) / layer.scale_height).exp()
            }
            None => 0.0,
        }
    }
}

/// Physical description of a celestial body.
#[derive(Debug, Clone)]
pub struct CelestialBody {
    pub name: String,
    /// Gravitational parameter (km³/s²)
    pub mu: f64,
    pub j2: f64,
    /// Equatorial radius (km)
    pub equatorial_radius: f64,
    /// Polar radius (km)
    pub polar_radius: f64,
    /// Rotation rate (rad/s)
    pub rotation_rate: f64,
    pub atmosphere: Option<ExponentialAtmosphere>,
    pub ephemeris: Option<Arc<dyn BodyEphemeris>>,
}

impl CelestialBody {
    pub fn earth() -> Self {
        CelestialBody {
            name: "Earth".to_string(),
            mu: EARTH_MU,
            j2: EARTH_J2,
            equatorial_radius: EARTH_EQUATORIAL_RADIUS,
            polar_radius: EARTH_POLAR_RADIUS,
            rotation_rate: EARTH_ROTATION_RATE,
            atmosphere: Some(ExponentialAtmosphere::vallado()),
            ephemeris: None,
        }
    }

    pub fn moon() -> Self {
        CelestialBody {
            name: "Moon".to_string(),
            mu: MOON_MU,
            j2: MOON_J2,
            equatorial_radius: MOON_EQUATORIAL_RADIUS,
            polar_radius: MOON_EQUATORIAL_RADIUS,
            rotation_rate: MOON_ROTATION_RATE,
            atmosphere: None,
            ephemeris: Some(Arc::new(MeanCircularEphemeris::moon())),
        }
    }

    pub fn sun() -> Self {
        CelestialBody {
            name: "Sun".to_string(),
            mu: SUN_MU,
            j2: 0.0,
            equatorial_radius: SUN_EQUATORIAL_RADIUS,
            polar_radius: SUN_EQUATORIAL_RADIUS,
            rotation_rate: SUN_ROTATION_RATE,
            atmosphere: None,
            ephemeris: Some(Arc::new(MeanCircularEphemeris::sun())),
        }
    }

    /// Replace the position provider of the body.
    pub fn with_ephemeris(mut self, ephemeris: Arc<dyn BodyEphemeris>) -> Self {
        self.ephemeris = Some(ephemeris);
        self
    }

    /// Position relative to the central body of the system (km).
    ///
    /// Return
    /// ------
    /// * `PropagationError::MissingEphemeris` if the body has no position provider.
    /// * `PropagationError::EphemerisOutOfRange` if `epoch` is outside the provider validity.
    pub fn position_at(&self, epoch: Epoch) -> Result<Vector3<f64>, PropagationError> {
        let ephemeris = self
            .ephemeris
            .as_ref()
            .ok_or_else(|| PropagationError::MissingEphemeris(self.name.clone()))?;
        ephemeris
            .position(epoch)
            .ok_or_else(|| PropagationError::EphemerisOutOfRange {
                body: self.name.clone(),
                epoch: epoch.to_string(),
            })
    }

    /// Atmospheric density (kg/m³) at the given altitude (km), zero without atmosphere.
    pub fn atmospheric_density(&self, altitude: f64) -> f64 {
        self.atmosphere
            .as_ref()
            .map_or(0.0, |atmosphere| atmosphere.density(altitude))
    }
}

impl fmt::Display for CelestialBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "  mu                = {:.6} km^3/s^2", self.mu)?;
        writeln!(f, "  J2                = {:.8e}", self.j2)?;
        writeln!(f, "  equatorial radius = {:.3} km", self.equatorial_radius)?;
        write!(f, "  rotation rate     = {:.6e} rad/s", self.rotation_rate)
    }
}
