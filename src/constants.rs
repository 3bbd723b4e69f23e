//! # Constants and type definitions for orbitflow
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! aliases** used throughout the propagation engine.
//!
//! ## Overview
//!
//! - Gravitational parameters and shape coefficients of the preset celestial bodies
//! - Unit conversions (degrees ↔ radians, days ↔ seconds, AU ↔ km, m ↔ km)
//! - Radii of the seed orbits used by tests and examples
//! - Core type aliases used across the crate
//!
//! All lengths are expressed in kilometers, times in seconds and angles in radians unless the
//! name of the constant says otherwise.

// -------------------------------------------------------------------------------------------------
// Unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of seconds in a week
pub const SECONDS_PER_WEEK: f64 = 7.0 * SECONDS_PER_DAY;

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU: f64 = 149_597_870.7;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Meters → kilometers
pub const M_TO_KM: f64 = 1.0e-3;

// -------------------------------------------------------------------------------------------------
// Celestial bodies
// -------------------------------------------------------------------------------------------------

/// Earth gravitational parameter (km³/s², EGM96)
pub const EARTH_MU: f64 = 398_600.441_8;

/// Earth second zonal harmonic
pub const EARTH_J2: f64 = 1.082_626_68e-3;

/// Earth equatorial radius in kilometers (WGS84)
pub const EARTH_EQUATORIAL_RADIUS: f64 = 6_378.137;

/// Earth polar radius in kilometers (WGS84)
pub const EARTH_POLAR_RADIUS: f64 = 6_356.752;

/// Earth sidereal rotation rate (rad/s)
pub const EARTH_ROTATION_RATE: f64 = 7.292_115e-5;

/// Moon gravitational parameter (km³/s²)
pub const MOON_MU: f64 = 4_902.800_066;

/// Moon second zonal harmonic
pub const MOON_J2: f64 = 2.027e-4;

/// Moon equatorial radius in kilometers
pub const MOON_EQUATORIAL_RADIUS: f64 = 1_738.1;

/// Moon rotation rate (rad/s), synchronous with its orbit
pub const MOON_ROTATION_RATE: f64 = 2.661_7e-6;

/// Mean Earth–Moon distance in kilometers
pub const MOON_MEAN_DISTANCE: f64 = 384_400.0;

/// Sidereal month in days
pub const MOON_SIDEREAL_PERIOD_DAYS: f64 = 27.321_661;

/// Mean longitude of the Moon at J2000 (degrees)
pub const MOON_MEAN_LONGITUDE_J2000_DEG: f64 = 218.316;

/// Inclination of the lunar orbit on the ecliptic (degrees)
pub const MOON_ORBIT_INCLINATION_DEG: f64 = 5.145;

/// Sun gravitational parameter (km³/s²)
pub const SUN_MU: f64 = 1.327_124_400_18e11;

/// Sun photospheric radius in kilometers (IAU 2015)
pub const SUN_EQUATORIAL_RADIUS: f64 = 695_700.0;

/// Sun rotation rate at the equator (rad/s)
pub const SUN_ROTATION_RATE: f64 = 2.865_3e-6;

/// Sidereal year in days
pub const SIDEREAL_YEAR_DAYS: f64 = 365.256_363;

/// Apparent geocentric mean longitude of the Sun at J2000 (degrees)
pub const SUN_MEAN_LONGITUDE_J2000_DEG: f64 = 280.460;

/// Mean obliquity of the ecliptic at J2000 (degrees)
pub const OBLIQUITY_J2000_DEG: f64 = 23.439_291;

/// Solar diameter used by the shadow model (km)
pub const SUN_SHADOW_DIAMETER: f64 = 696_000.0;

/// Mean solar radiation pressure at 1 AU (N/m²)
pub const SOLAR_PRESSURE_1AU: f64 = 4.556_485_540_406_757e-6;

// -------------------------------------------------------------------------------------------------
// Seed orbits
// -------------------------------------------------------------------------------------------------

/// Semi-major axis of the low Earth seed orbit (km)
pub const LEO_SEMI_MAJOR_AXIS: f64 = 7_000.0;

/// Semi-major axis of the lower medium Earth seed orbit (km)
pub const LMEO_SEMI_MAJOR_AXIS: f64 = 10_000.0;

/// Semi-major axis of the GPS-altitude seed orbit (km)
pub const GPS_SEMI_MAJOR_AXIS: f64 = 22_000.0;

/// Semi-major axis of the higher medium Earth seed orbit (km)
pub const HMEO_SEMI_MAJOR_AXIS: f64 = 30_000.0;

/// Semi-major axis of the geostationary seed orbit (km)
pub const GEO_SEMI_MAJOR_AXIS: f64 = 42_164.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in radians
pub type Radian = f64;

/// Distance in kilometers
pub type Kilometer = f64;

/// Elapsed time in seconds
pub type Second = f64;

/// Gravitational parameter in km³/s²
pub type GravParam = f64;
