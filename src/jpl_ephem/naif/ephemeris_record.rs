//! Type 2 ephemeris records and their Chebyshev evaluation.
//!
//! Each record holds its midpoint and half-span (ET seconds) then `n`
//! coefficients per axis. With `τ = (et - mid) / radius`:
//!
//! ```text
//! x(et)  = Σ cₖ Tₖ(τ)
//! x'(et) = Σ cₖ Tₖ'(τ) / radius
//! ```
use nalgebra::Vector3;
use nom::{
    multi::count,
    number::complete::le_f64,
    IResult, Parser,
};

use crate::celestial_errors::CelestialError;

#[derive(Debug, Clone, PartialEq)]
pub struct EphemerisRecord {
    /// Midpoint of the record span (ET seconds).
    pub mid: f64,
    /// Half-span of the record (seconds).
    pub radius: f64,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl EphemerisRecord {
    fn parse_words(input: &[u8], ncoeff: usize) -> IResult<&[u8], Self> {
        let (input, (mid, radius, x, y, z)) = (
            le_f64,
            le_f64,
            count(le_f64, ncoeff),
            count(le_f64, ncoeff),
            count(le_f64, ncoeff),
        )
            .parse(input)?;
        Ok((
            input,
            EphemerisRecord {
                mid,
                radius,
                x,
                y,
                z,
            },
        ))
    }

    /// Decode one record of `ncoeff` coefficients per axis.
    pub fn parse(input: &[u8], ncoeff: usize) -> Result<Self, CelestialError> {
        let (_, record) = EphemerisRecord::parse_words(input, ncoeff)
            .map_err(|e| CelestialError::NomParsingError(format!("ephemeris record: {e}")))?;
        if record.radius <= 0.0 {
            return Err(CelestialError::EphemerisUnavailable(format!(
                "ephemeris record with non-positive radius {}",
                record.radius
            )));
        }
        Ok(record)
    }

    /// Position (km) and velocity (km/s) at `et_seconds`.
    ///
    /// The normalized time is clamped to `[-1, 1]`, so epochs a hair outside
    /// the record are evaluated at its edge.
    pub fn interpolate(&self, et_seconds: f64) -> (Vector3<f64>, Vector3<f64>) {
        let tau = ((et_seconds - self.mid) / self.radius).clamp(-1.0, 1.0);
        let n = self.x.len();

        let mut t = vec![0.0; n.max(2)];
        let mut dt = vec![0.0; n.max(2)];
        t[0] = 1.0;
        t[1] = tau;
        dt[1] = 1.0;
        for k in 2..n {
            t[k] = 2.0 * tau * t[k - 1] - t[k - 2];
            dt[k] = 2.0 * t[k - 1] + 2.0 * tau * dt[k - 1] - dt[k - 2];
        }

        let series = |coeffs: &[f64], basis: &[f64]| -> f64 {
            coeffs.iter().zip(basis).map(|(c, b)| c * b).sum()
        };

        let position = Vector3::new(series(&self.x, &t), series(&self.y, &t), series(&self.z, &t));
        let velocity = Vector3::new(
            series(&self.x, &dt),
            series(&self.y, &dt),
            series(&self.z, &dt),
        ) / self.radius;

        (position, velocity)
    }
}
