#![warn(missing_docs)]
//! Module for handling paraxial rays
use std::fmt::Display;

use nalgebra::{Matrix2, Point2, Vector2};
use num::Zero;
use serde::{Deserialize, Serialize};
use uom::si::{f64::Length, length::millimeter};

use crate::{
    error::{ParaxError, ParaxResult},
    matrix, meter,
};

/// Struct that contains all information about a paraxial ray
///
/// The ray state is the 2-vector `(h, θ)` of height above the optical axis and (reduced) ray
/// angle, together with the current axial position `z`. Whether `θ` denotes the plain or the
/// reduced angle `n·θ` is a convention of the caller; the transfer matrices do not depend on it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ParaxialRay {
    /// current axial position of the ray
    pos: Length,
    /// current height above the optical axis
    height: Length,
    /// current (reduced) ray angle
    angle: f64,
    /// history of `(z, h)` samples of the ray path
    pos_hist: Vec<Point2<Length>>,
}
impl ParaxialRay {
    /// Creates a new [`ParaxialRay`] at axial position 0.
    ///
    /// # Errors
    /// This function returns an error if the given height or angle is not finite.
    pub fn new(height: Length, angle: f64) -> ParaxResult<Self> {
        if !height.is_finite() {
            return Err(ParaxError::InvalidArgument(
                "ray height must be finite".into(),
            ));
        }
        if !angle.is_finite() {
            return Err(ParaxError::InvalidArgument(
                "ray angle must be finite".into(),
            ));
        }
        Ok(Self {
            pos: Length::zero(),
            height,
            angle,
            pos_hist: Vec::<Point2<Length>>::with_capacity(16),
        })
    }
    /// Returns the current axial position of this [`ParaxialRay`].
    #[must_use]
    pub fn position(&self) -> Length {
        self.pos
    }
    /// Returns the current height of this [`ParaxialRay`] above the optical axis.
    #[must_use]
    pub fn height(&self) -> Length {
        self.height
    }
    /// Returns the current (reduced) angle of this [`ParaxialRay`].
    #[must_use]
    pub const fn angle(&self) -> f64 {
        self.angle
    }
    /// Place the ray at the given axial position without altering its state vector.
    pub(crate) fn set_position(&mut self, pos: Length) {
        self.pos = pos;
    }
    /// Adds the current `(z, h)` sample to the position history of the ray.
    ///
    /// This is, for example, necessary for recording the position when the ray is stopped at a
    /// diaphragm.
    pub(crate) fn record_position(&mut self) {
        self.pos_hist.push(Point2::new(self.pos, self.height));
    }
    /// Apply a ray-transfer matrix to the state vector of this [`ParaxialRay`].
    ///
    /// The axial position is unchanged; transfer matrices act at a fixed reference plane.
    pub fn transform(&mut self, matrix: &Matrix2<f64>) {
        let vector = matrix * Vector2::new(self.height.value, self.angle);
        self.height = meter!(vector[0]);
        self.angle = vector[1];
    }
    /// Propagate the ray freely along the optical axis by the given distance.
    ///
    /// The height transforms as `h' = h - d·θ`, following the sign convention of
    /// [`matrix::propagation`]. The starting point is appended to the position history.
    ///
    /// # Errors
    /// This function returns an error if the propagation distance is not finite.
    pub fn propagate(&mut self, distance: Length) -> ParaxResult<()> {
        if !distance.is_finite() {
            return Err(ParaxError::InvalidArgument(
                "propagation distance must be finite".into(),
            ));
        }
        self.record_position();
        self.transform(&matrix::propagation(distance));
        self.pos += distance;
        Ok(())
    }
    /// Returns the position history of this [`ParaxialRay`].
    ///
    /// This function returns all `(z, h)` samples of the ray path recorded so far.
    /// **Note**: This function adds the current ray position to the list.
    #[must_use]
    pub fn position_history(&self) -> Vec<Point2<Length>> {
        let mut positions = self.pos_hist.clone();
        positions.push(Point2::new(self.pos, self.height));
        positions
    }
}

impl Display for ParaxialRay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "height: {:.4} mm, angle: {:.6} rad @ position {:.4} mm",
            self.height.get::<millimeter>(),
            self.angle,
            self.pos.get::<millimeter>()
        )
    }
}
