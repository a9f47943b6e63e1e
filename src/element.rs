#![warn(missing_docs)]
//! Optical element records as stored by an [`OpticalSystem`](crate::optic_system::OpticalSystem)
use nalgebra::Matrix2;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use uom::si::f64::Length;
use uuid::Uuid;

use crate::error::{ParaxError, ParaxResult};

/// The kind of an [`OpticElement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ElementType {
    /// idealized lens of zero thickness
    ThinLens,
    /// lens of finite thickness with two refracting surfaces
    ThickLens,
    /// plane reflecting surface
    FlatMirror,
    /// spherical reflecting surface
    SphericalMirror,
    /// aperture stop which blocks rays outside its clear diameter but does not refract
    Diaphragm,
}

/// A single optical element of a sequential system.
///
/// An element packages its ray-transfer matrix with the geometric metadata needed for tracing:
/// the clear-aperture diameter and the axial position. Elements are immutable once created and
/// are referenced by their UUID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpticElement {
    uuid: Uuid,
    element_type: ElementType,
    diameter: Length,
    position: Length,
    matrix: Matrix2<f64>,
}
impl OpticElement {
    /// Creates a new [`OpticElement`].
    ///
    /// # Errors
    /// This function returns an error if the given diameter is negative or not finite, or the
    /// given position is not finite.
    pub fn new(
        element_type: ElementType,
        diameter: Length,
        position: Length,
        matrix: Matrix2<f64>,
    ) -> ParaxResult<Self> {
        if diameter.is_sign_negative() || !diameter.is_finite() {
            return Err(ParaxError::InvalidArgument(
                "diameter must be >= 0.0 and finite".into(),
            ));
        }
        if !position.is_finite() {
            return Err(ParaxError::InvalidArgument(
                "position must be finite".into(),
            ));
        }
        Ok(Self {
            uuid: Uuid::new_v4(),
            element_type,
            diameter,
            position,
            matrix,
        })
    }
    /// Returns the UUID of this [`OpticElement`].
    #[must_use]
    pub const fn uuid(&self) -> Uuid {
        self.uuid
    }
    /// Returns the kind of this [`OpticElement`].
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        self.element_type
    }
    /// Returns the clear-aperture diameter of this [`OpticElement`].
    #[must_use]
    pub fn diameter(&self) -> Length {
        self.diameter
    }
    /// Returns the axial position of this [`OpticElement`].
    #[must_use]
    pub fn position(&self) -> Length {
        self.position
    }
    /// Returns a reference to the ray-transfer matrix of this [`OpticElement`].
    #[must_use]
    pub const fn matrix(&self) -> &Matrix2<f64> {
        &self.matrix
    }
    /// Check whether a ray at the given height lies within the clear aperture.
    ///
    /// Both aperture boundaries are inclusive: a ray at exactly `±diameter/2` is still within
    /// the aperture.
    #[must_use]
    pub fn within_aperture(&self, height: Length) -> bool {
        let half_aperture = self.diameter / 2.0;
        -half_aperture <= height && height <= half_aperture
    }
    /// Check whether a diaphragm at this element's diameter stops a ray at the given height.
    ///
    /// Blocking is boundary inclusive: a ray at exactly `|h| = diameter/2` is stopped. This is
    /// deliberately not the negation of [`Self::within_aperture`], the two aperture policies
    /// differ at the boundary.
    #[must_use]
    pub fn blocks(&self, height: Length) -> bool {
        height.abs() >= self.diameter / 2.0
    }
}
