#![warn(missing_docs)]
//! The basic structure containing the entire paraxial optical model
use std::fmt::Display;

use log::{info, warn};
use nalgebra::Matrix2;
use num::Zero;
use serde::{Deserialize, Serialize};
use uom::si::{f64::Length, length::millimeter};
use uuid::Uuid;

use crate::{
    element::{ElementType, OpticElement},
    error::{ParaxError, ParaxResult},
    matrix::{self, SurfaceCurvature},
    ray::ParaxialRay,
};

/// Sequential paraxial optical system.
///
/// An [`OpticalSystem`] owns the ambient refractive index and the collection of optical
/// elements. Elements may be added in any order; they are sorted by axial position when a ray
/// is traced.
///
/// # Example
///
/// ```rust
/// use parax::error::ParaxResult;
/// use parax::meter;
/// use parax::OpticalSystem;
///
/// fn main() -> ParaxResult<()> {
///   let mut system = OpticalSystem::default();
///   system.add_thin_lens(meter!(0.05), meter!(0.1), None)?;
///   let outcome = system.ray_trace(meter!(0.01), 0.0)?;
///   assert!(!outcome.is_blocked());
///   Ok(())
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpticalSystem {
    ambient_idx: f64,
    elements: Vec<OpticElement>,
}

impl Default for OpticalSystem {
    /// Create an optical system surrounded by vacuum (ambient index 1.0).
    fn default() -> Self {
        Self {
            ambient_idx: 1.0,
            elements: Vec::default(),
        }
    }
}

impl OpticalSystem {
    /// Creates a new [`OpticalSystem`] with the given ambient refractive index.
    ///
    /// # Errors
    /// This function returns an error if the given index is not positive and finite.
    pub fn new(ambient_idx: f64) -> ParaxResult<Self> {
        if ambient_idx <= 0.0 || !ambient_idx.is_finite() {
            return Err(ParaxError::InvalidArgument(
                "ambient refractive index must be positive and finite".into(),
            ));
        }
        Ok(Self {
            ambient_idx,
            elements: Vec::default(),
        })
    }
    /// Returns the ambient refractive index of this [`OpticalSystem`].
    #[must_use]
    pub const fn ambient_idx(&self) -> f64 {
        self.ambient_idx
    }
    /// Returns `true` if the system does not contain any elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
    /// Returns the number of elements of this [`OpticalSystem`].
    #[must_use]
    pub fn nr_of_elements(&self) -> usize {
        self.elements.len()
    }
    /// Returns the element with the given UUID, if present.
    #[must_use]
    pub fn element(&self, uuid: &Uuid) -> Option<&OpticElement> {
        self.elements.iter().find(|e| &e.uuid() == uuid)
    }
    /// Returns the elements of this [`OpticalSystem`].
    ///
    /// The elements appear in insertion order until the first trace; afterwards they stay
    /// sorted by axial position.
    #[must_use]
    pub fn elements(&self) -> &[OpticElement] {
        &self.elements
    }

    /// Resolve the axial position of an element about to be added.
    ///
    /// The first (non-diaphragm) element of an empty system is anchored at position 0; a
    /// position supplied by the caller is ignored with a warning. All further elements require
    /// an explicit position.
    fn anchored_position(&self, position: Option<Length>) -> ParaxResult<Length> {
        if self.elements.is_empty() {
            if let Some(pos) = position {
                if !pos.is_zero() {
                    warn!(
                        "position {:.4} mm of the first element is ignored, anchoring at 0",
                        pos.get::<millimeter>()
                    );
                }
            }
            Ok(Length::zero())
        } else {
            position.ok_or_else(|| {
                ParaxError::InvalidArgument(
                    "an explicit position is required for all but the first element".into(),
                )
            })
        }
    }
    fn append_element(
        &mut self,
        element_type: ElementType,
        diameter: Length,
        position: Length,
        matrix: Matrix2<f64>,
    ) -> ParaxResult<Uuid> {
        let element = OpticElement::new(element_type, diameter, position, matrix)?;
        let uuid = element.uuid();
        self.elements.push(element);
        Ok(uuid)
    }
    /// Add a thin lens with the given clear-aperture diameter and image focal length.
    ///
    /// The first element added to an empty system is anchored at position 0 and may pass
    /// `None`; all further elements require an explicit position.
    ///
    /// # Errors
    /// This function returns an error if
    ///  - the given focal length is 0.0 ([`ParaxError::Domain`])
    ///  - the diameter is negative, a parameter is not finite, or the position is missing on a
    ///    non-empty system ([`ParaxError::InvalidArgument`])
    pub fn add_thin_lens(
        &mut self,
        diameter: Length,
        focal_length: Length,
        position: Option<Length>,
    ) -> ParaxResult<Uuid> {
        let matrix = matrix::thin_lens(focal_length)?;
        let position = self.anchored_position(position)?;
        self.append_element(ElementType::ThinLens, diameter, position, matrix)
    }
    /// Add a thick lens defined by its two surface curvatures, center thickness and material
    /// refractive index.
    ///
    /// The position refers to the vertex of the front surface. The ambient refractive index of
    /// the system is used as the outside medium of both surfaces.
    ///
    /// # Errors
    /// This function returns an error if
    ///  - one of the curvatures is spherical with a zero radius ([`ParaxError::Domain`])
    ///  - the diameter is negative, a curvature radius is not finite, the thickness is negative
    ///    or not finite, the lens index is not positive and finite, or the position is missing
    ///    on a non-empty system ([`ParaxError::InvalidArgument`])
    pub fn add_thick_lens(
        &mut self,
        diameter: Length,
        front_curvature: SurfaceCurvature,
        rear_curvature: SurfaceCurvature,
        center_thickness: Length,
        lens_idx: f64,
        position: Option<Length>,
    ) -> ParaxResult<Uuid> {
        let matrix = matrix::thick_lens(
            front_curvature,
            rear_curvature,
            center_thickness,
            self.ambient_idx,
            lens_idx,
        )?;
        let position = self.anchored_position(position)?;
        self.append_element(ElementType::ThickLens, diameter, position, matrix)
    }
    /// Add a flat mirror with the given clear-aperture diameter.
    ///
    /// # Errors
    /// This function returns an error if the diameter is negative or not finite, or the
    /// position is missing on a non-empty system ([`ParaxError::InvalidArgument`]).
    pub fn add_flat_mirror(
        &mut self,
        diameter: Length,
        position: Option<Length>,
    ) -> ParaxResult<Uuid> {
        let position = self.anchored_position(position)?;
        self.append_element(
            ElementType::FlatMirror,
            diameter,
            position,
            matrix::flat_mirror(),
        )
    }
    /// Add a spherical mirror with the given clear-aperture diameter and radius of curvature.
    ///
    /// # Errors
    /// This function returns an error if
    ///  - the given radius is 0.0 ([`ParaxError::Domain`])
    ///  - the diameter is negative, the radius is not finite, or the position is missing on a
    ///    non-empty system ([`ParaxError::InvalidArgument`])
    pub fn add_spherical_mirror(
        &mut self,
        diameter: Length,
        radius: Length,
        position: Option<Length>,
    ) -> ParaxResult<Uuid> {
        let matrix = matrix::spherical_mirror(radius)?;
        let position = self.anchored_position(position)?;
        self.append_element(ElementType::SphericalMirror, diameter, position, matrix)
    }
    /// Add a diaphragm (aperture stop) with the given clear diameter.
    ///
    /// A diaphragm does not alter the ray state; it only stops rays outside its clear
    /// diameter. Unlike the other elements, a diaphragm always requires an explicit position
    /// and is never anchored at 0, even as the first element of an empty system.
    ///
    /// # Errors
    /// This function returns an error if the diameter is negative or a parameter is not finite
    /// ([`ParaxError::InvalidArgument`]).
    pub fn add_diaphragm(&mut self, diameter: Length, position: Length) -> ParaxResult<Uuid> {
        self.append_element(
            ElementType::Diaphragm,
            diameter,
            position,
            Matrix2::identity(),
        )
    }

    /// Trace a ray with the given entry height and (reduced) angle through the system.
    ///
    /// The elements are sorted by axial position (stable, ties keep insertion order) and the
    /// ray is propagated through them in sequence: at each element the transfer matrix is
    /// applied if the ray lies within the clear aperture (an element is silently skipped
    /// otherwise), diaphragms stop the trace if the ray height reaches half their clear
    /// diameter, and free space between consecutive elements is bridged with
    /// [`matrix::propagation`]. The sort is an idempotent normalization; repeated traces with
    /// the same inputs yield identical results.
    ///
    /// A blocked ray is a normal outcome, reported as [`TraceOutcome::Blocked`], not an error.
    ///
    /// # Errors
    /// This function returns an error if
    ///  - the system contains no elements ([`ParaxError::EmptySystem`])
    ///  - height or angle are not finite ([`ParaxError::InvalidArgument`])
    pub fn ray_trace(&mut self, height: Length, angle: f64) -> ParaxResult<TraceOutcome> {
        if self.elements.is_empty() {
            return Err(ParaxError::EmptySystem(
                "the system does not contain any elements".into(),
            ));
        }
        self.elements
            .sort_by(|a, b| a.position().value.total_cmp(&b.position().value));
        let mut ray = ParaxialRay::new(height, angle)?;
        ray.set_position(self.elements[0].position());
        info!(
            "tracing ray ({ray}) through {} elements",
            self.elements.len()
        );
        let last_idx = self.elements.len() - 1;
        for (idx, element) in self.elements.iter().enumerate() {
            if element.element_type() == ElementType::Diaphragm {
                if element.blocks(ray.height()) {
                    info!(
                        "ray stopped at diaphragm at position {:.4} mm",
                        element.position().get::<millimeter>()
                    );
                    ray.record_position();
                    return Ok(TraceOutcome::Blocked {
                        position: element.position(),
                        ray,
                    });
                }
            } else if element.within_aperture(ray.height()) {
                ray.transform(element.matrix());
            } else {
                warn!(
                    "ray height {:.4} mm outside the clear aperture of the {} at position {:.4} mm, element skipped",
                    ray.height().get::<millimeter>(),
                    element.element_type(),
                    element.position().get::<millimeter>()
                );
            }
            if idx < last_idx {
                let distance = self.elements[idx + 1].position() - element.position();
                ray.propagate(distance)?;
            }
        }
        Ok(TraceOutcome::Transmitted(ray))
    }
}

/// The terminal outcome of a ray trace.
///
/// A trace is a single linear pass which either completes or is stopped at a diaphragm. Both
/// are normal outcomes; failures (e.g. tracing through an empty system) are reported as
/// [`ParaxError`](crate::error::ParaxError) instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TraceOutcome {
    /// the ray passed all elements; the final state refers to the last element's position
    Transmitted(ParaxialRay),
    /// the ray was stopped by a diaphragm
    Blocked {
        /// axial position of the blocking diaphragm
        position: Length,
        /// the ray state at the blocking diaphragm
        ray: ParaxialRay,
    },
}
impl TraceOutcome {
    /// Returns `true` if the ray was stopped by a diaphragm.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }
    /// Returns the traced ray, including its position history.
    #[must_use]
    pub const fn ray(&self) -> &ParaxialRay {
        match self {
            Self::Transmitted(ray) | Self::Blocked { ray, .. } => ray,
        }
    }
}
impl Display for TraceOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transmitted(ray) => write!(f, "ray exits with {ray}"),
            Self::Blocked { position, .. } => write!(
                f,
                "ray stopped at the diaphragm at position {:.4} mm",
                position.get::<millimeter>()
            ),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{meter, millimeter};
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use nalgebra::Vector2;

    #[test]
    fn default() {
        let system = OpticalSystem::default();
        assert_abs_diff_eq!(system.ambient_idx(), 1.0);
        assert!(system.is_empty());
        assert_eq!(system.nr_of_elements(), 0);
    }
    #[test]
    fn new() {
        assert!(OpticalSystem::new(1.33).is_ok());
        assert_matches!(
            OpticalSystem::new(0.0),
            Err(ParaxError::InvalidArgument(_))
        );
        assert_matches!(
            OpticalSystem::new(-1.0),
            Err(ParaxError::InvalidArgument(_))
        );
        assert_matches!(
            OpticalSystem::new(f64::NAN),
            Err(ParaxError::InvalidArgument(_))
        );
        assert_matches!(
            OpticalSystem::new(f64::INFINITY),
            Err(ParaxError::InvalidArgument(_))
        );
    }
    #[test]
    fn first_element_anchored_at_zero() {
        let mut system = OpticalSystem::default();
        let uuid = system
            .add_thin_lens(millimeter!(10.0), millimeter!(50.0), Some(millimeter!(25.0)))
            .unwrap();
        assert_abs_diff_eq!(system.element(&uuid).unwrap().position().value, 0.0);
    }
    #[test]
    fn further_elements_require_position() {
        let mut system = OpticalSystem::default();
        system
            .add_thin_lens(millimeter!(10.0), millimeter!(50.0), None)
            .unwrap();
        assert_matches!(
            system.add_thin_lens(millimeter!(10.0), millimeter!(50.0), None),
            Err(ParaxError::InvalidArgument(_))
        );
        assert!(system
            .add_thin_lens(millimeter!(10.0), millimeter!(50.0), Some(millimeter!(30.0)))
            .is_ok());
    }
    #[test]
    fn diaphragm_is_never_anchored() {
        let mut system = OpticalSystem::default();
        let uuid = system
            .add_diaphragm(millimeter!(2.0), millimeter!(5.0))
            .unwrap();
        let diaphragm = system.element(&uuid).unwrap();
        assert_abs_diff_eq!(diaphragm.position().get::<millimeter>(), 5.0);
        assert_eq!(diaphragm.element_type(), ElementType::Diaphragm);
        // the diaphragm does not consume the anchoring of the first optical element
        let uuid = system
            .add_thin_lens(millimeter!(10.0), millimeter!(50.0), Some(millimeter!(25.0)))
            .unwrap();
        assert_abs_diff_eq!(system.element(&uuid).unwrap().position().value, 0.0);
    }
    #[test]
    fn ignored_first_position_warns() {
        testing_logger::setup();
        let mut system = OpticalSystem::default();
        system
            .add_thin_lens(millimeter!(10.0), millimeter!(50.0), Some(millimeter!(25.0)))
            .unwrap();
        testing_logger::validate(|captured_logs| {
            let warnings: Vec<_> = captured_logs
                .iter()
                .filter(|l| l.level == log::Level::Warn)
                .collect();
            assert_eq!(warnings.len(), 1);
            assert!(warnings[0].body.contains("anchoring at 0"));
        });
    }
    #[test]
    fn skipped_element_warns() {
        testing_logger::setup();
        let mut system = OpticalSystem::default();
        system
            .add_thin_lens(meter!(2.0), meter!(5.0), None)
            .unwrap();
        system.ray_trace(meter!(1.5), 0.0).unwrap();
        testing_logger::validate(|captured_logs| {
            let warnings: Vec<_> = captured_logs
                .iter()
                .filter(|l| l.level == log::Level::Warn)
                .collect();
            assert_eq!(warnings.len(), 1);
            assert!(warnings[0].body.contains("element skipped"));
        });
    }
    #[test]
    fn failed_add_leaves_system_unchanged() {
        let mut system = OpticalSystem::default();
        assert!(system
            .add_thin_lens(millimeter!(10.0), millimeter!(0.0), None)
            .is_err());
        assert!(system.is_empty());
        assert!(system
            .add_spherical_mirror(millimeter!(-10.0), millimeter!(100.0), None)
            .is_err());
        assert!(system.is_empty());
    }
    #[test]
    fn trace_single_thin_lens() {
        let mut system = OpticalSystem::new(1.0).unwrap();
        system
            .add_thin_lens(meter!(10.0), meter!(5.0), None)
            .unwrap();
        let outcome = system.ray_trace(meter!(1.0), 0.0).unwrap();
        assert!(!outcome.is_blocked());
        let ray = outcome.ray();
        assert_abs_diff_eq!(ray.height().value, 1.0);
        assert_abs_diff_eq!(ray.angle(), -0.2);
        assert_abs_diff_eq!(ray.position().value, 0.0);
    }
    #[test]
    fn trace_blocked_at_diaphragm() {
        let mut system = OpticalSystem::default();
        system
            .add_diaphragm(meter!(2.0), meter!(0.0))
            .unwrap();
        let outcome = system.ray_trace(meter!(1.5), 0.0).unwrap();
        assert_matches!(
            outcome,
            TraceOutcome::Blocked { position, .. } if position.value == 0.0
        );
    }
    #[test]
    fn trace_diaphragm_boundary() {
        let mut system = OpticalSystem::default();
        system
            .add_diaphragm(meter!(2.0), meter!(0.0))
            .unwrap();
        // exactly half the diameter is blocked
        assert!(system.ray_trace(meter!(1.0), 0.0).unwrap().is_blocked());
        assert!(system.ray_trace(meter!(-1.0), 0.0).unwrap().is_blocked());
        // infinitesimally below is not
        assert!(!system
            .ray_trace(meter!(1.0 - 1e-12), 0.0)
            .unwrap()
            .is_blocked());
    }
    #[test]
    fn trace_element_aperture_boundary() {
        // a lens is still applied at exactly half its diameter
        let mut system = OpticalSystem::default();
        system
            .add_thin_lens(meter!(2.0), meter!(5.0), None)
            .unwrap();
        let outcome = system.ray_trace(meter!(1.0), 0.0).unwrap();
        assert_abs_diff_eq!(outcome.ray().angle(), -0.2);
        let outcome = system.ray_trace(meter!(-1.0), 0.0).unwrap();
        assert_abs_diff_eq!(outcome.ray().angle(), 0.2);
    }
    #[test]
    fn trace_element_skipped_outside_aperture() {
        // outside the clear aperture the lens is skipped, the ray passes unchanged
        let mut system = OpticalSystem::default();
        system
            .add_thin_lens(meter!(2.0), meter!(5.0), None)
            .unwrap();
        let outcome = system.ray_trace(meter!(1.5), 0.1).unwrap();
        assert!(!outcome.is_blocked());
        assert_abs_diff_eq!(outcome.ray().height().value, 1.5);
        assert_abs_diff_eq!(outcome.ray().angle(), 0.1);
    }
    #[test]
    fn trace_empty_system() {
        let mut system = OpticalSystem::default();
        assert_matches!(
            system.ray_trace(meter!(1.0), 0.0),
            Err(ParaxError::EmptySystem(_))
        );
    }
    #[test]
    fn trace_invalid_ray() {
        let mut system = OpticalSystem::default();
        system
            .add_thin_lens(meter!(10.0), meter!(5.0), None)
            .unwrap();
        assert_matches!(
            system.ray_trace(meter!(f64::NAN), 0.0),
            Err(ParaxError::InvalidArgument(_))
        );
        assert_matches!(
            system.ray_trace(meter!(1.0), f64::INFINITY),
            Err(ParaxError::InvalidArgument(_))
        );
    }
    #[test]
    fn trace_two_lens_composition() {
        // manual composition: lens2 · propagation(10) · lens1 applied to the entry vector
        let f1 = meter!(5.0);
        let f2 = meter!(2.0);
        let mut system = OpticalSystem::default();
        system.add_thin_lens(meter!(10.0), f1, None).unwrap();
        system
            .add_thin_lens(meter!(10.0), f2, Some(meter!(10.0)))
            .unwrap();
        let outcome = system.ray_trace(meter!(1.0), 0.05).unwrap();

        let composite = matrix::thin_lens(f2).unwrap()
            * matrix::propagation(meter!(10.0))
            * matrix::thin_lens(f1).unwrap();
        let expected = composite * Vector2::new(1.0, 0.05);
        assert_abs_diff_eq!(outcome.ray().height().value, expected[0], epsilon = 1e-12);
        assert_abs_diff_eq!(outcome.ray().angle(), expected[1], epsilon = 1e-12);
        assert_abs_diff_eq!(outcome.ray().position().value, 10.0);
    }
    #[test]
    fn trace_sorts_by_position() {
        // elements added out of order are traced in position order
        let f1 = meter!(5.0);
        let f2 = meter!(2.0);
        let mut forward = OpticalSystem::default();
        forward.add_thin_lens(meter!(10.0), f1, None).unwrap();
        forward
            .add_thin_lens(meter!(10.0), f2, Some(meter!(10.0)))
            .unwrap();
        // a wide diaphragm at the far end first, so the lenses can be added rear-to-front
        // with explicit positions
        let mut shuffled = OpticalSystem::default();
        shuffled.add_diaphragm(meter!(10.0), meter!(10.0)).unwrap();
        shuffled
            .add_thin_lens(meter!(10.0), f2, Some(meter!(10.0)))
            .unwrap();
        shuffled
            .add_thin_lens(meter!(10.0), f1, Some(meter!(0.0)))
            .unwrap();
        let a = forward.ray_trace(meter!(1.0), 0.0).unwrap();
        let b = shuffled.ray_trace(meter!(1.0), 0.0).unwrap();
        assert_abs_diff_eq!(
            a.ray().height().value,
            b.ray().height().value,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(a.ray().angle(), b.ray().angle(), epsilon = 1e-12);
    }
    #[test]
    fn trace_is_idempotent() {
        let mut system = OpticalSystem::default();
        system.add_thin_lens(meter!(10.0), meter!(5.0), None).unwrap();
        system
            .add_diaphragm(meter!(4.0), meter!(2.0))
            .unwrap();
        system
            .add_thin_lens(meter!(10.0), meter!(2.0), Some(meter!(10.0)))
            .unwrap();
        let first = system.ray_trace(meter!(1.0), 0.1).unwrap();
        let second = system.ray_trace(meter!(1.0), 0.1).unwrap();
        assert_eq!(first, second);
    }
    #[test]
    fn trace_flat_mirror() {
        let mut system = OpticalSystem::default();
        system.add_flat_mirror(meter!(10.0), None).unwrap();
        let outcome = system.ray_trace(meter!(1.0), 0.1).unwrap();
        assert_abs_diff_eq!(outcome.ray().height().value, 1.0);
        assert_abs_diff_eq!(outcome.ray().angle(), -0.1);
    }
    #[test]
    fn trace_free_space_sign_convention() {
        // two diaphragms 2 m apart: the ray crosses free space with h' = h - d·θ
        let mut system = OpticalSystem::default();
        system.add_diaphragm(meter!(10.0), meter!(0.0)).unwrap();
        system.add_diaphragm(meter!(10.0), meter!(2.0)).unwrap();
        let outcome = system.ray_trace(meter!(1.0), 0.1).unwrap();
        assert_abs_diff_eq!(outcome.ray().height().value, 1.0 - 2.0 * 0.1);
        assert_abs_diff_eq!(outcome.ray().position().value, 2.0);
    }
    #[test]
    fn outcome_display() {
        let mut system = OpticalSystem::default();
        system.add_diaphragm(millimeter!(2.0), millimeter!(5.0)).unwrap();
        let outcome = system.ray_trace(millimeter!(3.0), 0.0).unwrap();
        assert_eq!(
            format!("{outcome}"),
            "ray stopped at the diaphragm at position 5.0000 mm"
        );
    }
}
