//! This is the documentation for the **PARAX** software package, a paraxial
//! (first-order) simulator for sequential optical systems based on the ABCD
//! ray-transfer-matrix formalism.
//!
//! An [`OpticalSystem`] is built up from lenses, mirrors and diaphragms placed
//! along the optical axis; rays are then propagated through the
//! position-ordered elements to obtain their exit state or the diaphragm that
//! stops them.
//!
//! # Example
//!
//! ```rust
//! use parax::error::ParaxResult;
//! use parax::millimeter;
//! use parax::{OpticalSystem, SurfaceCurvature, TraceOutcome};
//!
//! fn main() -> ParaxResult<()> {
//!     let mut system = OpticalSystem::new(1.0)?;
//!     system.add_thin_lens(millimeter!(25.0), millimeter!(100.0), None)?;
//!     system.add_diaphragm(millimeter!(10.0), millimeter!(50.0))?;
//!     system.add_thick_lens(
//!         millimeter!(25.0),
//!         SurfaceCurvature::Curved(millimeter!(200.0)),
//!         SurfaceCurvature::Flat,
//!         millimeter!(4.0),
//!         1.5,
//!         Some(millimeter!(80.0)),
//!     )?;
//!     match system.ray_trace(millimeter!(2.0), 0.0)? {
//!         TraceOutcome::Transmitted(ray) => println!("{ray}"),
//!         TraceOutcome::Blocked { .. } => println!("ray blocked"),
//!     }
//!     Ok(())
//! }
//! ```
#![allow(clippy::module_name_repetitions)]

pub mod console;
pub mod element;
pub mod error;
pub mod matrix;
pub mod optic_system;
pub mod plottable;
pub mod ray;
pub mod utils;

pub use element::{ElementType, OpticElement};
pub use matrix::SurfaceCurvature;
pub use optic_system::{OpticalSystem, TraceOutcome};
pub use ray::ParaxialRay;
