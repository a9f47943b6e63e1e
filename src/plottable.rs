#![warn(missing_docs)]
//! Plotting of traced ray paths
//!
//! A [`RayPathPlot`] renders the height-over-position history of a traced
//! [`ParaxialRay`](crate::ray::ParaxialRay) together with the clear apertures of the system's
//! elements (drawn as vertical bars at their axial positions).
use std::path::Path;

use plotters::prelude::{
    ChartBuilder, IntoDrawingArea, LineSeries, SVGBackend, BLACK, RED, WHITE,
};
use uom::si::length::millimeter;

use crate::{
    error::{ParaxError, ParaxResult},
    optic_system::OpticalSystem,
    ray::ParaxialRay,
};

fn plot_err<E: std::fmt::Display>(e: E) -> ParaxError {
    ParaxError::Other(format!("plotting failed: {e}"))
}

/// Plot of a traced ray path through an optical system.
pub struct RayPathPlot<'a> {
    system: &'a OpticalSystem,
    ray: &'a ParaxialRay,
}
impl<'a> RayPathPlot<'a> {
    /// Creates a new [`RayPathPlot`] from a system and a ray traced through it.
    #[must_use]
    pub const fn new(system: &'a OpticalSystem, ray: &'a ParaxialRay) -> Self {
        Self { system, ray }
    }
    fn path_points(&self) -> Vec<(f64, f64)> {
        self.ray
            .position_history()
            .iter()
            .map(|p| (p.x.get::<millimeter>(), p.y.get::<millimeter>()))
            .collect()
    }
    fn bounds(&self, path_points: &[(f64, f64)]) -> ((f64, f64), (f64, f64)) {
        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_max = 0.0_f64;
        for (x, y) in path_points {
            x_min = x_min.min(*x);
            x_max = x_max.max(*x);
            y_max = y_max.max(y.abs());
        }
        for element in self.system.elements() {
            let z = element.position().get::<millimeter>();
            x_min = x_min.min(z);
            x_max = x_max.max(z);
            y_max = y_max.max(element.diameter().get::<millimeter>() / 2.0);
        }
        let x_pad = (0.05 * (x_max - x_min)).max(1.0);
        let y_pad = (0.05 * y_max).max(1.0);
        (
            (x_min - x_pad, x_max + x_pad),
            (-y_max - y_pad, y_max + y_pad),
        )
    }
    /// Render the plot as SVG to the given file path.
    ///
    /// # Errors
    /// This function returns an error if the drawing backend fails (e.g. the file cannot be
    /// written).
    pub fn to_svg(&self, path: &Path) -> ParaxResult<()> {
        let path_points = self.path_points();
        let ((x_min, x_max), (y_min, y_max)) = self.bounds(&path_points);
        let root = SVGBackend::new(path, (800, 600)).into_drawing_area();
        root.fill(&WHITE).map_err(plot_err)?;
        let mut chart = ChartBuilder::on(&root)
            .caption("ray path", ("sans-serif", 20))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(plot_err)?;
        chart
            .configure_mesh()
            .x_desc("position (mm)")
            .y_desc("height (mm)")
            .draw()
            .map_err(plot_err)?;
        for element in self.system.elements() {
            let z = element.position().get::<millimeter>();
            let half_aperture = element.diameter().get::<millimeter>() / 2.0;
            chart
                .draw_series(LineSeries::new(
                    vec![(z, -half_aperture), (z, half_aperture)],
                    &BLACK,
                ))
                .map_err(plot_err)?;
        }
        chart
            .draw_series(LineSeries::new(path_points, &RED))
            .map_err(plot_err)?;
        root.present().map_err(plot_err)?;
        Ok(())
    }
}
