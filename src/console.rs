#![warn(missing_docs)]
//! Handling of the PARAX CLI and the interactive system-builder session
//!
//! This module handles the command line parsing as well as the interactive prompt loop with
//! which an [`OpticalSystem`] is built up element by element and rays are traced through it.
use std::{
    io::{BufRead, Write},
    path::{Path, PathBuf},
};

use clap::Parser;
use rprompt::prompt_reply_from_bufread;
use strum::IntoEnumIterator;
use uom::si::f64::Length;

use crate::{
    element::ElementType,
    error::{ParaxError, ParaxResult},
    matrix::SurfaceCurvature,
    millimeter,
    optic_system::{OpticalSystem, TraceOutcome},
};

/// Command line arguments for the PARAX application.
pub struct Args {
    /// output file (SVG) the traced ray path is plotted to
    pub plot_file: Option<PathBuf>,
    /// suppress the intro banner
    pub quiet: bool,
}

/// Raw command line arguments as parsed by clap, converted to [`Args`] for use.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct PartialArgs {
    /// output file (SVG) the traced ray path is plotted to
    #[arg(short, long)]
    plot: Option<String>,

    /// suppress the intro banner
    #[arg(short, long)]
    quiet: bool,
}

/// Evaluates if the passed plot-file string is valid.
///
/// The file must have an `svg` extension. Returns `None` if the string is invalid.
fn eval_plot_path_input(plot_path: &str) -> Option<PathBuf> {
    let path = Path::new(plot_path);
    if path.extension().is_some_and(|ext| ext == "svg") {
        Some(PathBuf::from(plot_path))
    } else {
        None
    }
}

impl TryFrom<PartialArgs> for Args {
    type Error = ParaxError;

    fn try_from(part_args: PartialArgs) -> ParaxResult<Self> {
        let plot_file = match part_args.plot.as_deref() {
            Some(p) => Some(eval_plot_path_input(p).ok_or_else(|| {
                ParaxError::Console(format!("'{p}' is not a valid svg file path"))
            })?),
            None => None,
        };
        Ok(Self {
            plot_file,
            quiet: part_args.quiet,
        })
    }
}

/// Show the PARAX banner and version information.
pub fn show_intro() {
    println!("{:^60}", "PARAX - paraxial ray-transfer matrix simulator");
    println!("{:^60}\n", format!("version {}", env!("CARGO_PKG_VERSION")));
}

fn console_err<E: std::fmt::Display>(e: E) -> ParaxError {
    ParaxError::Console(format!("{e}"))
}

fn prompt_f64(
    reader: &mut impl BufRead,
    writer: &mut impl Write,
    prompt: &str,
) -> ParaxResult<f64> {
    let reply = prompt_reply_from_bufread(reader, writer, prompt).map_err(console_err)?;
    reply
        .trim()
        .parse::<f64>()
        .map_err(|_| ParaxError::Console(format!("'{}' is not a number", reply.trim())))
}

fn prompt_length_mm(
    reader: &mut impl BufRead,
    writer: &mut impl Write,
    prompt: &str,
) -> ParaxResult<Length> {
    Ok(millimeter!(prompt_f64(reader, writer, prompt)?))
}

/// Evaluates a surface-curvature reply: the literal `flat` denotes a plane surface, any number
/// is taken as radius of curvature in millimeters.
fn eval_curvature_input(input: &str) -> ParaxResult<SurfaceCurvature> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("flat") {
        return Ok(SurfaceCurvature::Flat);
    }
    input.parse::<f64>().map_or_else(
        |_| {
            Err(ParaxError::Console(format!(
                "'{input}' is neither a number nor 'flat'"
            )))
        },
        |radius| Ok(SurfaceCurvature::Curved(millimeter!(radius))),
    )
}

fn prompt_curvature(
    reader: &mut impl BufRead,
    writer: &mut impl Write,
    prompt: &str,
) -> ParaxResult<SurfaceCurvature> {
    let reply = prompt_reply_from_bufread(reader, writer, prompt).map_err(console_err)?;
    eval_curvature_input(&reply)
}

/// Prompt for an element position unless the system is still empty (the first element is
/// anchored at position 0).
fn prompt_position(
    system: &OpticalSystem,
    reader: &mut impl BufRead,
    writer: &mut impl Write,
) -> ParaxResult<Option<Length>> {
    if system.is_empty() {
        Ok(None)
    } else {
        Ok(Some(prompt_length_mm(
            reader,
            writer,
            "element position (mm): ",
        )?))
    }
}

const fn command_char(element_type: ElementType) -> char {
    match element_type {
        ElementType::ThinLens => 't',
        ElementType::ThickLens => 'k',
        ElementType::FlatMirror => 'f',
        ElementType::SphericalMirror => 's',
        ElementType::Diaphragm => 'd',
    }
}

fn create_menu_str() -> String {
    let mut menu = String::new();
    for element_type in ElementType::iter() {
        menu += &format!("{} - add {}\n", command_char(element_type), element_type);
    }
    menu + "r - trace a ray\nq - quit\n> "
}

fn add_thin_lens_dialog(
    system: &mut OpticalSystem,
    reader: &mut impl BufRead,
    writer: &mut impl Write,
) -> ParaxResult<()> {
    let position = prompt_position(system, reader, writer)?;
    let diameter = prompt_length_mm(reader, writer, "lens diameter (mm): ")?;
    let focal_length = prompt_length_mm(reader, writer, "image focal length (mm): ")?;
    system.add_thin_lens(diameter, focal_length, position)?;
    Ok(())
}

fn add_thick_lens_dialog(
    system: &mut OpticalSystem,
    reader: &mut impl BufRead,
    writer: &mut impl Write,
) -> ParaxResult<()> {
    let position = prompt_position(system, reader, writer)?;
    let diameter = prompt_length_mm(reader, writer, "lens diameter (mm): ")?;
    let front_curvature = prompt_curvature(
        reader,
        writer,
        "radius of the first surface (mm) or 'flat': ",
    )?;
    let rear_curvature = prompt_curvature(
        reader,
        writer,
        "radius of the second surface (mm) or 'flat': ",
    )?;
    let center_thickness = prompt_length_mm(reader, writer, "center thickness (mm): ")?;
    let lens_idx = prompt_f64(reader, writer, "refractive index of the lens material: ")?;
    system.add_thick_lens(
        diameter,
        front_curvature,
        rear_curvature,
        center_thickness,
        lens_idx,
        position,
    )?;
    Ok(())
}

fn add_flat_mirror_dialog(
    system: &mut OpticalSystem,
    reader: &mut impl BufRead,
    writer: &mut impl Write,
) -> ParaxResult<()> {
    let position = prompt_position(system, reader, writer)?;
    let diameter = prompt_length_mm(reader, writer, "mirror diameter (mm): ")?;
    system.add_flat_mirror(diameter, position)?;
    Ok(())
}

fn add_spherical_mirror_dialog(
    system: &mut OpticalSystem,
    reader: &mut impl BufRead,
    writer: &mut impl Write,
) -> ParaxResult<()> {
    let position = prompt_position(system, reader, writer)?;
    let diameter = prompt_length_mm(reader, writer, "mirror diameter (mm): ")?;
    let radius = prompt_length_mm(reader, writer, "radius of curvature (mm): ")?;
    system.add_spherical_mirror(diameter, radius, position)?;
    Ok(())
}

fn add_diaphragm_dialog(
    system: &mut OpticalSystem,
    reader: &mut impl BufRead,
    writer: &mut impl Write,
) -> ParaxResult<()> {
    let position = prompt_length_mm(reader, writer, "diaphragm position (mm): ")?;
    let diameter = prompt_length_mm(reader, writer, "diaphragm diameter (mm): ")?;
    system.add_diaphragm(diameter, position)?;
    Ok(())
}

fn trace_dialog(
    system: &mut OpticalSystem,
    reader: &mut impl BufRead,
    writer: &mut impl Write,
) -> ParaxResult<TraceOutcome> {
    let height = prompt_length_mm(reader, writer, "entry height (mm): ")?;
    let angle = prompt_f64(reader, writer, "entry angle (rad): ")?;
    system.ray_trace(height, angle)
}

/// Run the interactive system-builder session.
///
/// The session first asks for the ambient refractive index, then loops over a menu of
/// element-construction commands until `q` is entered. Invalid replies abort only the current
/// dialog; the menu loop continues. Returns the built system and the outcome of the last
/// traced ray, if any.
///
/// # Errors
/// This function returns an error if reading from the input or writing to the output fails.
pub fn run_session(
    reader: &mut impl BufRead,
    writer: &mut impl Write,
) -> ParaxResult<(OpticalSystem, Option<TraceOutcome>)> {
    let mut system = loop {
        match prompt_f64(reader, writer, "ambient refractive index: ")
            .and_then(OpticalSystem::new)
        {
            Ok(system) => break system,
            Err(e) => writeln!(writer, "{e}").map_err(console_err)?,
        }
    };
    let mut last_outcome = None;
    loop {
        let choice = prompt_reply_from_bufread(reader, writer, create_menu_str())
            .map_err(console_err)?;
        let result = match choice.trim() {
            "t" => add_thin_lens_dialog(&mut system, reader, writer),
            "k" => add_thick_lens_dialog(&mut system, reader, writer),
            "f" => add_flat_mirror_dialog(&mut system, reader, writer),
            "s" => add_spherical_mirror_dialog(&mut system, reader, writer),
            "d" => add_diaphragm_dialog(&mut system, reader, writer),
            "r" => match trace_dialog(&mut system, reader, writer) {
                Ok(outcome) => {
                    writeln!(writer, "{outcome}").map_err(console_err)?;
                    last_outcome = Some(outcome);
                    Ok(())
                }
                Err(e) => Err(e),
            },
            "q" => break,
            other => Err(ParaxError::Console(format!("unknown command '{other}'"))),
        };
        if let Err(e) = result {
            writeln!(writer, "{e}").map_err(console_err)?;
        }
    }
    Ok((system, last_outcome))
}
