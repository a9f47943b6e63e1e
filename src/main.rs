use std::io::{stdin, stdout, BufReader, BufWriter};

use clap::Parser;
use parax::{
    console::{run_session, show_intro, Args, PartialArgs},
    error::ParaxResult,
    plottable::RayPathPlot,
};

fn main() -> ParaxResult<()> {
    env_logger::init();
    let args = Args::try_from(PartialArgs::parse())?;
    if !args.quiet {
        show_intro();
    }
    let mut reader = BufReader::new(stdin().lock());
    let mut writer = BufWriter::new(stdout().lock());
    let (system, outcome) = run_session(&mut reader, &mut writer)?;
    drop(reader);
    drop(writer);

    match outcome {
        Some(outcome) => {
            if let Some(plot_file) = args.plot_file {
                print!("Write ray-path plot to {}...", plot_file.display());
                RayPathPlot::new(&system, outcome.ray()).to_svg(&plot_file)?;
                println!("Success");
            }
        }
        None => println!("no ray traced"),
    }
    Ok(())
}
