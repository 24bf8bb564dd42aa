use log::*;

use std::error::Error;
use std::path::PathBuf;
use structopt::StructOpt;
use trackalloc::{allocator, report, scenario::Scenario, track_reader};

#[derive(Debug, StructOpt)]
#[structopt(name = "trackalloc", about = "Railway track allocation.")]
struct Opt {
    /// Track description, one section per line:
    /// "<length> <junction> <branch> <junction> <branch>".
    #[structopt(name = "TRACK")]
    #[structopt(parse(from_os_str))]
    track: PathBuf,

    /// JSON file listing each train's occupied and requested segments,
    /// in priority order. Without it, the track is only checked and printed.
    #[structopt(short, long)]
    #[structopt(parse(from_os_str))]
    scenario: Option<PathBuf>,

    /// Write the allocation as JSON.
    #[structopt(short, long)]
    #[structopt(parse(from_os_str))]
    output: Option<PathBuf>,

    /// Activate debug mode
    #[structopt(short, long)]
    verbose: bool,
}

fn main() {
    let opt = Opt::from_args();
    let level = if opt.verbose {
        if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    } else {
        LevelFilter::Error
    };
    simple_logger::SimpleLogger::new()
        .with_level(level)
        .init()
        .expect("logger initialised twice");
    info!("{:#?}", opt);

    let result = run(&opt);

    hprof::end_frame();
    if opt.verbose {
        hprof::profiler().print_timing();
    }

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(opt: &Opt) -> Result<(), Box<dyn Error>> {
    let track = {
        let _h = hprof::enter("read track");
        track_reader::read_track(&opt.track)?
    };
    debug!("Track:\n{}", track);

    let scenario_file = match opt.scenario.as_ref() {
        Some(f) => f,
        None => {
            info!("No scenario given.");
            println!("{}", track);
            return Ok(());
        }
    };

    let trains = {
        let _h = hprof::enter("read scenario");
        Scenario::read(scenario_file)?.resolve(&track)?
    };
    info!("Allocating for {} trains", trains.names.len());

    let allocated = allocator::allocate(&trains.occupied, &trains.requested);

    print!(
        "{}",
        report::print_allocation(&trains.names, &trains.requested, &allocated)
    );
    if let Some(f) = opt.output.as_ref() {
        report::write_allocation_json(f, &trains.names, &allocated)?;
        info!("Wrote allocation to file {}", f.display());
    }
    Ok(())
}
