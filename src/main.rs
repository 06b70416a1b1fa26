mod cli;
mod config;
mod error;
mod executor;
mod logging;
mod model;
mod reporter;
mod staging;
mod status;
mod supervisor;

use std::path::PathBuf;

use error::RunnerError;

fn main() {
    let verbose = std::env::var("RUNPIPE_VERBOSE").is_ok();
    logging::init(verbose as u8);

    let argv: Vec<String> = std::env::args().collect();
    let Some(config_path) = cli::parse_args(&argv) else {
        println!("{}", cli::usage(&argv[0]));
        std::process::exit(0);
    };

    match run(config_path) {
        Ok(()) => std::process::exit(0),
        Err(RunnerError::ConfigInvalid) => {
            println!("An error ocurred while trying to load and parse the specified YAML file");
            std::process::exit(0);
        }
        Err(RunnerError::StagingUnavailable(detail)) => {
            tracing::error!(detail = %detail, "staging area unavailable");
            println!("An error ocurred while trying to load and parse the specified YAML file");
            std::process::exit(0);
        }
        Err(other) => {
            tracing::error!(error = %other, "unexpected startup failure");
            std::process::exit(0);
        }
    }
}

fn run(config_path: &str) -> Result<(), RunnerError> {
    let mut loaded = config::load(&PathBuf::from(config_path))?;

    if let Some(default_pipeline) =
        model::build_default_pipeline(loaded.jobs.len(), &loaded.assigned_jobs)
    {
        loaded.pipelines.push(default_pipeline);
    }

    let staging_dir = loaded.staging_dir.clone();
    let cleanup_dir = staging_dir.clone();
    ctrlc::set_handler(move || {
        staging::StagingArea::force_cleanup(&cleanup_dir);
        std::process::exit(0);
    })
    .expect("failed to install Ctrl-C handler");

    let staging_area =
        staging::StagingArea::prepare(staging_dir, &loaded.staging_ext, &mut loaded.pipelines)?;

    supervisor::run(&loaded.jobs, &loaded.pipelines, staging_area);

    Ok(())
}
