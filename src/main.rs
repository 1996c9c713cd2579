use std::process::ExitCode;

use clap::Parser;
use log::error;
use ringmax::command_line_options::CommandLineOptions;
use ringmax::logging::init_logging;
use ringmax::parameters::read_parameters;
use ringmax::parameters::RunParameters;
use ringmax::Result;

#[cfg(feature = "mpi")]
fn run(_opts: &CommandLineOptions, parameters: RunParameters) -> Result<()> {
    use ringmax::communication::MpiEnvironment;
    use ringmax::communication::SizedCommunicator;
    use ringmax::communication::WorldRank;
    use ringmax::process::run_process;
    use ringmax::rank_log;
    use ringmax::vectors::Value;

    let environment = MpiEnvironment::initialize()?;
    let mut world = environment.world::<Value>(0);
    rank_log::initialize(WorldRank(world.rank()));
    ringmax::main_info!("Running on {} MPI ranks", world.size());
    run_process(&mut world, &parameters, &mut std::io::stdout())?;
    Ok(())
}

#[cfg(not(feature = "mpi"))]
fn run(opts: &CommandLineOptions, parameters: RunParameters) -> Result<()> {
    use ringmax::communication::run_local;
    use ringmax::communication::LocalCommunicator;
    use ringmax::process::run_process;
    use ringmax::vectors::Value;

    log::info!("Running on {} local ranks", opts.num_ranks);
    run_local(
        opts.num_ranks,
        move |mut communicator: LocalCommunicator<Value>| {
            run_process(&mut communicator, &parameters, &mut std::io::stdout())
        },
    )?;
    Ok(())
}

fn main() -> ExitCode {
    let opts = CommandLineOptions::parse();
    if let Err(e) = init_logging(opts.verbosity) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }
    let result = read_parameters(opts.parameter_file_path.as_deref(), &opts.overrides)
        .and_then(|parameters| run(&opts, parameters));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
