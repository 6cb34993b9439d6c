use crate::demo::{run_crop_report, run_sensor_replay, CropArgs, SensorArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use farmhelp::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "FarmHelp",
    about = "Run the FarmHelp API or try its crop and sensor demos from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score every reference crop for the given weather and location
    Crops(CropArgs),
    /// Replay a simulated field sensor over a span of time
    Sensor(SensorArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Crops(args) => {
            run_crop_report(args);
            Ok(())
        }
        Command::Sensor(args) => {
            run_sensor_replay(args);
            Ok(())
        }
    }
}
