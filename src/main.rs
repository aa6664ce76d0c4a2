use clap::Parser;
use dotenv::dotenv;
use nexus::cli::{
    AnalyzeCliConfig, Cli, CointegrateCliConfig, Commands, JohansenCliConfig, ScreenCliConfig,
};
use nexus::commands::{run_analyze, run_cointegrate, run_johansen, run_screen};
use nexus::observability::init_logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from the .env file
    dotenv().ok();

    let cli = Cli::parse();
    init_logging(&cli.verbose)?;

    match cli.command {
        Commands::Analyze {
            bars,
            field,
            window,
            num_std,
            lag,
            significance,
        } => run_analyze(&AnalyzeCliConfig {
            bars,
            field,
            window,
            num_std,
            lag,
            significance,
        }),
        Commands::Cointegrate {
            left,
            right,
            field,
            lag,
            significance,
        } => run_cointegrate(&CointegrateCliConfig {
            left,
            right,
            field,
            lag,
            significance,
        }),
        Commands::Johansen {
            bars,
            field,
            lag,
            critical_value,
        } => run_johansen(&JohansenCliConfig {
            bars,
            field,
            lag,
            critical_value,
        }),
        Commands::Screen {
            bars,
            field,
            config,
            output,
        } => run_screen(&ScreenCliConfig {
            bars,
            field,
            config,
            output,
        }),
    }
}
