use std::process;

use clap::Parser;
use sql_trace_analyzer::{
    app::{AnalyzeParams, BindParams, CommandOutput, LogParams, run_analyze, run_bind, run_log},
    cli::{Cli, Commands},
    config::Config,
    error::AppResult
};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(output) => {
            for line in output.stdout {
                println!("{}", line);
            }
            process::exit(output.exit_code);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Log to stderr; `-v` forces debug, otherwise `RUST_LOG` or warn
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> AppResult<CommandOutput> {
    let config = Config::load()?;

    match cli.command {
        Commands::Analyze {
            queries,
            dialect,
            output_format,
            no_color
        } => run_analyze(
            AnalyzeParams {
                queries_path: queries.display().to_string(),
                dialect,
                output_format,
                no_color
            },
            &config
        ),
        Commands::Bind {
            queries,
            params,
            params_file
        } => run_bind(BindParams {
            queries_path: queries.display().to_string(),
            params,
            params_file: params_file.map(|path| path.display().to_string())
        }),
        Commands::Log {
            file,
            tag,
            dialect,
            output_format,
            no_color
        } => run_log(
            LogParams {
                log_path: file.display().to_string(),
                tag,
                dialect,
                output_format,
                no_color
            },
            &config
        )
    }
}
