use clap::Parser;
use covid_pipeline::cli::{args::Args, commands};
use std::process;

fn main() {
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    match commands::run(args) {
        Ok(stats) => {
            // A gate rejection is not a crash, but the run did not load
            if !stats.admitted {
                eprintln!("Pipeline aborted: data quality checks failed");
                process::exit(1);
            }
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information when no subcommand is provided
fn show_help_and_commands() {
    println!("COVID Pipeline - Johns Hopkins Time-Series ETL");
    println!("==============================================");
    println!();
    println!("Download COVID-19 cumulative case counts, reshape them into a unified");
    println!("long-format dataset, validate data quality, and write a Parquet snapshot.");
    println!();
    println!("USAGE:");
    println!("    covid-pipeline <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    run      Run the full pipeline: extract, transform, validate, load");
    println!("    check    Transform and validate local files without loading");
    println!("    help     Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Download and process the latest data:");
    println!("    covid-pipeline run --output ./output");
    println!();
    println!("    # Reuse already-downloaded files:");
    println!("    covid-pipeline run --input data/raw");
    println!();
    println!("    # Quality-check local files without writing anything:");
    println!("    covid-pipeline check --input data/raw");
    println!();
    println!("For detailed help on any command, use:");
    println!("    covid-pipeline <COMMAND> --help");
}
