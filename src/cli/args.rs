use crate::config::MalformedLinePolicy;
use crate::utils::constants::{DEFAULT_INPUT_EXTENSION, DEFAULT_OUTPUT_FILE};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ghcnd-processor")]
#[command(about = "Unpack GHCN-Daily .dly station archives into one CSV table")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Only log warnings and errors")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge every .dly file in a directory into a single CSV file
    Process {
        #[arg(short, long, help = "Directory containing .dly files")]
        input_dir: Option<PathBuf>,

        #[arg(short, long, help = "Directory to write the merged CSV into")]
        output_dir: Option<PathBuf>,

        #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
        output_name: String,

        #[arg(long, default_value = DEFAULT_INPUT_EXTENSION)]
        extension: String,

        #[arg(long, default_value_t = num_cpus::get())]
        max_workers: usize,

        #[arg(long, value_enum, default_value_t = MalformedLinePolicy::Skip)]
        on_malformed: MalformedLinePolicy,

        #[arg(long, help = "Print the run report as JSON")]
        json: bool,
    },

    /// Print the unpacked rows of a single .dly file
    Inspect {
        #[arg(short, long, help = "Input .dly file")]
        file: PathBuf,

        #[arg(short, long, default_value = "31")]
        sample: usize,
    },
}
