use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "pathpilot-intent", version, about = "Voice command intent classification service")]
pub struct Cli {
    /// Path to the JSON5 config file.
    #[arg(long, short = 'c', default_value = "./pathpilot.jsonc")]
    pub config: PathBuf,
}
