use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vsh", version, about = "vsh: a small shell over a persistent virtual filesystem")]
pub struct Cli {
    /// Configuration file (defaults to ./vsh.toml when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Host file holding the persisted filesystem
    #[arg(long, value_name = "FILE")]
    pub state: Option<PathBuf>,

    /// Discard the persisted filesystem and start from the seed tree
    #[arg(long)]
    pub reset: bool,

    /// Run one command line and exit with its status
    #[arg(short = 'c', long = "command", value_name = "COMMAND")]
    pub command: Option<String>,
}
