use anyhow::Result;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "party-planner")]
pub struct Args {
    #[structopt(
        short,
        parse(from_occurrences),
        help = "-v => Debug, -vv => Trace (default Info)"
    )]
    pub verbose: u8,

    #[structopt(
        short,
        long,
        default_value = "config.toml",
        help = "Specify path to configuration file"
    )]
    pub config: String,

    #[structopt(
        short,
        long,
        parse(from_os_str),
        help = "logoutput or \"-\" for stdout"
    )]
    pub logoutput: Option<PathBuf>,

    /// Only create the database schema, then exit
    #[structopt(long)]
    pub init_db: bool,
}

impl Args {
    /// Returns true if we want to start the HTTP server after the cli part
    pub fn server_should_start(&self) -> bool {
        !self.init_db
    }
}

/// Parses the CLI-Arguments into [`Args`]
pub fn parse_args() -> Result<Args> {
    Ok(Args::from_args())
}
