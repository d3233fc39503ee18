use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}",
    arg_required_else_help = true
)]
pub struct Args {
    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress outputs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as json
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Disable progress bars
    #[arg(long, global = true)]
    pub no_progress: bool,

    /// Provide custom config file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set proxy
    #[arg(required = false, long, short = 'P', global = true)]
    pub proxy: Option<String>,

    /// Set user agent
    #[arg(required = false, long, short = 'A', global = true)]
    pub user_agent: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the release feed, building it on first use
    #[clap(name = "feed", visible_alias = "f")]
    Feed {
        /// Page to show
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        page: i64,

        /// Releases per page
        #[arg(long)]
        per_page: Option<usize>,
    },

    /// Rebuild the feed from GitHub and show its first page
    #[clap(name = "refresh", visible_alias = "r")]
    Refresh {
        /// Releases per page
        #[arg(long)]
        per_page: Option<usize>,
    },

    /// Print the configuration file to stdout
    Config {
        /// Print the documented default configuration instead
        #[arg(required = false, short, long)]
        default: bool,
    },

    /// Generate default config
    #[clap(name = "defconfig")]
    DefConfig,
}
