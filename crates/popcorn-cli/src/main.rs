use clap::{ArgAction, Parser, Subcommand};
use commands::{config, interactive, search, show, watched};

mod commands;
mod logging;
mod output;
mod terminal;

#[derive(Parser)]
#[command(name = "popcorn")]
#[command(about = "usePopcorn - Search movies and keep a rated list of what you watched")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog by title
    #[command(long_about = "Search the movie catalog by title. Queries shorter than catalog.min_query_len never reach the network.")]
    Search {
        /// Title to search for (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Show details for one title, optionally rating it and adding it to the watched list
    Show {
        /// IMDb identifier, e.g. tt1375666
        imdb_id: String,

        /// Your rating, 1 to 10
        #[arg(long, value_name = "RATING")]
        rate: Option<f64>,

        /// Add the title to the watched list (needs --rate)
        #[arg(long, action = ArgAction::SetTrue, requires = "rate")]
        add: bool,
    },
    /// Inspect or edit the watched list
    Watched {
        #[command(subcommand)]
        cmd: Option<WatchedCommands>,
    },
    /// Manage configuration
    #[command(long_about = "View or create the configuration file. Running without a subcommand shows the current configuration.")]
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
    /// Line-driven session: type to search, ':help' lists commands
    Interactive,
}

#[derive(Subcommand)]
enum WatchedCommands {
    /// List every watched title
    List,
    /// Remove a title by IMDb identifier
    Remove {
        imdb_id: String,
    },
    /// Averages across the watched list
    Summary,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Create or update the configuration file
    #[command(long_about = "Write config.toml. Values not passed as flags are prompted for.")]
    Init {
        /// Catalog API key (if not provided, will prompt)
        #[arg(long)]
        api_key: Option<String>,

        /// Overwrite an existing configuration without asking
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // The interactive session owns the terminal, so its logs go to a file
    let log_file = match cli.command {
        Commands::Interactive => Some(popcorn_config::PathManager::default().log_file()),
        _ => None,
    };
    logging::init_logging_with_file(cli.verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Search { query } => search::run_search(&query.join(" "), &output).await,
        Commands::Show { imdb_id, rate, add } => show::run_show(&imdb_id, rate, add, &output).await,
        Commands::Watched { cmd } => {
            let cmd = cmd.unwrap_or(WatchedCommands::List);
            watched::run_watched(cmd, &output)
        }
        Commands::Config { cmd } => {
            let cmd = cmd.unwrap_or(ConfigCommands::Show { full: false });
            config::run_config(cmd, &output)
        }
        Commands::Interactive => interactive::run_interactive(&output).await,
    }
}
