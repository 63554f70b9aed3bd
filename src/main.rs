use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;

use picadito::balance::{self, BalanceOutcome, BalanceParams, CancellationToken};
use picadito::config::Config;
use picadito::roster::{self, PlayerId, Position};
use picadito::store::{
    MatchDraft, MatchHistoryStore, PlayerDirectory, Repository, TeamGeneration, TeamGenerationStore,
};

const EXIT_SUCCESS: i32 = 0;
const EXIT_NO_SPLIT: i32 = 1;
const EXIT_STORAGE: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Register and list players
    #[command(subcommand)]
    Players(PlayerCommands),
    /// Split the available players into two balanced teams
    Balance(BalanceArgs),
    /// Record, list and delete match results
    #[command(subcommand)]
    Matches(MatchCommands),
    /// Show the teams generated for a date
    #[command(subcommand)]
    Teams(TeamCommands),
    /// Show the standings table ordered by win percentage
    Standings,
}

#[derive(Subcommand, Debug)]
enum PlayerCommands {
    /// Register a new player
    Add {
        name: String,
        /// forward, midfielder, defender or goalkeeper
        #[arg(short, long, value_parser = Position::parse)]
        position: Position,
    },
    /// List registered players
    List,
}

#[derive(Args, Debug)]
struct BalanceArgs {
    /// Match date (defaults to today)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Comma-separated player names (defaults to every registered player)
    #[arg(long, value_delimiter = ',')]
    players: Vec<String>,

    #[arg(long)]
    team_size: Option<usize>,

    #[arg(long)]
    max_defenders: Option<usize>,

    #[arg(long)]
    min_midfielders: Option<usize>,

    #[arg(long)]
    min_forwards: Option<usize>,

    /// Weight of the win difference (0 ignores match history)
    #[arg(long)]
    win_weight: Option<f64>,

    /// Worker threads (1 = sequential)
    #[arg(long)]
    workers: Option<usize>,

    /// Do not store the generated teams
    #[arg(long)]
    no_save: bool,
}

#[derive(Subcommand, Debug)]
enum MatchCommands {
    /// Record a match result
    Record {
        /// Match date (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Use the teams generated for this date
        #[arg(long, conflicts_with_all = ["team_a", "team_b"])]
        use_generated: bool,

        /// Comma-separated names for team 1
        #[arg(long, value_delimiter = ',')]
        team_a: Vec<String>,

        /// Comma-separated names for team 2
        #[arg(long, value_delimiter = ',')]
        team_b: Vec<String>,

        #[arg(long)]
        goals_a: u32,

        #[arg(long)]
        goals_b: u32,
    },
    /// List matches, newest first
    List,
    /// Delete a match by id
    Delete { id: u64 },
}

#[derive(Subcommand, Debug)]
enum TeamCommands {
    /// Show the teams stored for a date
    Show {
        /// Match date (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[derive(Parser, Debug)]
#[command(name = "picadito")]
#[command(about = "Balanced team generator for pickup football", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/picadito/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn storage_failure(e: anyhow::Error) -> ! {
    eprintln!("Storage error: {:#}", e);
    std::process::exit(EXIT_STORAGE);
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config_path = cli.config.map(PathBuf::from);
    let config = match picadito::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    picadito::logging::init(cli.verbose, config.log_level());
    let repo = Repository::new(config.data_path());
    debug!(data_file = %repo.path().display(), "opened data file");
    let use_colors = picadito::output::should_use_colors();

    let code = match cli.command {
        Commands::Players(cmd) => run_players(&repo, cmd, use_colors),
        Commands::Balance(args) => run_balance(&repo, &config, args, use_colors).await,
        Commands::Matches(cmd) => run_matches(&repo, cmd, use_colors),
        Commands::Teams(TeamCommands::Show { date }) => {
            let date = date.unwrap_or_else(today);
            let players = repo.list_players().unwrap_or_else(|e| storage_failure(e));
            match repo.generation_for(date) {
                Ok(Some(generation)) => {
                    println!(
                        "{}",
                        picadito::output::format_generation(&generation, &players, use_colors)
                    );
                    EXIT_SUCCESS
                }
                Ok(None) => {
                    eprintln!("No teams generated for {}.", date);
                    EXIT_NO_SPLIT
                }
                Err(e) => storage_failure(e),
            }
        }
        Commands::Standings => {
            let players = repo.list_players().unwrap_or_else(|e| storage_failure(e));
            let matches = repo.list_matches().unwrap_or_else(|e| storage_failure(e));
            let rows = roster::standings(&players, &matches);
            println!("{}", picadito::output::format_standings(&rows, use_colors));
            EXIT_SUCCESS
        }
    };

    std::process::exit(code);
}

fn run_players(repo: &Repository, cmd: PlayerCommands, use_colors: bool) -> i32 {
    match cmd {
        PlayerCommands::Add { name, position } => match repo.add_player(&name, position) {
            Ok(record) => {
                println!("Added {} as {} ({})", record.name, record.position, record.id);
                EXIT_SUCCESS
            }
            Err(e) => {
                eprintln!("Could not add player: {:#}", e);
                EXIT_CONFIG
            }
        },
        PlayerCommands::List => {
            let players = repo.list_players().unwrap_or_else(|e| storage_failure(e));
            println!("{}", picadito::output::format_players(&players, use_colors));
            EXIT_SUCCESS
        }
    }
}

/// Apply per-run CLI overrides on top of the configured parameters.
fn effective_params(defaults: &BalanceParams, args: &BalanceArgs) -> BalanceParams {
    BalanceParams {
        team_size: args.team_size.unwrap_or(defaults.team_size),
        max_defenders: args.max_defenders.unwrap_or(defaults.max_defenders),
        min_midfielders: args.min_midfielders.unwrap_or(defaults.min_midfielders),
        min_forwards: args.min_forwards.unwrap_or(defaults.min_forwards),
        win_weight: args.win_weight.unwrap_or(defaults.win_weight),
        workers: args.workers.unwrap_or(defaults.workers),
    }
}

async fn run_balance(repo: &Repository, config: &Config, args: BalanceArgs, use_colors: bool) -> i32 {
    let params = effective_params(&config.balance, &args);
    if let Err(errors) = balance::validate_params(&params) {
        eprintln!("Balance parameter errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return EXIT_CONFIG;
    }

    let ids: Vec<PlayerId> = if args.players.is_empty() {
        repo.list_players()
            .unwrap_or_else(|e| storage_failure(e))
            .iter()
            .map(|p| p.id)
            .collect()
    } else {
        match repo.resolve_names(&args.players) {
            Ok(ids) => ids,
            Err(e) => {
                eprintln!("{:#}", e);
                return EXIT_CONFIG;
            }
        }
    };
    let pool = repo.pool(&ids).unwrap_or_else(|e| storage_failure(e));
    let players = repo.list_players().unwrap_or_else(|e| storage_failure(e));

    let total = balance::binomial(pool.len(), params.team_size).unwrap_or(0);
    let bar = ProgressBar::new(total);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} splits ({eta})")
    {
        bar.set_style(style.progress_chars("=> "));
    }

    let token = CancellationToken::new();
    let ctrl_c_token = token.clone();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_token.cancel();
        }
    });

    let started = Instant::now();
    let engine_bar = bar.clone();
    let engine_params = params.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        let sink = move |processed: u64, _total: u64| engine_bar.set_position(processed);
        balance::balance_parallel(&pool, &engine_params, engine_params.workers, &sink, &token)
    })
    .await;
    ctrl_c.abort();
    bar.finish_and_clear();

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Balancing task failed: {}", e);
            return EXIT_NO_SPLIT;
        }
    };
    debug!(
        elapsed = %picadito::output::format_elapsed(started.elapsed()),
        "balance run finished"
    );

    match outcome {
        BalanceOutcome::Found(teams) => {
            println!("{}", picadito::output::format_teams(&teams, &players, use_colors));
            if !args.no_save {
                let date = args.date.unwrap_or_else(today);
                if let Err(e) = repo.save_generation(TeamGeneration::from_teams(date, &teams)) {
                    storage_failure(e);
                }
                println!();
                println!("Teams saved for {}", date);
            }
            EXIT_SUCCESS
        }
        BalanceOutcome::NoFeasibleSplit => {
            eprintln!(
                "No split satisfies every constraint. Try different parameters or players."
            );
            EXIT_NO_SPLIT
        }
        BalanceOutcome::Cancelled => {
            eprintln!("Cancelled.");
            EXIT_NO_SPLIT
        }
        BalanceOutcome::InvalidConfiguration(issue) => {
            eprintln!("Invalid configuration: {}", issue);
            EXIT_CONFIG
        }
    }
}

fn run_matches(repo: &Repository, cmd: MatchCommands, use_colors: bool) -> i32 {
    match cmd {
        MatchCommands::Record {
            date,
            use_generated,
            team_a,
            team_b,
            goals_a,
            goals_b,
        } => {
            let date = date.unwrap_or_else(today);
            let (roster_a, roster_b) = if use_generated {
                match repo.generation_for(date) {
                    Ok(Some(generation)) => (generation.team_a, generation.team_b),
                    Ok(None) => {
                        eprintln!("No teams generated for {}. Pass --team-a and --team-b instead.", date);
                        return EXIT_CONFIG;
                    }
                    Err(e) => storage_failure(e),
                }
            } else {
                match (repo.resolve_names(&team_a), repo.resolve_names(&team_b)) {
                    (Ok(a), Ok(b)) => (a, b),
                    (Err(e), _) | (_, Err(e)) => {
                        eprintln!("{:#}", e);
                        return EXIT_CONFIG;
                    }
                }
            };

            let draft = MatchDraft {
                date,
                roster_a,
                roster_b,
                goals_a,
                goals_b,
            };
            match repo.append_match(draft) {
                Ok(record) => {
                    println!(
                        "Recorded match {} on {}: {} - {}",
                        record.id, record.date, record.goals_a, record.goals_b
                    );
                    EXIT_SUCCESS
                }
                Err(e) => {
                    eprintln!("Could not record match: {:#}", e);
                    EXIT_CONFIG
                }
            }
        }
        MatchCommands::List => {
            let players = repo.list_players().unwrap_or_else(|e| storage_failure(e));
            let matches = repo.list_matches().unwrap_or_else(|e| storage_failure(e));
            println!(
                "{}",
                picadito::output::format_matches(&matches, &players, use_colors)
            );
            EXIT_SUCCESS
        }
        MatchCommands::Delete { id } => match repo.delete_match(id) {
            Ok(true) => {
                println!("Deleted match {}", id);
                EXIT_SUCCESS
            }
            Ok(false) => {
                eprintln!("No match with id {}", id);
                EXIT_CONFIG
            }
            Err(e) => storage_failure(e),
        },
    }
}
