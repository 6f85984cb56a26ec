use std::{
    io::{self, stdin, BufRead, IsTerminal, Write},
    path::PathBuf,
};

use anyhow::{anyhow, bail};
use bbref_leaders::{
    api::PageSource,
    config::Config,
    export::OutputFormat,
    leaderboard::{LeaderBoard, Report},
    logging,
    parser::ExtractOptions,
    statistic::{Selection, Statistic},
};
use clap::Parser;
use inquire::{InquireError, Text};
use log::{error, info};

#[derive(Parser)]
struct Opts {
    #[arg(long, default_value = "leaders.toml")]
    config_path: PathBuf,
    /// Fetch one statistic (label or menu number) and exit.
    ///
    /// Without it, choices are prompted for, or read line by line when stdin is not a terminal.
    #[arg(long)]
    stat: Option<String>,
    #[arg(long)]
    no_save: bool,
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Keep the player and value cells as plain text.
    #[arg(long)]
    raw: bool,
}

impl Opts {
    fn apply(&self, config: &mut Config) {
        if self.no_save {
            config.save = false;
        }
        if let Some(format) = self.format {
            config.output_format = format;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if self.raw {
            config.extract = ExtractOptions::raw();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();
    let (mut config, found) = Config::load(&opts.config_path)?;
    opts.apply(&mut config);
    logging::init(&config.log_path)?;
    if found {
        info!("Loaded configuration from {:?}.", opts.config_path);
    } else {
        info!(
            "Configuration file {:?} was not found.  Using defaults.",
            opts.config_path
        );
    }

    let board = LeaderBoard::from_config(&config)?;
    match &opts.stat {
        Some(choice) => one_shot(&board, choice).await,
        None => {
            interactive(&board).await;
            println!("Thank you for using the Basketball Reference Scraper!");
            Ok(())
        }
    }
}

async fn one_shot<S: PageSource>(board: &LeaderBoard<S>, choice: &str) -> anyhow::Result<()> {
    let statistic = match choice.parse::<Selection>()? {
        Selection::Statistic(statistic) => statistic,
        Selection::Quit => return Ok(()),
    };
    match board.fetch_leaders(statistic).await? {
        Some(report) => {
            show(&report);
            Ok(())
        }
        None => bail!("Could not retrieve data for {}.", statistic.label()),
    }
}

async fn interactive<S: PageSource>(board: &LeaderBoard<S>) {
    println!("Basketball Reference Top 15 Leaders Scraper");
    println!("===========================================");

    loop {
        println!("\nAvailable Statistics:");
        for (i, statistic) in Statistic::menu() {
            println!("{i}. {}", statistic.display_name());
        }

        let input = match read_choice() {
            Ok(Some(input)) => input,
            Ok(None) => {
                println!("Exiting program. Goodbye!");
                return;
            }
            Err(InquireError::OperationInterrupted | InquireError::OperationCanceled) => {
                println!("\nProgram interrupted. Exiting gracefully.");
                return;
            }
            Err(e) => {
                error!("Unhandled exception: {e}");
                println!("An unexpected error occurred: {e}");
                return;
            }
        };
        let statistic = match input.parse::<Selection>() {
            Ok(Selection::Statistic(statistic)) => statistic,
            Ok(Selection::Quit) => {
                println!("Exiting program. Goodbye!");
                return;
            }
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        println!("\nFetching top 15 leaders for {}...", statistic.label());
        tokio::select! {
            res = board.fetch_leaders(statistic) => match res {
                Ok(Some(report)) => show(&report),
                Ok(None) => println!("Could not retrieve data for {}.", statistic.label()),
                Err(e) => {
                    let e = anyhow!(e);
                    error!("Error scraping {}: {e:#}", statistic.label());
                    println!("An error occurred: {e:#}");
                }
            },
            _ = tokio::signal::ctrl_c() => {
                println!("\nProgram interrupted. Exiting gracefully.");
                return;
            }
        }
        println!("\n{}", "-".repeat(50));
    }
}

const PROMPT: &str = "What statistic would you like to see? (type 'quit' to exit)";

/// Prompts on a terminal, and otherwise takes the next line of stdin.
///
/// `Ok(None)` means stdin has ended.
fn read_choice() -> Result<Option<String>, InquireError> {
    if stdin().is_terminal() {
        return Text::new(PROMPT).prompt().map(Some);
    }
    print!("{PROMPT} ");
    io::stdout().flush()?;
    Ok(next_line(stdin().lock())?)
}

fn next_line(reader: impl BufRead) -> io::Result<Option<String>> {
    reader.lines().next().transpose()
}

fn show(report: &Report) {
    print!("\n{report}");
    if let Some(path) = report.saved_to() {
        println!("\nData saved to: {}", path.display());
    }
}
