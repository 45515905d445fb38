use std::{error::Error, path::PathBuf, sync::Arc};

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use rebalance_gym::{
    agent::{run_episode, EpisodeSummary, PolicyKind},
    constants::{files, portfolio::INITIAL_INVESTMENT, END_DATE, START_DATE, TICKERS},
    data::{
        historical::{get_stocks, load_price_table, save_price_table},
        synthetic,
    },
    env::RewardKind,
    EnvConfig, TradingEnv,
};

#[derive(Parser)]
#[command(name = "rebalance_gym")]
#[command(about = "Weekly portfolio rebalancing environment", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a seeded synthetic price table
    Generate {
        #[arg(short, long, value_delimiter = ',', default_values = TICKERS)]
        tickers: Vec<String>,

        #[arg(long, default_value = START_DATE)]
        start: NaiveDate,

        #[arg(long, default_value = END_DATE)]
        end: NaiveDate,

        #[arg(long, default_value_t = 0)]
        seed: u64,

        #[arg(short, long, default_value = files::PRICES_FILE)]
        out: PathBuf,
    },
    /// Run episodes of the environment with a baseline policy
    Simulate {
        /// Price table to use instead of the cached one
        #[arg(short, long)]
        prices: Option<PathBuf>,

        #[arg(short, long, value_delimiter = ',', default_values = TICKERS)]
        tickers: Vec<String>,

        #[arg(long, default_value = START_DATE)]
        start: NaiveDate,

        #[arg(long, default_value = END_DATE)]
        end: NaiveDate,

        /// Initial weights aligned with the tickers, equal weights if omitted
        #[arg(short, long, value_delimiter = ',')]
        weights: Option<Vec<f64>>,

        #[arg(short, long, default_value_t = INITIAL_INVESTMENT)]
        investment: f64,

        #[arg(short, long, default_value_t = 1)]
        episodes: usize,

        #[arg(long, value_enum, default_value_t = PolicyKind::Random)]
        policy: PolicyKind,

        #[arg(long, value_enum, default_value_t = RewardKind::PortfolioValue)]
        reward: RewardKind,

        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("{}", "Start".green());

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Generate {
            tickers,
            start,
            end,
            seed,
            out,
        }) => {
            let table = synthetic::random_walk(&tickers, start, end, seed)?;
            save_price_table(&out, &table)?;
            println!(
                "Wrote {} trading days for {:?} to {}",
                table.len(),
                table.tickers(),
                out.display()
            );
        }
        Some(Commands::Simulate {
            prices,
            tickers,
            start,
            end,
            weights,
            investment,
            episodes,
            policy,
            reward,
            seed,
        }) => {
            let table = match prices {
                Some(path) => load_price_table(path)?.select(&tickers, start, end)?,
                None => get_stocks(&tickers, start, end, seed)?,
            };

            let config = match weights {
                Some(weights) => EnvConfig::new(tickers, weights, investment),
                None => EnvConfig::equal_weights(tickers, investment),
            }
            .with_reward(reward);

            simulate(TradingEnv::new(Arc::new(table), config)?, episodes, policy, seed)?;
        }
        None => {
            let tickers: Vec<String> = TICKERS.iter().map(|ticker| ticker.to_string()).collect();
            let start = START_DATE.parse()?;
            let end = END_DATE.parse()?;
            let table = get_stocks(&tickers, start, end, 0)?;
            let config = EnvConfig::equal_weights(tickers, INITIAL_INVESTMENT);

            simulate(TradingEnv::new(Arc::new(table), config)?, 1, PolicyKind::Random, 0)?;
        }
    }

    println!("{}", "End".green());
    Ok(())
}

fn simulate(
    mut env: TradingEnv,
    episodes: usize,
    policy: PolicyKind,
    seed: u64,
) -> Result<(), Box<dyn Error>> {
    println!(
        "{:?} from {} to {} with a {:?} policy",
        env.tickers(),
        env.start_date(),
        env.end_date(),
        policy
    );

    for episode in 0..episodes {
        let episode_seed = seed.wrapping_add(episode as u64);
        let mut agent = policy.build(episode_seed);
        let summary = run_episode(&mut env, agent.as_mut(), Some(episode_seed))?;
        print_summary(episode, &summary);
    }

    Ok(())
}

fn print_summary(episode: usize, summary: &EpisodeSummary) {
    let return_pct = summary.return_pct();
    let return_str = if return_pct >= 0.0 {
        format!("{:.2}%", return_pct).green()
    } else {
        format!("{:.2}%", return_pct).red()
    };

    println!(
        "{} {} - Final value: {} ({}) after {} steps",
        "Episode".bright_blue(),
        episode.to_string().bright_blue().bold(),
        format!("${:.2}", summary.final_value).bright_white().bold(),
        return_str,
        summary.steps,
    );
}
