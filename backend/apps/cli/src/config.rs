//! Command line and environment configuration

use clap::{Parser, Subcommand};
use kernel::id::StrategyId;
use std::path::PathBuf;
use strategy::StrategyConfig;
use strategy::application::config::DEFAULT_SEARCH_THRESHOLD;

/// Oblique Strategies from the terminal
#[derive(Parser, Debug, Clone)]
#[command(name = "oblique")]
#[command(about = "Draw, search and collect Oblique Strategies")]
pub struct Cli {
    /// Base URL of the strategy API
    #[arg(long, env = "OBLIQUE_API_URL", default_value = "http://localhost:3001")]
    pub api_url: String,

    /// Bearer token identifying the user (favorites, daily mirror)
    #[arg(long, env = "OBLIQUE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// File holding this device's durable state
    #[arg(long, env = "OBLIQUE_STATE_FILE", default_value = ".oblique-state.json")]
    pub state_file: PathBuf,

    /// Fuzzy-search threshold, 0 (exact) to 1 (anything)
    #[arg(long, env = "OBLIQUE_SEARCH_THRESHOLD", default_value_t = DEFAULT_SEARCH_THRESHOLD)]
    pub threshold: f64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Today's strategy; the same one all day on this device
    Today,
    /// A random strategy
    Random,
    /// One strategy by id
    Show { id: StrategyId },
    /// Fuzzy search over the deck
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// List your favorites
    Favorites,
    /// Add or remove a favorite
    Fav { id: StrategyId },
    /// Show the identity behind the token
    Whoami,
}

impl Cli {
    pub fn strategy_config(&self) -> StrategyConfig {
        StrategyConfig::default().with_search_threshold(self.threshold)
    }
}
