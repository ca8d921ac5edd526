//! Command execution
//!
//! Each command runs against one loaded [`StrategiesProvider`] and returns
//! the text to print.

use anyhow::{Context, bail};
use kernel::id::StrategyId;
use kernel::identity::Identity;
use platform::clock::SystemClock;
use platform::storage::JsonFileStore;
use std::path::PathBuf;
use std::sync::Arc;
use strategy::{
    DailySelection, DailyState, HttpStrategyStore, SearchOutcome, SearchSession, StrategiesProvider,
    Strategy, StrategyConfig,
};

use crate::config::{Cli, Command};

const FAVORITE_MARK: &str = "*";

pub struct Session {
    provider: Arc<StrategiesProvider<HttpStrategyStore>>,
    config: StrategyConfig,
    state_file: PathBuf,
}

impl Session {
    /// Load the catalog and, with a token, the user's favorites
    pub async fn open(cli: &Cli) -> anyhow::Result<Self> {
        let mut store = HttpStrategyStore::new(cli.api_url.as_str());
        if let Some(token) = &cli.token {
            store = store.with_token(token.as_str());
        }

        let provider = Arc::new(StrategiesProvider::new(
            Arc::new(store.clone()),
            Arc::new(SystemClock),
        ));

        let status = provider.load().await;
        if let Some(error) = &status.error {
            tracing::warn!(error = %error, api_url = %cli.api_url, "Strategy catalog unavailable");
        }

        match store.current_identity().await {
            Ok(identity) => {
                provider.set_identity(identity).await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Token not accepted, continuing signed out");
            }
        }

        Ok(Self {
            provider,
            config: cli.strategy_config(),
            state_file: cli.state_file.clone(),
        })
    }

    pub async fn run(&self, command: &Command) -> anyhow::Result<String> {
        match command {
            Command::Today => self.today().await,
            Command::Random => {
                let strategy = self.provider.get_random().context(self.empty_deck())?;
                Ok(self.line(&strategy))
            }
            Command::Show { id } => {
                let strategy = self.find(*id)?;
                Ok(self.line(&strategy))
            }
            Command::Search { query } => Ok(self.search(&query.join(" "))),
            Command::Favorites => Ok(self.favorites()),
            Command::Fav { id } => self.toggle(*id).await,
            Command::Whoami => Ok(render_identity(self.provider.identity().as_ref())),
        }
    }

    async fn today(&self) -> anyhow::Result<String> {
        let store = Arc::new(JsonFileStore::new(self.state_file.clone()));
        let daily = DailySelection::new(self.provider.clone(), store, &self.config);

        match daily.resolve().await {
            DailyState::Resolved(strategy) => Ok(self.line(&strategy)),
            DailyState::Uninitialized => bail!(self.empty_deck()),
        }
    }

    fn search(&self, query: &str) -> String {
        let mut session = SearchSession::new(self.config.search_threshold);
        let strategies = self.provider.strategies();
        match session.update(query, self.provider.generation(), &strategies) {
            SearchOutcome::Idle => "Nothing to search for".to_string(),
            SearchOutcome::NoMatches => format!("No strategies match \"{}\"", query.trim()),
            SearchOutcome::Matches(found) => self.lines(found),
        }
    }

    fn favorites(&self) -> String {
        if self.provider.identity().is_none() {
            return "Sign in to keep favorites".to_string();
        }

        let ids = self.provider.favorites();
        if ids.is_empty() {
            return "No favorites yet".to_string();
        }

        ids.into_iter()
            .map(|id| match self.provider.get_by_id(id) {
                Some(strategy) => render_strategy(&strategy, true),
                None => format!("  #{:<4} (no longer in the deck)", id.value()),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    async fn toggle(&self, id: StrategyId) -> anyhow::Result<String> {
        let strategy = self.find(id)?;
        let favorite = self.provider.toggle_favorite(id).await?;
        let verb = if favorite { "Added to" } else { "Removed from" };
        Ok(format!("{verb} favorites: {}", render_strategy(&strategy, favorite)))
    }

    fn find(&self, id: StrategyId) -> anyhow::Result<Strategy> {
        if self.provider.strategies().is_empty() {
            bail!(self.empty_deck());
        }
        self.provider
            .get_by_id(id)
            .with_context(|| format!("Strategy {id} not found"))
    }

    fn line(&self, strategy: &Strategy) -> String {
        render_strategy(strategy, self.provider.is_favorite(strategy.id))
    }

    fn lines(&self, strategies: &[Strategy]) -> String {
        strategies
            .iter()
            .map(|s| self.line(s))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn empty_deck(&self) -> String {
        match self.provider.status().error {
            Some(error) => format!("No strategies available: {error}"),
            None => "No strategies available".to_string(),
        }
    }
}

pub fn render_strategy(strategy: &Strategy, favorite: bool) -> String {
    let mark = if favorite { FAVORITE_MARK } else { " " };
    format!("{mark} #{:<4} {}", strategy.id.value(), strategy.text)
}

pub fn render_identity(identity: Option<&Identity>) -> String {
    match identity {
        None => "Not signed in".to_string(),
        Some(identity) if identity.is_anonymous => format!("{} (guest)", identity.uid),
        Some(identity) => match &identity.email {
            Some(email) => format!("{} <{email}>", identity.uid),
            None => identity.uid.to_string(),
        },
    }
}
