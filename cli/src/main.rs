//! ratedesk CLI
//!
//! Resolves currency rates through the provider fallback chain and manages
//! saved favorite pairs.

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ratedesk_common::CurrencyCode;
use ratedesk_engine::{
    display_name, BulletinProvider, RateProvider, RateResolver, RateResolverConfig, RestProvider,
};
use ratedesk_store::{FavoritesRepository, PostgresFavorites};

mod config;

use config::AppConfig;

/// ratedesk CLI
#[derive(Parser, Debug)]
#[command(name = "ratedesk")]
#[command(about = "Currency exchange rates with provider fallback")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve the exchange rate for a currency pair
    Rate { from: String, to: String },

    /// Convert an amount between two currencies
    Convert {
        amount: Decimal,
        from: String,
        to: String,
    },

    /// List the supported currency catalog
    Currencies,

    /// Manage saved favorite pairs (requires DATABASE_URL)
    Favorites {
        /// User the favorites belong to
        #[arg(long)]
        user: i64,

        #[command(subcommand)]
        action: FavoritesAction,
    },
}

#[derive(Subcommand, Debug)]
enum FavoritesAction {
    /// Save a pair
    Add { from: String, to: String },
    /// Show saved pairs with their current rates
    List,
    /// Forget a pair
    Remove { from: String, to: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = AppConfig::from_env();
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("configuration error: {e}"))?;

    let resolver = build_resolver(&config);

    match args.command {
        Command::Rate { from, to } => {
            let rate = resolver.get_rate(&from, &to).await?;
            println!("{} = {} ({})", rate.pair, rate.rate, rate.source);
        }
        Command::Convert { amount, from, to } => {
            let rate = resolver.get_rate(&from, &to).await?;
            println!(
                "{} {} = {} {}",
                amount,
                rate.pair.base,
                rate.convert(amount),
                rate.pair.quote
            );
        }
        Command::Currencies => {
            for (code, name) in resolver.supported_currencies() {
                println!("{code}  {name}");
            }
        }
        Command::Favorites { user, action } => {
            let store = connect_store(&config).await?;
            run_favorites(&resolver, store.as_ref(), user, action).await?;
        }
    }

    Ok(())
}

fn build_resolver(config: &AppConfig) -> RateResolver {
    let rest = match &config.rest_base_url {
        Some(url) => RestProvider::with_base_url(url.clone()),
        None => RestProvider::new(),
    };
    let bulletin = match &config.bulletin_url {
        Some(url) => BulletinProvider::with_endpoint(CurrencyCode::new("RUB"), url.clone()),
        None => BulletinProvider::new(),
    };

    // REST first, bulletin second; order is the fallback priority.
    let providers: Vec<Arc<dyn RateProvider>> = vec![Arc::new(rest), Arc::new(bulletin)];

    RateResolver::new(
        providers,
        RateResolverConfig {
            cache_ttl_minutes: config.cache_ttl_minutes,
            ..Default::default()
        },
    )
}

async fn connect_store(config: &AppConfig) -> anyhow::Result<Box<dyn FavoritesRepository>> {
    let url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is required for favorites commands")?;
    let store = PostgresFavorites::connect(url).await?;
    info!("connected to favorites store");
    Ok(Box::new(store))
}

async fn run_favorites(
    resolver: &RateResolver,
    store: &dyn FavoritesRepository,
    user: i64,
    action: FavoritesAction,
) -> anyhow::Result<()> {
    match action {
        FavoritesAction::Add { from, to } => {
            let pair = parse_pair(&from, &to)?;
            store.add(user, &pair).await?;
            println!("saved {pair}");
        }
        FavoritesAction::List => {
            let favorites = store.list(user).await?;
            if favorites.is_empty() {
                println!("no favorites saved");
                return Ok(());
            }
            for favorite in favorites {
                match resolver.resolve(&favorite.pair).await {
                    Ok(rate) => println!("{} = {}", favorite.pair, rate.rate),
                    Err(e) => println!("{}: unavailable ({e})", favorite.pair),
                }
            }
        }
        FavoritesAction::Remove { from, to } => {
            let pair = parse_pair(&from, &to)?;
            store.remove(user, &pair).await?;
            println!("removed {pair}");
        }
    }

    Ok(())
}

fn parse_pair(from: &str, to: &str) -> anyhow::Result<ratedesk_common::CurrencyPair> {
    let base = CurrencyCode::parse(from)?;
    let quote = CurrencyCode::parse(to)?;
    if display_name(&base).is_none() {
        info!(code = %base, "currency not in catalog, saving anyway");
    }
    Ok(ratedesk_common::CurrencyPair::new(base, quote))
}
