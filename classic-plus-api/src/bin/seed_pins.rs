//! Fills the pins table with random pins for local development.
//!
//! Environment:
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `SEED_PIN_COUNT`: number of pins to insert (default: 100)
//! - `SEED_MAX_X`, `SEED_MAX_Y`: map extent (default: 1500 x 2000)
//!
//! Pins start without votes, like every pin created through the API.

use std::env;

use anyhow::{Context, bail};
use classic_plus_repository::{PinsRepository, PostgresPinsRepository, PostgresSchemaManager, SchemaManager};
use classic_plus_shared::types::{NewPin, PinCategory};
use rand::{Rng, seq::SliceRandom};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

const ADJECTIVES: [&str; 6] = ["Ancient", "Mystic", "Lost", "Hidden", "Cursed", "Fabled"];
const NOUNS: [&str; 6] = ["Temple", "Cave", "Ruins", "Fortress", "Dungeon", "Shrine"];
const FEATURES: [&str; 5] = [
    "contains treasure",
    "is haunted",
    "holds a secret boss",
    "has rare mobs",
    "is a quest hub",
];

fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) => value.trim().parse().with_context(|| format!("{key} has an invalid value")),
        Err(_) => Ok(default),
    }
}

fn random_pin<R: Rng>(rng: &mut R, max_x: f64, max_y: f64) -> NewPin {
    let adjective = ADJECTIVES.choose(rng).copied().unwrap_or("Ancient");
    let noun = NOUNS.choose(rng).copied().unwrap_or("Temple");
    let feature = FEATURES.choose(rng).copied().unwrap_or("contains treasure");
    NewPin {
        x: rng.gen_range(0.0..=max_x),
        y: rng.gen_range(0.0..=max_y),
        name: format!("{adjective} {noun}"),
        description: format!("This location {feature}."),
        category: PinCategory::ALL.choose(rng).copied().unwrap_or(PinCategory::Lore),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .compact()
        .init();

    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let count: usize = env_or("SEED_PIN_COUNT", 100)?;
    let max_x: f64 = env_or("SEED_MAX_X", 1500.0)?;
    let max_y: f64 = env_or("SEED_MAX_Y", 2000.0)?;
    if !(max_x.is_finite() && max_x > 0.0 && max_y.is_finite() && max_y > 0.0) {
        bail!("SEED_MAX_X and SEED_MAX_Y must be positive numbers");
    }

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .context("Failed to connect to PostgreSQL")?;
    PostgresSchemaManager::new(pool.clone()).migrate().await?;
    let repository = PostgresPinsRepository::new(pool).await?;

    let pins: Vec<NewPin> = {
        let mut rng = rand::thread_rng();
        (0..count).map(|_| random_pin(&mut rng, max_x, max_y)).collect()
    };
    for pin in &pins {
        repository.create_pin(pin).await?;
    }

    info!(count, "Successfully added random pins");
    Ok(())
}
