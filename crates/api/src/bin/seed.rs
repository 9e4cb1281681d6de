//! Populate a development database with random users, posts, comments and
//! follow edges.
//!
//! `SEED_RNG` (optional, u64) makes the generated data reproducible.

use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use social_api::config::DbConfig;
use social_db::seed::{seed, SeedPlan};
use social_db::Storage;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "social_db=info,social_seed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db_config = match DbConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid database configuration");
            return ExitCode::FAILURE;
        }
    };

    let rng_seed = match std::env::var("SEED_RNG").ok().map(|v| v.trim().parse::<u64>()) {
        None => None,
        Some(Ok(seed)) => Some(seed),
        Some(Err(e)) => {
            tracing::error!(error = %e, "SEED_RNG must be an unsigned integer");
            return ExitCode::FAILURE;
        }
    };

    let pool = match social_db::create_pool(&db_config.database_url, &db_config.pool).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = social_db::run_migrations(&pool).await {
        tracing::error!(error = %e, "Failed to run database migrations");
        return ExitCode::FAILURE;
    }

    let plan = SeedPlan {
        rng_seed,
        ..SeedPlan::default()
    };

    let outcome = seed(&Storage::postgres(pool.clone()), &plan).await;
    pool.close().await;

    match outcome {
        Ok(report) => {
            tracing::info!(
                users = report.users,
                posts = report.posts,
                comments = report.comments,
                follows = report.follows,
                "Seeding complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Seeding stopped; rows inserted so far remain");
            ExitCode::FAILURE
        }
    }
}
