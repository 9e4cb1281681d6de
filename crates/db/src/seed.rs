//! Development data seeding.
//!
//! Inserts users, then posts, then comments, then follow edges through the
//! [`Storage`] traits. The sequence is not transactional: the first failure
//! stops seeding and everything inserted before it stays committed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use social_core::password::hash_password;
use social_core::types::DbId;

use crate::error::StoreError;
use crate::models::comment::CreateComment;
use crate::models::post::CreatePost;
use crate::models::user::NewUser;
use crate::store::Storage;

const USERNAMES: &[&str] = &[
    "ada", "brendan", "carmen", "dmitri", "elena", "farid", "greta", "hiro", "ines", "jonas",
    "kemi", "lars", "mira", "nils", "olga", "pavel", "quentin", "rosa", "sven", "tala",
];

const TITLES: &[&str] = &[
    "Lifetimes explained with a whiteboard",
    "Why my borrow checker fights were worth it",
    "Shipping a CLI with clap in an afternoon",
    "Async cancellation is a feature",
    "Notes from rewriting a parser",
    "Zero-copy deserialization in practice",
    "Postgres arrays are underrated",
    "Benchmarks that lied to me",
    "Trait objects versus generics",
    "A small tour of tower middleware",
];

const CONTENTS: &[&str] = &[
    "Some thoughts collected after a long week of refactoring.",
    "The short version: measure first, then decide.",
    "I kept a log of every mistake I made so you do not have to.",
    "This started as a tweet and grew into a post.",
    "There is more than one way to do it, and here are three.",
    "A follow-up to last month's post, with corrections.",
];

const TAGS: &[&str] = &[
    "rust", "async", "database", "web", "cli", "performance", "testing", "tooling",
];

const COMMENTS: &[&str] = &[
    "Great write-up, thanks!",
    "Could you expand on the second section?",
    "I ran into the same thing last week.",
    "This changed how I think about the problem.",
    "Bookmarked for later.",
    "Small typo in the third paragraph.",
];

/// Plaintext credential given to every seeded account.
const SEED_PASSWORD: &str = "password";

/// How much data to create.
#[derive(Debug, Clone)]
pub struct SeedPlan {
    pub users: usize,
    pub posts: usize,
    pub comments: usize,
    pub follows: usize,
    /// Fixed RNG seed for reproducible data; `None` draws from the OS.
    pub rng_seed: Option<u64>,
}

impl Default for SeedPlan {
    fn default() -> Self {
        Self {
            users: 50,
            posts: 20,
            comments: 20,
            follows: 100,
            rng_seed: None,
        }
    }
}

/// What was actually inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub posts: usize,
    pub comments: usize,
    pub follows: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Populate `storage` according to `plan`. Fails fast on the first error.
pub async fn seed(storage: &Storage, plan: &SeedPlan) -> Result<SeedReport, SeedError> {
    let mut rng = match plan.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut report = SeedReport::default();

    let password_hash = hash_password(SEED_PASSWORD).map_err(|e| SeedError::Hash(e.to_string()))?;

    let mut user_ids: Vec<DbId> = Vec::with_capacity(plan.users);
    for i in 0..plan.users {
        let name = format!("{}{i}", USERNAMES[i % USERNAMES.len()]);
        let user = storage
            .users
            .create(&NewUser {
                email: format!("{name}@example.com"),
                username: name,
                password_hash: password_hash.clone(),
            })
            .await?;
        user_ids.push(user.id);
        report.users += 1;
    }
    tracing::info!(count = report.users, "Seeded users");

    if user_ids.is_empty() {
        return Ok(report);
    }

    let mut post_ids: Vec<DbId> = Vec::with_capacity(plan.posts);
    for _ in 0..plan.posts {
        let author = user_ids[rng.random_range(0..user_ids.len())];
        let input = CreatePost {
            title: pick(&mut rng, TITLES).to_string(),
            content: pick(&mut rng, CONTENTS).to_string(),
            tags: (0..3).map(|_| pick(&mut rng, TAGS).to_string()).collect(),
        };
        let post = storage.posts.create(author, &input).await?;
        post_ids.push(post.id);
        report.posts += 1;
    }
    tracing::info!(count = report.posts, "Seeded posts");

    if !post_ids.is_empty() {
        for _ in 0..plan.comments {
            let post_id = post_ids[rng.random_range(0..post_ids.len())];
            let author = user_ids[rng.random_range(0..user_ids.len())];
            let input = CreateComment {
                content: pick(&mut rng, COMMENTS).to_string(),
            };
            storage.comments.create(post_id, author, &input).await?;
            report.comments += 1;
        }
        tracing::info!(count = report.comments, "Seeded comments");
    }

    // Random pairs collide; duplicates and self-follows are skipped rather
    // than treated as failures.
    for _ in 0..plan.follows {
        let follower = user_ids[rng.random_range(0..user_ids.len())];
        let target = user_ids[rng.random_range(0..user_ids.len())];
        if follower == target {
            continue;
        }
        match storage.followers.follow(follower, target).await {
            Ok(()) => report.follows += 1,
            Err(StoreError::Conflict(_)) => {}
            Err(e) => return Err(e.into()),
        }
    }
    tracing::info!(count = report.follows, "Seeded follow edges");

    Ok(report)
}

fn pick<'a>(rng: &mut StdRng, items: &[&'a str]) -> &'a str {
    items[rng.random_range(0..items.len())]
}
