//! Demo content seeding.
//!
//! Seeding goes through the store's regular create operations so that the
//! same uniqueness checks apply to seed rows as to user-created ones.

use anyhow::Context;
use chrono::{DateTime, Duration, TimeZone, Utc};

use inkwell_core::domain::{NewPost, NewTag, NewUser};
use inkwell_core::ports::{
    BlogStore, PasswordService, PostRepository, TagRepository, UserRepository,
};
use inkwell_core::slug::slugify;

/// Credentials for the seeded admin account.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub admin_username: String,
    pub admin_password: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            admin_username: "admin".to_string(),
            admin_password: "admin123".to_string(),
        }
    }
}

/// What a seeding run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The store already had users; nothing was written.
    Skipped,
    Seeded { tags: usize, posts: usize },
}

pub const TAG_NAMES: &[&str] = &[
    "JavaScript",
    "React",
    "TypeScript",
    "Node.js",
    "CSS",
    "Web Development",
    "Performance",
    "Tutorial",
];

struct DemoPost {
    title: &'static str,
    excerpt: &'static str,
    content: &'static str,
    cover_image: &'static str,
    days_before_epoch: i64,
    reading_time: &'static str,
    tags: &'static [&'static str],
}

const DEMO_POSTS: &[DemoPost] = &[
    DemoPost {
        title: "Getting Started with React Hooks",
        excerpt: "A practical introduction to useState, useEffect and writing your own hooks.",
        content: "## Why hooks\n\nHooks let function components hold state and run side effects.\n\n\
                  ## useState\n\nCall `useState` with an initial value and get back the value and a setter.\n\n\
                  ## useEffect\n\nEffects run after render. Return a cleanup function to undo subscriptions.",
        cover_image: "https://images.unsplash.com/photo-1633356122544-f134324a6cee",
        days_before_epoch: 0,
        reading_time: "6 min read",
        tags: &["React", "JavaScript", "Tutorial"],
    },
    DemoPost {
        title: "TypeScript Generics Without Tears",
        excerpt: "Generics explained through small, realistic examples you can reuse today.",
        content: "## The problem\n\nWithout generics you either lose type information or duplicate code.\n\n\
                  ## Constraints\n\nUse `extends` to require a shape from a type parameter.",
        cover_image: "https://images.unsplash.com/photo-1516116216624-53e697fedbea",
        days_before_epoch: 4,
        reading_time: "8 min read",
        tags: &["TypeScript", "Tutorial"],
    },
    DemoPost {
        title: "Modern CSS Layout with Grid and Flexbox",
        excerpt: "When to reach for grid, when flexbox is enough, and how they combine.",
        content: "## One dimension or two\n\nFlexbox lays out a single row or column. Grid handles both axes.\n\n\
                  ## Combining them\n\nA grid for the page skeleton, flexbox inside each card.",
        cover_image: "https://images.unsplash.com/photo-1507721999472-8ed4421c4af2",
        days_before_epoch: 9,
        reading_time: "5 min read",
        tags: &["CSS", "Web Development"],
    },
    DemoPost {
        title: "Building a REST API with Node.js",
        excerpt: "Routing, validation and error handling for a small JSON API.",
        content: "## Routes\n\nKeep handlers thin and push data access into a storage layer.\n\n\
                  ## Validation\n\nValidate request bodies at the edge and return 400 with a clear message.",
        cover_image: "https://images.unsplash.com/photo-1555066931-4365d14bab8c",
        days_before_epoch: 15,
        reading_time: "10 min read",
        tags: &["Node.js", "JavaScript", "Web Development"],
    },
    DemoPost {
        title: "Web Performance Quick Wins",
        excerpt: "Five changes that make most sites noticeably faster.",
        content: "## Measure first\n\nUse real user metrics before optimizing.\n\n\
                  ## Images\n\nServe modern formats at the size they are displayed.",
        cover_image: "https://images.unsplash.com/photo-1460925895917-afdab827c52f",
        days_before_epoch: 22,
        reading_time: "4 min read",
        tags: &["Performance", "Web Development"],
    },
];

/// Reference date the demo posts are published relative to.
fn seed_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 15, 10, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// Populate an empty store with an admin user, tags and demo posts.
///
/// Skips entirely when any user already exists.
pub async fn seed_demo_content(
    store: &dyn BlogStore,
    passwords: &dyn PasswordService,
    config: &SeedConfig,
) -> anyhow::Result<SeedOutcome> {
    if store.has_users().await.context("checking for existing users")? {
        tracing::info!("Store already has users, skipping seed");
        return Ok(SeedOutcome::Skipped);
    }

    tracing::info!(backend = store.backend(), "Seeding demo content...");

    let password = passwords
        .hash(&config.admin_password)
        .context("hashing admin password")?;
    let admin = store
        .create_user(NewUser::new(config.admin_username.clone(), password))
        .await
        .context("creating admin user")?;

    let mut tags = Vec::with_capacity(TAG_NAMES.len());
    for name in TAG_NAMES {
        let tag = store
            .create_tag(NewTag {
                name: (*name).to_string(),
                slug: slugify(name)?,
            })
            .await
            .with_context(|| format!("creating tag {name}"))?;
        tags.push(tag);
    }

    let epoch = seed_epoch();
    for demo in DEMO_POSTS {
        let post = store
            .create_post(NewPost {
                slug: slugify(demo.title)?,
                title: demo.title.to_string(),
                excerpt: demo.excerpt.to_string(),
                content: demo.content.to_string(),
                cover_image: Some(demo.cover_image.to_string()),
                published_at: Some(epoch - Duration::days(demo.days_before_epoch)),
                reading_time: demo.reading_time.to_string(),
                author_id: Some(admin.id),
            })
            .await
            .with_context(|| format!("creating post {}", demo.title))?;

        for tag_name in demo.tags {
            let Some(tag) = tags.iter().find(|t| t.name == *tag_name) else {
                tracing::warn!(tag = %tag_name, "Demo post references unknown tag");
                continue;
            };
            store
                .add_tag_to_post(post.id, tag.id)
                .await
                .with_context(|| format!("tagging {} with {}", post.slug, tag.slug))?;
        }
    }

    tracing::info!(
        tags = tags.len(),
        posts = DEMO_POSTS.len(),
        "Demo content seeded"
    );

    Ok(SeedOutcome::Seeded {
        tags: tags.len(),
        posts: DEMO_POSTS.len(),
    })
}
