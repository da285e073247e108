//! Application state - shared across all handlers.

use std::sync::Arc;

use blogly_core::{PostService, TagService, UserService};
use blogly_infra::{DatabaseConfig, InMemoryStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub posts: PostService,
    pub tags: TagService,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(feature = "postgres")]
        {
            if let Some(config) = db_config {
                match blogly_infra::database::connect(config).await {
                    Ok(conn) => {
                        use blogly_infra::{
                            PostgresPostRepository, PostgresPostTagRepository,
                            PostgresTagRepository, PostgresUserRepository,
                        };

                        let users = Arc::new(PostgresUserRepository::new(conn.clone()));
                        let posts = Arc::new(PostgresPostRepository::new(conn.clone()));
                        let tags = Arc::new(PostgresTagRepository::new(conn.clone()));
                        let post_tags = Arc::new(PostgresPostTagRepository::new(conn));

                        tracing::info!("Application state initialized (postgres)");
                        return Self {
                            users: UserService::new(users.clone(), posts.clone()),
                            posts: PostService::new(
                                users,
                                posts.clone(),
                                tags.clone(),
                                post_tags.clone(),
                            ),
                            tags: TagService::new(tags, posts, post_tags),
                        };
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            }
        }

        #[cfg(not(feature = "postgres"))]
        {
            if db_config.is_some() {
                tracing::warn!("Built without postgres feature - ignoring DATABASE_URL");
            }
            tracing::info!("Running without postgres feature - using in-memory store");
        }

        Self::in_memory()
    }

    /// State backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(InMemoryStore::new()))
    }

    pub fn with_store(store: Arc<InMemoryStore>) -> Self {
        Self {
            users: UserService::new(store.clone(), store.clone()),
            posts: PostService::new(store.clone(), store.clone(), store.clone(), store.clone()),
            tags: TagService::new(store.clone(), store.clone(), store),
        }
    }
}
