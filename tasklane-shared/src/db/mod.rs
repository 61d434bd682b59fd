/// Database plumbing
///
/// - `pool`: Connection pool creation, health checks, and usage stats
/// - `migrations`: Embedded schema migrations
///
/// Queries live in [`crate::services`].
///
/// ```no_run
/// use tasklane_shared::db::migrations::run_migrations;
/// use tasklane_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::new(std::env::var("DATABASE_URL")?)).await?;
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```

pub mod migrations;
pub mod pool;
