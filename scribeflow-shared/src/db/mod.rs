/// Database infrastructure
///
/// - `pool`: PostgreSQL connection pool creation and health checking
///
/// Schema migrations live in `migrations/` and are applied through
/// [`crate::store::postgres::run_migrations`].

pub mod pool;
