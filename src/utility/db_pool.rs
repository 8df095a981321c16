use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::{Connection, SqliteConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use eyre::{eyre, WrapErr};
use std::time::Duration;
use tracing::info;

use crate::models::app_state::DbPool;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// SQLite needs a busy timeout and foreign keys switched on per connection;
/// WAL lets readers proceed while a writer holds the lock.
#[derive(Debug)]
struct ConnectionOptions;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(
            "PRAGMA busy_timeout = 5000; \
             PRAGMA foreign_keys = ON; \
             PRAGMA journal_mode = WAL;",
        )
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn establish_pool(database_url: &str) -> eyre::Result<DbPool> {
    run_migrations(database_url)?;

    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(10)
        .connection_timeout(Duration::from_secs(5))
        .connection_customizer(Box::new(ConnectionOptions))
        .build(manager)
        .wrap_err_with(|| format!("failed to build connection pool for {database_url}"))?;

    info!(url = %database_url, "db: pool ready");
    Ok(pool)
}

pub fn run_migrations(database_url: &str) -> eyre::Result<()> {
    let mut conn = SqliteConnection::establish(database_url)
        .wrap_err("failed to open connection for migrations")?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| eyre!("failed to run migrations: {e}"))?;
    Ok(())
}
