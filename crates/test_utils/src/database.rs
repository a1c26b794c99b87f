//! PostgreSQL test harness
//!
//! Each [`TestDatabase`] owns a throwaway `postgres` container with the
//! embedded migrations applied. The container stops when the value drops.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use testcontainers::{
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
    ContainerAsync, GenericImage, ImageExt,
};
use tokio::sync::OnceCell;

use infra_db::MIGRATOR;

const IMAGE: (&str, &str) = ("postgres", "16-alpine");
const CREDENTIALS: (&str, &str) = ("claims", "claims");
const DATABASE: &str = "claims_test";

/// Postgres restarts once after initdb; connections are retried across it
const CONNECT_ATTEMPTS: u32 = 20;
const CONNECT_BACKOFF: Duration = Duration::from_millis(250);

/// Concurrency tests spawn up to this many simultaneous claims
const POOL_SIZE: u32 = 20;

pub type HarnessError = Box<dyn std::error::Error + Send + Sync>;

/// A migrated database inside its own container
pub struct TestDatabase {
    _container: ContainerAsync<GenericImage>,
    url: String,
    pool: PgPool,
}

impl TestDatabase {
    /// Starts a container, waits for it to accept connections and migrates it
    pub async fn start() -> Result<Self, HarnessError> {
        let (user, password) = CREDENTIALS;
        let container = GenericImage::new(IMAGE.0, IMAGE.1)
            .with_exposed_port(5432.tcp())
            .with_wait_for(WaitFor::message_on_stderr(
                "database system is ready to accept connections",
            ))
            .with_env_var("POSTGRES_USER", user)
            .with_env_var("POSTGRES_PASSWORD", password)
            .with_env_var("POSTGRES_DB", DATABASE)
            .start()
            .await?;

        let host = container.get_host().await?;
        let port = container.get_host_port_ipv4(5432).await?;
        let url = connection_url(&host.to_string(), port);

        let pool = connect_with_retry(&url).await?;
        MIGRATOR.run(&pool).await?;

        Ok(Self {
            _container: container,
            url,
            pool,
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Empties every claims table, keeping the schema
    pub async fn truncate(&self) -> Result<(), HarnessError> {
        sqlx::query(
            "TRUNCATE TABLE outbox_events, provider_net_fee_aggregate, claim_lines, claims",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn connection_url(host: &str, port: u16) -> String {
    let (user, password) = CREDENTIALS;
    format!("postgres://{user}:{password}@{host}:{port}/{DATABASE}")
}

async fn connect_with_retry(url: &str) -> Result<PgPool, HarnessError> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match PgPoolOptions::new()
            .max_connections(POOL_SIZE)
            .acquire_timeout(Duration::from_secs(30))
            .connect(url)
            .await
        {
            Ok(pool) => return Ok(pool),
            Err(e) if attempt >= CONNECT_ATTEMPTS => return Err(e.into()),
            Err(_) => tokio::time::sleep(CONNECT_BACKOFF).await,
        }
    }
}

static SHARED: OnceCell<Arc<TestDatabase>> = OnceCell::const_new();

/// One container shared by every test in the binary
///
/// Tests using it must not assume empty tables.
///
/// # Panics
///
/// Panics if the container cannot be started
pub async fn shared_test_database() -> Arc<TestDatabase> {
    SHARED
        .get_or_init(|| async {
            Arc::new(
                TestDatabase::start()
                    .await
                    .expect("Failed to start shared test database"),
            )
        })
        .await
        .clone()
}

/// A fresh container for a test that needs empty tables
pub async fn create_isolated_test_database() -> Result<TestDatabase, HarnessError> {
    TestDatabase::start().await
}
