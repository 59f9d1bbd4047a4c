//! Embedded PostgreSQL databases carrying the ledger schema.
//!
//! One shared cluster serves the whole test binary. A template database is
//! migrated once per migration-set hash; every test then gets a fresh clone.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::MigrationHarness;
use kudos_backend::outbound::persistence::MIGRATIONS;
use pg_embedded_setup_unpriv::test_support::hash_directory;
use pg_embedded_setup_unpriv::{BootstrapResult, ClusterHandle, TemporaryDatabase};
use uuid::Uuid;

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const TEMPLATE_NAME_PREFIX: &str = "kudos_template";
const RETRIES: usize = 5;
const RETRY_DELAY: Duration = Duration::from_millis(500);

fn migrations_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations")
}

/// Keep `PG_PASSWORD` stable so a reused data directory still accepts logins.
fn ensure_stable_password() {
    if std::env::var_os("PG_PASSWORD").is_none() {
        // SAFETY: runs before the cluster library spawns threads, under the
        // library's singleton lock.
        unsafe {
            std::env::set_var("PG_PASSWORD", "kudos_embedded_test");
        }
    }
}

/// The process-wide embedded cluster, retrying transient bootstrap failures.
pub fn shared_cluster_handle() -> BootstrapResult<&'static ClusterHandle> {
    ensure_stable_password();
    let mut attempt = 1;
    loop {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(error) if attempt < RETRIES => {
                eprintln!("pg-embed: attempt {attempt}/{RETRIES} failed: {error:?}");
                std::thread::sleep(RETRY_DELAY);
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}

fn template_database_name() -> Result<String, String> {
    let hash = hash_directory(migrations_dir()).map_err(|err| format!("hash migrations: {err}"))?;
    let short_hash = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_NAME_PREFIX}_{short_hash}"))
}

fn migrate_schema(url: &str) -> Result<(), String> {
    let mut conn = PgConnection::establish(url).map_err(|err| format!("connect: {err:?}"))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| format!("migration: {err:?}"))?;
    Ok(())
}

fn ensure_template_database(cluster: &ClusterHandle) -> Result<String, String> {
    let template_name = template_database_name()?;
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(template_name.as_str())
        .map_err(|err| format!("template check: {err:?}"))?;
    if !exists {
        cluster
            .create_database(template_name.as_str())
            .map_err(|err| format!("create template: {err:?}"))?;
        let url = cluster.connection().database_url(&template_name);
        migrate_schema(&url)?;
    }

    Ok(template_name)
}

/// A fresh database cloned from the migrated template.
pub fn provision_ledger_database(cluster: &ClusterHandle) -> Result<TemporaryDatabase, String> {
    let mut last_error = String::from("no attempt made");
    for attempt in 1..=RETRIES {
        let cloned = ensure_template_database(cluster).and_then(|template| {
            let db_name = format!("test_{}", Uuid::new_v4().simple());
            cluster
                .temporary_database_from_template(db_name.as_str(), template.as_str())
                .map_err(|err| format!("clone template: {err:?}"))
        });
        match cloned {
            Ok(database) => return Ok(database),
            Err(error) => last_error = format!("attempt {attempt}/{RETRIES}: {error}"),
        }
        if attempt < RETRIES {
            std::thread::sleep(RETRY_DELAY);
        }
    }
    Err(last_error)
}
