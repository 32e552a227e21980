//! Warehouse access: one long-lived connection plus the metadata presence
//! checks built on top of it.

use anyhow::Result;
use log::debug;

use crate::{errors::LoadError, settings::WarehouseSettings, sql};

/// Executes statements against the warehouse.
///
/// Implementations commit each statement before returning; there is no
/// multi-statement transaction spanning a run, so a failure partway
/// through leaves earlier statements durably applied.
pub trait Warehouse {
    /// Runs a read-only query and reports whether it returned any rows.
    fn query_has_rows(&mut self, query: &str) -> Result<bool>;
    /// Executes a statement and commits it.
    fn execute(&mut self, statement: &str) -> Result<()>;
}

/// Production client over a single blocking postgres-protocol connection,
/// opened once and reused for every statement in the run.
pub struct WarehouseClient {
    client: postgres::Client,
}

impl WarehouseClient {
    pub fn connect(settings: &WarehouseSettings) -> Result<Self> {
        let mut config = postgres::Config::new();
        config
            .host(&settings.host)
            .port(settings.port)
            .user(&settings.user)
            .password(&settings.password)
            .dbname(&settings.database);
        let client = config
            .connect(postgres::NoTls)
            .map_err(LoadError::WarehouseUnavailable)?;
        debug!(
            "Connected to warehouse {}:{}/{}",
            settings.host, settings.port, settings.database
        );
        Ok(Self { client })
    }
}

impl Warehouse for WarehouseClient {
    fn query_has_rows(&mut self, query: &str) -> Result<bool> {
        let rows = self
            .client
            .query(query, &[])
            .map_err(LoadError::WarehouseUnavailable)?;
        Ok(!rows.is_empty())
    }

    fn execute(&mut self, statement: &str) -> Result<()> {
        self.client
            .batch_execute(statement)
            .map_err(LoadError::WarehouseUnavailable)?;
        Ok(())
    }
}

pub fn schema_exists(warehouse: &mut dyn Warehouse, schema: &str) -> Result<bool> {
    warehouse.query_has_rows(&sql::schema_exists_query(schema))
}

pub fn table_exists(warehouse: &mut dyn Warehouse, schema: &str, table: &str) -> Result<bool> {
    warehouse.query_has_rows(&sql::table_exists_query(schema, table))
}
