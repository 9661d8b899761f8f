//! Idempotent schema migrations for the ticketing database.
//!
//! There is no applied-migrations table: every run re-reads the live schema
//! and only issues the DDL needed to converge, so each migration can be run
//! any number of times, also concurrently.

pub use sea_orm_migration::MigrationName;

pub mod catalog;
pub(crate) mod datatype;
pub mod enum_label;
pub mod error;
pub mod model;
pub mod runner;
pub mod table;

mod m20260205_101500_add_retraite_ticket_status;
mod m20260212_093000_create_assets_tables;

pub use catalog::{DatabaseCatalog, SchemaCatalog};
pub use error::MigrationError;
pub use m20260205_101500_add_retraite_ticket_status::{
    DEFAULT_TICKET_STATUS_TYPE, Migration as AddRetraiteTicketStatus, TICKET_STATUS_TYPE_PREFIX,
};
pub use m20260212_093000_create_assets_tables::Migration as CreateAssetsTables;
pub use model::{FailureMode, MigrationReport, SchemaObject, StepOutcome, StepReport};

/// A migration that converges the live schema towards its target state.
#[async_trait::async_trait]
pub trait SchemaMigration: MigrationName + Send + Sync {
    /// How a failed run is surfaced to the caller.
    fn failure_mode(&self) -> FailureMode;

    /// Applies the missing schema objects, recording every step into `report`.
    async fn converge(
        &self,
        catalog: &dyn SchemaCatalog,
        report: &mut MigrationReport,
    ) -> Result<(), MigrationError>;
}
