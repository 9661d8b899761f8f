use sea_orm_migration::prelude::*;

use crate::SchemaMigration;
use crate::catalog::SchemaCatalog;
use crate::enum_label::{EnumLabels, ensure_enum_labels};
use crate::error::MigrationError;
use crate::model::{FailureMode, MigrationReport};

/// The ORM may have created the type as `ticketstatus` or with a suffix.
pub const TICKET_STATUS_TYPE_PREFIX: &str = "ticketstatus";

/// Altered when no type matches [`TICKET_STATUS_TYPE_PREFIX`].
pub const DEFAULT_TICKET_STATUS_TYPE: &str = "ticketstatus";

/// The ORM writes the member name (`RETRAITE`), other call sites write the
/// value (`retraite`); both have to be accepted by the column.
const RETRAITE_LABELS: [&str; 2] = ["retraite", "RETRAITE"];

/// Adds the retired (`retraite`) ticket status.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl SchemaMigration for Migration {
    fn failure_mode(&self) -> FailureMode {
        FailureMode::Propagate
    }

    async fn converge(
        &self,
        catalog: &dyn SchemaCatalog,
        report: &mut MigrationReport,
    ) -> Result<(), MigrationError> {
        ensure_enum_labels(
            catalog,
            &EnumLabels {
                type_prefix: TICKET_STATUS_TYPE_PREFIX,
                fallback_type: DEFAULT_TICKET_STATUS_TYPE,
                labels: &RETRAITE_LABELS,
            },
            report,
        )
        .await
    }
}
