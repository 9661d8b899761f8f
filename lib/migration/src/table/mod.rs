use std::collections::HashSet;

use sea_orm_migration::prelude::{Iden, TableCreateStatement};

use crate::catalog::SchemaCatalog;
use crate::error::{MigrationError, is_duplicate_object};
use crate::model::{MigrationReport, SchemaObject, StepOutcome};


/// A table to create when absent, together with the tables its foreign keys
/// point to.
#[derive(Clone, Debug)]
pub struct TableDefinition {
    name: String,
    depends_on: Vec<String>,
    statement: TableCreateStatement,
}

impl TableDefinition {
    pub fn new(table: impl Iden, statement: TableCreateStatement) -> Self {
        Self {
            name: Iden::to_string(&table),
            depends_on: vec![],
            statement,
        }
    }

    pub fn depends_on(mut self, table: impl Iden) -> Self {
        self.depends_on.push(Iden::to_string(&table));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn statement(&self) -> &TableCreateStatement {
        &self.statement
    }
}

/// Orders `definitions` so that every table comes after the tables it
/// references. Input order is kept where no dependency forces otherwise;
/// references to tables outside the set and to the table itself are ignored.
pub fn dependency_order(
    definitions: Vec<TableDefinition>,
) -> Result<Vec<TableDefinition>, MigrationError> {
    let names: HashSet<String> = definitions
        .iter()
        .map(|definition| definition.name.to_owned())
        .collect();

    let mut pending = definitions;
    let mut placed: HashSet<String> = HashSet::new();
    let mut ordered = Vec::with_capacity(pending.len());

    while !pending.is_empty() {
        let ready = pending.iter().position(|definition| {
            definition.depends_on.iter().all(|dependency| {
                *dependency == definition.name
                    || !names.contains(dependency)
                    || placed.contains(dependency)
            })
        });

        let Some(ready) = ready else {
            let blocked = pending
                .first()
                .map(|definition| definition.name.to_owned())
                .unwrap_or_default();
            return Err(MigrationError::DependencyCycle(blocked));
        };

        let definition = pending.remove(ready);
        placed.insert(definition.name.to_owned());
        ordered.push(definition);
    }

    Ok(ordered)
}

/// Creates every table of `definitions` that does not exist yet, parents
/// first. Existing tables are never touched.
pub async fn ensure_tables(
    catalog: &dyn SchemaCatalog,
    definitions: Vec<TableDefinition>,
    report: &mut MigrationReport,
) -> Result<(), MigrationError> {
    for TableDefinition {
        name, statement, ..
    } in dependency_order(definitions)?
    {
        let object = SchemaObject::table(&name);

        if catalog.has_table(&name).await? {
            let outcome = StepOutcome::AlreadyPresent;
            tracing::info!(%object, %outcome, "already exists, left unchanged");
            report.record(object, outcome);
            continue;
        }

        tracing::info!(%object, "creating");
        let outcome = match catalog.create_table(&name, statement).await {
            Ok(()) => StepOutcome::Applied,
            Err(err) if is_duplicate_object(&err) => {
                tracing::warn!(%object, "created concurrently: {err}");
                StepOutcome::AlreadyPresent
            }
            Err(source) => return Err(MigrationError::Apply { object, source }),
        };
        tracing::info!(%object, %outcome, "table converged");
        report.record(object, outcome);
    }

    Ok(())
}
