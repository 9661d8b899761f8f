use std::fmt;

use strum::Display;

/// Schema object targeted by a single migration step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SchemaObject {
    EnumLabel { type_prefix: String, label: String },
    Table(String),
}

impl SchemaObject {
    pub fn enum_label(type_prefix: impl Into<String>, label: impl Into<String>) -> Self {
        Self::EnumLabel {
            type_prefix: type_prefix.into(),
            label: label.into(),
        }
    }

    pub fn table(name: impl Into<String>) -> Self {
        Self::Table(name.into())
    }
}

impl fmt::Display for SchemaObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnumLabel { type_prefix, label } => {
                write!(f, "value '{label}' of enum '{type_prefix}*'")
            }
            Self::Table(name) => write!(f, "table '{name}'"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum StepOutcome {
    /// Created by this run.
    Applied,
    /// Found in the schema, or created by a concurrent run in the meantime.
    AlreadyPresent,
    /// The connected backend has no such kind of object.
    Unsupported,
}

/// How a migration signals a failed run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum FailureMode {
    /// The error is logged and returned to the caller.
    Propagate,
    /// The error is logged and recorded in [`MigrationReport::failure`]; the
    /// caller gets a successful return.
    ReportOnly,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepReport {
    pub object: SchemaObject,
    pub outcome: StepOutcome,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub migration: String,
    pub steps: Vec<StepReport>,
    pub failure: Option<String>,
}

impl MigrationReport {
    pub fn new(migration: impl Into<String>) -> Self {
        Self {
            migration: migration.into(),
            ..Default::default()
        }
    }

    pub(crate) fn record(&mut self, object: SchemaObject, outcome: StepOutcome) {
        self.steps.push(StepReport { object, outcome });
    }

    pub fn count(&self, outcome: StepOutcome) -> usize {
        self.steps
            .iter()
            .filter(|step| step.outcome == outcome)
            .count()
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}
