use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbBackend, DbErr, Statement, TransactionTrait,
};
use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::{Alias, SchemaManager, TableCreateStatement};

/// Read and write access to the schema of the connected database.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SchemaCatalog: Send + Sync {
    fn backend(&self) -> DbBackend;

    /// Whether an enum type whose name starts with `type_prefix` contains `label`.
    async fn enum_has_label(&self, type_prefix: &str, label: &str) -> Result<bool, DbErr>;

    /// Name of the first enum type (by name) starting with `type_prefix`.
    async fn resolve_enum_type(&self, type_prefix: &str) -> Result<Option<String>, DbErr>;

    /// Appends `label` to the enum type `type_name`, committed on its own.
    async fn add_enum_label(&self, type_name: &str, label: &str) -> Result<(), DbErr>;

    async fn has_table(&self, table: &str) -> Result<bool, DbErr>;

    /// Executes `statement` inside its own transaction.
    async fn create_table(&self, table: &str, statement: TableCreateStatement)
    -> Result<(), DbErr>;
}

const ENUM_LABEL_EXISTS: &str = r#"
    SELECT 1 FROM pg_enum e
    JOIN pg_type t ON e.enumtypid = t.oid
    WHERE t.typname LIKE $1 AND e.enumlabel = $2
"#;

const ENUM_TYPE_BY_PREFIX: &str = r#"
    SELECT t.typname FROM pg_type t
    WHERE t.typtype = 'e' AND t.typname LIKE $1
    ORDER BY t.typname
    LIMIT 1
"#;

#[derive(Clone, Debug)]
pub struct DatabaseCatalog {
    db: DatabaseConnection,
}

impl DatabaseCatalog {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn require_postgres(&self) -> Result<(), DbErr> {
        match self.db.get_database_backend() {
            DbBackend::Postgres => Ok(()),
            backend => Err(DbErr::Custom(format!(
                "Enum types are not available on {backend:?}"
            ))),
        }
    }
}

#[async_trait::async_trait]
impl SchemaCatalog for DatabaseCatalog {
    fn backend(&self) -> DbBackend {
        self.db.get_database_backend()
    }

    async fn enum_has_label(&self, type_prefix: &str, label: &str) -> Result<bool, DbErr> {
        self.require_postgres()?;

        let row = self
            .db
            .query_one(Statement::from_sql_and_values(
                DbBackend::Postgres,
                ENUM_LABEL_EXISTS,
                [prefix_pattern(type_prefix).into(), label.into()],
            ))
            .await?;

        Ok(row.is_some())
    }

    async fn resolve_enum_type(&self, type_prefix: &str) -> Result<Option<String>, DbErr> {
        self.require_postgres()?;

        let row = self
            .db
            .query_one(Statement::from_sql_and_values(
                DbBackend::Postgres,
                ENUM_TYPE_BY_PREFIX,
                [prefix_pattern(type_prefix).into()],
            ))
            .await?;

        row.map(|row| row.try_get::<String>("", "typname"))
            .transpose()
    }

    async fn add_enum_label(&self, type_name: &str, label: &str) -> Result<(), DbErr> {
        self.require_postgres()?;

        // ADD VALUE is rejected inside a transaction block on older PostgreSQL
        // versions, so this runs directly on the pool in autocommit mode
        SchemaManager::new(&self.db)
            .alter_type(
                Type::alter()
                    .name(Alias::new(type_name))
                    .add_value(Alias::new(label))
                    .to_owned(),
            )
            .await
    }

    async fn has_table(&self, table: &str) -> Result<bool, DbErr> {
        SchemaManager::new(&self.db).has_table(table).await
    }

    async fn create_table(
        &self,
        table: &str,
        statement: TableCreateStatement,
    ) -> Result<(), DbErr> {
        let txn = self.db.begin().await?;
        let statement = txn.get_database_backend().build(&statement);

        match txn.execute(statement).await {
            Ok(_) => txn.commit().await,
            Err(err) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::warn!(table, "rollback after failed create failed: {rollback_err}");
                }
                Err(err)
            }
        }
    }
}

/// LIKE pattern matching every name starting with `prefix` literally.
fn prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
