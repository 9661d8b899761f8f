use sea_orm_migration::prelude::*;

use crate::SchemaMigration;
use crate::catalog::SchemaCatalog;
use crate::datatype::{
    date, date_null, reference, reference_null, serial_primary_key, text, text_null,
    timestamp_now,
};
use crate::error::MigrationError;
use crate::model::{FailureMode, MigrationReport};
use crate::table::{TableDefinition, ensure_tables};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl SchemaMigration for Migration {
    fn failure_mode(&self) -> FailureMode {
        FailureMode::ReportOnly
    }

    async fn converge(
        &self,
        catalog: &dyn SchemaCatalog,
        report: &mut MigrationReport,
    ) -> Result<(), MigrationError> {
        ensure_tables(catalog, Self::tables(), report).await
    }
}

impl Migration {
    /// `assets` and `asset_history`, in the order they are declared.
    pub fn tables() -> Vec<TableDefinition> {
        vec![assets_table(), asset_history_table()]
    }
}

pub(crate) fn assets_table() -> TableDefinition {
    TableDefinition::new(
        Assets::Table,
        Table::create()
            .table(Assets::Table)
            .if_not_exists()
            .col(serial_primary_key(Assets::Id))
            .col(text(Assets::Name))
            .col(text(Assets::Type))
            .col(text(Assets::SerialNumber).unique_key())
            .col(text(Assets::Brand))
            .col(text(Assets::Model))
            .col(text(Assets::Status).default("in_stock"))
            .col(date(Assets::PurchaseDate))
            .col(date_null(Assets::WarrantyEndDate))
            .col(ColumnDef::new(Assets::PurchasePrice).decimal().null())
            .col(text_null(Assets::Supplier))
            .col(text(Assets::Location))
            .col(text(Assets::Department))
            .col(reference_null(Assets::AssignedToUserId))
            .col(text_null(Assets::AssignedToName))
            .col(ColumnDef::new(Assets::Specifications).json_binary().null())
            .col(text_null(Assets::Notes))
            .col(text_null(Assets::QrCode))
            .col(timestamp_now(Assets::CreatedAt))
            .col(timestamp_now(Assets::UpdatedAt))
            .col(reference_null(Assets::CreatedBy))
            .foreign_key(
                ForeignKey::create()
                    .name("fk-Assets-AssignedToUserId")
                    .from_tbl(Assets::Table)
                    .from_col(Assets::AssignedToUserId)
                    .to_tbl(Users::Table)
                    .to_col(Users::Id),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk-Assets-CreatedBy")
                    .from_tbl(Assets::Table)
                    .from_col(Assets::CreatedBy)
                    .to_tbl(Users::Table)
                    .to_col(Users::Id),
            )
            .to_owned(),
    )
    .depends_on(Users::Table)
}

pub(crate) fn asset_history_table() -> TableDefinition {
    TableDefinition::new(
        AssetHistory::Table,
        Table::create()
            .table(AssetHistory::Table)
            .if_not_exists()
            .col(serial_primary_key(AssetHistory::Id))
            .col(reference(AssetHistory::AssetId))
            .col(text(AssetHistory::Action))
            .col(text(AssetHistory::Description))
            .col(reference_null(AssetHistory::PerformedBy))
            .col(reference_null(AssetHistory::TicketId))
            .col(timestamp_now(AssetHistory::CreatedAt))
            .foreign_key(
                ForeignKey::create()
                    .name("fk-AssetHistory-AssetId")
                    .from_tbl(AssetHistory::Table)
                    .from_col(AssetHistory::AssetId)
                    .to_tbl(Assets::Table)
                    .to_col(Assets::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk-AssetHistory-PerformedBy")
                    .from_tbl(AssetHistory::Table)
                    .from_col(AssetHistory::PerformedBy)
                    .to_tbl(Users::Table)
                    .to_col(Users::Id),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk-AssetHistory-TicketId")
                    .from_tbl(AssetHistory::Table)
                    .from_col(AssetHistory::TicketId)
                    .to_tbl(Tickets::Table)
                    .to_col(Tickets::Id),
            )
            .to_owned(),
    )
    .depends_on(Assets::Table)
    .depends_on(Users::Table)
    .depends_on(Tickets::Table)
}

// Column names follow the application's ORM models
#[derive(DeriveIden)]
pub enum Assets {
    Table,
    Id,
    #[sea_orm(iden = "nom")]
    Name,
    Type,
    #[sea_orm(iden = "numero_de_serie")]
    SerialNumber,
    #[sea_orm(iden = "marque")]
    Brand,
    #[sea_orm(iden = "modele")]
    Model,
    #[sea_orm(iden = "statut")]
    Status,
    #[sea_orm(iden = "date_d_achat")]
    PurchaseDate,
    #[sea_orm(iden = "date_de_fin_garantie")]
    WarrantyEndDate,
    #[sea_orm(iden = "prix_d_achat")]
    PurchasePrice,
    #[sea_orm(iden = "fournisseur")]
    Supplier,
    #[sea_orm(iden = "localisation")]
    Location,
    #[sea_orm(iden = "departement")]
    Department,
    AssignedToUserId,
    AssignedToName,
    Specifications,
    Notes,
    QrCode,
    CreatedAt,
    UpdatedAt,
    CreatedBy,
}

#[derive(DeriveIden)]
pub enum AssetHistory {
    Table,
    Id,
    AssetId,
    Action,
    Description,
    PerformedBy,
    TicketId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Tickets {
    Table,
    Id,
}
