use std::collections::BTreeMap;

use migration::error::is_duplicate_object;
use migration::runner::run_migration;
use migration::{
    CreateAssetsTables, DatabaseCatalog, SchemaCatalog, SchemaObject, StepOutcome, StepReport,
};
use sea_orm::{ConnectionTrait, DatabaseConnection};
use similar_asserts::assert_eq;

use crate::fixtures::{columns, count_rows, fresh_database, has_column, has_table, is_postgres};

const ASSETS_COLUMNS: [&str; 21] = [
    "id",
    "nom",
    "type",
    "numero_de_serie",
    "marque",
    "modele",
    "statut",
    "date_d_achat",
    "date_de_fin_garantie",
    "prix_d_achat",
    "fournisseur",
    "localisation",
    "departement",
    "assigned_to_user_id",
    "assigned_to_name",
    "specifications",
    "notes",
    "qr_code",
    "created_at",
    "updated_at",
    "created_by",
];

const ASSET_HISTORY_COLUMNS: [&str; 7] = [
    "id",
    "asset_id",
    "action",
    "description",
    "performed_by",
    "ticket_id",
    "created_at",
];

fn step(table: &str, outcome: StepOutcome) -> StepReport {
    StepReport {
        object: SchemaObject::table(table),
        outcome,
    }
}

async fn insert_asset(db: &DatabaseConnection, id: i32, serial_number: &str) {
    db.execute_unprepared(&format!(
        "INSERT INTO assets \
         (id, nom, type, numero_de_serie, marque, modele, date_d_achat, localisation, departement) \
         VALUES ({id}, 'Laptop {id}', 'laptop', '{serial_number}', 'Dell', 'Latitude 5440', \
         '2024-01-15', 'Siege', 'IT')"
    ))
    .await
    .unwrap();
}

#[tokio::test]
async fn test_create_assets_tables_on_empty_schema() {
    let db = fresh_database().await;

    let report = run_migration(&CreateAssetsTables, &DatabaseCatalog::new(db.clone()))
        .await
        .unwrap();

    assert!(report.is_success());
    assert_eq!(
        report.steps,
        vec![
            step("assets", StepOutcome::Applied),
            step("asset_history", StepOutcome::Applied),
        ]
    );
    for column in ASSETS_COLUMNS {
        assert!(has_column(&db, "assets", column).await, "missing assets.{column}");
    }
    for column in ASSET_HISTORY_COLUMNS {
        assert!(
            has_column(&db, "asset_history", column).await,
            "missing asset_history.{column}"
        );
    }
}

#[tokio::test]
async fn test_create_assets_tables_twice_keeps_rows() {
    let db = fresh_database().await;
    let catalog = DatabaseCatalog::new(db.clone());

    run_migration(&CreateAssetsTables, &catalog).await.unwrap();
    for id in 1..=3 {
        insert_asset(&db, id, &format!("SN-{id}")).await;
    }

    let report = run_migration(&CreateAssetsTables, &catalog).await.unwrap();

    assert!(report.is_success());
    assert_eq!(
        report.steps,
        vec![
            step("assets", StepOutcome::AlreadyPresent),
            step("asset_history", StepOutcome::AlreadyPresent),
        ]
    );
    assert_eq!(count_rows(&db, "assets").await, 3);
}

#[tokio::test]
async fn test_existing_assets_table_is_not_altered() {
    let db = fresh_database().await;
    db.execute_unprepared("CREATE TABLE assets (id INTEGER PRIMARY KEY, nom TEXT NOT NULL)")
        .await
        .unwrap();
    db.execute_unprepared("INSERT INTO assets (id, nom) VALUES (1, 'Printer'), (2, 'Screen')")
        .await
        .unwrap();

    let report = run_migration(&CreateAssetsTables, &DatabaseCatalog::new(db.clone()))
        .await
        .unwrap();

    assert_eq!(
        report.steps,
        vec![
            step("assets", StepOutcome::AlreadyPresent),
            step("asset_history", StepOutcome::Applied),
        ]
    );
    assert_eq!(count_rows(&db, "assets").await, 2);
    assert!(has_column(&db, "assets", "nom").await);
    assert!(!has_column(&db, "assets", "numero_de_serie").await);
    assert!(has_table(&db, "asset_history").await);
}

#[tokio::test]
async fn test_assets_defaults() {
    let db = fresh_database().await;
    run_migration(&CreateAssetsTables, &DatabaseCatalog::new(db.clone()))
        .await
        .unwrap();

    insert_asset(&db, 1, "SN-1").await;

    assert_eq!(count_rows(&db, "assets WHERE statut = 'in_stock'").await, 1);
    assert_eq!(
        count_rows(
            &db,
            "assets WHERE created_at IS NOT NULL AND updated_at IS NOT NULL"
        )
        .await,
        1
    );
}

#[tokio::test]
async fn test_assets_serial_number_is_unique() {
    let db = fresh_database().await;
    run_migration(&CreateAssetsTables, &DatabaseCatalog::new(db.clone()))
        .await
        .unwrap();

    insert_asset(&db, 1, "SN-1").await;
    let duplicate = db
        .execute_unprepared(
            "INSERT INTO assets \
             (id, nom, type, numero_de_serie, marque, modele, date_d_achat, localisation, departement) \
             VALUES (2, 'Laptop 2', 'laptop', 'SN-1', 'Dell', 'Latitude 5440', '2024-01-15', 'Siege', 'IT')",
        )
        .await;

    assert!(duplicate.is_err());
    assert_eq!(count_rows(&db, "assets").await, 1);
}

#[tokio::test]
async fn test_asset_history_is_deleted_with_asset() {
    let db = fresh_database().await;
    run_migration(&CreateAssetsTables, &DatabaseCatalog::new(db.clone()))
        .await
        .unwrap();

    insert_asset(&db, 1, "SN-1").await;
    db.execute_unprepared(
        "INSERT INTO asset_history (id, asset_id, action, description) \
         VALUES (1, 1, 'created', 'Asset registered')",
    )
    .await
    .unwrap();
    assert_eq!(count_rows(&db, "asset_history").await, 1);

    db.execute_unprepared("DELETE FROM assets WHERE id = 1")
        .await
        .unwrap();

    assert_eq!(count_rows(&db, "asset_history").await, 0);
}

fn expected_columns(columns: &[(&str, &str, bool)]) -> BTreeMap<String, (String, bool)> {
    columns
        .iter()
        .map(|(name, data_type, nullable)| {
            (name.to_string(), (data_type.to_string(), *nullable))
        })
        .collect()
}

#[tokio::test]
async fn test_assets_column_types_and_nullability() {
    let db = fresh_database().await;
    if !is_postgres(&db) {
        return;
    }
    run_migration(&CreateAssetsTables, &DatabaseCatalog::new(db.clone()))
        .await
        .unwrap();

    assert_eq!(
        columns(&db, "assets").await,
        expected_columns(&[
            ("id", "integer", false),
            ("nom", "text", false),
            ("type", "text", false),
            ("numero_de_serie", "text", false),
            ("marque", "text", false),
            ("modele", "text", false),
            ("statut", "text", false),
            ("date_d_achat", "date", false),
            ("date_de_fin_garantie", "date", true),
            ("prix_d_achat", "numeric", true),
            ("fournisseur", "text", true),
            ("localisation", "text", false),
            ("departement", "text", false),
            ("assigned_to_user_id", "integer", true),
            ("assigned_to_name", "text", true),
            ("specifications", "jsonb", true),
            ("notes", "text", true),
            ("qr_code", "text", true),
            ("created_at", "timestamp with time zone", true),
            ("updated_at", "timestamp with time zone", true),
            ("created_by", "integer", true),
        ])
    );
    assert_eq!(
        columns(&db, "asset_history").await,
        expected_columns(&[
            ("id", "integer", false),
            ("asset_id", "integer", false),
            ("action", "text", false),
            ("description", "text", false),
            ("performed_by", "integer", true),
            ("ticket_id", "integer", true),
            ("created_at", "timestamp with time zone", true),
        ])
    );
}

#[tokio::test]
async fn test_assets_mandatory_column_rejects_null() {
    let db = fresh_database().await;
    run_migration(&CreateAssetsTables, &DatabaseCatalog::new(db.clone()))
        .await
        .unwrap();

    let result = db
        .execute_unprepared(
            "INSERT INTO assets \
             (id, nom, type, numero_de_serie, marque, modele, date_d_achat, localisation, departement) \
             VALUES (1, NULL, 'laptop', 'SN-1', 'Dell', 'Latitude 5440', '2024-01-15', 'Siege', 'IT')",
        )
        .await;

    assert!(result.is_err());
    assert_eq!(count_rows(&db, "assets").await, 0);
}

#[tokio::test]
async fn test_asset_history_references_users_and_tickets() {
    let db = fresh_database().await;
    if !is_postgres(&db) {
        return;
    }
    run_migration(&CreateAssetsTables, &DatabaseCatalog::new(db.clone()))
        .await
        .unwrap();
    insert_asset(&db, 1, "SN-1").await;
    db.execute_unprepared("INSERT INTO users (id, email) VALUES (1, 'it@example.com')")
        .await
        .unwrap();

    let unknown_user = db
        .execute_unprepared(
            "INSERT INTO asset_history (id, asset_id, action, description, performed_by) \
             VALUES (1, 1, 'assigned', 'Assigned to desk 4', 999)",
        )
        .await;
    assert!(unknown_user.is_err());

    let unknown_ticket = db
        .execute_unprepared(
            "INSERT INTO asset_history (id, asset_id, action, description, ticket_id) \
             VALUES (2, 1, 'repaired', 'Screen replaced', 999)",
        )
        .await;
    assert!(unknown_ticket.is_err());

    let unknown_asset = db
        .execute_unprepared(
            "INSERT INTO asset_history (id, asset_id, action, description) \
             VALUES (3, 999, 'created', 'Asset registered')",
        )
        .await;
    assert!(unknown_asset.is_err());

    db.execute_unprepared(
        "INSERT INTO asset_history (id, asset_id, action, description, performed_by) \
         VALUES (4, 1, 'assigned', 'Assigned to desk 4', 1)",
    )
    .await
    .unwrap();
    assert_eq!(count_rows(&db, "asset_history").await, 1);
}

#[tokio::test]
async fn test_asset_history_cannot_be_created_before_assets() {
    let db = fresh_database().await;
    if !is_postgres(&db) {
        return;
    }
    let catalog = DatabaseCatalog::new(db.clone());
    let asset_history = CreateAssetsTables::tables()
        .into_iter()
        .find(|definition| definition.name() == "asset_history")
        .unwrap();

    let err = catalog
        .create_table("asset_history", asset_history.statement().to_owned())
        .await
        .unwrap_err();

    assert!(!is_duplicate_object(&err));
    assert!(!has_table(&db, "asset_history").await);
    assert!(!has_table(&db, "assets").await);
}
