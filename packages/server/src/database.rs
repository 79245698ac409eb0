use std::time::Duration;

use sea_orm::sea_query::{Index, PostgresQueryBuilder};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tracing::{info, warn};

use crate::entity::{import_content, import_operation};

pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());

    // Set connection pool options
    opt.max_connections(100)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(8))
        .max_lifetime(Duration::from_secs(8))
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;
    db.get_schema_registry("import_server::entity::*")
        .sync(&db)
        .await?;

    Ok(db)
}

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't support composite indexes, so we create them
/// manually on startup. The content uniqueness index is what makes concurrent
/// identical uploads collapse into one record, so failing to create it is fatal.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let stmt = Index::create()
        .if_not_exists()
        .unique()
        .name("idx_import_content_op_type_digest")
        .table(import_content::Entity)
        .col(import_content::Column::OperationId)
        .col(import_content::Column::ContentType)
        .col(import_content::Column::Digest)
        .to_string(PostgresQueryBuilder);

    db.execute_unprepared(&stmt).await?;
    info!("Ensured index idx_import_content_op_type_digest exists");

    // Listing operations:
    // SELECT * FROM image_import_operation WHERE account = ? ORDER BY created_at
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_import_operation_account_created")
        .table(import_operation::Entity)
        .col(import_operation::Column::Account)
        .col(import_operation::Column::CreatedAt)
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => {
            info!("Ensured index idx_import_operation_account_created exists");
        }
        Err(e) => {
            warn!(
                "Failed to create index idx_import_operation_account_created: {}",
                e
            );
        }
    }

    Ok(())
}
