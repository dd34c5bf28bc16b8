use anyhow::{Context, Result};
use sqlx::PgPool;

/// Users and their balances. The CHECK constraint is what turns an overdraft
/// into SQLSTATE 23514.
pub const CREATE_USUARIOS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS usuarios (
    id SERIAL PRIMARY KEY,
    nombre VARCHAR(255) NOT NULL,
    balance NUMERIC(18, 2) NOT NULL DEFAULT 0 CHECK (balance >= 0)
)
"#;

pub const CREATE_TRANSFERENCIAS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS transferencias (
    id SERIAL PRIMARY KEY,
    emisor INTEGER NOT NULL REFERENCES usuarios(id),
    receptor INTEGER NOT NULL REFERENCES usuarios(id),
    monto NUMERIC(18, 2) NOT NULL CHECK (monto > 0),
    fecha TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

pub const CREATE_TRANSFERENCIAS_FECHA_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_transferencias_fecha ON transferencias (fecha, id)";

/// Create the balance store and ledger tables if they do not exist
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    tracing::info!("Initializing PostgreSQL schema...");

    sqlx::query(CREATE_USUARIOS_TABLE)
        .execute(pool)
        .await
        .context("Failed to create usuarios table")?;

    sqlx::query(CREATE_TRANSFERENCIAS_TABLE)
        .execute(pool)
        .await
        .context("Failed to create transferencias table")?;

    sqlx::query(CREATE_TRANSFERENCIAS_FECHA_INDEX)
        .execute(pool)
        .await
        .context("Failed to create transferencias index")?;

    tracing::info!("PostgreSQL schema initialized successfully");
    Ok(())
}
