use serde::{Deserialize, Serialize};

/// A tenant organization owning services and transactions
///
/// Read projection over the `structures` table. The reporting core only
/// ever reads structures; creation and updates belong to the structure
/// management collaborator. `active = false` marks a soft-deleted tenant.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Structure {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
}
