use async_trait::async_trait;
use chrono::Utc;
use entity::employees;
use products_hr::{Fields, apply_patch, strip_identifier};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set, TransactionTrait};
use serde_json::Value;
use tracing::debug;

use crate::{DbPool, EmployeeRecord, EmployeeStore, StoreError, StoreResult, new_document_id};

/// Document store backed by the `employees` table; each row keeps its
/// fields in a JSON column.
#[derive(Clone, Debug)]
pub struct SeaOrmStore {
    pool: DbPool,
}

impl SeaOrmStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn document_fields(model: &employees::Model) -> StoreResult<Fields> {
    match &model.data {
        Value::Object(fields) => Ok(fields.clone()),
        _ => Err(StoreError::Corrupt {
            id: model.id.clone(),
        }),
    }
}

#[async_trait]
impl EmployeeStore for SeaOrmStore {
    async fn create(&self, fields: Fields) -> StoreResult<String> {
        let id = new_document_id();
        let now = Utc::now().fixed_offset();
        employees::ActiveModel {
            id: Set(id.clone()),
            data: Set(Value::Object(strip_identifier(fields))),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.pool)
        .await?;
        debug!(%id, "employee document inserted");
        Ok(id)
    }

    async fn list(&self) -> StoreResult<Vec<EmployeeRecord>> {
        let models = employees::Entity::find()
            .order_by_asc(employees::Column::CreatedAt)
            .order_by_asc(employees::Column::Id)
            .all(&self.pool)
            .await?;
        models
            .iter()
            .map(|model| {
                Ok(EmployeeRecord {
                    id: model.id.clone(),
                    fields: document_fields(model)?,
                })
            })
            .collect()
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let result = employees::Entity::delete_by_id(id.to_string())
            .exec(&self.pool)
            .await?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        debug!(%id, "employee document deleted");
        Ok(())
    }

    async fn update(&self, id: &str, patch: Fields) -> StoreResult<()> {
        let txn = self.pool.begin().await?;
        let model = employees::Entity::find_by_id(id.to_string())
            .one(&txn)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let mut fields = document_fields(&model)?;
        apply_patch(&mut fields, patch);

        let mut active: employees::ActiveModel = model.into();
        active.data = Set(Value::Object(fields));
        active.updated_at = Set(Utc::now().fixed_offset());
        active.update(&txn).await?;
        txn.commit().await?;
        debug!(%id, "employee document updated");
        Ok(())
    }

    async fn ping(&self) -> bool {
        self.pool.ping().await.is_ok()
    }
}
