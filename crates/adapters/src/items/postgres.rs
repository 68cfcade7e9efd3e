// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Postgres-backed item repository
//!
//! Expected schema (owned and migrated by the CRUD layer):
//!
//! ```sql
//! shopping_lists      (id bigint primary key, ...)
//! shopping_list_items (id text primary key,
//!                      shopping_list_id bigint references shopping_lists,
//!                      content text not null,
//!                      notes text,
//!                      completed boolean not null,
//!                      "order" integer not null)
//! ```

use super::{ItemStore, ItemStoreError};
use async_trait::async_trait;
use pantry_core::{Batch, Item, ItemId, ListId};
use sqlx::{FromRow, PgPool};
use tracing::debug;

#[derive(FromRow)]
struct ItemRow {
    id: String,
    shopping_list_id: i64,
    content: String,
    notes: Option<String>,
    completed: bool,
    order: i32,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item {
            id: ItemId::new(row.id),
            list_id: ListId(row.shopping_list_id),
            content: row.content,
            notes: row.notes,
            completed: row.completed,
            order: row.order,
        }
    }
}

/// Item repository over a shared Postgres pool
#[derive(Clone)]
pub struct PgItemStore {
    pool: PgPool,
}

impl PgItemStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemStore for PgItemStore {
    async fn list_exists(&self, list_id: ListId) -> Result<bool, ItemStoreError> {
        let exists: bool =
            sqlx::query_scalar("select exists(select 1 from shopping_lists where id = $1)")
                .bind(list_id.0)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn load_all(&self, list_id: ListId) -> Result<Vec<Item>, ItemStoreError> {
        let rows: Vec<ItemRow> = sqlx::query_as(
            r#"
            select id, shopping_list_id, content, notes, completed, "order"
            from shopping_list_items
            where shopping_list_id = $1
            order by id
            "#,
        )
        .bind(list_id.0)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn apply_batch(&self, list_id: ListId, batch: &Batch) -> Result<(), ItemStoreError> {
        let mut tx = self.pool.begin().await?;

        for item in &batch.upserts {
            sqlx::query(
                r#"
                insert into shopping_list_items
                    (id, shopping_list_id, content, notes, completed, "order")
                values ($1, $2, $3, $4, $5, $6)
                on conflict (id) do update set
                    content = excluded.content,
                    notes = excluded.notes,
                    completed = excluded.completed,
                    "order" = excluded."order"
                "#,
            )
            .bind(item.id.as_str())
            .bind(item.list_id.0)
            .bind(&item.content)
            .bind(&item.notes)
            .bind(item.completed)
            .bind(item.order)
            .execute(&mut *tx)
            .await?;
        }

        if !batch.deletes.is_empty() {
            let ids: Vec<String> = batch
                .deletes
                .iter()
                .map(|id| id.as_str().to_string())
                .collect();
            sqlx::query(
                "delete from shopping_list_items where shopping_list_id = $1 and id = any($2)",
            )
            .bind(list_id.0)
            .bind(&ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!(
            list = %list_id,
            upserts = batch.upserts.len(),
            deletes = batch.deletes.len(),
            "applied item batch"
        );
        Ok(())
    }
}
