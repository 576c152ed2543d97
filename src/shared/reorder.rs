//! Drag-and-drop reordering.
//!
//! A drop moves one item to a new index; every item in the resulting sequence
//! then gets `order_position = index`.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};

/// Explicit positions for a batch of records
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReorderDto {
    #[validate(length(min = 1, max = 1000))]
    pub items: Vec<OrderItemDto>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct OrderItemDto {
    pub id: Uuid,
    #[schema(minimum = 0)]
    pub order_position: i32,
}

impl ReorderDto {
    pub fn into_positions(self) -> Result<Vec<(Uuid, i32)>> {
        if self.items.iter().any(|item| item.order_position < 0) {
            return Err(AppError::Validation(
                "order_position must not be negative".to_string(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        if !self.items.iter().all(|item| seen.insert(item.id)) {
            return Err(AppError::Validation(
                "Each id may appear only once".to_string(),
            ));
        }
        Ok(self
            .items
            .into_iter()
            .map(|item| (item.id, item.order_position))
            .collect())
    }
}

/// Move the element at `from` to `to`, shifting the elements in between
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() || from == to {
        return;
    }
    let item = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, item);
}

/// Assign sequential positions to an ordered list of ids
pub fn assign_positions(ids: &[Uuid]) -> Vec<(Uuid, i32)> {
    ids.iter()
        .enumerate()
        .map(|(index, id)| (*id, index as i32))
        .collect()
}

/// Resolve a drop of `active_id` onto `over_id` within `ordered` and return the new positions.
///
/// Both ids must be present in `ordered`.
pub fn move_by_id(ordered: &[Uuid], active_id: Uuid, over_id: Uuid) -> Result<Vec<(Uuid, i32)>> {
    let from = ordered
        .iter()
        .position(|id| *id == active_id)
        .ok_or_else(|| AppError::BadRequest(format!("Item {} is not in this list", active_id)))?;
    let to = ordered
        .iter()
        .position(|id| *id == over_id)
        .ok_or_else(|| AppError::BadRequest(format!("Item {} is not in this list", over_id)))?;

    let mut ids = ordered.to_vec();
    array_move(&mut ids, from, to);
    Ok(assign_positions(&ids))
}

/// Tables carrying an `order_position` column
#[derive(Debug, Clone, Copy)]
pub enum PositionedTable {
    Links,
    Categories,
}

impl PositionedTable {
    fn as_sql(&self) -> &'static str {
        match self {
            PositionedTable::Links => "links",
            PositionedTable::Categories => "categories",
        }
    }
}

/// Write every position in one transaction.
///
/// Fails without changes if any id does not exist. Concurrent reorders are
/// last-writer-wins.
pub async fn persist_positions(
    pool: &PgPool,
    table: PositionedTable,
    positions: &[(Uuid, i32)],
) -> Result<()> {
    if positions.is_empty() {
        return Ok(());
    }

    let (ids, order): (Vec<Uuid>, Vec<i32>) = positions.iter().copied().unzip();

    let mut tx = pool.begin().await.map_err(AppError::Database)?;

    let query = format!(
        r#"
        UPDATE {table} AS t
        SET order_position = v.order_position, updated_at = NOW()
        FROM UNNEST($1::uuid[], $2::int4[]) AS v(id, order_position)
        WHERE t.id = v.id
        "#,
        table = table.as_sql()
    );

    let result = sqlx::query(&query)
        .bind(&ids)
        .bind(&order)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to persist {} order: {:?}", table.as_sql(), e);
            AppError::Database(e)
        })?;

    if result.rows_affected() != ids.len() as u64 {
        tx.rollback().await.map_err(AppError::Database)?;
        return Err(AppError::BadRequest(format!(
            "Reorder references {} unknown {} record(s)",
            ids.len() as u64 - result.rows_affected().min(ids.len() as u64),
            table.as_sql()
        )));
    }

    tx.commit().await.map_err(AppError::Database)?;

    tracing::info!("Reordered {} {}", ids.len(), table.as_sql());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn test_move_index_two_to_zero() {
        let original = ids(5);
        let positions = move_by_id(&original, original[2], original[0]).unwrap();

        let expected_sequence = [original[2], original[0], original[1], original[3], original[4]];
        let sequence: Vec<Uuid> = positions.iter().map(|(id, _)| *id).collect();
        let order: Vec<i32> = positions.iter().map(|(_, pos)| *pos).collect();

        assert_eq!(sequence, expected_sequence);
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_move_forward() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        array_move(&mut items, 0, 2);
        assert_eq!(items, vec!['b', 'c', 'a', 'd']);
    }

    #[test]
    fn test_move_to_end_and_out_of_range() {
        let mut items = vec![1, 2, 3];
        array_move(&mut items, 0, 10);
        assert_eq!(items, vec![2, 3, 1]);

        array_move(&mut items, 7, 0);
        assert_eq!(items, vec![2, 3, 1]);
    }

    #[test]
    fn test_move_onto_itself_keeps_order() {
        let original = ids(3);
        let positions = move_by_id(&original, original[1], original[1]).unwrap();
        let sequence: Vec<Uuid> = positions.iter().map(|(id, _)| *id).collect();
        assert_eq!(sequence, original);
    }

    #[test]
    fn test_reorder_dto_rejects_negative_positions() {
        let dto = ReorderDto {
            items: vec![OrderItemDto {
                id: Uuid::new_v4(),
                order_position: -1,
            }],
        };
        assert!(matches!(dto.into_positions(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_unknown_id_rejected() {
        let original = ids(3);
        let result = move_by_id(&original, Uuid::new_v4(), original[0]);
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
