use scylla_cdc::consumer::{CDCRow, OperationType};
use uuid::Uuid;

use crate::models::{Order, OrderItem, OrderStatus};
use super::errors::ChangeDecodeError;

/// The part of a CDC log row the assembler cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    PreImage,
    PostImage,
    Insert,
    Update,
    Delete,
}

impl RowKind {
    fn from_operation(operation: &OperationType) -> Self {
        match operation {
            OperationType::PreImage => RowKind::PreImage,
            OperationType::PostImage => RowKind::PostImage,
            OperationType::RowInsert => RowKind::Insert,
            OperationType::RowUpdate => RowKind::Update,
            // Row, range and partition deletes all end the order's life
            _ => RowKind::Delete,
        }
    }
}

/// Raw `orders` columns as they appear in an image row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderColumns {
    pub id: Option<Uuid>,
    pub consumer_id: Option<Uuid>,
    /// JSON array of line items
    pub items: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChangeRow {
    /// Position within the write's batch; 0 opens a new batch
    pub batch_seq_no: i32,
    pub kind: RowKind,
    pub columns: OrderColumns,
    pub end_of_batch: bool,
}

impl ChangeRow {
    pub fn from_cdc(data: &CDCRow<'_>) -> Self {
        let columns = OrderColumns {
            id: data.get_value("id").as_ref().and_then(|v| v.as_uuid()),
            consumer_id: data.get_value("consumer_id").as_ref().and_then(|v| v.as_uuid()),
            items: data
                .get_value("items")
                .as_ref()
                .and_then(|v| v.as_text())
                .map(|s| s.to_string()),
            status: data
                .get_value("status")
                .as_ref()
                .and_then(|v| v.as_text())
                .map(|s| s.to_string()),
        };

        Self {
            batch_seq_no: data.batch_seq_no,
            kind: RowKind::from_operation(&data.operation),
            columns,
            end_of_batch: data.end_of_batch,
        }
    }
}

impl TryFrom<OrderColumns> for Order {
    type Error = ChangeDecodeError;

    fn try_from(columns: OrderColumns) -> Result<Self, Self::Error> {
        let id = columns.id.ok_or(ChangeDecodeError::MissingColumn("id"))?;
        let consumer_id = columns
            .consumer_id
            .ok_or(ChangeDecodeError::MissingColumn("consumer_id"))?;

        // A null items column is an order without line items
        let items: Vec<OrderItem> = match columns.items.as_deref() {
            None | Some("") => Vec::new(),
            Some(json) => serde_json::from_str(json).map_err(|source| {
                ChangeDecodeError::MalformedItems { order_id: id, source }
            })?,
        };

        Ok(Order {
            id,
            consumer_id,
            items,
            status: columns.status.map(OrderStatus::new),
        })
    }
}
