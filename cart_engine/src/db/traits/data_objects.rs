use crate::db_types::OrderId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOrderResult {
    Inserted(OrderId),
    AlreadyExists(OrderId),
}
