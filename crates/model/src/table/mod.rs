pub mod column;
pub mod row;

pub use column::{Column, ColumnType, TABLE_NAME, columns};
pub use row::{Row, partition_for_region};
