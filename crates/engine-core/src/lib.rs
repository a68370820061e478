pub mod enumerate;
pub mod error;
pub mod lookup;
pub mod paginator;
pub mod paging;
pub mod sink;
pub mod table;
