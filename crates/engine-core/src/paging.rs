use model::query::{Filter, RowCeiling};

/// Largest page the remote API will return.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Smallest page we ask for when a row ceiling would otherwise shrink the
/// page below it.
pub const MIN_PAGE_SIZE: u32 = 20;

/// Page size for an enumeration bounded by `ceiling`.
///
/// No ceiling, or one at or above [`MAX_PAGE_SIZE`], uses the maximum. A
/// smaller ceiling becomes the page size, floored at [`MIN_PAGE_SIZE`].
pub fn page_size_for(ceiling: Option<RowCeiling>) -> u32 {
    match ceiling.map(RowCeiling::get) {
        Some(limit) if limit < u64::from(MAX_PAGE_SIZE) => {
            if limit < u64::from(MIN_PAGE_SIZE) {
                MIN_PAGE_SIZE
            } else {
                limit as u32
            }
        }
        _ => MAX_PAGE_SIZE,
    }
}

/// Filter and page size of one enumeration. Built once and never
/// re-evaluated between pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    filter: Option<Filter>,
    page_size: u32,
}

impl PageRequest {
    pub fn new(filter: Option<Filter>, ceiling: Option<RowCeiling>) -> Self {
        PageRequest {
            filter,
            page_size: page_size_for(ceiling),
        }
    }

    pub fn filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }
}
