pub mod action_result;
pub mod pagination;

pub use action_result::ActionResult;
pub use pagination::{clamp_page, total_pages, PageQuery, Paginated, SortOrder, SortSpec, DEFAULT_PAGE_SIZE};
