pub mod dialog;
pub mod pagination_controls;
pub mod table;

pub use dialog::{AlertDialog, ConfirmDialog};
pub use pagination_controls::PaginationControls;
