pub mod api;
pub mod bulk;
pub mod cache;
pub mod coordinator;
pub mod export;
pub mod selection;
pub mod ui;

#[cfg(test)]
pub(crate) mod fake;
