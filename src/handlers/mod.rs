pub mod api;
pub mod shortener;
