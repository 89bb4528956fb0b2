pub mod api;
pub mod booking;
pub mod catalog;
pub mod entities;
pub mod middleware;
pub mod notify;
pub mod slug;
pub mod storage;

pub use api::create_api_router;
