pub mod page_service;
pub mod response_cache;
pub mod transport;
pub mod youtube_service;
