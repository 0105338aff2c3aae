//! Data access for a YouTube channel statistics browser.
//!
//! [`services::youtube_service::YoutubeService`] queries the YouTube Data API,
//! caches raw responses for five minutes and normalizes them into the records
//! in [`models`]. [`services::page_service::PageService`] assembles the data
//! behind the home, search and channel pages.

pub mod errors;
pub mod models;
pub mod services;
pub mod utils;

pub use errors::ApiError;
