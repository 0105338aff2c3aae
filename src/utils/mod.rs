pub mod format_utils;
pub mod keyword_utils;
