pub mod date_format;
pub mod relative_time;
pub mod slug;
