pub mod api_football;
pub mod besoccer;
