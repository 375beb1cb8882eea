pub mod body;
pub mod status_bar;
pub mod tag;
