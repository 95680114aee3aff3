pub mod recipe;
pub mod state;
