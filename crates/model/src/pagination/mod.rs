pub mod order;
pub mod state;
