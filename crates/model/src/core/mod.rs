pub mod column;
pub mod value;
