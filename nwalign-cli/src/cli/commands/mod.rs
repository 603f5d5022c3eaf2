pub mod align;
pub mod matrix;
pub mod rank;
