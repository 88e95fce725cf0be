pub mod delay;
pub mod overtime;
pub mod score;
