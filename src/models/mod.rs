pub mod delta;
pub mod live;
pub mod performance;
pub mod session;
pub mod shift;
