pub mod aggregator;
pub mod backup;
pub mod boundary;
pub mod breaks;
pub mod calculator;
pub mod clock;
pub mod engine;
pub mod locks;
pub mod log;
pub mod logic;
pub mod scoring;
pub mod shift;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;
