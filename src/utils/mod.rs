//! Shared utilities

pub mod distribution;

pub use distribution::DiscreteDistribution;
