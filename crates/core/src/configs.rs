//! Configuration file parsing

pub mod recipes;
