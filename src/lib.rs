pub mod backtest;
pub mod config;
pub mod error;
pub mod hint;
pub mod mesh;
pub mod model;
pub mod strategy;
pub mod strategy_catalog;
