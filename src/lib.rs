pub mod config;
pub mod factors;
pub mod model;
pub mod predictor;
pub mod provider;
pub mod report;
pub mod seed;
pub mod store;
pub mod win_prob;
