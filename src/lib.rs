pub mod accounts;
pub mod catalog;
pub mod config;
pub mod error;
pub mod generator;
pub mod handlers;
pub mod helpers;
pub mod jwtoken;
pub mod ledger;
pub mod loggers;
pub mod models;
pub mod session;
pub mod state;
pub mod storage;
