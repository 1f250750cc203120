//! BigBlackCoin casino backend: accounts, wallets, admin review and five
//! coin games behind a JSON API.

pub mod auth;
pub mod config;
pub mod games;
pub mod http;
pub mod model;
pub mod money;
pub mod store;
pub mod telemetry;
pub mod util;
