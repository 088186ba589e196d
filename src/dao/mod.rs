//! Best-effort persistence of player scores.

pub mod models;
pub mod score_store;
pub mod storage;
