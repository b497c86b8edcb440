pub mod cache;
pub mod db;
pub mod identity;
pub mod service;
pub mod storage;

mod client;
pub use client::Client;

pub mod domain;
pub use domain::config;

pub mod dirs;
