pub mod config;
pub mod connect;
pub mod abi;
pub mod rpc;
pub mod contract;
pub mod wallet;
pub mod claim;
pub mod countdown;
pub mod mint;
pub mod cache;
pub mod metadata;

#[cfg(all(test, target_arch = "wasm32"))]
pub mod storage_tests;
