pub mod broadcast;
pub mod chain;
pub mod commands;
pub mod config;
pub mod contract;
pub mod cosmos;
pub mod credentials;
pub mod deploy;
pub mod events;
mod result_ext;
pub mod types;
pub mod wallet;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to load config")]
    LoadConfig,
    #[error("failed to load the chain config")]
    ChainConfig,
    #[error("failed to set up the wallet")]
    Wallet,
    #[error("failed to connect to the chain")]
    Connection,
    #[error("failed to deploy the verifier contract")]
    Deploy,
    #[error("failed to query the verifier contract")]
    Query,
    #[error("failed to prepare demo credentials")]
    Credential,
    #[error("demo flow failed")]
    Demo,
    #[error("invalid input")]
    InvalidInput,
}
