use std::path::Path;

use clap::Subcommand;
use error_stack::{report, Result, ResultExt};

use crate::broadcast::TxExecutor;
use crate::chain::ChainConfig;
use crate::config::Config;
use crate::cosmos::CosmosGrpcClient;
use crate::wallet::Wallet;
use crate::Error;

pub mod demo;
pub mod deploy;
pub mod routes;

#[derive(Debug, Subcommand)]
pub enum SubCommand {
    /// Store and instantiate the verifier contract
    Deploy(deploy::Args),
    /// Query the routes registered for an app
    Routes(routes::Args),
    /// Run the full issue → present → verify demo flow
    Demo(demo::Args),
}

async fn connect(
    config: &Config,
    chain_config_override: Option<&Path>,
) -> Result<(ChainConfig, CosmosGrpcClient), Error> {
    let path = chain_config_override.unwrap_or(config.chain_config.as_path());
    let chain = ChainConfig::load(path).change_context(Error::ChainConfig)?;

    let client = CosmosGrpcClient::new(chain.endpoint().as_str())
        .await
        .change_context(Error::Connection)?;

    Ok((chain, client))
}

async fn executor(
    config: &Config,
    chain_config_override: Option<&Path>,
) -> Result<TxExecutor<CosmosGrpcClient>, Error> {
    if config.mnemonic.trim().is_empty() {
        return Err(report!(Error::InvalidInput)
            .attach_printable("mnemonic must be set in the config or via VCDEPLOY_MNEMONIC"));
    }

    let (chain, client) = connect(config, chain_config_override).await?;
    let wallet = Wallet::new(&chain, &config.mnemonic).change_context(Error::Wallet)?;

    Ok(TxExecutor::new(client, wallet, config.broadcast.clone()))
}
