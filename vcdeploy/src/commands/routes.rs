use std::path::PathBuf;

use error_stack::{Result, ResultExt};

use crate::config::Config;
use crate::result_ext::ResultCompatExt;
use crate::types::TMAddress;
use crate::{contract, Error};

#[derive(clap::Args, Debug)]
pub struct Args {
    /// Address of the deployed verifier contract
    pub contract: String,

    /// App address the routes were registered for
    pub app_addr: String,

    /// Chain registry file to use instead of the configured one
    #[arg(long)]
    pub chain_config: Option<PathBuf>,
}

pub async fn run(config: Config, args: Args) -> Result<Option<String>, Error> {
    let contract_address: TMAddress =
        ResultCompatExt::change_context(args.contract.parse(), Error::InvalidInput)
            .attach_printable_lazy(|| format!("{{ contract = {} }}", args.contract))?;

    let (_, mut client) = super::connect(&config, args.chain_config.as_deref()).await?;

    let routes = contract::query_routes(&mut client, &contract_address, &args.app_addr)
        .await
        .change_context(Error::Query)?;

    Ok(Some(format!(
        "routes registered for {}: {:?}",
        args.app_addr, routes
    )))
}
