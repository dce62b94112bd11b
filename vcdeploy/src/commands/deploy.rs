use std::path::PathBuf;

use error_stack::{Result, ResultExt};
use sdjwt_verifier_api::msg::InstantiateMsg;

use crate::config::Config;
use crate::{deploy, Error};

#[derive(clap::Args, Debug)]
pub struct Args {
    /// Path to the verifier contract wasm artifact
    pub wasm: PathBuf,

    /// Label of the instantiated contract
    #[arg(long, default_value = "sdjwt-verifier")]
    pub label: String,

    /// Maximum accepted length of a serialized presentation, in bytes
    #[arg(long, default_value_t = 3000)]
    pub max_presentation_len: usize,

    /// Chain registry file to use instead of the configured one
    #[arg(long)]
    pub chain_config: Option<PathBuf>,
}

pub async fn run(config: Config, args: Args) -> Result<Option<String>, Error> {
    let mut executor = super::executor(&config, args.chain_config.as_deref()).await?;

    let init_msg = InstantiateMsg {
        max_presentation_len: args.max_presentation_len,
        init_registrations: vec![],
    };
    let deployment = deploy::deploy(&mut executor, &args.wasm, &init_msg, vec![], &args.label)
        .await
        .change_context(Error::Deploy)?;

    Ok(Some(format!(
        "deployed verifier contract {} (code id {}, store tx {}, instantiate tx {})",
        deployment.address, deployment.code_id, deployment.store_tx, deployment.instantiate_tx
    )))
}
