use std::fs;
use std::path::Path;

use cosmrs::tendermint::chain::Id;
use error_stack::{ensure, Result, ResultExt};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::broadcast::GasPrice;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read the chain config file")]
    Read,
    #[error("chain config is malformed")]
    Malformed,
    #[error("gas price denom does not match the chain denom")]
    DenomMismatch,
}

/// Chain parameters in the registry format local devnet tooling writes:
/// a top level `value` object with kebab-case keys.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ChainConfig {
    pub account_prefix: String,
    pub chain_id: Id,
    pub rpc_addr: Url,
    pub denom: String,
    pub gas_prices: GasPrice,
    #[serde(default)]
    pub client_rpc_endpoint: Option<Url>,
}

#[derive(Deserialize)]
struct ChainConfigFile {
    value: ChainConfig,
}

impl ChainConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let raw = fs::read_to_string(path.as_ref())
            .change_context(Error::Read)
            .attach_printable_lazy(|| format!("{{ path = {} }}", path.as_ref().display()))?;
        Self::from_json(&raw)
    }

    fn from_json(raw: &str) -> Result<Self, Error> {
        let file: ChainConfigFile = serde_json::from_str(raw).change_context(Error::Malformed)?;
        let config = file.value;

        ensure!(
            config.gas_prices.denom.as_ref() == config.denom,
            Error::DenomMismatch
        );

        Ok(config)
    }

    /// The endpoint to dial for client traffic. Registry files expose the
    /// node's own rpc address and, for local setups, a separate endpoint
    /// reachable from the host; the latter wins when present.
    pub fn endpoint(&self) -> &Url {
        self.client_rpc_endpoint.as_ref().unwrap_or(&self.rpc_addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_registry_format() {
        let raw = r#"{
            "value": {
                "account-prefix": "neutron",
                "chain-id": "ntrntest-1",
                "rpc-addr": "http://validator:26657",
                "denom": "untrn",
                "gas-prices": "0.025untrn",
                "client-rpc-endpoint": "http://localhost:9090"
            }
        }"#;

        let config = ChainConfig::from_json(raw).unwrap();

        assert_eq!(config.account_prefix, "neutron");
        assert_eq!(config.chain_id.as_str(), "ntrntest-1");
        assert_eq!(config.denom, "untrn");
        assert_eq!(config.endpoint().as_str(), "http://localhost:9090/");
    }

    #[test]
    fn falls_back_to_the_rpc_addr() {
        let raw = r#"{
            "value": {
                "account-prefix": "wasm",
                "chain-id": "testing",
                "rpc-addr": "http://localhost:26657",
                "denom": "ustake",
                "gas-prices": "0.1ustake"
            }
        }"#;

        let config = ChainConfig::from_json(raw).unwrap();

        assert_eq!(config.endpoint().as_str(), "http://localhost:26657/");
    }

    #[test]
    fn rejects_missing_fields() {
        let raw = r#"{
            "value": {
                "account-prefix": "wasm",
                "chain-id": "testing"
            }
        }"#;

        let result = ChainConfig::from_json(raw);

        assert!(matches!(
            result.unwrap_err().current_context(),
            Error::Malformed
        ));
    }

    #[test]
    fn rejects_mismatched_gas_price_denom() {
        let raw = r#"{
            "value": {
                "account-prefix": "wasm",
                "chain-id": "testing",
                "rpc-addr": "http://localhost:26657",
                "denom": "untrn",
                "gas-prices": "0.1ustake"
            }
        }"#;

        let result = ChainConfig::from_json(raw);

        assert!(matches!(
            result.unwrap_err().current_context(),
            Error::DenomMismatch
        ));
    }

    #[test]
    fn load_fails_for_a_missing_file() {
        let result = ChainConfig::load("/definitely/not/here.json");

        assert!(matches!(
            result.unwrap_err().current_context(),
            Error::Read
        ));
    }
}
