use cosmrs::bip32;
use cosmrs::crypto::secp256k1::SigningKey;
use cosmrs::tendermint::chain::Id;
use cosmrs::tx::{Raw, SignDoc};
use error_stack::{Result, ResultExt};
use thiserror::Error;

use crate::broadcast::GasPrice;
use crate::chain::ChainConfig;
use crate::result_ext::ResultCompatExt;
use crate::types::{CosmosPublicKey, TMAddress};

/// The standard cosmos-sdk derivation path, coin type 118, account and
/// index 0. The devnet tooling this replaces derived its deployer key the
/// same way.
const DERIVATION_PATH: &str = "m/44'/118'/0'/0/0";

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid mnemonic")]
    Mnemonic,
    #[error("failed to derive the signing key")]
    KeyDerivation,
    #[error("failed to encode the account address")]
    AddressEncoding,
    #[error("tx signing failed")]
    Sign,
}

/// A single-signer wallet derived from a mnemonic, bound to one chain's
/// bech32 prefix, chain id and gas price.
pub struct Wallet {
    signing_key: SigningKey,
    public_key: CosmosPublicKey,
    address: TMAddress,
    chain_id: Id,
    gas_price: GasPrice,
}

impl Wallet {
    pub fn new(config: &ChainConfig, mnemonic: &str) -> Result<Self, Error> {
        let mnemonic = bip32::Mnemonic::new(mnemonic.trim(), bip32::Language::English)
            .change_context(Error::Mnemonic)?;
        let seed = mnemonic.to_seed("");

        let path = DERIVATION_PATH
            .parse()
            .expect("the derivation path must be valid");
        let signing_key = SigningKey::derive_from_path(seed.as_bytes(), &path)
            .change_context(Error::KeyDerivation)?;

        let public_key = signing_key.public_key();
        let address = ResultCompatExt::change_context(
            public_key.account_id(&config.account_prefix),
            Error::AddressEncoding,
        )?
        .into();

        Ok(Self {
            signing_key,
            public_key,
            address,
            chain_id: config.chain_id.clone(),
            gas_price: config.gas_prices.clone(),
        })
    }

    pub fn address(&self) -> &TMAddress {
        &self.address
    }

    pub fn public_key(&self) -> CosmosPublicKey {
        self.public_key
    }

    pub fn chain_id(&self) -> &Id {
        &self.chain_id
    }

    pub fn gas_price(&self) -> &GasPrice {
        &self.gas_price
    }

    pub fn sign(&self, sign_doc: SignDoc) -> Result<Raw, Error> {
        ResultCompatExt::change_context(sign_doc.sign(&self.signing_key), Error::Sign)
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .field("chain_id", &self.chain_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub mod test_utils {
    use super::Wallet;
    use crate::broadcast::GasPrice;
    use crate::chain::ChainConfig;

    // The throwaway deployer account the neutron devnet init script funds.
    pub const TEST_MNEMONIC: &str = "banner spread envelope side kite person disagree path silver will brother under couch edit food venture squirrel civil budget number acquire point work mass";

    pub fn test_chain_config() -> ChainConfig {
        ChainConfig {
            account_prefix: "neutron".to_string(),
            chain_id: "ntrntest-1".parse().unwrap(),
            rpc_addr: "http://localhost:9090".parse().unwrap(),
            denom: "untrn".to_string(),
            gas_prices: GasPrice::new(0.025, "untrn").unwrap(),
            client_rpc_endpoint: None,
        }
    }

    pub fn test_wallet() -> Wallet {
        Wallet::new(&test_chain_config(), TEST_MNEMONIC).unwrap()
    }
}
