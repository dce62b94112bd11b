use std::fmt;
use std::str::FromStr;

use cosmrs::crypto;
use cosmrs::AccountId;
use serde::{Deserialize, Serialize};

pub type CosmosPublicKey = crypto::PublicKey;

/// A bech32 account address on the target chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TMAddress(AccountId);

impl FromStr for TMAddress {
    type Err = <AccountId as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccountId::from_str(s).map(Self)
    }
}

impl From<AccountId> for TMAddress {
    fn from(account_id: AccountId) -> Self {
        Self(account_id)
    }
}

impl AsRef<AccountId> for TMAddress {
    fn as_ref(&self) -> &AccountId {
        &self.0
    }
}

impl fmt::Display for TMAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
