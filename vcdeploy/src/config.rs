use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::broadcast;

#[derive(Deserialize, Serialize, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Path to the chain registry file describing the target chain.
    pub chain_config: PathBuf,
    /// Signer mnemonic. Usually supplied through the environment
    /// (`VCDEPLOY_MNEMONIC`) rather than written to disk.
    pub mnemonic: String,
    pub broadcast: broadcast::Config,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chain_config: PathBuf::from("chain.json"),
            mnemonic: String::new(),
            broadcast: broadcast::Config::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::Config;

    #[test]
    fn can_serialize_deserialize_config() {
        let cfg = Config::default();

        let serialized = toml::to_string_pretty(&cfg).expect("should work");
        let deserialized: Config = toml::from_str(serialized.as_str()).expect("should work");

        assert_eq!(cfg, deserialized);
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let cfg: Config = toml::from_str(
            "
            chain_config = 'devnet/neutron.json'

            [broadcast]
            tx_fetch_interval = '1s'
            ",
        )
        .unwrap();

        assert_eq!(cfg.chain_config.to_str(), Some("devnet/neutron.json"));
        assert_eq!(cfg.broadcast.tx_fetch_interval, Duration::from_secs(1));
        assert_eq!(
            cfg.broadcast.tx_fetch_max_retries,
            Config::default().broadcast.tx_fetch_max_retries
        );
        assert!(cfg.mnemonic.is_empty());
    }

    #[test]
    fn fail_deserialization() {
        assert!(toml::from_str::<Config>("chain_config = 5").is_err());
        assert!(toml::from_str::<Config>("[broadcast]\ngas_adjustment = 'high'").is_err());
    }
}
