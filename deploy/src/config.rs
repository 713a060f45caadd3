use std::collections::HashMap;
use std::path::Path;

use fundraising_common::PPM;
use serde::{Deserialize, Serialize};
use soroban_sdk::{Address, Env, String as SorobanString};

use crate::error::DeployError;

/// Parameters of one fundraising deployment. Percentages, ratios, fees and
/// slippage are PPM; `presale_exchange_rate` is bonded tokens per collateral
/// unit scaled by PPM.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentParameters {
    /// Presale open date, unix seconds. 0 opens whenever `open_presale` runs.
    pub start_date: u64,
    pub minting_beneficiary_pct: u32,
    pub presale_period: u64,
    pub presale_exchange_rate: u64,
    pub reserve_ratio: u32,
    pub batch_blocks: u32,
    pub slippage: u32,
    pub buy_fee: u32,
    pub sell_fee: u32,
    #[serde(default)]
    pub collateral_token_address: Option<String>,
    #[serde(default)]
    pub bonded_token_address: Option<String>,
    #[serde(default)]
    pub governance_address: Option<String>,
    pub beneficiary_address: String,
}

impl DeploymentParameters {
    pub fn validate(&self) -> Result<(), DeployError> {
        if self.minting_beneficiary_pct >= PPM {
            return Err(DeployError::InvalidParameter("minting_beneficiary_pct"));
        }
        if self.presale_period == 0 {
            return Err(DeployError::InvalidParameter("presale_period"));
        }
        if self.presale_exchange_rate == 0 {
            return Err(DeployError::InvalidParameter("presale_exchange_rate"));
        }
        if self.reserve_ratio == 0 || self.reserve_ratio > PPM {
            return Err(DeployError::InvalidParameter("reserve_ratio"));
        }
        if self.batch_blocks == 0 {
            return Err(DeployError::InvalidParameter("batch_blocks"));
        }
        if self.buy_fee >= PPM {
            return Err(DeployError::InvalidParameter("buy_fee"));
        }
        if self.sell_fee >= PPM {
            return Err(DeployError::InvalidParameter("sell_fee"));
        }
        Ok(())
    }
}

/// Deployment parameters keyed by network name.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworksFile {
    pub networks: HashMap<String, DeploymentParameters>,
}

impl NetworksFile {
    pub fn from_json(json: &str) -> Result<Self, DeployError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DeployError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Validated parameters for `name`.
    pub fn network(&self, name: &str) -> Result<&DeploymentParameters, DeployError> {
        let params = self
            .networks
            .get(name)
            .ok_or_else(|| DeployError::MissingNetwork(name.to_string()))?;
        params.validate()?;
        Ok(params)
    }
}

fn is_strkey(value: &str) -> bool {
    value.len() == 56
        && matches!(value.as_bytes()[0], b'G' | b'C')
        && value
            .bytes()
            .all(|b| b.is_ascii_uppercase() || (b'2'..=b'7').contains(&b))
}

pub fn parse_address(env: &Env, value: &str) -> Result<Address, DeployError> {
    if !is_strkey(value) {
        return Err(DeployError::Address(value.to_string()));
    }
    Ok(Address::from_string(&SorobanString::from_str(env, value)))
}

pub fn parse_optional_address(
    env: &Env,
    value: &Option<String>,
) -> Result<Option<Address>, DeployError> {
    value.as_deref().map(|v| parse_address(env, v)).transpose()
}

/// Strkey form of `address`, for logs and config files.
pub fn strkey(address: &Address) -> String {
    let encoded = address.to_string();
    let mut buf = vec![0u8; encoded.len() as usize];
    encoded.copy_into_slice(&mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}
