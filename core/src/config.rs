// Copyright 2018 Kodebox, Inc.
// This file is part of CodeChain.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::fs;
use std::path::Path;

use crate::client::ClientConfig;
use crate::ibc;

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub ibc: Ibc,
    #[serde(default)]
    pub state: State,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct Ibc {
    #[serde(default = "default_commitment_prefix")]
    pub commitment_prefix: String,
    pub consensus_state_retention: Option<u64>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct State {
    /// Number of recent snapshots kept.
    pub history: Option<u64>,
}

fn default_commitment_prefix() -> String {
    String::from_utf8_lossy(ibc::DEFAULT_COMMITMENT_PREFIX).into_owned()
}

impl Default for Ibc {
    fn default() -> Self {
        Ibc {
            commitment_prefix: default_commitment_prefix(),
            consensus_state_retention: None,
        }
    }
}

impl<'a> From<&'a Ibc> for ibc::Config {
    fn from(config: &'a Ibc) -> Self {
        ibc::Config {
            commitment_prefix: config.commitment_prefix.as_bytes().to_vec(),
            consensus_state_retention: config.consensus_state_retention,
        }
    }
}

impl<'a> From<&'a State> for ClientConfig {
    fn from(config: &'a State) -> Self {
        ClientConfig {
            state_history: config.history,
            ..Default::default()
        }
    }
}

pub fn parse(toml_string: &str) -> Result<Config, String> {
    let config: Config = toml::from_str(toml_string).map_err(|e| format!("Error while parse TOML: {:?}", e))?;
    if config.ibc.commitment_prefix.is_empty() {
        return Err("The commitment prefix must not be empty".to_string())
    }
    Ok(config)
}

pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Config, String> {
    let toml_string = fs::read_to_string(config_path).map_err(|e| format!("Fail to read file: {:?}", e))?;
    parse(&toml_string)
}
