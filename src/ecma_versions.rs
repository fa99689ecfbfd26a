use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EcmaVersion {
    #[serde(rename = "5")]
    _5,
    #[serde(rename = "2015")]
    _2015,
    #[serde(rename = "2016")]
    _2016,
    #[serde(rename = "2017")]
    _2017,
    #[serde(rename = "2018")]
    _2018,
    #[serde(rename = "2019")]
    _2019,
    #[serde(rename = "2020")]
    _2020,
    #[serde(rename = "2021")]
    _2021,
    #[serde(rename = "2022")]
    _2022,
    #[serde(rename = "2023")]
    _2023,
    #[serde(rename = "2024")]
    _2024,
    #[serde(rename = "2025")]
    _2025,
}

impl TryFrom<u32> for EcmaVersion {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Ok(match value {
            5 => EcmaVersion::_5,
            2015 => EcmaVersion::_2015,
            2016 => EcmaVersion::_2016,
            2017 => EcmaVersion::_2017,
            2018 => EcmaVersion::_2018,
            2019 => EcmaVersion::_2019,
            2020 => EcmaVersion::_2020,
            2021 => EcmaVersion::_2021,
            2022 => EcmaVersion::_2022,
            2023 => EcmaVersion::_2023,
            2024 => EcmaVersion::_2024,
            2025 => EcmaVersion::_2025,
            _ => return Err(format!("'{}' is not a valid ECMA version", value)),
        })
    }
}

pub const LATEST_ECMA_VERSION: EcmaVersion = EcmaVersion::_2025;

impl Default for EcmaVersion {
    fn default() -> Self {
        LATEST_ECMA_VERSION
    }
}
