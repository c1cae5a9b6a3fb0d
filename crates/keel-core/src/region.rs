use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::NameError;

/// Azure region → short code used in resource names.
const AZURE_REGION_CODES: &[(&str, &str)] = &[
    ("australiaeast", "aue"),
    ("australiasoutheast", "ause"),
    ("brazilsouth", "brs"),
    ("canadacentral", "cac"),
    ("canadaeast", "cae"),
    ("centralindia", "inc"),
    ("centralus", "cus"),
    ("eastasia", "ea"),
    ("eastus", "eus"),
    ("eastus2", "eus2"),
    ("francecentral", "frc"),
    ("germanywestcentral", "gwc"),
    ("italynorth", "itn"),
    ("japaneast", "jpe"),
    ("japanwest", "jpw"),
    ("koreacentral", "krc"),
    ("northcentralus", "ncus"),
    ("northeurope", "neu"),
    ("norwayeast", "nwe"),
    ("polandcentral", "plc"),
    ("southafricanorth", "san"),
    ("southcentralus", "scus"),
    ("southeastasia", "sea"),
    ("southindia", "ins"),
    ("spaincentral", "spc"),
    ("swedencentral", "sdc"),
    ("switzerlandnorth", "szn"),
    ("uaenorth", "uan"),
    ("uksouth", "uks"),
    ("ukwest", "ukw"),
    ("westeurope", "weu"),
    ("westus", "wus"),
    ("westus2", "wus2"),
    ("westus3", "wus3"),
];

/// Immutable region → short-code lookup.
///
/// A miss is always an error. There is no default region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionCodeTable {
    codes: BTreeMap<String, String>,
}

impl RegionCodeTable {
    /// The built-in Azure table.
    pub fn azure() -> Self {
        Self::from_pairs(AZURE_REGION_CODES.iter().copied())
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let codes = pairs
            .into_iter()
            .map(|(region, code)| (normalize(region.as_ref()), code.into()))
            .collect();
        Self { codes }
    }

    /// Look up the short code for a region. `"East US"` and `"eastus"` are
    /// the same key.
    pub fn code(&self, region: &str) -> Result<&str, NameError> {
        self.codes
            .get(&normalize(region))
            .map(String::as_str)
            .ok_or_else(|| NameError::InvalidRegion {
                region: region.to_string(),
            })
    }

    pub fn contains(&self, region: &str) -> bool {
        self.codes.contains_key(&normalize(region))
    }

    /// All `(region, code)` pairs in region order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.codes.iter().map(|(r, c)| (r.as_str(), c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

fn normalize(region: &str) -> String {
    region
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
