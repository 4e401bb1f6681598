/*!
Rows of the NX-OS `| json` show-command outputs consumed by the reader.

Every table has the same envelope:

{
    "TABLE_<name>": {
        "ROW_<name>": [ {row}, {row}, ... ]   // or a bare {row} when there is only one
    }
}

NX-OS prints nothing at all when a table is empty (e.g. no HSRP group configured).
*/

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;
use tracing::debug;

use crate::error::ReaderError;

/// Where a table comes from and where its rows live in the JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    pub command: &'static str,
    pub table_key: &'static str,
    pub row_key: &'static str,
}

pub const VLAN_TABLE: TableSpec = TableSpec {
    command: "show vlan all | json",
    table_key: "TABLE_vlanbriefallports",
    row_key: "ROW_vlanbriefallports",
};

pub const INTERFACE_TABLE: TableSpec = TableSpec {
    command: "show interface | json",
    table_key: "TABLE_interface",
    row_key: "ROW_interface",
};

pub const VRF_TABLE: TableSpec = TableSpec {
    command: "show vrf all | json",
    table_key: "TABLE_vrf",
    row_key: "ROW_vrf",
};

pub const VRF_INTERFACE_TABLE: TableSpec = TableSpec {
    command: "show vrf all interface | json",
    table_key: "TABLE_if",
    row_key: "ROW_if",
};

pub const HSRP_TABLE: TableSpec = TableSpec {
    command: "show hsrp all | json",
    table_key: "TABLE_grp_detail",
    row_key: "ROW_grp_detail",
};

pub const DEFAULT_VRF: &str = "default";

impl TableSpec {
    /// Decodes the raw command output into rows.
    pub fn decode<R: DeserializeOwned>(&self, output: &str) -> Result<Vec<R>, ReaderError> {
        if output.trim().is_empty() {
            debug!("'{}' returned no output, treating as empty table", self.command);
            return Ok(Vec::new());
        }
        let mut root: Value =
            serde_json::from_str(output).map_err(|e| ReaderError::decode(self.command, e))?;
        let table = root.get_mut(self.table_key).ok_or_else(|| {
            ReaderError::decode(self.command, format!("missing key {}", self.table_key))
        })?;
        let rows = table
            .get_mut(self.row_key)
            .ok_or_else(|| {
                ReaderError::decode(
                    self.command,
                    format!("missing key {}/{}", self.table_key, self.row_key),
                )
            })?
            .take();
        let rows = match rows {
            Value::Array(rows) => rows,
            row @ Value::Object(_) => vec![row],
            other => {
                return Err(ReaderError::decode(
                    self.command,
                    format!("{} is neither a row nor a list of rows: {}", self.row_key, other),
                ));
            }
        };
        rows.into_iter()
            .map(|row| {
                serde_json::from_value(row).map_err(|e| ReaderError::decode(self.command, e))
            })
            .collect()
    }
}

/// One VLAN of `show vlan all`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VlanRow {
    #[serde(rename = "vlanshowbr-vlanid", deserialize_with = "string_or_number")]
    pub vlan_id: String,
    #[serde(rename = "vlanshowbr-vlanname")]
    pub vlan_name: String,
}

impl VlanRow {
    /// Name of the SVI carrying this VLAN.
    pub fn interface_name(&self) -> String {
        format!("Vlan{}", self.vlan_id)
    }
}

/// One interface of `show interface`. Only the SVI addressing is read, the
/// remaining attributes are kept as reported.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InterfaceRow {
    pub interface: String,
    #[serde(default)]
    pub svi_ip_addr: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub svi_ip_mask: Option<String>,
    /// Everything else the switch reports for the interface. Intentionally
    /// opaque: kept as reported, never read by the correlation.
    #[serde(flatten)]
    #[allow(dead_code)]
    pub attributes: BTreeMap<String, Value>,
}

/// One VRF of `show vrf all`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VrfRow {
    pub vrf_name: String,
    /// Numeric VRF id as reported. Intentionally opaque: decoded but never read.
    #[serde(default, deserialize_with = "opt_string_or_number")]
    #[allow(dead_code)]
    pub vrf_id: Option<String>,
    #[serde(default)]
    pub vrf_state: Option<String>,
}

/// One interface to VRF binding of `show vrf all interface`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VrfBindingRow {
    pub if_name: String,
    pub vrf_name: String,
}

/// One HSRP group of `show hsrp all`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HsrpGroupRow {
    pub sh_if_index: String,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub sh_group_num: Option<String>,
    pub sh_active_router_addr: String,
    pub sh_standby_router_addr: String,
    #[serde(default)]
    pub sh_vip: Option<String>,
}

fn value_to_string<E: serde::de::Error>(value: Value) -> Result<String, E> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(E::custom(format!("expected a string or a number, got {other}"))),
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    value_to_string(Value::deserialize(deserializer)?)
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => value_to_string(value).map(Some),
    }
}
