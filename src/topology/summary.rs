use std::{
    fmt::Display,
    io::{self, Write},
};

/// What the reader knows about one VLAN once all tables are joined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VlanSummary {
    pub vlan_name: String,
    pub vlan_id: String,
    pub vrf_name: Option<String>,
    pub master_addr: Option<String>,
    pub slave_addr: Option<String>,
    pub virtual_addr: Option<String>,
    pub mask: Option<String>,
}

/// The three line layouts of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryShape {
    /// No address resolved: name and id only.
    Identity,
    /// SVI pair without a virtual address.
    Addressed,
    /// HSRP pair with its virtual address.
    Redundant,
}

impl VlanSummary {
    pub fn identity(vlan_name: impl Into<String>, vlan_id: impl Into<String>) -> Self {
        Self {
            vlan_name: vlan_name.into(),
            vlan_id: vlan_id.into(),
            ..Self::default()
        }
    }

    pub fn shape(&self) -> SummaryShape {
        match (&self.master_addr, &self.virtual_addr) {
            (None, _) => SummaryShape::Identity,
            (Some(_), None) => SummaryShape::Addressed,
            (Some(_), Some(_)) => SummaryShape::Redundant,
        }
    }
}

fn quoted(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn plain(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("null")
}

impl Display for VlanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "- {{ name: {}, vlan_id: {}", quoted(&self.vlan_name), self.vlan_id)?;
        if self.shape() == SummaryShape::Identity {
            return write!(f, " }}");
        }
        write!(
            f,
            ", vrf: {}, masterip: {}, slaveip: {}",
            quoted(self.vrf_name.as_deref().unwrap_or_default()),
            plain(&self.master_addr),
            plain(&self.slave_addr)
        )?;
        if let Some(vip) = &self.virtual_addr {
            write!(f, ", vip: {}", vip)?;
        }
        write!(f, ", mask: {} }}", plain(&self.mask))
    }
}

/// Writes one line per summary, flushing after each.
pub fn write_report<W: Write>(out: &mut W, summaries: &[VlanSummary]) -> io::Result<()> {
    for summary in summaries {
        writeln!(out, "{}", summary)?;
        out.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn servers() -> VlanSummary {
        VlanSummary {
            vlan_name: "SERVERS".to_string(),
            vlan_id: "10".to_string(),
            vrf_name: Some("default".to_string()),
            master_addr: Some("10.0.10.1".to_string()),
            slave_addr: Some("10.0.10.2".to_string()),
            virtual_addr: None,
            mask: Some("24".to_string()),
        }
    }

    #[test]
    fn test_identity_line() {
        let summary = VlanSummary::identity("default", "1");
        assert_eq!(summary.shape(), SummaryShape::Identity);
        assert_eq!(summary.to_string(), "- { name: 'default', vlan_id: 1 }");
    }

    #[test]
    fn test_identity_line_ignores_other_fields() {
        let summary = VlanSummary {
            vrf_name: Some("PROD".to_string()),
            mask: Some("24".to_string()),
            virtual_addr: Some("10.0.0.1".to_string()),
            ..VlanSummary::identity("NOIP", "99")
        };
        assert_eq!(summary.shape(), SummaryShape::Identity);
        assert_eq!(summary.to_string(), "- { name: 'NOIP', vlan_id: 99 }");
    }

    #[test]
    fn test_addressed_line() {
        let summary = servers();
        assert_eq!(summary.shape(), SummaryShape::Addressed);
        assert_eq!(
            summary.to_string(),
            "- { name: 'SERVERS', vlan_id: 10, vrf: 'default', masterip: 10.0.10.1, slaveip: 10.0.10.2, mask: 24 }"
        );
    }

    #[test]
    fn test_redundant_line() {
        let summary = VlanSummary {
            vlan_name: "DMZ".to_string(),
            vlan_id: "20".to_string(),
            vrf_name: Some("PROD".to_string()),
            master_addr: Some("10.0.20.2".to_string()),
            slave_addr: Some("10.0.20.3".to_string()),
            virtual_addr: Some("10.0.20.1".to_string()),
            mask: Some("24".to_string()),
        };
        assert_eq!(summary.shape(), SummaryShape::Redundant);
        assert_eq!(
            summary.to_string(),
            "- { name: 'DMZ', vlan_id: 20, vrf: 'PROD', masterip: 10.0.20.2, slaveip: 10.0.20.3, vip: 10.0.20.1, mask: 24 }"
        );
    }

    #[test]
    fn test_missing_values_and_quotes() {
        let summary = VlanSummary {
            slave_addr: None,
            mask: None,
            vlan_name: "BOB'S LAB".to_string(),
            ..servers()
        };
        assert_eq!(
            summary.to_string(),
            "- { name: 'BOB''S LAB', vlan_id: 10, vrf: 'default', masterip: 10.0.10.1, slaveip: null, mask: null }"
        );
    }

    #[test]
    fn test_write_report() {
        let mut out = Vec::new();
        write_report(&mut out, &[VlanSummary::identity("default", "1"), servers()]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "- { name: 'default', vlan_id: 1 }");
        assert!(lines[1].starts_with("- { name: 'SERVERS'"));
    }
}
