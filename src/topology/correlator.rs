/*!
Joins the tables of an HSRP pair into one `VlanSummary` per VLAN.

For every VLAN of the primary switch, in table order, the SVI `Vlan<id>` is looked up in:
- the VRF bindings (last matching binding wins, `default` otherwise),
- the HSRP groups (active/standby/virtual addresses),
- the interfaces (mask, and the SVI address when no HSRP group gave one).

When the address comes from the SVI instead of HSRP, the secondary switch's SVI of the
same name provides the standby address. The secondary is not queried otherwise.
*/

use tracing::{debug, warn};

use crate::{
    data_aquisition::core::Connector,
    error::ReaderError,
    nxos::{
        Nexus,
        tables::{DEFAULT_VRF, HsrpGroupRow, VlanRow, VrfBindingRow, VrfRow},
    },
    topology::summary::VlanSummary,
};

/// Builds the summaries of every VLAN of `primary`. Any failed fetch aborts the
/// whole run; no partial list is returned.
pub fn correlate<P, S>(
    primary: &mut Nexus<P>,
    secondary: &mut Nexus<S>,
) -> Result<Vec<VlanSummary>, ReaderError>
where
    P: Connector,
    S: Connector,
{
    let vlans = primary.vlans()?.to_vec();
    debug!("correlating {} vlans of {}", vlans.len(), primary.target());
    vlans
        .iter()
        .map(|vlan| summarize(vlan, primary, secondary))
        .collect()
}

fn summarize<P, S>(
    vlan: &VlanRow,
    primary: &mut Nexus<P>,
    secondary: &mut Nexus<S>,
) -> Result<VlanSummary, ReaderError>
where
    P: Connector,
    S: Connector,
{
    let iface_name = vlan.interface_name();

    let vrf_name = resolve_vrf(primary.vrf_bindings()?, &iface_name);

    let mut master_addr = None;
    let mut slave_addr = None;
    let mut virtual_addr = None;
    if let Some(group) = find_group(primary.hsrp_groups()?, &iface_name) {
        debug!(
            "{}: HSRP group {}",
            iface_name,
            group.sh_group_num.as_deref().unwrap_or("?")
        );
        master_addr = non_empty(Some(&group.sh_active_router_addr));
        slave_addr = non_empty(Some(&group.sh_standby_router_addr));
        virtual_addr = non_empty(group.sh_vip.as_ref());
    }

    let mut mask = None;
    let svi = primary
        .find_interface(&iface_name)?
        .map(|iface| (iface.svi_ip_addr.clone(), iface.svi_ip_mask.clone()));
    if let Some((svi_addr, svi_mask)) = svi {
        mask = svi_mask;
        if master_addr.is_none() {
            master_addr = non_empty(svi_addr.as_ref());
            debug!("{}: no HSRP address, using SVI address {:?}", iface_name, master_addr);
            if let Some(peer_iface) = secondary.find_interface(&iface_name)? {
                slave_addr = non_empty(peer_iface.svi_ip_addr.as_ref());
            }
        }
    }

    if master_addr.is_none() {
        return Ok(VlanSummary::identity(&vlan.vlan_name, &vlan.vlan_id));
    }

    Ok(VlanSummary {
        vlan_name: vlan.vlan_name.clone(),
        vlan_id: vlan.vlan_id.clone(),
        vrf_name: Some(vrf_name),
        master_addr,
        slave_addr,
        virtual_addr,
        mask,
    })
}

/// Warns about summaries whose VRF `show vrf all` does not report as up.
/// Returns how many summaries were flagged.
pub fn audit_vrfs<P: Connector>(
    primary: &mut Nexus<P>,
    summaries: &[VlanSummary],
) -> Result<usize, ReaderError> {
    if summaries.iter().all(|s| s.vrf_name.is_none()) {
        return Ok(0);
    }
    let vrfs = primary.vrfs()?;
    let mut flagged = 0;
    for summary in summaries {
        let Some(vrf_name) = &summary.vrf_name else {
            continue;
        };
        match vrfs.iter().find(|vrf| &vrf.vrf_name == vrf_name) {
            None => {
                warn!(
                    "vlan {} is in VRF {} which the switch does not list",
                    summary.vlan_id, vrf_name
                );
                flagged += 1;
            }
            Some(vrf) if !is_up(vrf) => {
                warn!(
                    "vlan {} is in VRF {} which is {}",
                    summary.vlan_id,
                    vrf_name,
                    vrf.vrf_state.as_deref().unwrap_or("in an unknown state")
                );
                flagged += 1;
            }
            Some(_) => {}
        }
    }
    Ok(flagged)
}

/// VRF of `iface_name`. Scans every binding; the last match wins.
pub fn resolve_vrf(bindings: &[VrfBindingRow], iface_name: &str) -> String {
    let mut matches = bindings.iter().filter(|b| b.if_name == iface_name);
    let Some(first) = matches.next() else {
        return DEFAULT_VRF.to_string();
    };
    let mut vrf = first;
    let mut count = 1;
    for binding in matches {
        vrf = binding;
        count += 1;
    }
    if count > 1 {
        warn!(
            "{} is bound to {} VRFs, keeping the last one ({})",
            iface_name, count, vrf.vrf_name
        );
    }
    vrf.vrf_name.clone()
}

/// HSRP group configured on `iface_name`; the last one listed when there are several.
pub fn find_group<'a>(groups: &'a [HsrpGroupRow], iface_name: &str) -> Option<&'a HsrpGroupRow> {
    groups.iter().rev().find(|g| g.sh_if_index == iface_name)
}

fn is_up(vrf: &VrfRow) -> bool {
    vrf.vrf_state
        .as_deref()
        .is_some_and(|state| state.eq_ignore_ascii_case("up"))
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}
