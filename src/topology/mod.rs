/*!
Topology module

Structure:
- `correlator`: joins the VLAN, interface, VRF binding and HSRP tables of an HSRP pair,
                and checks the resulting VRFs against `show vrf all`.
- `summary`: `VlanSummary`, the per-VLAN result, and its one-line report format.
*/

pub mod correlator;
pub mod summary;

pub use correlator::{audit_vrfs, correlate};
pub use summary::write_report;
