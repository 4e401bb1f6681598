/*!
One NX-OS switch as seen by the reader.

`Nexus` owns a lazily opened session and one cache per show-command table.
Each table is fetched at most once per `Nexus`; the caches are never invalidated.
*/

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::{
    data_aquisition::core::{CommandSession, ConnectionTarget, Connector},
    error::ReaderError,
    nxos::tables::{
        HSRP_TABLE, HsrpGroupRow, INTERFACE_TABLE, InterfaceRow, TableSpec, VLAN_TABLE,
        VRF_INTERFACE_TABLE, VRF_TABLE, VlanRow, VrfBindingRow, VrfRow,
    },
};

/// Fetch state of a memoized table: empty until the first successful fetch,
/// never reset afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Cached<T> {
    fetched: Option<T>,
}

impl<T> Default for Cached<T> {
    fn default() -> Self {
        Self { fetched: None }
    }
}

impl<T> Cached<T> {
    /// Returns the cached value, running `fetch` first if there is none yet.
    /// A failed fetch leaves the cache unfetched.
    pub fn get_or_try_fetch<E>(&mut self, fetch: impl FnOnce() -> Result<T, E>) -> Result<&T, E> {
        let value = match self.fetched.take() {
            Some(value) => value,
            None => fetch()?,
        };
        Ok(self.fetched.insert(value))
    }
}

/// Connection half of a `Nexus`: where to go and the session once opened.
struct Link<C: Connector> {
    target: ConnectionTarget,
    connector: C,
    session: Option<C::Session>,
}

impl<C: Connector> Link<C> {
    /// Opens the session on first use and hands it out afterwards.
    fn connect(&mut self) -> Result<&mut C::Session, ReaderError> {
        let session = match self.session.take() {
            Some(session) => session,
            None => {
                let session = self
                    .connector
                    .connect(&self.target)
                    .map_err(|e| ReaderError::transport(self.target.to_string(), e))?;
                info!("connected to {}", self.target);
                session
            }
        };
        Ok(self.session.insert(session))
    }

    fn fetch<R: DeserializeOwned>(&mut self, table: &TableSpec) -> Result<Vec<R>, ReaderError> {
        let device = self.target.to_string();
        let session = self.connect()?;
        debug!("[{}] issuing '{}'", device, table.command);
        let output = session
            .execute_command(table.command)
            .map_err(|e| ReaderError::transport(device.clone(), e))?;
        let rows = table.decode(&output)?;
        debug!("[{}] '{}' returned {} rows", device, table.command, rows.len());
        Ok(rows)
    }
}

pub struct Nexus<C: Connector> {
    link: Link<C>,
    vlans: Cached<Vec<VlanRow>>,
    interfaces: Cached<Vec<InterfaceRow>>,
    vrfs: Cached<Vec<VrfRow>>,
    vrf_bindings: Cached<Vec<VrfBindingRow>>,
    hsrp_groups: Cached<Vec<HsrpGroupRow>>,
}

impl<C: Connector> Nexus<C> {
    pub fn new(target: ConnectionTarget, connector: C) -> Self {
        Self {
            link: Link {
                target,
                connector,
                session: None,
            },
            vlans: Cached::default(),
            interfaces: Cached::default(),
            vrfs: Cached::default(),
            vrf_bindings: Cached::default(),
            hsrp_groups: Cached::default(),
        }
    }

    pub fn target(&self) -> &ConnectionTarget {
        &self.link.target
    }

    pub fn is_connected(&self) -> bool {
        self.link.session.is_some()
    }

    /// `show vlan all`
    pub fn vlans(&mut self) -> Result<&[VlanRow], ReaderError> {
        let link = &mut self.link;
        self.vlans
            .get_or_try_fetch(|| link.fetch(&VLAN_TABLE))
            .map(Vec::as_slice)
    }

    /// `show interface`
    pub fn interfaces(&mut self) -> Result<&[InterfaceRow], ReaderError> {
        let link = &mut self.link;
        self.interfaces
            .get_or_try_fetch(|| link.fetch(&INTERFACE_TABLE))
            .map(Vec::as_slice)
    }

    /// `show vrf all`
    pub fn vrfs(&mut self) -> Result<&[VrfRow], ReaderError> {
        let link = &mut self.link;
        self.vrfs
            .get_or_try_fetch(|| link.fetch(&VRF_TABLE))
            .map(Vec::as_slice)
    }

    /// `show vrf all interface`
    pub fn vrf_bindings(&mut self) -> Result<&[VrfBindingRow], ReaderError> {
        let link = &mut self.link;
        self.vrf_bindings
            .get_or_try_fetch(|| link.fetch(&VRF_INTERFACE_TABLE))
            .map(Vec::as_slice)
    }

    /// `show hsrp all`
    pub fn hsrp_groups(&mut self) -> Result<&[HsrpGroupRow], ReaderError> {
        let link = &mut self.link;
        self.hsrp_groups
            .get_or_try_fetch(|| link.fetch(&HSRP_TABLE))
            .map(Vec::as_slice)
    }

    /// First interface named `name`, fetching the interface table if needed.
    pub fn find_interface(&mut self, name: &str) -> Result<Option<&InterfaceRow>, ReaderError> {
        Ok(self.interfaces()?.iter().find(|iface| iface.interface == name))
    }
}
