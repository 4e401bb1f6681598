/*!
NX-OS specifics.

Structure:
- `tables`: the show-commands issued and the rows decoded from their JSON output.
- `device`: `Nexus`, a switch with lazily fetched, memoized tables.
*/

pub mod device;
pub mod tables;

pub use device::Nexus;
