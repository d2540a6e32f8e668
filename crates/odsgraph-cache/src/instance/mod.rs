//! Instance records and their per-type store.

mod record;
mod store;

pub use record::InstanceRecord;
pub use store::InstanceStore;
