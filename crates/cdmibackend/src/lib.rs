//! CDMI QoS backend for EOS
//!
//! Exposes EOS QoS classes as CDMI capabilities and EOS per-file QoS state as
//! CDMI object status. Every EOS class yields one `container` and one
//! `dataobject` capability; objects without a class map to the `empty`
//! capability.
//!
//! # Example
//!
//! ```no_run
//! use cdmibackend::{EosStorageBackend, StorageBackend};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = EosStorageBackend::from_file("config/eos.config")?;
//!
//!     for capability in backend.capabilities().await? {
//!         println!("{}", capability.uri());
//!     }
//!
//!     let status = backend.current_status("/eos/test/file").await?;
//!     println!("current: {}", status.current_capabilities_uri);
//!
//!     backend
//!         .update_cdmi_object("/eos/test/file", "/cdmi_capabilities/dataobject/disk_replica")
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod capability;
pub mod status;

pub use backend::{EosStorageBackend, StorageBackend};
pub use capability::{
    capability_uri, map_capability, map_empty_capability, transition_uri, BackendCapability,
    CapabilityFlags, CapabilityKind, QosClassDescription, EMPTY_CAPABILITY, EOS_CAPABILITIES,
};
pub use status::{class_name_from_uri, is_directory, map_object_status, CdmiObjectStatus};

/// Backend operations report client errors unchanged
pub use eosclient::{EosClientError as BackendError, Result};
