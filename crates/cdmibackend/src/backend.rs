//! EOS implementation of the CDMI storage backend interface

use crate::capability::{
    map_empty_capability, BackendCapability, CapabilityFlags, CapabilityKind,
    QosClassDescription, EOS_CAPABILITIES,
};
use crate::status::{class_name_from_uri, is_directory, map_object_status, CdmiObjectStatus};
use async_trait::async_trait;
use eosclient::{
    string_list, EosClient, EosClientError, HttpTransport, QosCommand, Result, Transport,
};
use eosconfig::PluginConfig;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Operations the CDMI server expects from a storage backend
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// All capabilities provided by the storage
    async fn capabilities(&self) -> Result<Vec<BackendCapability>>;

    /// Start a QoS transition of the object at `path` towards the
    /// capability at `target_capability_uri`
    async fn update_cdmi_object(&self, path: &str, target_capability_uri: &str) -> Result<()>;

    /// QoS state of the object at `path`
    async fn current_status(&self, path: &str) -> Result<CdmiObjectStatus>;
}

/// Storage backend talking to an EOS MGM
pub struct EosStorageBackend<T: Transport = HttpTransport> {
    client: EosClient<T>,
    flags: &'static CapabilityFlags,
}

impl EosStorageBackend<HttpTransport> {
    /// Create a backend from an already loaded plugin configuration
    pub fn from_config(config: &PluginConfig) -> Result<Self> {
        Ok(Self::new(EosClient::from_config(config)?))
    }

    /// Load the plugin configuration from `path` and create a backend
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = PluginConfig::from_file(path)?;
        Self::from_config(&config)
    }
}

impl<T: Transport> EosStorageBackend<T> {
    pub fn new(client: EosClient<T>) -> Self {
        Self {
            client,
            flags: &EOS_CAPABILITIES,
        }
    }

    pub fn client(&self) -> &EosClient<T> {
        &self.client
    }

    /// List classes, then describe each one
    ///
    /// Every error carries the URL of the request it belongs to.
    async fn collect_capabilities(&self) -> Result<Vec<BackendCapability>> {
        let endpoint = self.client.endpoint();

        let url = endpoint.proto_command_url(&QosCommand::List);
        let listing = self.client.execute(&url).await?;
        let classes = string_list(&listing, eosclient::envelope::ARRAY_FIELD)
            .map_err(|e| e.in_command("GET", &url))?;

        let mut capabilities = Vec::with_capacity(2 * classes.len() + 2);

        for class_name in classes {
            // An empty name would go out as a plain `qos list`
            if class_name.is_empty() {
                warn!("Skipping unnamed QoS class in listing");
                continue;
            }

            let url = endpoint.proto_command_url(&QosCommand::ListClass { class_name });
            let response = self.client.execute(&url).await?;
            let description =
                QosClassDescription::from_json(&response).map_err(|e| e.in_command("GET", &url))?;

            for kind in CapabilityKind::ALL {
                let capability = description.to_capability(kind, self.flags);
                info!("{} capability: {}", kind, capability);
                capabilities.push(capability);
            }
        }

        for kind in CapabilityKind::ALL {
            capabilities.push(map_empty_capability(kind, self.flags));
        }

        Ok(capabilities)
    }
}

#[async_trait]
impl<T: Transport> StorageBackend for EosStorageBackend<T> {
    async fn capabilities(&self) -> Result<Vec<BackendCapability>> {
        debug!("Fetching CDMI capabilities.");

        self.collect_capabilities()
            .await
            .inspect_err(|e| error!("Error fetching CDMI capabilities -- {}", e))
    }

    async fn update_cdmi_object(&self, path: &str, target_capability_uri: &str) -> Result<()> {
        let class_name = class_name_from_uri(target_capability_uri)?;

        info!("Requesting QoS transition of {} to {}", path, class_name);
        self.client.qos_set(path, &class_name).await
    }

    async fn current_status(&self, path: &str) -> Result<CdmiObjectStatus> {
        debug!("Fetching QoS status of {}", path);

        let fileinfo = self.client.fileinfo(path).await?;
        if is_directory(&fileinfo) {
            return Err(EosClientError::InvalidOperation("is a directory".into())
                .in_command("GET", self.client.endpoint().fileinfo_url(path)));
        }

        let qos = self.client.qos_get(path).await?;

        map_object_status(qos).map_err(|e| {
            let command = QosCommand::Get {
                path: path.to_string(),
            };
            e.in_command("GET", self.client.endpoint().proto_command_url(&command))
        })
    }
}
