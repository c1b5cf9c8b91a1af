//! Device registration and discovery.
//!
//! Before a websocket connection can be opened, this client must hold a
//! device record registered with the service's device directory (WDM). The
//! record identifies the client instance and carries the service-assigned
//! `webSocketUrl` to connect to.
//!
//! Registration is get-or-create: an existing device with our fixed name is
//! reused, otherwise a new one is created from the fixed capability
//! descriptor. A failed lookup is never fatal; it falls through to
//! creation. A failed creation is fatal: there is nothing to connect to.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::api::RestClient;
use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Default device directory endpoint.
pub const DEFAULT_DEVICE_URL: &str = "https://wdm-a.wbx2.com/wdm/api/v1";

/// Fixed device name this client registers and looks itself up under.
pub(crate) const DEVICE_NAME: &str = "rust-spark-client";

// ============================================================================
// DeviceDescriptor
// ============================================================================

/// Fixed capability descriptor sent when creating a device.
#[derive(Debug, Clone, Serialize)]
struct DeviceDescriptor {
    #[serde(rename = "deviceName")]
    device_name: &'static str,
    #[serde(rename = "deviceType")]
    device_type: &'static str,
    #[serde(rename = "localizedModel")]
    localized_model: &'static str,
    model: &'static str,
    name: &'static str,
    #[serde(rename = "systemName")]
    system_name: &'static str,
    #[serde(rename = "systemVersion")]
    system_version: &'static str,
}

/// Returns the fixed capability descriptor for this client.
fn descriptor() -> DeviceDescriptor {
    DeviceDescriptor {
        device_name: "rust-websocket-client",
        device_type: "DESKTOP",
        localized_model: "rust",
        model: "rust",
        name: DEVICE_NAME,
        system_name: DEVICE_NAME,
        system_version: env!("CARGO_PKG_VERSION"),
    }
}

// ============================================================================
// DeviceRecord
// ============================================================================

/// A device record as returned by the directory.
///
/// Held for the lifetime of one run; not persisted across runs.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceRecord {
    /// Device name; matched against [`DEVICE_NAME`] during lookup.
    #[serde(default)]
    pub name: Option<String>,

    /// Service-assigned websocket endpoint. Its absence is fatal at run
    /// time, not here: lookup still matches such a record.
    #[serde(rename = "webSocketUrl", default)]
    pub web_socket_url: Option<String>,

    /// Remaining directory fields, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Device directory list response.
#[derive(Debug, Deserialize)]
struct DeviceList {
    devices: Vec<DeviceRecord>,
}

// ============================================================================
// DeviceRegistry
// ============================================================================

/// Resolves or creates this client's device record.
#[derive(Debug, Clone)]
pub struct DeviceRegistry {
    /// Authenticated REST client.
    rest: RestClient,

    /// Device directory base URL, default [`DEFAULT_DEVICE_URL`].
    device_url: String,
}

impl DeviceRegistry {
    /// Creates a registry against the given device directory.
    #[must_use]
    pub fn new(rest: RestClient, device_url: impl Into<String>) -> Self {
        let mut device_url = device_url.into();
        while device_url.ends_with('/') {
            device_url.pop();
        }
        Self { rest, device_url }
    }

    /// Resolves or creates the device record for this client.
    ///
    /// With `check_existing`, lists registered devices first and returns the
    /// one matching the fixed device name. Any lookup failure is logged and
    /// treated as not-found.
    ///
    /// # Errors
    ///
    /// [`Error::Registration`] if creation yields no usable device record,
    /// or [`Error::Http`] if the create call itself fails. Both are fatal to
    /// startup.
    pub async fn get_or_create_device(&self, check_existing: bool) -> Result<DeviceRecord> {
        if check_existing {
            debug!("Listing registered devices");
            match self.find_existing().await {
                Ok(Some(device)) => {
                    debug!(name = DEVICE_NAME, "Reusing registered device");
                    return Ok(device);
                }
                Ok(None) => info!("Device not registered, creating"),
                Err(e) => warn!(error = %e, "Device lookup failed, creating"),
            }
        }

        self.create_device().await
    }

    /// Looks up an existing device by the fixed name.
    async fn find_existing(&self) -> Result<Option<DeviceRecord>> {
        let value = self.rest.get_json(&self.devices_url()).await?;
        let list: DeviceList = serde_json::from_value(value)?;

        Ok(list
            .devices
            .into_iter()
            .find(|device| device.name.as_deref() == Some(DEVICE_NAME)))
    }

    /// Creates a new device from the fixed capability descriptor.
    async fn create_device(&self) -> Result<DeviceRecord> {
        let value = self
            .rest
            .post_json(&self.devices_url(), &descriptor())
            .await?;

        let device: DeviceRecord = serde_json::from_value(value)
            .map_err(|e| Error::registration(format!("create returned no device record: {e}")))?;

        info!(
            has_websocket_url = device.web_socket_url.is_some(),
            "Device created"
        );
        Ok(device)
    }

    /// Returns the device collection URL.
    fn devices_url(&self) -> String {
        format!("{}/devices", self.device_url)
    }
}

// ============================================================================
// Tests
// ============================================================================
