//! Printer transport seam
//!
//! The wireless transport is an external collaborator: the host platform
//! owns device pairing, service discovery, and characteristic writes.
//! This trait is the surface the print pipeline needs from it.

use crate::error::Result;

/// One writable endpoint advertised by a connected device
#[derive(Debug, Clone)]
pub struct CharacteristicInfo {
    pub uuid: String,
    /// Acknowledged write mode ("write with response")
    pub supports_write: bool,
    /// Fire-and-forget write mode
    pub supports_write_without_response: bool,
}

impl CharacteristicInfo {
    pub fn is_writable(&self) -> bool {
        self.supports_write || self.supports_write_without_response
    }
}

/// A service and its characteristics as enumerated after pairing
#[derive(Debug, Clone)]
pub struct ServiceInfo {
    pub uuid: String,
    pub characteristics: Vec<CharacteristicInfo>,
}

/// Platform pairing/connection handle for a nearby thermal printer.
///
/// Implementations map platform failures onto the error taxonomy:
/// `DeviceNotFound` when the chooser yields nothing, `PermissionDenied`
/// when the platform withholds the radio, `Transport` for write and
/// teardown failures.
#[allow(async_fn_in_trait)]
pub trait PrinterTransport {
    /// Open the platform pairing chooser restricted to the given
    /// device-name patterns and connect to the selection.
    async fn request_device(&mut self, name_patterns: &[&str]) -> Result<String>;

    /// Enumerate services and characteristics of the connected device
    async fn discover_services(&mut self) -> Result<Vec<ServiceInfo>>;

    /// Write one chunk to a characteristic. `acknowledged` selects the
    /// write-with-response mode when the characteristic supports it.
    async fn write(
        &mut self,
        service_uuid: &str,
        characteristic_uuid: &str,
        data: &[u8],
        acknowledged: bool,
    ) -> Result<()>;

    /// Tear down the connection. Best-effort.
    async fn disconnect(&mut self) -> Result<()>;

    fn is_connected(&self) -> bool;
}
