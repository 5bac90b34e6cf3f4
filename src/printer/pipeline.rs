//! Print pipeline
//!
//! Drives a paired thermal printer through its connection lifecycle and
//! transmits formatted payloads in bounded chunks. One print operation
//! may be in flight at a time; the `&mut self` receivers enforce that
//! per service instance.

use crate::config::{
    PRINTER_CHUNK_DELAY_MS, PRINTER_CHUNK_SIZE, PRINTER_NAME_PATTERNS, VENDOR_SERVICE_UUIDS,
};
use crate::error::{AppError, Result};
use crate::printer::transport::{PrinterTransport, ServiceInfo};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Printing,
}

/// The negotiated write endpoint on the paired device
#[derive(Debug, Clone)]
struct WriteTarget {
    service_uuid: String,
    characteristic_uuid: String,
    /// Acknowledged write mode is used when the characteristic has it
    acknowledged: bool,
}

pub struct PrintService<T: PrinterTransport> {
    transport: T,
    state: ConnectionState,
    target: Option<WriteTarget>,
}

impl<T: PrinterTransport> PrintService<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: ConnectionState::Disconnected,
            target: None,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Pair with a printer and negotiate a writable characteristic.
    ///
    /// The pairing chooser is restricted to the known device-name
    /// patterns. Characteristics under known vendor service UUIDs are
    /// preferred; otherwise the first writable one is used.
    pub async fn connect(&mut self) -> Result<()> {
        if matches!(self.state, ConnectionState::Connected | ConnectionState::Printing) {
            return Ok(());
        }

        self.state = ConnectionState::Connecting;

        let device = match self.transport.request_device(PRINTER_NAME_PATTERNS).await {
            Ok(device) => device,
            Err(e) => {
                self.state = ConnectionState::Disconnected;
                return Err(e);
            }
        };

        let services = match self.transport.discover_services().await {
            Ok(services) => services,
            Err(e) => {
                self.state = ConnectionState::Disconnected;
                return Err(e);
            }
        };

        let Some(target) = select_write_target(&services) else {
            self.state = ConnectionState::Disconnected;
            return Err(AppError::DeviceNotFound(format!(
                "{} exposes no writable characteristic",
                device
            )));
        };

        tracing::info!(
            "Printer {} connected, writing via {}/{} ({})",
            device,
            target.service_uuid,
            target.characteristic_uuid,
            if target.acknowledged { "acknowledged" } else { "no-response" }
        );

        self.target = Some(target);
        self.state = ConnectionState::Connected;
        Ok(())
    }

    /// Transmit a formatted payload.
    ///
    /// The UTF-8 payload is split into fixed-size byte chunks written
    /// strictly sequentially, pausing between writes so the printer's
    /// input buffer can drain. A failed chunk aborts the transmission
    /// with no retry and no rollback: the physical printout may be
    /// incomplete and the caller must reconnect and reprint in full.
    pub async fn print(&mut self, payload: &str) -> Result<()> {
        if self.state != ConnectionState::Connected {
            return Err(AppError::Transport(
                "printer is not connected".to_string(),
            ));
        }
        let target = self
            .target
            .clone()
            .ok_or_else(|| AppError::Transport("no write target negotiated".to_string()))?;

        self.state = ConnectionState::Printing;

        let bytes = payload.as_bytes();
        let chunk_count = bytes.len().div_ceil(PRINTER_CHUNK_SIZE);
        tracing::debug!("Printing {} bytes in {} chunks", bytes.len(), chunk_count);

        for (index, chunk) in bytes.chunks(PRINTER_CHUNK_SIZE).enumerate() {
            if index > 0 {
                tokio::time::sleep(Duration::from_millis(PRINTER_CHUNK_DELAY_MS)).await;
            }

            if let Err(e) = self
                .transport
                .write(
                    &target.service_uuid,
                    &target.characteristic_uuid,
                    chunk,
                    target.acknowledged,
                )
                .await
            {
                tracing::error!("Chunk {}/{} failed: {}", index + 1, chunk_count, e);
                self.state = ConnectionState::Disconnected;
                self.target = None;
                return Err(e);
            }
        }

        self.state = ConnectionState::Connected;
        Ok(())
    }

    /// Best-effort teardown. Cached device handles are cleared whether
    /// or not the transport cooperates.
    pub async fn disconnect(&mut self) {
        if let Err(e) = self.transport.disconnect().await {
            tracing::warn!("Printer teardown failed: {}", e);
        }
        self.target = None;
        self.state = ConnectionState::Disconnected;
    }
}

fn select_write_target(services: &[ServiceInfo]) -> Option<WriteTarget> {
    let vendor = services.iter().find(|s| {
        VENDOR_SERVICE_UUIDS
            .iter()
            .any(|known| s.uuid.eq_ignore_ascii_case(known))
    });

    vendor
        .into_iter()
        .chain(services.iter())
        .find_map(|service| {
            service
                .characteristics
                .iter()
                .find(|c| c.is_writable())
                .map(|c| WriteTarget {
                    service_uuid: service.uuid.clone(),
                    characteristic_uuid: c.uuid.clone(),
                    acknowledged: c.supports_write,
                })
        })
}
