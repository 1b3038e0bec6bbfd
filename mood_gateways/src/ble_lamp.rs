// THEORY:
// The `ble_lamp` module is the real transport behind `LightGateway`: a BLE
// bedside lamp exposing one writable control characteristic. The wire format
// is a five-byte frame: a fixed start marker followed by brightness and the
// three color channels.
//
// The BLE stack is async, but the gateway trait is synchronous by design (the
// frame loop issues one blocking call per transition and tolerates the
// stall). The gateway therefore owns a small current-thread runtime and
// blocks on each operation. Reconnection policy is internal: a failed write
// triggers exactly one reconnect-and-retry before the error is surfaced to
// the caller, who logs it and moves on.

use crate::{GatewayError, LightGateway};
use btleplug::api::{Central, Characteristic, Manager as _, Peripheral as _, ScanFilter, WriteType};
use btleplug::platform::{Manager, Peripheral};
use mood_engine::pipeline::LightCommand;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

/// Start marker of the lamp's control frame.
const FRAME_MARKER: u8 = 0xAA;
/// How long to let the adapter scan before looking for the lamp.
const SCAN_WINDOW: Duration = Duration::from_secs(3);

/// Addressing for a specific lamp: its MAC plus the GATT service and control
/// characteristic UUIDs.
#[derive(Debug, Clone)]
pub struct BleLampConfig {
    /// MAC address, colon-separated hex (e.g. "AA:BB:CC:DD:EE:FF").
    pub address: String,
    pub service_uuid: Uuid,
    pub characteristic_uuid: Uuid,
}

/// A `LightGateway` backed by a BLE lamp.
pub struct BleLamp {
    config: BleLampConfig,
    runtime: tokio::runtime::Runtime,
    peripheral: Option<Peripheral>,
    control: Option<Characteristic>,
}

impl BleLamp {
    /// Scans for and connects to the configured lamp. Failing here is fatal
    /// for the caller (device unavailable at startup).
    pub fn connect(config: BleLampConfig) -> Result<Self, GatewayError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let mut lamp = Self {
            config,
            runtime,
            peripheral: None,
            control: None,
        };
        lamp.reconnect()?;
        Ok(lamp)
    }

    /// Discovers the lamp again and rebinds the control characteristic.
    fn reconnect(&mut self) -> Result<(), GatewayError> {
        let config = self.config.clone();
        let (peripheral, control) = self.runtime.block_on(async {
            let manager = Manager::new()
                .await
                .map_err(|e| GatewayError::Transport(e.to_string()))?;
            let adapter = manager
                .adapters()
                .await
                .map_err(|e| GatewayError::Transport(e.to_string()))?
                .into_iter()
                .next()
                .ok_or_else(|| GatewayError::DeviceUnavailable("no BLE adapter".into()))?;

            adapter
                .start_scan(ScanFilter { services: vec![config.service_uuid] })
                .await
                .map_err(|e| GatewayError::Transport(e.to_string()))?;
            tokio::time::sleep(SCAN_WINDOW).await;

            let peripherals = adapter
                .peripherals()
                .await
                .map_err(|e| GatewayError::Transport(e.to_string()))?;

            let mut found = None;
            for peripheral in peripherals {
                let properties = peripheral
                    .properties()
                    .await
                    .map_err(|e| GatewayError::Transport(e.to_string()))?;
                if let Some(properties) = properties {
                    if properties
                        .address
                        .to_string()
                        .eq_ignore_ascii_case(&config.address)
                    {
                        found = Some(peripheral);
                        break;
                    }
                }
            }
            let peripheral = found.ok_or_else(|| {
                GatewayError::DeviceUnavailable(format!("lamp {} not in range", config.address))
            })?;

            peripheral
                .connect()
                .await
                .map_err(|e| GatewayError::Transport(e.to_string()))?;
            peripheral
                .discover_services()
                .await
                .map_err(|e| GatewayError::Transport(e.to_string()))?;

            let control = peripheral
                .characteristics()
                .into_iter()
                .find(|c| c.uuid == config.characteristic_uuid)
                .ok_or_else(|| {
                    GatewayError::DeviceUnavailable("control characteristic not exposed".into())
                })?;

            Ok::<_, GatewayError>((peripheral, control))
        })?;

        info!(address = %self.config.address, "connected to BLE lamp");
        self.peripheral = Some(peripheral);
        self.control = Some(control);
        Ok(())
    }

    fn write_frame(&mut self, payload: &[u8]) -> Result<(), GatewayError> {
        let (peripheral, control) = match (&self.peripheral, &self.control) {
            (Some(p), Some(c)) => (p.clone(), c.clone()),
            _ => return Err(GatewayError::DeviceUnavailable("lamp not connected".into())),
        };
        self.runtime.block_on(async {
            peripheral
                .write(&control, payload, WriteType::WithoutResponse)
                .await
                .map_err(|e| GatewayError::Transport(e.to_string()))
        })
    }
}

impl LightGateway for BleLamp {
    fn set_light(&mut self, cmd: &LightCommand) -> Result<(), GatewayError> {
        let payload = [
            FRAME_MARKER,
            cmd.brightness,
            cmd.color.0,
            cmd.color.1,
            cmd.color.2,
        ];

        match self.write_frame(&payload) {
            Ok(()) => Ok(()),
            Err(err) => {
                // One reconnect-and-retry; a second failure surfaces.
                warn!(%err, "lamp write failed, reconnecting");
                self.reconnect()?;
                self.write_frame(&payload)
            }
        }
    }
}
