//! myenergi Cloud Exporter Library
//!
//! This library polls the myenergi cloud API for home energy-management
//! devices (Zappi EV chargers and Eddi water-heater diverters) and republishes
//! their state as Prometheus gauges for scraping.

pub mod device_snapshot;
pub mod device_status;
pub mod error;
pub mod metrics_projector;
pub mod metrics_server;
pub mod myenergi_api;
pub mod status_collector;

// Re-export commonly used types for easier access
pub use device_snapshot::{ChargerSnapshot, DeviceKind, DiverterSnapshot};
pub use device_status::{ChargeMode, ChargerStatus, ConnectorStatus, DiverterStatus};
pub use error::ExporterError;
pub use metrics_projector::MetricsProjector;
pub use myenergi_api::MyEnergiClient;
pub use status_collector::StatusCollector;
