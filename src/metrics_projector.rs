use crate::device_snapshot::{ChargerSnapshot, DeviceKind, DiverterSnapshot, INTERNAL_LOAD_CT};
use crate::device_status::{ChargeMode, ChargerStatus, ConnectorStatus, DiverterStatus};
use prometheus::{GaugeVec, Opts, Registry};

const NAMESPACE: &str = "myenergi";

/// Projects device snapshots onto a shared gauge set.
///
/// Enum-valued state is one-hot encoded: every value in the enum domain gets
/// a series, exactly one of which is 1 for a given device. Downstream alerts
/// can then match on `series == 1` without knowing the vendor code table,
/// and label cardinality stays stable across scrapes regardless of state.
pub struct MetricsProjector {
    info: GaugeVec,
    status: GaugeVec,
    mode: GaugeVec,
    connector_status: GaugeVec,
    grid_power: GaugeVec,
    supply_voltage: GaugeVec,
    supply_frequency: GaugeVec,
    diverted_power: GaugeVec,
    charge_added: GaugeVec,
    energy_transferred: GaugeVec,
    load_power: GaugeVec,
    heater_temperature: GaugeVec,
    last_seen: GaugeVec,
}

impl MetricsProjector {
    /// Creates the gauge set and registers it on the caller-owned registry.
    /// Registration happens exactly once, at process start.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        Ok(Self {
            info: register_gauge(
                registry,
                "info",
                "Device identity; constant 1 while the device is reported by the API",
                &["model", "serial", "firmware_version"],
            )?,
            status: register_gauge(
                registry,
                "status",
                "One-hot encoded operating status",
                &["model", "serial", "status"],
            )?,
            mode: register_gauge(
                registry,
                "mode",
                "One-hot encoded charge mode",
                &["model", "serial", "mode"],
            )?,
            connector_status: register_gauge(
                registry,
                "connector_status",
                "One-hot encoded EV connector status",
                &["model", "serial", "status"],
            )?,
            grid_power: register_gauge(
                registry,
                "grid_power_watt",
                "Instantaneous grid power in watts, negative when exporting",
                &["model", "serial"],
            )?,
            supply_voltage: register_gauge(
                registry,
                "supply_voltage",
                "Supply voltage in volts",
                &["model", "serial"],
            )?,
            supply_frequency: register_gauge(
                registry,
                "supply_frequency_hz",
                "Supply frequency in hertz",
                &["model", "serial"],
            )?,
            diverted_power: register_gauge(
                registry,
                "diverted_power_watt",
                "Power currently diverted to the device's load in watts",
                &["model", "serial"],
            )?,
            charge_added: register_gauge(
                registry,
                "charge_added_kwh",
                "Energy added in the current charge session in kWh",
                &["model", "serial"],
            )?,
            energy_transferred: register_gauge(
                registry,
                "energy_transferred_kwh",
                "Energy transferred today in kWh",
                &["model", "serial"],
            )?,
            load_power: register_gauge(
                registry,
                "load_power_watt",
                "Power on the CT channel named 'Internal Load' in watts",
                &["model", "serial"],
            )?,
            heater_temperature: register_gauge(
                registry,
                "heater_temperature_celsius",
                "Temperature probe reading per configured heater",
                &["model", "serial", "heater"],
            )?,
            last_seen: register_gauge(
                registry,
                "last_seen_timestamp_seconds",
                "Device-reported clock as epoch seconds",
                &["model", "serial"],
            )?,
        })
    }

    /// Clears identity series ahead of a collection pass so devices the API
    /// no longer returns leave no stale samples.
    pub fn reset_identity(&self) {
        self.info.reset();
    }

    pub fn record_charger(&self, snapshot: &ChargerSnapshot) {
        let model = DeviceKind::Charger.model_label();
        let serial = snapshot.serial_number.to_string();

        self.info
            .with_label_values(&[model, &serial, &snapshot.firmware_version])
            .set(1.0);

        for status in ChargerStatus::ALL {
            self.status
                .with_label_values(&[model, &serial, status.label()])
                .set(one_hot(status == snapshot.status));
        }
        for mode in ChargeMode::ALL {
            self.mode
                .with_label_values(&[model, &serial, mode.label()])
                .set(one_hot(mode == snapshot.mode));
        }
        for connector in ConnectorStatus::ALL {
            self.connector_status
                .with_label_values(&[model, &serial, connector.label()])
                .set(one_hot(connector == snapshot.connector_status));
        }

        self.record_supply(
            model,
            &serial,
            snapshot.grid_power,
            snapshot.supply_voltage,
            snapshot.supply_frequency,
        );
        self.diverted_power
            .with_label_values(&[model, &serial])
            .set(snapshot.diverted_power as f64);
        self.charge_added
            .with_label_values(&[model, &serial])
            .set(snapshot.charge_added_kwh);

        if let Some(load) = snapshot.ct_power_named(INTERNAL_LOAD_CT) {
            self.load_power
                .with_label_values(&[model, &serial])
                .set(load as f64);
        }
        if let Some(last_seen) = snapshot.last_seen() {
            self.last_seen
                .with_label_values(&[model, &serial])
                .set(last_seen.timestamp() as f64);
        }
    }

    pub fn record_diverter(&self, snapshot: &DiverterSnapshot) {
        let model = DeviceKind::Diverter.model_label();
        let serial = snapshot.serial_number.to_string();

        self.info
            .with_label_values(&[model, &serial, &snapshot.firmware_version])
            .set(1.0);

        for status in DiverterStatus::ALL {
            self.status
                .with_label_values(&[model, &serial, status.label()])
                .set(one_hot(status == snapshot.status));
        }

        self.record_supply(
            model,
            &serial,
            snapshot.grid_power,
            snapshot.supply_voltage,
            snapshot.supply_frequency,
        );
        self.diverted_power
            .with_label_values(&[model, &serial])
            .set(snapshot.diverted_power as f64);
        self.energy_transferred
            .with_label_values(&[model, &serial])
            .set(snapshot.energy_transferred_kwh);

        if let Some(load) = snapshot.ct_power_named(INTERNAL_LOAD_CT) {
            self.load_power
                .with_label_values(&[model, &serial])
                .set(load as f64);
        }
        for (heater, temperature) in snapshot.heaters() {
            self.heater_temperature
                .with_label_values(&[model, &serial, heater])
                .set(temperature as f64);
        }
        if let Some(last_seen) = snapshot.last_seen() {
            self.last_seen
                .with_label_values(&[model, &serial])
                .set(last_seen.timestamp() as f64);
        }
    }

    fn record_supply(&self, model: &str, serial: &str, grid_power: i64, voltage_x10: i64, frequency: f64) {
        self.grid_power
            .with_label_values(&[model, serial])
            .set(grid_power as f64);
        // The wire carries the true voltage x10; scale only at emission so
        // the snapshot stays faithful to the wire representation.
        self.supply_voltage
            .with_label_values(&[model, serial])
            .set(voltage_x10 as f64 / 10.0);
        self.supply_frequency
            .with_label_values(&[model, serial])
            .set(frequency);
    }
}

fn one_hot(active: bool) -> f64 {
    if active {
        1.0
    } else {
        0.0
    }
}

fn register_gauge(
    registry: &Registry,
    name: &str,
    help: &str,
    labels: &[&str],
) -> Result<GaugeVec, prometheus::Error> {
    let gauge = GaugeVec::new(Opts::new(name, help).namespace(NAMESPACE), labels)?;
    registry.register(Box::new(gauge.clone()))?;
    Ok(gauge)
}
