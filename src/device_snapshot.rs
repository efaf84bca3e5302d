use crate::device_status::{ChargeMode, ChargerStatus, ConnectorStatus, DiverterStatus};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_derive::Deserialize;
use std::fmt;

/// CT channel name the vendor app uses for the circuit feeding the device's
/// own load.
pub const INTERNAL_LOAD_CT: &str = "Internal Load";

/// Heater name marking an unused temperature probe on a diverter.
pub const UNUSED_HEATER: &str = "None";

/// The two device families the vendor API exposes, each with its own status
/// endpoint, envelope key and metric model label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    Charger,
    Diverter,
}

impl DeviceKind {
    /// Vendor status endpoint path for this device kind.
    pub fn endpoint_path(self) -> &'static str {
        match self {
            DeviceKind::Charger => "/cgi-jstatus-Z",
            DeviceKind::Diverter => "/cgi-jstatus-E",
        }
    }

    /// Value of the `model` label on every metric for this kind.
    pub fn model_label(self) -> &'static str {
        match self {
            DeviceKind::Charger => "zappi",
            DeviceKind::Diverter => "eddi",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceKind::Charger => write!(f, "charger"),
            DeviceKind::Diverter => write!(f, "diverter"),
        }
    }
}

/// One polled state record for an EV charging station, field names matching
/// the vendor wire schema. Missing fields take their zero value; extra wire
/// fields are ignored.
///
/// `supply_voltage` is the wire representation (true voltage x10); it is
/// scaled at metric emission, not here.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChargerSnapshot {
    #[serde(rename = "sno", default)]
    pub serial_number: u64,
    #[serde(rename = "fwv", default)]
    pub firmware_version: String,
    #[serde(rename = "dat", default)]
    pub date: String,
    #[serde(rename = "tim", default)]
    pub time: String,
    #[serde(rename = "grd", default)]
    pub grid_power: i64,
    #[serde(rename = "vol", default)]
    pub supply_voltage: i64,
    #[serde(rename = "frq", default)]
    pub supply_frequency: f64,
    #[serde(rename = "sta", default)]
    pub status: ChargerStatus,
    #[serde(rename = "pst", default)]
    pub connector_status: ConnectorStatus,
    #[serde(rename = "zmo", default)]
    pub mode: ChargeMode,
    #[serde(rename = "che", default)]
    pub charge_added_kwh: f64,
    #[serde(rename = "div", default)]
    pub diverted_power: i64,
    #[serde(rename = "ectp1", default)]
    pub ct_power_1: i64,
    #[serde(rename = "ectp2", default)]
    pub ct_power_2: i64,
    #[serde(rename = "ectp3", default)]
    pub ct_power_3: i64,
    #[serde(rename = "ectp4", default)]
    pub ct_power_4: i64,
    #[serde(rename = "ectp5", default)]
    pub ct_power_5: i64,
    #[serde(rename = "ectp6", default)]
    pub ct_power_6: i64,
    #[serde(rename = "ectt1", default)]
    pub ct_name_1: String,
    #[serde(rename = "ectt2", default)]
    pub ct_name_2: String,
    #[serde(rename = "ectt3", default)]
    pub ct_name_3: String,
    #[serde(rename = "ectt4", default)]
    pub ct_name_4: String,
    #[serde(rename = "ectt5", default)]
    pub ct_name_5: String,
    #[serde(rename = "ectt6", default)]
    pub ct_name_6: String,
}

impl ChargerSnapshot {
    /// CT channels as (operator-assigned name, power in watts) pairs.
    pub fn ct_channels(&self) -> [(&str, i64); 6] {
        [
            (self.ct_name_1.as_str(), self.ct_power_1),
            (self.ct_name_2.as_str(), self.ct_power_2),
            (self.ct_name_3.as_str(), self.ct_power_3),
            (self.ct_name_4.as_str(), self.ct_power_4),
            (self.ct_name_5.as_str(), self.ct_power_5),
            (self.ct_name_6.as_str(), self.ct_power_6),
        ]
    }

    /// Power on the first CT channel carrying the given name, if any.
    pub fn ct_power_named(&self, name: &str) -> Option<i64> {
        self.ct_channels()
            .into_iter()
            .find(|(channel, _)| *channel == name)
            .map(|(_, power)| power)
    }

    /// The device's self-reported clock, combined from the separate date and
    /// time fields. `None` if either is unparseable.
    pub fn last_seen(&self) -> Option<DateTime<Utc>> {
        combine_timestamp(&self.date, &self.time)
    }
}

/// One polled state record for a water-heater diverter.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DiverterSnapshot {
    #[serde(rename = "sno", default)]
    pub serial_number: u64,
    #[serde(rename = "fwv", default)]
    pub firmware_version: String,
    #[serde(rename = "dat", default)]
    pub date: String,
    #[serde(rename = "tim", default)]
    pub time: String,
    #[serde(rename = "grd", default)]
    pub grid_power: i64,
    #[serde(rename = "vol", default)]
    pub supply_voltage: i64,
    #[serde(rename = "frq", default)]
    pub supply_frequency: f64,
    #[serde(rename = "sta", default)]
    pub status: DiverterStatus,
    #[serde(rename = "che", default)]
    pub energy_transferred_kwh: f64,
    #[serde(rename = "div", default)]
    pub diverted_power: i64,
    /// Boost-mode flag. Decoded for completeness but not projected into any
    /// metric; the existing mapping never exposed it.
    #[serde(rename = "bsm", default)]
    pub boost_mode: i64,
    #[serde(rename = "tp1", default)]
    pub temperature_1: i64,
    #[serde(rename = "tp2", default)]
    pub temperature_2: i64,
    #[serde(rename = "ht1", default)]
    pub heater_name_1: String,
    #[serde(rename = "ht2", default)]
    pub heater_name_2: String,
    #[serde(rename = "ectp1", default)]
    pub ct_power_1: i64,
    #[serde(rename = "ectp2", default)]
    pub ct_power_2: i64,
    #[serde(rename = "ectp3", default)]
    pub ct_power_3: i64,
    #[serde(rename = "ectt1", default)]
    pub ct_name_1: String,
    #[serde(rename = "ectt2", default)]
    pub ct_name_2: String,
    #[serde(rename = "ectt3", default)]
    pub ct_name_3: String,
}

impl DiverterSnapshot {
    /// Temperature probes that are actually wired up, as (heater name,
    /// temperature in celsius) pairs. A heater named "None" (or left unset)
    /// marks the probe unused and is skipped.
    pub fn heaters(&self) -> impl Iterator<Item = (&str, i64)> {
        [
            (self.heater_name_1.as_str(), self.temperature_1),
            (self.heater_name_2.as_str(), self.temperature_2),
        ]
        .into_iter()
        .filter(|(name, _)| !name.is_empty() && *name != UNUSED_HEATER)
    }

    pub fn ct_channels(&self) -> [(&str, i64); 3] {
        [
            (self.ct_name_1.as_str(), self.ct_power_1),
            (self.ct_name_2.as_str(), self.ct_power_2),
            (self.ct_name_3.as_str(), self.ct_power_3),
        ]
    }

    pub fn ct_power_named(&self, name: &str) -> Option<i64> {
        self.ct_channels()
            .into_iter()
            .find(|(channel, _)| *channel == name)
            .map(|(_, power)| power)
    }

    pub fn last_seen(&self) -> Option<DateTime<Utc>> {
        combine_timestamp(&self.date, &self.time)
    }
}

/// Combines the device's separate `DD-MM-YYYY` date and `HH:MM:SS` time
/// strings into a single timestamp. Parse failure is non-fatal and simply
/// yields `None`.
pub fn combine_timestamp(date: &str, time: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%d-%m-%Y %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZAPPI_RECORD: &str = r#"
        {
            "sno": 16000001,
            "dat": "01-03-2023",
            "tim": "14:05:00",
            "fwv": "3560S3.142",
            "grd": -1234,
            "vol": 2398,
            "frq": 49.97,
            "sta": 3,
            "pst": "C2",
            "zmo": 3,
            "che": 12.52,
            "div": 1400,
            "ectp1": 310,
            "ectt1": "Internal Load",
            "ectt2": "Grid",
            "ectt3": "None",
            "newAppAvailable": false,
            "beingTamperedWith": false
        }
    "#;

    #[test]
    fn decodes_charger_record() {
        let snapshot: ChargerSnapshot = serde_json::from_str(ZAPPI_RECORD).unwrap();
        assert_eq!(snapshot.serial_number, 16000001);
        assert_eq!(snapshot.firmware_version, "3560S3.142");
        assert_eq!(snapshot.grid_power, -1234);
        assert_eq!(snapshot.supply_voltage, 2398);
        assert_eq!(snapshot.supply_frequency, 49.97);
        assert_eq!(snapshot.status, ChargerStatus::Charging);
        assert_eq!(snapshot.connector_status, ConnectorStatus::Charging);
        assert_eq!(snapshot.mode, ChargeMode::EcoPlus);
        assert_eq!(snapshot.charge_added_kwh, 12.52);
    }

    #[test]
    fn missing_fields_take_zero_values() {
        let snapshot: ChargerSnapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(snapshot.serial_number, 0);
        assert_eq!(snapshot.firmware_version, "");
        assert_eq!(snapshot.status, ChargerStatus::Unknown);
        assert_eq!(snapshot.connector_status, ConnectorStatus::Unknown);
        assert_eq!(snapshot.mode, ChargeMode::Unknown);
        assert!(snapshot.last_seen().is_none());
    }

    #[test]
    fn reserved_status_code_decodes_to_unknown() {
        let snapshot: ChargerSnapshot = serde_json::from_str(r#"{"sta": 4}"#).unwrap();
        assert_eq!(snapshot.status, ChargerStatus::Unknown);
    }

    #[test]
    fn finds_internal_load_channel() {
        let snapshot: ChargerSnapshot = serde_json::from_str(ZAPPI_RECORD).unwrap();
        assert_eq!(snapshot.ct_power_named(INTERNAL_LOAD_CT), Some(310));
        assert_eq!(snapshot.ct_power_named("Solar"), None);
    }

    #[test]
    fn combines_date_and_time() {
        let ts = combine_timestamp("01-03-2023", "14:05:00").unwrap();
        assert_eq!(ts.timestamp(), 1677679500);
    }

    #[test]
    fn invalid_date_yields_none() {
        // The 31st of February does not exist; the derived metric is simply
        // omitted for this device.
        assert!(combine_timestamp("31-02-2023", "14:05:00").is_none());
        assert!(combine_timestamp("", "").is_none());
        assert!(combine_timestamp("01-03-2023", "25:99:00").is_none());
    }

    #[test]
    fn diverter_unused_probe_is_skipped() {
        let snapshot: DiverterSnapshot = serde_json::from_str(
            r#"{
                "sno": 21000001,
                "sta": 3,
                "tp1": 52,
                "tp2": -1,
                "ht1": "Tank Top",
                "ht2": "None"
            }"#,
        )
        .unwrap();
        let heaters: Vec<_> = snapshot.heaters().collect();
        assert_eq!(heaters, vec![("Tank Top", 52)]);
        assert_eq!(snapshot.status, DiverterStatus::Diverting);
    }

    #[test]
    fn diverter_boost_mode_is_decoded() {
        let snapshot: DiverterSnapshot = serde_json::from_str(r#"{"bsm": 1}"#).unwrap();
        assert_eq!(snapshot.boost_mode, 1);
    }
}
