use serde_derive::Deserialize;

/// Operating status reported by a charging station.
///
/// The wire codes have gaps (2 and 4 are reserved by the vendor); those codes
/// must keep resolving to `Unknown` rather than being renumbered onto a
/// neighbouring state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "i64")]
pub enum ChargerStatus {
    #[default]
    Unknown,
    Paused,
    Charging,
    Complete,
}

impl ChargerStatus {
    /// Full domain of the enum, used for one-hot metric emission.
    pub const ALL: [ChargerStatus; 4] = [
        ChargerStatus::Unknown,
        ChargerStatus::Paused,
        ChargerStatus::Charging,
        ChargerStatus::Complete,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChargerStatus::Unknown => "unknown",
            ChargerStatus::Paused => "paused",
            ChargerStatus::Charging => "charging",
            ChargerStatus::Complete => "complete",
        }
    }
}

impl From<i64> for ChargerStatus {
    fn from(code: i64) -> Self {
        match code {
            1 => ChargerStatus::Paused,
            3 => ChargerStatus::Charging,
            5 => ChargerStatus::Complete,
            _ => ChargerStatus::Unknown,
        }
    }
}

/// Operating status reported by a water-heater diverter.
///
/// Same gapped-code pattern as [`ChargerStatus`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "i64")]
pub enum DiverterStatus {
    #[default]
    Unknown,
    Paused,
    Diverting,
    MaxTempReached,
    Stopped,
}

impl DiverterStatus {
    pub const ALL: [DiverterStatus; 5] = [
        DiverterStatus::Unknown,
        DiverterStatus::Paused,
        DiverterStatus::Diverting,
        DiverterStatus::MaxTempReached,
        DiverterStatus::Stopped,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DiverterStatus::Unknown => "unknown",
            DiverterStatus::Paused => "paused",
            DiverterStatus::Diverting => "diverting",
            DiverterStatus::MaxTempReached => "max-temp-reached",
            DiverterStatus::Stopped => "stopped",
        }
    }
}

impl From<i64> for DiverterStatus {
    fn from(code: i64) -> Self {
        match code {
            1 => DiverterStatus::Paused,
            3 => DiverterStatus::Diverting,
            5 => DiverterStatus::MaxTempReached,
            6 => DiverterStatus::Stopped,
            _ => DiverterStatus::Unknown,
        }
    }
}

/// Charge mode selected on a charging station.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "i64")]
pub enum ChargeMode {
    #[default]
    Unknown,
    Fast,
    Eco,
    EcoPlus,
    Stopped,
}

impl ChargeMode {
    pub const ALL: [ChargeMode; 5] = [
        ChargeMode::Unknown,
        ChargeMode::Fast,
        ChargeMode::Eco,
        ChargeMode::EcoPlus,
        ChargeMode::Stopped,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChargeMode::Unknown => "unknown",
            ChargeMode::Fast => "fast",
            ChargeMode::Eco => "eco",
            ChargeMode::EcoPlus => "eco+",
            ChargeMode::Stopped => "stopped",
        }
    }
}

impl From<i64> for ChargeMode {
    fn from(code: i64) -> Self {
        match code {
            1 => ChargeMode::Fast,
            2 => ChargeMode::Eco,
            3 => ChargeMode::EcoPlus,
            4 => ChargeMode::Stopped,
            _ => ChargeMode::Unknown,
        }
    }
}

/// State of the EV connector, string-coded on the wire with short vendor
/// tokens ("A", "B1", "C2", ...).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ConnectorStatus {
    #[default]
    Unknown,
    EvDisconnected,
    EvConnected,
    EvWaiting,
    ReadyToCharge,
    Charging,
    Fault,
}

impl ConnectorStatus {
    pub const ALL: [ConnectorStatus; 7] = [
        ConnectorStatus::Unknown,
        ConnectorStatus::EvDisconnected,
        ConnectorStatus::EvConnected,
        ConnectorStatus::EvWaiting,
        ConnectorStatus::ReadyToCharge,
        ConnectorStatus::Charging,
        ConnectorStatus::Fault,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ConnectorStatus::Unknown => "unknown",
            ConnectorStatus::EvDisconnected => "ev-disconnected",
            ConnectorStatus::EvConnected => "ev-connected",
            ConnectorStatus::EvWaiting => "ev-waiting",
            ConnectorStatus::ReadyToCharge => "ready-to-charge",
            ConnectorStatus::Charging => "charging",
            ConnectorStatus::Fault => "fault",
        }
    }
}

impl From<String> for ConnectorStatus {
    fn from(token: String) -> Self {
        match token.as_str() {
            "A" => ConnectorStatus::EvDisconnected,
            "B1" => ConnectorStatus::EvConnected,
            "B2" => ConnectorStatus::EvWaiting,
            "C1" => ConnectorStatus::ReadyToCharge,
            "C2" => ConnectorStatus::Charging,
            "F" => ConnectorStatus::Fault,
            _ => ConnectorStatus::Unknown,
        }
    }
}
