use std::error::Error;
use std::fmt;

use serde_json::Value as JsonValue;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DeviceId {
    Tv,
    Lamp,
    Chandelier,
    HeatingSetpoint,
    HeatingActual,
    Alarm,
}

impl DeviceId {
    pub const fn all() -> [DeviceId; 6] {
        [
            DeviceId::Tv,
            DeviceId::Lamp,
            DeviceId::Chandelier,
            DeviceId::HeatingSetpoint,
            DeviceId::HeatingActual,
            DeviceId::Alarm,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            DeviceId::Tv => "TV",
            DeviceId::Lamp => "Lampe",
            DeviceId::Chandelier => "Leuchter",
            DeviceId::HeatingSetpoint => "TempSoll",
            DeviceId::HeatingActual => "TempIst",
            DeviceId::Alarm => "Alarm",
        }
    }

    pub const fn domain(self) -> Domain {
        match self {
            DeviceId::Tv => Domain::Binary {
                on: "ON",
                off: "OFF",
            },
            DeviceId::Alarm => Domain::Binary {
                on: "ACTIVE",
                off: "INACTIVE",
            },
            DeviceId::Lamp
            | DeviceId::Chandelier
            | DeviceId::HeatingSetpoint
            | DeviceId::HeatingActual => Domain::Percentage,
        }
    }

    // measured by the controller only
    pub const fn is_controllable(self) -> bool {
        !matches!(self, DeviceId::HeatingActual)
    }

    pub fn to_json(self, value: Value) -> JsonValue {
        match (self.domain(), value) {
            (Domain::Binary { on, .. }, Value::Binary(true)) => JsonValue::from(on),
            (Domain::Binary { off, .. }, Value::Binary(false)) => JsonValue::from(off),
            (_, Value::Binary(is_on)) => JsonValue::from(if is_on { 100 } else { 0 }),
            (_, Value::Level(level)) => JsonValue::from(level.get()),
        }
    }

    pub fn validate(self, value: Value) -> Result<(), crate::Error> {
        match (self.domain(), value) {
            (Domain::Binary { .. }, Value::Binary(_)) | (Domain::Percentage, Value::Level(_)) => {
                Ok(())
            }
            (Domain::Binary { on, off }, Value::Level(level)) => Err(crate::Error::invalid_value(
                self,
                format!("expected {on} or {off}, got {level}"),
            )),
            (Domain::Percentage, Value::Binary(_)) => Err(crate::Error::invalid_value(
                self,
                "expected a percentage, got a switch state",
            )),
        }
    }

    pub fn describe(self, value: Value) -> String {
        match self.to_json(value) {
            JsonValue::String(token) => token,
            other => other.to_string(),
        }
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, PartialEq)]
pub struct UnknownDevice(String);

impl fmt::Display for UnknownDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("Unknown device {}", self.0))
    }
}

impl Error for UnknownDevice {}

impl TryFrom<&str> for DeviceId {
    type Error = UnknownDevice;

    fn try_from(value: &str) -> Result<Self, UnknownDevice> {
        match value {
            "TV" | "tv" => Ok(Self::Tv),
            "Lampe" | "lamp" => Ok(Self::Lamp),
            "Leuchter" | "chandelier" => Ok(Self::Chandelier),
            "TempSoll" | "setpoint" => Ok(Self::HeatingSetpoint),
            "TempIst" | "actual" => Ok(Self::HeatingActual),
            "Alarm" | "alarm" => Ok(Self::Alarm),
            _ => Err(UnknownDevice(value.to_string())),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Domain {
    Binary {
        on: &'static str,
        off: &'static str,
    },
    Percentage,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Level(u8);

impl Level {
    pub const MIN: Level = Level(0);
    pub const MAX: Level = Level(100);

    pub const fn new(value: u8) -> Option<Level> {
        if value <= Self::MAX.0 {
            Some(Level(value))
        } else {
            None
        }
    }

    pub fn clamped(value: i64) -> Level {
        Level(value.clamp(Self::MIN.0 as i64, Self::MAX.0 as i64) as u8)
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    pub fn alpha(self) -> f32 {
        self.0 as f32 / 100.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Binary(bool),
    Level(Level),
}

impl Value {
    pub const ON: Value = Value::Binary(true);
    pub const OFF: Value = Value::Binary(false);

    pub fn level(value: i64) -> Value {
        Value::Level(Level::clamped(value))
    }
}

impl From<Level> for Value {
    fn from(level: Level) -> Self {
        Value::Level(level)
    }
}
