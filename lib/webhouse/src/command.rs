use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value as JsonValue;

use crate::{DeviceId, Error, Result, Value};

const ALARM_RESET: &str = "AlarmReset";

#[derive(Clone, Debug, PartialEq)]
pub struct Command {
    key: &'static str,
    value: JsonValue,
}

impl Command {
    pub fn alarm_reset() -> Command {
        Command {
            key: ALARM_RESET,
            value: JsonValue::String(String::new()),
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn value(&self) -> &JsonValue {
        &self.value
    }

    pub fn to_text(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Serialize for Command {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.key, &self.value)?;
        map.end()
    }
}

pub fn encode(device: DeviceId, value: Value) -> Result<Command> {
    if !device.is_controllable() {
        return Err(Error::ReadOnlyDevice(device));
    }

    device.validate(value)?;

    Ok(Command {
        key: device.key(),
        value: device.to_json(value),
    })
}
