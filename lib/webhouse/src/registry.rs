use std::collections::HashMap;

use log::debug;

use crate::{DeviceId, Error, Level, Result, Value};

const DEFAULT_SETPOINT: Level = match Level::new(20) {
    Some(level) => level,
    None => Level::MIN,
};

#[derive(Clone, Debug, PartialEq)]
pub struct DeviceRegistry {
    values: HashMap<DeviceId, Value>,
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceRegistry {
    pub fn new() -> Self {
        let values = DeviceId::all()
            .into_iter()
            .map(|device| (device, Self::default_value(device)))
            .collect();

        Self { values }
    }

    pub const fn default_value(device: DeviceId) -> Value {
        match device {
            DeviceId::Tv | DeviceId::Alarm => Value::OFF,
            DeviceId::HeatingSetpoint => Value::Level(DEFAULT_SETPOINT),
            DeviceId::Lamp | DeviceId::Chandelier | DeviceId::HeatingActual => {
                Value::Level(Level::MIN)
            }
        }
    }

    pub fn get(&self, device: DeviceId) -> Value {
        self.values
            .get(&device)
            .copied()
            .unwrap_or_else(|| Self::default_value(device))
    }

    pub fn level(&self, device: DeviceId) -> Option<Level> {
        match self.get(device) {
            Value::Level(level) => Some(level),
            Value::Binary(_) => None,
        }
    }

    pub fn is_on(&self, device: DeviceId) -> bool {
        match self.get(device) {
            Value::Binary(is_on) => is_on,
            Value::Level(level) => level > Level::MIN,
        }
    }

    pub fn set(&mut self, device: DeviceId, value: Value) -> Result<Value> {
        device.validate(value)?;
        self.values.insert(device, value);

        Ok(value)
    }

    pub fn set_level(&mut self, device: DeviceId, raw: i64) -> Result<Level> {
        let level = Level::clamped(raw);
        if i64::from(level.get()) != raw {
            debug!("clamped {raw} to {level} for {device}");
        }

        self.set(device, Value::Level(level))?;
        Ok(level)
    }

    // mirrors the alarm state machine, which owns the arm state
    pub fn set_armed(&mut self, armed: bool) {
        self.values.insert(DeviceId::Alarm, Value::Binary(armed));
    }

    // a dark dimmer goes fully on, a lit one fully off
    pub fn toggle(&mut self, device: DeviceId) -> Result<Value> {
        match device {
            DeviceId::HeatingActual => return Err(Error::ReadOnlyDevice(device)),
            DeviceId::Alarm => {
                return Err(Error::invalid_value(device, "arm or disarm the alarm instead"))
            }
            _ => (),
        }

        let toggled = match self.get(device) {
            Value::Binary(is_on) => Value::Binary(!is_on),
            Value::Level(level) if level.get() < 1 => Value::Level(Level::MAX),
            Value::Level(_) => Value::Level(Level::MIN),
        };

        self.values.insert(device, toggled);
        Ok(toggled)
    }
}
