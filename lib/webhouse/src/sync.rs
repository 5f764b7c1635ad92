use log::{debug, warn};

use crate::update::{decode, is_truthy};
use crate::{
    Alarm, AlarmSignal, DeviceId, DeviceRegistry, Field, InboundUpdate, Result, Transition, Value,
};

#[derive(Debug, Default, PartialEq)]
pub struct Applied {
    pub updates: Vec<(DeviceId, Value)>,
    pub alarm: Option<AlarmSignal>,
    pub arming: Option<Transition>,
    pub rejected: Vec<Rejected>,
}

#[derive(Debug, PartialEq)]
pub struct Rejected {
    pub field: Field,
    pub reason: String,
}

#[derive(Clone, Debug)]
pub struct Synchronizer {
    registry: DeviceRegistry,
    alarm: Alarm,
}

impl Synchronizer {
    pub fn new(registry: DeviceRegistry, alarm: Alarm) -> Self {
        Self { registry, alarm }
    }

    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut DeviceRegistry {
        &mut self.registry
    }

    pub fn alarm(&self) -> &Alarm {
        &self.alarm
    }

    pub fn alarm_mut(&mut self) -> &mut Alarm {
        &mut self.alarm
    }

    // a malformed frame leaves all state untouched
    pub fn apply(&mut self, raw: &str) -> Result<Applied> {
        let update = InboundUpdate::parse(raw)?;
        let mut applied = Applied::default();

        for (field, json) in update.fields() {
            let device = match field.device() {
                Some(device) => device,
                None => {
                    if is_truthy(json) {
                        applied.alarm = applied.alarm.or(self.alarm.trip());
                    } else {
                        debug!("light barrier clear");
                    }
                    continue;
                }
            };

            let value = match decode(device, json).and_then(|value| self.registry.set(device, value))
            {
                Ok(value) => value,
                Err(err) => {
                    warn!("rejected {}: {err}", field.key());
                    applied.rejected.push(Rejected {
                        field,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            if device == DeviceId::Alarm {
                let transition = self.alarm.set_armed(value == Value::ON);
                if transition != Transition::Unchanged {
                    applied.arming = Some(transition);
                }
            }

            applied.updates.push((device, value));
        }

        Ok(applied)
    }
}

impl Default for Synchronizer {
    fn default() -> Self {
        Self::new(DeviceRegistry::new(), Alarm::new(false))
    }
}
