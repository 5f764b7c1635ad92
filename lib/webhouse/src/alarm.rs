use std::fmt;

use log::{debug, info};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AlarmState {
    Disarmed,
    ArmedIdle,
    ArmedTriggered,
}

impl fmt::Display for AlarmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disarmed => f.write_str("disarmed"),
            Self::ArmedIdle => f.write_str("armed"),
            Self::ArmedTriggered => f.write_str("triggered"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AlarmSignal;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    Armed,
    Disarmed { silenced: bool },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Alarm {
    state: AlarmState,
}

impl Alarm {
    pub fn new(armed: bool) -> Self {
        let state = if armed {
            AlarmState::ArmedIdle
        } else {
            AlarmState::Disarmed
        };

        Self { state }
    }

    pub fn state(&self) -> AlarmState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        self.state != AlarmState::Disarmed
    }

    pub fn is_triggered(&self) -> bool {
        self.state == AlarmState::ArmedTriggered
    }

    pub fn set_armed(&mut self, armed: bool) -> Transition {
        let transition = match (self.state, armed) {
            (AlarmState::Disarmed, true) => {
                self.state = AlarmState::ArmedIdle;
                Transition::Armed
            }
            (AlarmState::ArmedIdle, false) => {
                self.state = AlarmState::Disarmed;
                Transition::Disarmed { silenced: false }
            }
            (AlarmState::ArmedTriggered, false) => {
                self.state = AlarmState::Disarmed;
                Transition::Disarmed { silenced: true }
            }
            _ => Transition::Unchanged,
        };

        debug!("alarm {} ({transition:?})", self.state);
        transition
    }

    pub fn toggle_armed(&mut self) -> Transition {
        let armed = !self.is_armed();
        self.set_armed(armed)
    }

    // only an idle armed alarm fires
    pub fn trip(&mut self) -> Option<AlarmSignal> {
        match self.state {
            AlarmState::ArmedIdle => {
                info!("light barrier tripped, alarm triggered");
                self.state = AlarmState::ArmedTriggered;
                Some(AlarmSignal)
            }
            AlarmState::Disarmed => {
                debug!("light barrier tripped while disarmed");
                None
            }
            AlarmState::ArmedTriggered => None,
        }
    }

    pub fn reset(&mut self) -> bool {
        if self.state == AlarmState::ArmedTriggered {
            self.state = AlarmState::ArmedIdle;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arm_toggle() {
        let mut alarm = Alarm::new(false);
        assert_eq!(alarm.state(), AlarmState::Disarmed);

        assert_eq!(alarm.toggle_armed(), Transition::Armed);
        assert_eq!(alarm.state(), AlarmState::ArmedIdle);

        assert_eq!(
            alarm.toggle_armed(),
            Transition::Disarmed { silenced: false }
        );
        assert_eq!(alarm.state(), AlarmState::Disarmed);

        assert_eq!(alarm.set_armed(false), Transition::Unchanged);
    }

    #[test]
    fn test_trip_only_when_armed() {
        let mut alarm = Alarm::new(false);
        assert_eq!(alarm.trip(), None);
        assert_eq!(alarm.state(), AlarmState::Disarmed);

        let mut alarm = Alarm::new(true);
        assert_eq!(alarm.trip(), Some(AlarmSignal));
        assert_eq!(alarm.state(), AlarmState::ArmedTriggered);

        assert_eq!(alarm.trip(), None);
        assert!(alarm.is_triggered());
    }

    #[test]
    fn test_reset() {
        let mut alarm = Alarm::new(true);
        assert!(!alarm.reset());

        alarm.trip();
        assert!(alarm.reset());
        assert_eq!(alarm.state(), AlarmState::ArmedIdle);

        assert_eq!(alarm.trip(), Some(AlarmSignal));
    }

    #[test]
    fn test_disarm_while_triggered() {
        let mut alarm = Alarm::new(true);
        alarm.trip();

        assert_eq!(alarm.set_armed(false), Transition::Disarmed { silenced: true });
        assert_eq!(alarm.state(), AlarmState::Disarmed);
        assert!(!alarm.reset());
    }
}
