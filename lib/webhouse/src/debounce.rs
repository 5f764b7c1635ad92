use std::time::{Duration, Instant};

use crate::{DeviceId, Value};

#[derive(Clone, Debug)]
pub struct Debouncer {
    window: Duration,
    pending: Vec<Pending>,
}

#[derive(Clone, Debug)]
struct Pending {
    device: DeviceId,
    value: Value,
    deadline: Instant,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.window.is_zero()
    }

    pub fn offer(&mut self, device: DeviceId, value: Value, now: Instant) {
        let deadline = now + self.window;

        match self.pending.iter_mut().find(|p| p.device == device) {
            Some(pending) => {
                pending.value = value;
                pending.deadline = deadline;
            }
            None => self.pending.push(Pending {
                device,
                value,
                deadline,
            }),
        }
    }

    pub fn take_due(&mut self, now: Instant) -> Vec<(DeviceId, Value)> {
        let mut due = Vec::new();

        self.pending.retain(|pending| {
            if pending.deadline <= now {
                due.push((pending.deadline, pending.device, pending.value));
                false
            } else {
                true
            }
        });

        due.sort_by_key(|(deadline, _, _)| *deadline);
        due.into_iter()
            .map(|(_, device, value)| (device, value))
            .collect()
    }

    pub fn cancel(&mut self, device: DeviceId) {
        self.pending.retain(|pending| pending.device != device);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|pending| pending.deadline).min()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(100);

    #[test]
    fn test_coalesces_per_device() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);

        debouncer.offer(DeviceId::Lamp, Value::level(10), start);
        debouncer.offer(DeviceId::Lamp, Value::level(20), start + Duration::from_millis(50));
        debouncer.offer(
            DeviceId::Chandelier,
            Value::level(70),
            start + Duration::from_millis(60),
        );

        assert!(debouncer.take_due(start + Duration::from_millis(120)).is_empty());
        assert_eq!(
            debouncer.next_deadline(),
            Some(start + Duration::from_millis(150))
        );

        assert_eq!(
            debouncer.take_due(start + Duration::from_millis(200)),
            vec![
                (DeviceId::Lamp, Value::level(20)),
                (DeviceId::Chandelier, Value::level(70)),
            ]
        );
        assert!(debouncer.is_idle());
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);

        debouncer.offer(DeviceId::Lamp, Value::level(10), start);
        debouncer.cancel(DeviceId::Lamp);

        assert!(debouncer.take_due(start + WINDOW).is_empty());
        assert_eq!(debouncer.next_deadline(), None);
    }

    #[test]
    fn test_zero_window_is_disabled() {
        assert!(!Debouncer::new(Duration::ZERO).is_enabled());
        assert!(Debouncer::new(WINDOW).is_enabled());
    }
}
