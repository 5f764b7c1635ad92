use std::time::{Duration, Instant};

use log::{debug, error, info, warn};

use crate::console::{LogSink, Style};
use crate::floor_plan::{self, Surface};
use crate::{
    encode, Alarm, AlarmState, Command, Debouncer, DeviceId, DeviceRegistry, Error, Result,
    Synchronizer, Transition, Value,
};

const ALARM_TEXT: &str = "Burglar alarm! The light barrier was interrupted.";

pub trait Transport {
    fn send(&mut self, text: &str) -> Result<()>;

    fn close(&mut self);
}

pub trait AudioPlayer {
    fn play(&mut self);

    fn pause(&mut self);
}

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    TransportOpened,
    TransportClosed,
    TransportErrored(String),
    MessageReceived(String),
    UserChangedDevice { device: DeviceId, value: Value },
    Clicked { x: i32, y: i32 },
    ToggleDevice(DeviceId),
    SetArmed(bool),
    ToggleArmed,
    ResetAlarm,
    SendRaw(String),
    ClearLog,
    Disconnect,
    Tick,
}

pub struct Panel<T, A, L, S> {
    sync: Synchronizer,
    debouncer: Debouncer,
    connected: bool,
    transport: T,
    audio: A,
    log: L,
    surface: S,
}

impl<T, A, L, S> Panel<T, A, L, S>
where
    T: Transport,
    A: AudioPlayer,
    L: LogSink,
    S: Surface,
{
    pub fn new(transport: T, audio: A, log: L, surface: S) -> Self {
        Self {
            sync: Synchronizer::default(),
            debouncer: Debouncer::new(Duration::ZERO),
            connected: false,
            transport,
            audio,
            log,
            surface,
        }
    }

    pub fn with_alarm_armed(mut self, armed: bool) -> Self {
        let registry = self.sync.registry().clone();
        self.sync = Synchronizer::new(registry, Alarm::new(armed));
        self.sync.registry_mut().set_armed(armed);

        self
    }

    pub fn with_debounce(mut self, window: Duration) -> Self {
        self.debouncer = Debouncer::new(window);
        self
    }

    pub fn registry(&self) -> &DeviceRegistry {
        self.sync.registry()
    }

    pub fn alarm_state(&self) -> AlarmState {
        self.sync.alarm().state()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.next_deadline()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn handle(&mut self, event: Event) {
        self.handle_at(event, Instant::now())
    }

    pub fn handle_at(&mut self, event: Event, now: Instant) {
        match event {
            Event::TransportOpened => {
                info!("transport opened");
                self.connected = true;
                self.log.append("CONNECTED", Style::Plain);
                self.redraw();
            }
            Event::TransportClosed => {
                info!("transport closed");
                self.connected = false;
                self.log.append("DISCONNECTED", Style::Plain);
            }
            Event::TransportErrored(reason) => {
                error!("transport error: {reason}");
                self.log.append(&format!("ERROR: {reason}"), Style::Error);
            }
            Event::MessageReceived(text) => self.receive(&text),
            Event::UserChangedDevice { device, value } => self.change(device, value, now),
            Event::Clicked { x, y } => self.click(x, y),
            Event::ToggleDevice(device) => self.toggle(device),
            Event::SetArmed(armed) => {
                let transition = self.sync.alarm_mut().set_armed(armed);
                self.arming_changed(transition, true);
            }
            Event::ToggleArmed => {
                let transition = self.sync.alarm_mut().toggle_armed();
                self.arming_changed(transition, true);
            }
            Event::ResetAlarm => self.reset_alarm(),
            Event::SendRaw(text) => self.send_text(&text),
            Event::ClearLog => self.log.clear(),
            Event::Disconnect => {
                self.connected = false;
                self.transport.close();
            }
            Event::Tick => {
                for (device, value) in self.debouncer.take_due(now) {
                    self.send_device(device, value);
                }
            }
        }
    }

    fn redraw(&mut self) {
        floor_plan::draw_house(&mut self.surface);

        for device in DeviceId::all() {
            let value = self.sync.registry().get(device);
            floor_plan::draw_device(&mut self.surface, device, value);
        }
    }

    fn receive(&mut self, text: &str) {
        debug!("received {text}");
        self.log.append(&format!("RESPONSE: {text}"), Style::Received);

        let applied = match self.sync.apply(text) {
            Ok(applied) => applied,
            Err(err) => {
                warn!("dropping frame: {err}");
                self.log.append(&format!("ERROR: {err}"), Style::Error);
                return;
            }
        };

        for (device, value) in &applied.updates {
            // the controller's report wins over a slider change still waiting
            self.debouncer.cancel(*device);
            floor_plan::draw_device(&mut self.surface, *device, *value);
        }

        for rejected in &applied.rejected {
            let text = format!("ERROR: {}", rejected.reason);
            self.log.append(&text, Style::Error);
        }

        if applied.alarm.is_some() {
            self.log.append("ALARM: light barrier interrupted", Style::Error);
            self.surface.show_alarm(ALARM_TEXT);
            self.audio.play();
        }

        if let Some(transition) = applied.arming {
            self.arming_changed(transition, false);
        }
    }

    fn change(&mut self, device: DeviceId, value: Value, now: Instant) {
        if device == DeviceId::Alarm {
            if let Err(err) = device.validate(value) {
                warn!("ignoring {device} change: {err}");
                self.log.append(&format!("ERROR: {err}"), Style::Error);
                return;
            }

            let transition = self.sync.alarm_mut().set_armed(value == Value::ON);
            self.arming_changed(transition, true);
            return;
        }

        if let Err(err) = self.store(device, value) {
            self.log.append(&format!("ERROR: {err}"), Style::Error);
            return;
        }

        if self.debouncer.is_enabled() && matches!(value, Value::Level(_)) {
            self.debouncer.offer(device, value, now);
        } else {
            self.send_device(device, value);
        }
    }

    fn toggle(&mut self, device: DeviceId) {
        if device == DeviceId::Alarm {
            let transition = self.sync.alarm_mut().toggle_armed();
            self.arming_changed(transition, true);
            return;
        }

        let value = match self.sync.registry_mut().toggle(device) {
            Ok(value) => value,
            Err(err) => {
                self.log.append(&format!("ERROR: {err}"), Style::Error);
                return;
            }
        };

        self.show_change(device, value);
        self.debouncer.cancel(device);
        self.send_device(device, value);
    }

    fn click(&mut self, x: i32, y: i32) {
        let position = format!("Mouse-Position: x={x} y={y}");
        self.log.append(&position, Style::Plain);

        let registry = self.sync.registry();
        let status = format!(
            "Leuchter: {} Lampe: {} TempSoll: {} TempIst: {}",
            DeviceId::Chandelier.describe(registry.get(DeviceId::Chandelier)),
            DeviceId::Lamp.describe(registry.get(DeviceId::Lamp)),
            DeviceId::HeatingSetpoint.describe(registry.get(DeviceId::HeatingSetpoint)),
            DeviceId::HeatingActual.describe(registry.get(DeviceId::HeatingActual)),
        );
        self.log.append(&status, Style::Plain);

        if let Some(device) = floor_plan::hotspot_at(x, y) {
            self.toggle(device);
        }
    }

    fn store(&mut self, device: DeviceId, value: Value) -> Result<()> {
        if !device.is_controllable() {
            return Err(Error::ReadOnlyDevice(device));
        }

        let value = self.sync.registry_mut().set(device, value)?;
        self.show_change(device, value);

        Ok(())
    }

    fn show_change(&mut self, device: DeviceId, value: Value) {
        floor_plan::draw_device(&mut self.surface, device, value);
        self.log.append(
            &format!("{}: {}", device, device.describe(value)),
            Style::Sent,
        );
    }

    // `local`: the panel changed the arm state and has to tell the controller
    fn arming_changed(&mut self, transition: Transition, local: bool) {
        let armed = match transition {
            Transition::Unchanged => return,
            Transition::Armed => true,
            Transition::Disarmed { silenced } => {
                if silenced {
                    self.audio.pause();
                    self.surface.hide_alarm();
                }
                false
            }
        };

        self.sync.registry_mut().set_armed(armed);
        let value = self.sync.registry().get(DeviceId::Alarm);
        self.log.append(
            &format!("Alarm: {}", DeviceId::Alarm.describe(value)),
            Style::Sent,
        );

        if local {
            self.send_device(DeviceId::Alarm, value);
        }
    }

    fn reset_alarm(&mut self) {
        if !self.sync.alarm_mut().reset() {
            self.log.append("Alarm is not triggered", Style::Plain);
            return;
        }

        self.audio.pause();
        self.surface.hide_alarm();
        self.send_command(Command::alarm_reset());
    }

    fn send_device(&mut self, device: DeviceId, value: Value) {
        match encode(device, value) {
            Ok(command) => self.send_command(command),
            Err(err) => self.log.append(&format!("ERROR: {err}"), Style::Error),
        }
    }

    fn send_command(&mut self, command: Command) {
        match command.to_text() {
            Ok(text) => self.send_text(&text),
            Err(err) => self.log.append(&format!("ERROR: {err}"), Style::Error),
        }
    }

    fn send_text(&mut self, text: &str) {
        let result = if self.connected {
            self.transport.send(text)
        } else {
            Err(Error::TransportClosed)
        };

        match result {
            Ok(()) => {
                debug!("sent {text}");
                self.log.append(&format!("SENT: {text}"), Style::Sent);
            }
            Err(err) => {
                error!("cannot send {text}: {err}");
                self.log.append(&format!("ERROR: {err}"), Style::Error);
            }
        }
    }
}
