use std::error::Error;
use std::fmt;

use webhouse::{DeviceId, Event, Value};

pub const HELP: &str = "\
commands:
  tv [on|off]            toggle or switch the TV
  lamp <0-100>           dim the floor lamp
  chandelier <0-100>     dim the chandelier
  setpoint <0-100>       set the heating setpoint
  toggle <device>        toggle tv, lamp, chandelier, setpoint or alarm
  click <x> <y>          click on the floor plan
  arm | disarm | reset   control the burglar alarm
  send <text>            send a raw frame
  clear | log | state    console and device state
  connect | disconnect   open or close the connection
  quit";

#[derive(Clone, Debug, PartialEq)]
pub enum Input {
    Panel(Event),
    Connect,
    ShowLog,
    ShowState,
    Help,
    Quit,
}

#[derive(Debug, PartialEq)]
pub struct InvalidInput(String);

impl fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Error for InvalidInput {}

impl TryFrom<&str> for Input {
    type Error = InvalidInput;

    fn try_from(line: &str) -> Result<Self, InvalidInput> {
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        let input = match command {
            "tv" => match rest {
                "" => Event::ToggleDevice(DeviceId::Tv),
                "on" | "ON" => set(DeviceId::Tv, Value::ON),
                "off" | "OFF" => set(DeviceId::Tv, Value::OFF),
                _ => return Err(InvalidInput(format!("tv takes on or off, got {rest}"))),
            }
            .into(),
            "lamp" => set(DeviceId::Lamp, level(command, rest)?).into(),
            "chandelier" => set(DeviceId::Chandelier, level(command, rest)?).into(),
            "setpoint" => set(DeviceId::HeatingSetpoint, level(command, rest)?).into(),
            "toggle" => {
                let device = DeviceId::try_from(rest)
                    .map_err(|err| InvalidInput(err.to_string()))?;
                Event::ToggleDevice(device).into()
            }
            "click" => {
                let mut coordinates = rest.split_whitespace().map(str::parse::<i32>);

                match (coordinates.next(), coordinates.next(), coordinates.next()) {
                    (Some(Ok(x)), Some(Ok(y)), None) => Event::Clicked { x, y }.into(),
                    _ => return Err(InvalidInput("click takes <x> <y>".to_string())),
                }
            }
            "arm" => Event::SetArmed(true).into(),
            "disarm" => Event::SetArmed(false).into(),
            "reset" => Event::ResetAlarm.into(),
            "send" if !rest.is_empty() => Event::SendRaw(rest.to_string()).into(),
            "send" => return Err(InvalidInput("send takes the text to send".to_string())),
            "clear" => Event::ClearLog.into(),
            "disconnect" => Event::Disconnect.into(),
            "connect" => Input::Connect,
            "log" => Input::ShowLog,
            "state" => Input::ShowState,
            "help" | "?" => Input::Help,
            "quit" | "exit" => Input::Quit,
            _ => return Err(InvalidInput(format!("unknown command {command}, try help"))),
        };

        Ok(input)
    }
}

impl From<Event> for Input {
    fn from(event: Event) -> Self {
        Input::Panel(event)
    }
}

fn set(device: DeviceId, value: Value) -> Event {
    Event::UserChangedDevice { device, value }
}

// out-of-range values are clamped by the panel, only garbage is refused
fn level(command: &str, rest: &str) -> Result<Value, InvalidInput> {
    rest.parse::<i64>()
        .map(Value::level)
        .map_err(|_| InvalidInput(format!("{command} takes a value from 0 to 100")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Input, InvalidInput> {
        Input::try_from(line)
    }

    #[test]
    fn test_device_commands() {
        assert_eq!(
            parse("tv"),
            Ok(Input::Panel(Event::ToggleDevice(DeviceId::Tv)))
        );
        assert_eq!(parse("tv on"), Ok(Input::Panel(set(DeviceId::Tv, Value::ON))));
        assert_eq!(
            parse("  lamp 58 "),
            Ok(Input::Panel(set(DeviceId::Lamp, Value::level(58))))
        );
        assert_eq!(
            parse("chandelier 140"),
            Ok(Input::Panel(set(DeviceId::Chandelier, Value::level(100))))
        );
        assert_eq!(
            parse("setpoint 0"),
            Ok(Input::Panel(set(DeviceId::HeatingSetpoint, Value::level(0))))
        );
        assert_eq!(
            parse("toggle chandelier"),
            Ok(Input::Panel(Event::ToggleDevice(DeviceId::Chandelier)))
        );
    }

    #[test]
    fn test_panel_commands() {
        assert_eq!(
            parse("click 200 160"),
            Ok(Input::Panel(Event::Clicked { x: 200, y: 160 }))
        );
        assert_eq!(parse("arm"), Ok(Input::Panel(Event::SetArmed(true))));
        assert_eq!(parse("reset"), Ok(Input::Panel(Event::ResetAlarm)));
        assert_eq!(
            parse(r#"send {"TV": "ON"}"#),
            Ok(Input::Panel(Event::SendRaw(r#"{"TV": "ON"}"#.to_string())))
        );
        assert_eq!(parse("connect"), Ok(Input::Connect));
        assert_eq!(parse("quit"), Ok(Input::Quit));
    }

    #[test]
    fn test_invalid_commands() {
        assert!(parse("lamp bright").is_err());
        assert!(parse("tv maybe").is_err());
        assert!(parse("click 1").is_err());
        assert!(parse("click 1 2 3").is_err());
        assert!(parse("toggle fridge").is_err());
        assert!(parse("send").is_err());
        assert!(parse("dance").is_err());
    }
}
