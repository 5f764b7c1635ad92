use crate::{DeviceId, Level, Value};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Rect {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    // border pixels do not count as a hit
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x > self.x && x < self.x + self.width && y > self.y && y < self.y + self.height
    }
}

pub const HOUSE: Rect = Rect::new(0, 0, 400, 300);

const CHANDELIER: Rect = Rect::new(196, 156, 22, 22);
const LAMP: Rect = Rect::new(248, 196, 21, 17);
const TV: Rect = Rect::new(163, 227, 23, 14);
const HEATING: Rect = Rect::new(300, 240, 24, 16);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Sprite {
    House,
    LampOff,
    LampOn,
    ChandelierOff,
    ChandelierOn,
    TvOff,
    TvOn,
    Heating,
}

impl Sprite {
    pub const fn file_name(self) -> &'static str {
        match self {
            Sprite::House => "haus.gif",
            Sprite::LampOff => "Lampe_off.png",
            Sprite::LampOn => "Lampe_on.png",
            Sprite::ChandelierOff => "Kronleuchter_off.png",
            Sprite::ChandelierOn => "Kronleuchter_on.png",
            Sprite::TvOff => "TV_off.png",
            Sprite::TvOn => "TV_on.png",
            Sprite::Heating => "Heizung.png",
        }
    }
}

pub trait Surface {
    fn draw_sprite(&mut self, sprite: Sprite, rect: Rect, alpha: f32);

    fn show_alarm(&mut self, text: &str);

    fn hide_alarm(&mut self);
}

pub fn hotspot(device: DeviceId) -> Option<Rect> {
    match device {
        DeviceId::Chandelier => Some(CHANDELIER),
        DeviceId::Lamp => Some(LAMP),
        DeviceId::Tv => Some(TV),
        DeviceId::HeatingSetpoint => Some(HEATING),
        DeviceId::HeatingActual | DeviceId::Alarm => None,
    }
}

pub fn hotspot_at(x: i32, y: i32) -> Option<DeviceId> {
    DeviceId::all()
        .into_iter()
        .find(|device| hotspot(*device).is_some_and(|rect| rect.contains(x, y)))
}

pub fn draw_house<S: Surface + ?Sized>(surface: &mut S) {
    surface.draw_sprite(Sprite::House, HOUSE, 1.0);
}

pub fn draw_device<S: Surface + ?Sized>(surface: &mut S, device: DeviceId, value: Value) {
    let Some(rect) = hotspot(device) else {
        return;
    };

    let level = match value {
        Value::Level(level) => level,
        Value::Binary(true) => Level::MAX,
        Value::Binary(false) => Level::MIN,
    };

    match device {
        DeviceId::Lamp => {
            surface.draw_sprite(Sprite::LampOff, rect, 1.0);
            surface.draw_sprite(Sprite::LampOn, rect, level.alpha());
        }
        DeviceId::Chandelier => {
            surface.draw_sprite(Sprite::ChandelierOff, rect, 1.0);
            surface.draw_sprite(Sprite::ChandelierOn, rect, level.alpha());
        }
        DeviceId::Tv => {
            let sprite = if level > Level::MIN {
                Sprite::TvOn
            } else {
                Sprite::TvOff
            };
            surface.draw_sprite(sprite, rect, 1.0);
        }
        DeviceId::HeatingSetpoint => surface.draw_sprite(Sprite::Heating, rect, level.alpha()),
        DeviceId::HeatingActual | DeviceId::Alarm => (),
    }
}
