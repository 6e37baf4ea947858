/// One accelerometer sample, raw counts per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Acceleration {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl Acceleration {
    pub const AXIS_MASK: i16 = 0x0FFF;

    /// Axes with the top nibble cleared, as the app expects on the wire.
    pub fn masked(self) -> Acceleration {
        Acceleration {
            x: self.x & Self::AXIS_MASK,
            y: self.y & Self::AXIS_MASK,
            z: self.z & Self::AXIS_MASK,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioPin {
    Gpio1,
    Gpio2,
}

/// Sensors and actuators the bridge reads and drives.
///
/// Levels are reported the way the pins see them. The push button and the
/// data LED are both active low, so `read_button` is `true` while released
/// and `data_led_output` is `true` while the LED is dark. The error LED is
/// driven through a logical on/off flag.
pub trait Board {
    fn read_button(&mut self) -> bool;

    fn read_gpio(&mut self, pin: GpioPin) -> bool;

    fn read_temperature(&mut self) -> i16;

    fn read_acceleration(&mut self) -> Acceleration;

    fn data_led_output(&mut self) -> bool;

    fn set_data_led_output(&mut self, high: bool);

    fn error_led(&mut self) -> bool;

    fn set_error_led(&mut self, on: bool);

    fn set_data_led(&mut self, on: bool) {
        self.set_data_led_output(!on);
    }
}
