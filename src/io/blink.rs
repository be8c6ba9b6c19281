//! LED blink sequences
//!
//! During guess entry the blink count is the only feedback the player gets
//! without looking at the LCD, so sequences always run to completion and
//! block the caller for `times * (on + off)`.

use crate::hal::{Delay, Pin, RegisterBlock};

use super::Rig;

impl<R: RegisterBlock, D: Delay> Rig<R, D> {
    /// Square wave on `pin`: `times` cycles of high/on-time, low/off-time
    pub fn blink(&self, pin: Pin, times: u32) {
        let on = self.timing().blink_on();
        let off = self.timing().blink_off();

        for _ in 0..times {
            self.write_pin(pin, true);
            self.pause(on);
            self.write_pin(pin, false);
            self.pause(off);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::hal::sim::{pin_events, PinEvent};
    use crate::io::testing::sim_rig;
    use crate::io::{GREEN_LED, RED_LED};
    use std::time::Duration;

    #[test]
    fn test_blink_cycles() {
        let (rig, trace) = sim_rig();

        rig.blink(GREEN_LED, 2);

        let ms200 = PinEvent::Delay(Duration::from_millis(200));
        let on = PinEvent::Level { pin: 26, high: true };
        let off = PinEvent::Level { pin: 26, high: false };
        assert_eq!(
            pin_events(&trace.snapshot()),
            vec![on, ms200, off, ms200, on, ms200, off, ms200]
        );
    }

    #[test]
    fn test_zero_blinks_is_silent() {
        let (rig, trace) = sim_rig();
        rig.blink(RED_LED, 0);
        assert!(trace.snapshot().is_empty());
    }
}
