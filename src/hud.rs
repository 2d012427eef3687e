//! HUD state
//!
//! The timer text, the restart button and the on-screen key indicators. The
//! DOM side only copies these values into elements.

use serde::{Deserialize, Serialize};

use crate::format_seconds;
use crate::sim::run::{RunPhase, RunState};

/// Player controls shown on the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Control {
    Forward,
    Backward,
    Leftward,
    Rightward,
    Jump,
}

impl Control {
    /// Map a `KeyboardEvent.code` to a control (arrows or WASD, space to jump)
    pub fn from_key_code(code: &str) -> Option<Self> {
        match code {
            "ArrowUp" | "KeyW" => Some(Control::Forward),
            "ArrowDown" | "KeyS" => Some(Control::Backward),
            "ArrowLeft" | "KeyA" => Some(Control::Leftward),
            "ArrowRight" | "KeyD" => Some(Control::Rightward),
            "Space" => Some(Control::Jump),
            _ => None,
        }
    }
}

/// Which controls are currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub forward: bool,
    pub backward: bool,
    pub leftward: bool,
    pub rightward: bool,
    pub jump: bool,
}

impl Controls {
    pub fn set(&mut self, control: Control, pressed: bool) {
        match control {
            Control::Forward => self.forward = pressed,
            Control::Backward => self.backward = pressed,
            Control::Leftward => self.leftward = pressed,
            Control::Rightward => self.rightward = pressed,
            Control::Jump => self.jump = pressed,
        }
    }

    /// Key event from the host. Returns false for keys that are not controls.
    pub fn handle_key(&mut self, code: &str, pressed: bool) -> bool {
        match Control::from_key_code(code) {
            Some(control) => {
                self.set(control, pressed);
                true
            }
            None => false,
        }
    }

    pub fn any_active(&self) -> bool {
        self.forward || self.backward || self.leftward || self.rightward || self.jump
    }
}

/// Everything the HUD displays for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    /// Seconds with two decimals
    pub time: String,
    pub show_restart: bool,
    pub controls: Controls,
}

impl HudSnapshot {
    pub fn new(run: &RunState, controls: Controls, now_ms: f64) -> Self {
        Self {
            time: format_seconds(run.elapsed_secs(now_ms)),
            show_restart: run.phase == RunPhase::Ended,
            controls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::run::RunEvent;

    #[test]
    fn test_timer_text() {
        let mut run = RunState::new();
        let hud = HudSnapshot::new(&run, Controls::default(), 123_456.0);
        assert_eq!(hud.time, "0.00");
        assert!(!hud.show_restart);

        run.apply(RunEvent::Start { at_ms: 1_000.0 });
        assert_eq!(HudSnapshot::new(&run, Controls::default(), 2_234.0).time, "1.23");

        run.apply(RunEvent::Finish { at_ms: 11_500.0 });
        let hud = HudSnapshot::new(&run, Controls::default(), 50_000.0);
        assert_eq!(hud.time, "10.50");
        assert!(hud.show_restart);
    }

    #[test]
    fn test_key_mapping() {
        let mut controls = Controls::default();
        assert!(!controls.any_active());

        assert!(controls.handle_key("KeyW", true));
        assert!(controls.handle_key("ArrowLeft", true));
        assert!(controls.handle_key("Space", true));
        assert!(!controls.handle_key("KeyQ", true));
        assert_eq!(
            controls,
            Controls {
                forward: true,
                leftward: true,
                jump: true,
                ..Controls::default()
            }
        );

        controls.handle_key("ArrowUp", false);
        controls.handle_key("KeyA", false);
        controls.handle_key("Space", false);
        assert!(!controls.any_active());
    }
}
