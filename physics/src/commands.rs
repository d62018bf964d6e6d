use serde::{Deserialize, Serialize};

use crate::{ControlState, TankId};

/// A discrete operator input, queued by a driver and applied between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimCommand {
    SetControlState {
        state: ControlState,
        #[serde(default)]
        override_lock: bool,
    },
    SetManualTarget {
        tank: TankId,
        proportion: f32,
    },
    SetAutoMode {
        enabled: bool,
    },
    ToggleAutoMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        command: SimCommand,
    }

    #[test]
    fn parses_tagged_commands() {
        let w: Wrapper = toml::from_str(
            r#"command = { kind = "set_control_state", state = "emergency_surface" }"#,
        )
        .expect("parse");
        assert_eq!(
            w.command,
            SimCommand::SetControlState { state: ControlState::EmergencySurface, override_lock: false }
        );

        let w: Wrapper =
            toml::from_str(r#"command = { kind = "set_manual_target", tank = "aft", proportion = 0.4 }"#)
                .expect("parse");
        assert_eq!(w.command, SimCommand::SetManualTarget { tank: TankId::Aft, proportion: 0.4 });

        let w: Wrapper = toml::from_str(r#"command = { kind = "toggle_auto_mode" }"#).expect("parse");
        assert_eq!(w.command, SimCommand::ToggleAutoMode);
    }

    #[test]
    fn rejects_unknown_state() {
        let r: Result<Wrapper, _> =
            toml::from_str(r#"command = { kind = "set_control_state", state = "hover" }"#);
        assert!(r.is_err());
    }
}
