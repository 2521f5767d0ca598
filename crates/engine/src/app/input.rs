use super::world::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Fire,
    SwitchAbility,
    SummonAlly,
}

const ACTION_COUNT: usize = 7;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::MoveUp => 0,
            InputAction::MoveDown => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
            InputAction::Fire => 4,
            InputAction::SwitchAbility => 5,
            InputAction::SummonAlly => 6,
        }
    }
}

/// Per-tick view of command input: held states plus one-tick edges.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    actions: ActionStates,
    switch_ability_pressed: bool,
    summon_pressed: bool,
    fire_pressed: bool,
    fire_released: bool,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn fire_held(&self) -> bool {
        self.actions.is_down(InputAction::Fire)
    }

    /// True on the tick after fire went down, even if it was let go again
    /// before that tick ran.
    pub fn fire_pressed(&self) -> bool {
        self.fire_pressed
    }

    pub fn fire_released(&self) -> bool {
        self.fire_released
    }

    pub fn switch_ability_pressed(&self) -> bool {
        self.switch_ability_pressed
    }

    pub fn summon_pressed(&self) -> bool {
        self.summon_pressed
    }

    pub fn move_direction(&self) -> Vec2 {
        let mut direction = Vec2::ZERO;
        if self.is_down(InputAction::MoveRight) {
            direction.x += 1.0;
        }
        if self.is_down(InputAction::MoveLeft) {
            direction.x -= 1.0;
        }
        if self.is_down(InputAction::MoveUp) {
            direction.y += 1.0;
        }
        if self.is_down(InputAction::MoveDown) {
            direction.y -= 1.0;
        }
        direction
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_switch_ability_pressed(mut self, pressed: bool) -> Self {
        self.switch_ability_pressed = pressed;
        self
    }

    pub fn with_summon_pressed(mut self, pressed: bool) -> Self {
        self.summon_pressed = pressed;
        self
    }

    pub fn with_fire_pressed(mut self, pressed: bool) -> Self {
        self.fire_pressed = pressed;
        self
    }

    pub fn with_fire_released(mut self, released: bool) -> Self {
        self.fire_released = released;
        self
    }
}

/// Folds press/release transitions into per-tick snapshots.
///
/// Edges are latched until the next [`InputCollector::snapshot_for_tick`] so a
/// press and release landing between two ticks is still observed once.
#[derive(Debug, Default)]
pub struct InputCollector {
    action_states: ActionStates,
    switch_ability_pressed_edge: bool,
    summon_pressed_edge: bool,
    fire_pressed_edge: bool,
    fire_released_edge: bool,
}

impl InputCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_action(&mut self, action: InputAction, is_down: bool) {
        let was_down = self.action_states.is_down(action);
        match action {
            InputAction::SwitchAbility => {
                if is_down && !was_down {
                    self.switch_ability_pressed_edge = true;
                }
            }
            InputAction::SummonAlly => {
                if is_down && !was_down {
                    self.summon_pressed_edge = true;
                }
            }
            InputAction::Fire => {
                if is_down && !was_down {
                    self.fire_pressed_edge = true;
                }
                if !is_down && was_down {
                    self.fire_released_edge = true;
                }
            }
            InputAction::MoveUp
            | InputAction::MoveDown
            | InputAction::MoveLeft
            | InputAction::MoveRight => {}
        }
        self.action_states.set(action, is_down);
    }

    pub fn release_all(&mut self) {
        for action in [
            InputAction::MoveUp,
            InputAction::MoveDown,
            InputAction::MoveLeft,
            InputAction::MoveRight,
            InputAction::Fire,
            InputAction::SwitchAbility,
            InputAction::SummonAlly,
        ] {
            self.handle_action(action, false);
        }
    }

    pub fn snapshot_for_tick(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot {
            actions: self.action_states,
            switch_ability_pressed: self.switch_ability_pressed_edge,
            summon_pressed: self.summon_pressed_edge,
            fire_pressed: self.fire_pressed_edge,
            fire_released: self.fire_released_edge,
        };
        self.switch_ability_pressed_edge = false;
        self.summon_pressed_edge = false;
        self.fire_pressed_edge = false;
        self.fire_released_edge = false;
        snapshot
    }
}
