#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
}

const ACTION_COUNT: usize = 4;

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
        }
    }
}

/// Input state handed to a scene once per frame.
///
/// Held actions reflect the key state at the moment the snapshot was taken.
/// `attack_pressed` is an edge: it is true for exactly one snapshot after a
/// released-to-pressed transition of the attack key.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    attack_pressed: bool,
    actions: ActionStates,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(attack_pressed: bool, actions: ActionStates) -> Self {
        Self {
            attack_pressed,
            actions,
        }
    }

    pub fn attack_pressed(&self) -> bool {
        self.attack_pressed
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_attack_pressed(mut self, attack_pressed: bool) -> Self {
        self.attack_pressed = attack_pressed;
        self
    }
}
