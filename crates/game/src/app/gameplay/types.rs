const TILE_SIZE: f32 = 32.0;
const SWORD_HIT_BOX_WIDTH: f32 = 8.0;
const BLADE_SEGMENT_PX: f32 = 4.0;

const BACKGROUND_COLOR: Rgba = [0, 0, 0, 255];
const PLAYER_COLOR: Rgba = [0, 255, 255, 255];
const ENEMY_COLOR: Rgba = [255, 0, 0, 255];
const SWORD_HILT_COLOR: Rgba = [0x8B, 0x45, 0x13, 255];
const SWORD_BLADE_COLOR: Rgba = [0xFF, 0xD7, 0x00, 255];
const HUD_TEXT_COLOR: Rgba = [255, 255, 255, 255];
const HUD_TEXT_POSITION_PX: Vec2 = Vec2 { x: 10.0, y: 5.0 };

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Facing {
    Up,
    Down,
    Left,
    Right,
}

impl Facing {
    fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    /// Left and up swings turn the other way so every swing sweeps outward.
    fn swing_sign(self) -> f32 {
        match self {
            Self::Left | Self::Up => -1.0,
            Self::Down | Self::Right => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Sword {
    angle: f32,
    max_angle: f32,
    angular_speed: f32,
    length: f32,
}

impl Sword {
    fn new(max_angle: f32, angular_speed: f32, length: f32) -> Self {
        Self {
            angle: 0.0,
            max_angle,
            angular_speed,
            length,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum SwordState {
    #[default]
    Inactive,
    Active(Sword),
}

impl SwordState {
    /// Starts `swing` unless one is already in progress. Returns whether a
    /// new swing started.
    fn request_attack(&mut self, swing: Sword) -> bool {
        match self {
            Self::Inactive => {
                *self = Self::Active(swing);
                true
            }
            Self::Active(_) => false,
        }
    }

    /// Moves the swing forward one frame. Returns true on the frame the swing
    /// finishes.
    fn advance(&mut self) -> bool {
        let Self::Active(sword) = self else {
            return false;
        };

        sword.angle += sword.angular_speed;
        if sword.angle >= sword.max_angle {
            *self = Self::Inactive;
            return true;
        }
        false
    }

    fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    fn active(&self) -> Option<&Sword> {
        match self {
            Self::Active(sword) => Some(sword),
            Self::Inactive => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PixelRect {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl PixelRect {
    fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Strict overlap: rectangles that only share an edge do not collide.
    fn overlaps(&self, other: &PixelRect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

#[derive(Debug, Clone)]
struct Player {
    /// Tile units.
    position: Vec2,
    width: f32,
    height: f32,
    speed: f32,
    health: f32,
    facing: Facing,
    sword: SwordState,
    swing_template: Sword,
}

impl Player {
    fn pixel_rect(&self) -> PixelRect {
        PixelRect::new(
            self.position.x * TILE_SIZE,
            self.position.y * TILE_SIZE,
            self.width,
            self.height,
        )
    }

    fn pixel_center(&self) -> Vec2 {
        Vec2::new(
            self.position.x * TILE_SIZE + self.width / 2.0,
            self.position.y * TILE_SIZE + self.height / 2.0,
        )
    }

    fn request_attack(&mut self) -> bool {
        self.sword.request_attack(self.swing_template)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Enemy {
    /// Tile units.
    position: Vec2,
    width: f32,
    height: f32,
    speed: f32,
    health: f32,
}

impl Enemy {
    fn pixel_rect(&self) -> PixelRect {
        PixelRect::new(
            self.position.x * TILE_SIZE,
            self.position.y * TILE_SIZE,
            self.width,
            self.height,
        )
    }
}

#[derive(Debug, Clone)]
struct GameState {
    player: Player,
    enemies: Vec<Enemy>,
    contact_damage: f32,
    sword_damage: f32,
}

impl GameState {
    fn from_tuning(tuning: &GameTuning) -> Self {
        let player = Player {
            position: tile_to_vec2(tuning.player_spawn_tile),
            width: tuning.player_size_px,
            height: tuning.player_size_px,
            speed: tuning.player_speed_px,
            health: tuning.player_health,
            facing: Facing::Right,
            sword: SwordState::Inactive,
            swing_template: Sword::new(
                tuning.sword_max_angle,
                tuning.sword_angular_speed,
                tuning.sword_length_px,
            ),
        };
        let enemies = tuning
            .enemy_spawn_tiles
            .iter()
            .map(|spawn| Enemy {
                position: tile_to_vec2(*spawn),
                width: tuning.enemy_size_px,
                height: tuning.enemy_size_px,
                speed: tuning.enemy_speed_px,
                health: tuning.enemy_health,
            })
            .collect();

        Self {
            player,
            enemies,
            contact_damage: tuning.contact_damage,
            sword_damage: tuning.sword_damage,
        }
    }
}

/// What happened during one update. Only read by logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct FrameReport {
    swing_started: bool,
    swing_ended: bool,
    contact_hits: u32,
    sword_hits: u32,
    enemies_removed: u32,
}

fn tile_to_vec2(tile: TilePosition) -> Vec2 {
    Vec2::new(tile.x, tile.y)
}
