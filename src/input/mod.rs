// src/input/mod.rs
use std::collections::{HashMap, VecDeque};
use glam::{IVec2, Vec2};
use winit::event::{ElementState, ModifiersState, MouseButton, VirtualKeyCode, WindowEvent};

pub const GAME_SCREEN_WIDTH: u32 = 320;
pub const GAME_SCREEN_HEIGHT: u32 = 200;

/// Discrete engine commands produced by the shortcut keymap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SkyAction {
    #[default]
    None,
    ToggleFastMode,
    ToggleReallyFastMode,
    OpenControlPanel,
    Skip,
    SkipLine,
    Pause,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyInfo {
    pub keycode: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
}

impl PointerButton {
    /// Button numbering used by the game's mouse handler.
    pub fn game_number(self) -> u16 {
        match self {
            PointerButton::Left => 2,
            PointerButton::Right => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    CustomActionStart(SkyAction),
    KeyDown(KeyInfo),
    MouseMove { x: i32, y: i32 },
    MouseButtonDown { button: PointerButton, x: i32, y: i32 },
}

/// Non-blocking event feed; `None` means the queue is drained.
pub trait EventSource {
    fn poll_event(&mut self) -> Option<EngineEvent>;
}

impl EventSource for VecDeque<EngineEvent> {
    fn poll_event(&mut self) -> Option<EngineEvent> {
        self.pop_front()
    }
}

/// Collects winit window events and replays them as engine events.
pub struct WindowInput {
    queue: VecDeque<EngineEvent>,
    keymap: HashMap<(VirtualKeyCode, bool), SkyAction>,
    modifiers: ModifiersState,
    window_size: Vec2,
    cursor: IVec2,
}

impl WindowInput {
    pub fn new(window_width: u32, window_height: u32) -> Self {
        let mut input = Self {
            queue: VecDeque::new(),
            keymap: HashMap::new(),
            modifiers: ModifiersState::empty(),
            window_size: Vec2::new(window_width as f32, window_height as f32),
            cursor: IVec2::ZERO,
        };
        input.setup_default_mappings();
        input
    }

    pub fn map_key(&mut self, key: VirtualKeyCode, ctrl: bool, action: SkyAction) {
        self.keymap.insert((key, ctrl), action);
    }

    pub fn setup_default_mappings(&mut self) {
        self.map_key(VirtualKeyCode::F5, false, SkyAction::OpenControlPanel);
        self.map_key(VirtualKeyCode::Escape, false, SkyAction::Skip);
        self.map_key(VirtualKeyCode::Period, false, SkyAction::SkipLine);
        self.map_key(VirtualKeyCode::P, false, SkyAction::Pause);
        self.map_key(VirtualKeyCode::F, true, SkyAction::ToggleFastMode);
        self.map_key(VirtualKeyCode::G, true, SkyAction::ToggleReallyFastMode);
    }

    pub fn translate_key(&self, key: VirtualKeyCode, ctrl: bool) -> EngineEvent {
        match self.keymap.get(&(key, ctrl)) {
            Some(action) => EngineEvent::CustomActionStart(*action),
            None => EngineEvent::KeyDown(KeyInfo { keycode: key as u32 }),
        }
    }

    /// Maps window pixels onto the 320x200 game screen.
    pub fn to_game_coords(&self, position: Vec2) -> IVec2 {
        let game = Vec2::new(GAME_SCREEN_WIDTH as f32, GAME_SCREEN_HEIGHT as f32);
        let scaled = position * game / self.window_size.max(Vec2::ONE);
        scaled
            .floor()
            .as_ivec2()
            .clamp(IVec2::ZERO, game.as_ivec2() - IVec2::ONE)
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::Resized(size) => {
                self.window_size = Vec2::new(size.width as f32, size.height as f32);
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = *modifiers;
            }
            WindowEvent::KeyboardInput { input, .. } => {
                if let (ElementState::Pressed, Some(key)) = (input.state, input.virtual_keycode) {
                    let event = self.translate_key(key, self.modifiers.ctrl());
                    self.queue.push_back(event);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = self.to_game_coords(Vec2::new(position.x as f32, position.y as f32));
                self.queue.push_back(EngineEvent::MouseMove {
                    x: self.cursor.x,
                    y: self.cursor.y,
                });
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button,
                ..
            } => {
                let button = match button {
                    MouseButton::Left => PointerButton::Left,
                    MouseButton::Right => PointerButton::Right,
                    _ => return,
                };
                self.queue.push_back(EngineEvent::MouseButtonDown {
                    button,
                    x: self.cursor.x,
                    y: self.cursor.y,
                });
            }
            _ => {}
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl EventSource for WindowInput {
    fn poll_event(&mut self) -> Option<EngineEvent> {
        self.queue.pop_front()
    }
}
