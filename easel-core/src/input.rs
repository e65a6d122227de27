/// 画布上的原始输入事件 (逻辑坐标)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Click { x: f32, y: f32 },
    Focus,
    Blur,
    KeyPress(char),
    KeyDown(KeyCode),
    MouseMove { x: f32, y: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Enter,
    Escape,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Char(char),
}

impl InputEvent {
    pub fn name(&self) -> &'static str {
        match self {
            InputEvent::Click { .. } => "click",
            InputEvent::Focus => "focus",
            InputEvent::Blur => "blur",
            InputEvent::KeyPress(_) => "key-press",
            InputEvent::KeyDown(_) => "key-down",
            InputEvent::MouseMove { .. } => "mouse-move",
        }
    }
}
