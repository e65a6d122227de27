use std::io::{stdin, BufRead};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use easel_core::{InputEvent, KeyCode, Surface};

/// 逐行打印的"画布"
pub struct TerminalSurface {
    width: f32,
    height: f32,
    focused: bool,
}

impl TerminalSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height, focused: true }
    }
}

impl Surface for TerminalSurface {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        println!("{}", "-".repeat(self.width as usize));
    }

    fn draw_text(&mut self, text: &str, x: f32, _y: f32) {
        println!("{}{}", " ".repeat(x.max(0.0) as usize), text);
    }

    fn request_focus(&mut self) {
        if !self.focused {
            log::debug!("Terminal surface regained focus");
        }
        self.focused = true;
    }
}

pub enum Command {
    Input(InputEvent),
    Quit,
}

/// 解析一行终端输入
pub fn parse_command(line: &str) -> Option<Command> {
    let mut parts = line.split_whitespace();
    let head = parts.next()?;
    let mut coord = || parts.next().and_then(|v| v.parse::<f32>().ok()).unwrap_or(0.0);

    let event = match head {
        "quit" | "q" => return Some(Command::Quit),
        "click" => InputEvent::Click { x: coord(), y: coord() },
        "move" => InputEvent::MouseMove { x: coord(), y: coord() },
        "focus" => InputEvent::Focus,
        "blur" => InputEvent::Blur,
        "enter" => InputEvent::KeyDown(KeyCode::Enter),
        "esc" => InputEvent::KeyDown(KeyCode::Escape),
        "tab" => InputEvent::KeyDown(KeyCode::Tab),
        "up" => InputEvent::KeyDown(KeyCode::Up),
        "down" => InputEvent::KeyDown(KeyCode::Down),
        "left" => InputEvent::KeyDown(KeyCode::Left),
        "right" => InputEvent::KeyDown(KeyCode::Right),
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => InputEvent::KeyPress(ch),
                _ => {
                    log::warn!("Unknown command: '{}'", other);
                    return None;
                }
            }
        }
    };
    Some(Command::Input(event))
}

/// 后台线程读 stdin，主循环用 try_recv 取，不会阻塞
pub fn spawn_input() -> Receiver<Command> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in stdin().lock().lines() {
            let Ok(line) = line else { break };
            if let Some(cmd) = parse_command(&line) {
                if tx.send(cmd).is_err() {
                    break;
                }
            }
        }
        // stdin 关闭等同于退出
        let _ = tx.send(Command::Quit);
    });
    rx
}
