use crate::art::CardArt;
use crate::render;
use crossterm::{
    cursor,
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::StreamExt;
use high_low_core::{
    InputReducer, KeyCommand, Point, PointerEvent, Regions, RoundState, Settings, apply_intent, build_scene,
    new_game, tick,
};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use tui::{Terminal, backend::CrosstermBackend};

/// 目标帧率 60 Hz
const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

type Term = Terminal<CrosstermBackend<Stdout>>;

/// 持有终端，离开作用域时恢复终端设置
struct TerminalGuard {
    terminal: Term,
}

impl TerminalGuard {
    fn enter() -> io::Result<TerminalGuard> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(TerminalGuard { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            warn!("恢复终端模式失败: {}", e);
        }
        if let Err(e) = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen, cursor::Show) {
            warn!("恢复终端屏幕失败: {}", e);
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Control {
    Continue,
    Exit,
}

/// 客户端应用：唯一持有 RoundState 的地方
struct App<A: CardArt> {
    state: RoundState,
    reducer: InputReducer,
    // 上一帧绘制时登记的可点击区域
    regions: Regions,
    art: A,
    started: Instant,
}

impl<A: CardArt> App<A> {
    fn new(settings: Settings, art: A) -> Self {
        App {
            state: new_game(settings),
            reducer: InputReducer::default(),
            regions: Regions::new(),
            art,
            started: Instant::now(),
        }
    }

    /// 一帧：推进动画，然后重绘
    fn frame(&mut self, terminal: &mut Term) -> io::Result<()> {
        tick(&mut self.state);

        let scene = build_scene(&self.state.snapshot(), &self.reducer, self.started.elapsed());
        let mut regions = Regions::new();
        terminal.draw(|f| regions = render::draw_scene(f, &scene, &self.art))?;
        self.regions = regions;
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Control {
        let now = Instant::now();
        let snapshot = self.state.snapshot();

        let intent = match event {
            Event::Key(key) => {
                if is_exit(&key) {
                    return Control::Exit;
                }
                match key_command(&key) {
                    Some(command) => self.reducer.reduce_key(command, now, &snapshot),
                    None => None,
                }
            }
            Event::Mouse(mouse) => match pointer_event(&mouse) {
                Some(pointer) => self.reducer.reduce(pointer, now, &snapshot, &self.regions),
                None => None,
            },
            _ => None,
        };

        if let Some(intent) = intent {
            apply_intent(&mut self.state, intent);
        }
        Control::Continue
    }
}

/// 主循环
///
/// 单线程协作式：定时器驱动每一帧，终端事件在两帧之间处理。
pub async fn run<A: CardArt>(settings: Settings, art: A) -> anyhow::Result<()> {
    let mut guard = TerminalGuard::enter()?;
    let mut app = App::new(settings, art);
    let mut events = EventStream::new();
    let mut frames = tokio::time::interval(FRAME_INTERVAL);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!("进入游戏主循环");
    loop {
        tokio::select! {
            _ = frames.tick() => {
                app.frame(&mut guard.terminal)?;
            }
            event = events.next() => match event {
                Some(Ok(event)) => {
                    if app.handle_event(event) == Control::Exit {
                        break;
                    }
                }
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
        }
    }
    info!("退出游戏: 资金 {}, 奖池 {}", app.state.player_money, app.state.pot);
    Ok(())
}

// --- 终端事件 -> 输入层事件 ---

fn is_exit(key: &KeyEvent) -> bool {
    key.kind == KeyEventKind::Press
        && (key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)))
}

fn key_command(key: &KeyEvent) -> Option<KeyCommand> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('h') | KeyCode::Char('H') => Some(KeyCommand::Higher),
        KeyCode::Char('l') | KeyCode::Char('L') => Some(KeyCommand::Lower),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(KeyCommand::Pass),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(KeyCommand::Quit),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(KeyCommand::Restart),
        KeyCode::Enter | KeyCode::Char(' ') => Some(KeyCommand::Confirm),
        KeyCode::Right | KeyCode::Up | KeyCode::Char('+') | KeyCode::Char('=') => Some(KeyCommand::IncreaseBet),
        KeyCode::Left | KeyCode::Down | KeyCode::Char('-') => Some(KeyCommand::DecreaseBet),
        _ => None,
    }
}

fn pointer_event(mouse: &MouseEvent) -> Option<PointerEvent> {
    let p = Point::new(mouse.column as i32, mouse.row as i32);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(PointerEvent::Press(p)),
        MouseEventKind::Up(MouseButton::Left) => Some(PointerEvent::Release(p)),
        MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => Some(PointerEvent::Motion(p)),
        _ => None,
    }
}
