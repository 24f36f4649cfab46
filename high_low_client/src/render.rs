use crate::art::CardArt;
use high_low_core::{
    Card, CardFace, MessageStyle, Region, RegionId, Regions, Scene, SliderView, slider_position,
};
use tui::{
    Frame,
    backend::Backend,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

// --- 画面布局 (单位：字符格) ---

const BOARD_WIDTH: u16 = 74;
const BOARD_HEIGHT: u16 = 22;
const CARD_WIDTH: u16 = 11;
const CARD_HEIGHT: u16 = 7;
const SLIDER_WIDTH: u16 = 40;
const BUTTON_WIDTH: u16 = 12;
const BUTTON_HEIGHT: u16 = 3;
const BUTTON_GAP: u16 = 2;
// 牌堆最多画出的叠放层数
const DECK_LAYERS: usize = 3;

const HELP: &str = "h 大  l 小  p 跳过  q 退出  r 重来  ←→ 下注  Enter 确认  Esc 关闭";

/// 绘制一帧，并返回这一帧的可点击区域
pub fn draw_scene<B: Backend>(f: &mut Frame<B>, scene: &Scene, art: &dyn CardArt) -> Regions {
    let mut regions = Regions::new();
    let area = f.size();

    if area.width < BOARD_WIDTH || area.height < BOARD_HEIGHT {
        let notice = Paragraph::new(format!("终端窗口太小，至少需要 {}x{}", BOARD_WIDTH, BOARD_HEIGHT))
            .wrap(Wrap { trim: true });
        f.render_widget(notice, area);
        return regions;
    }

    let ox = area.x + (area.width - BOARD_WIDTH) / 2;
    let oy = area.y + (area.height - BOARD_HEIGHT) / 2;
    let row = |dy: u16, height: u16| Rect::new(ox, oy + dy, BOARD_WIDTH, height);

    // 资金与奖池
    let status = Spans::from(vec![
        Span::styled(format!("你的资金: ${}", scene.player_money), Style::default().fg(Color::White)),
        Span::raw("    "),
        Span::styled(format!("奖池: ${}", scene.pot), Style::default().fg(Color::White)),
    ]);
    f.render_widget(Paragraph::new(status), row(0, 1));

    // 提示信息
    let message = Paragraph::new(scene.message.as_str())
        .style(message_style(scene.style))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(message, row(1, 3));

    // 牌堆和两个牌位
    draw_deck(f, Rect::new(ox + 2, oy + 5, CARD_WIDTH, CARD_HEIGHT), scene.deck_count, art);
    let center = ox + BOARD_WIDTH / 2;
    draw_card(f, Rect::new(center - CARD_WIDTH - 2, oy + 5, CARD_WIDTH, CARD_HEIGHT), scene.left, art);
    draw_card(f, Rect::new(center + 2, oy + 5, CARD_WIDTH, CARD_HEIGHT), scene.right, art);

    if let Some(prompt) = scene.continue_prompt {
        let text = if prompt.final_round { "点击任意位置查看结局" } else { "点击任意位置继续" };
        let glow = Color::Rgb((255.0 * prompt.pulse) as u8, (215.0 * prompt.pulse) as u8, 0);
        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(glow).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        f.render_widget(paragraph, row(13, 1));
    }

    if let Some(slider) = scene.slider {
        let track = Rect::new(ox + (BOARD_WIDTH - SLIDER_WIDTH) / 2, oy + 14, SLIDER_WIDTH, 1);
        draw_slider(f, track, slider);
        regions.insert(RegionId::BetSlider, region(track));

        let bet = Paragraph::new(format!("下注: ${}", scene.bet))
            .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        f.render_widget(bet, row(15, 1));
    }

    let buttons_width = scene.buttons.len() as u16 * (BUTTON_WIDTH + BUTTON_GAP) - BUTTON_GAP;
    let mut x = ox + (BOARD_WIDTH - buttons_width) / 2;
    for button in &scene.buttons {
        let rect = Rect::new(x, oy + 17, BUTTON_WIDTH, BUTTON_HEIGHT);
        let style = if button.enabled {
            Style::default().fg(Color::White).bg(Color::Blue).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let widget = Paragraph::new(button.label)
            .style(style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(style));
        f.render_widget(widget, rect);
        regions.insert(button.id, region(rect));
        x += BUTTON_WIDTH + BUTTON_GAP;
    }

    let help = Paragraph::new(HELP).style(Style::default().fg(Color::Gray)).alignment(Alignment::Center);
    f.render_widget(help, row(21, 1));

    regions
}

fn region(rect: Rect) -> Region {
    Region::new(rect.x as i32, rect.y as i32, rect.width as i32, rect.height as i32)
}

fn message_style(style: MessageStyle) -> Style {
    let color = match style {
        MessageStyle::Neutral => Color::White,
        MessageStyle::Win => Color::Rgb(0, 90, 220),
        MessageStyle::Lose => Color::Rgb(200, 0, 0),
        MessageStyle::Tie => Color::Rgb(180, 120, 0),
        MessageStyle::Pass => Color::Rgb(50, 120, 200),
        MessageStyle::Quit => Color::Rgb(120, 120, 120),
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn card_style(card: Card) -> Style {
    if card.suit.is_red() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::White)
    }
}

fn back_style() -> Style {
    Style::default().fg(Color::Blue)
}

fn draw_deck<B: Backend>(f: &mut Frame<B>, rect: Rect, count: usize, art: &dyn CardArt) {
    let layers = count.min(DECK_LAYERS) as u16;
    for i in 0..layers {
        let layer = Rect::new(rect.x + i, rect.y.saturating_sub(i / 2), rect.width, rect.height);
        draw_card_box(f, layer, art.back(), back_style());
    }
    let label = Paragraph::new(format!("牌堆 {}", count)).alignment(Alignment::Center);
    f.render_widget(label, Rect::new(rect.x, rect.y + rect.height, rect.width + DECK_LAYERS as u16, 1));
}

fn draw_card<B: Backend>(f: &mut Frame<B>, rect: Rect, face: CardFace, art: &dyn CardArt) {
    match face {
        CardFace::FaceDown => draw_card_box(f, rect, art.back(), back_style()),
        CardFace::FaceUp(card) => draw_card_box(f, rect, art.face(card), card_style(card)),
        CardFace::Flipping { card, face_up, width } => {
            // 侧面朝向观众时什么都不画
            let w = (rect.width as f32 * width).round() as u16;
            if w < 2 {
                return;
            }
            let narrowed = Rect::new(rect.x + (rect.width - w) / 2, rect.y, w, rect.height);
            if face_up {
                draw_card_box(f, narrowed, art.face(card), card_style(card));
            } else {
                draw_card_box(f, narrowed, art.back(), back_style());
            }
        }
    }
}

fn draw_card_box<B: Backend>(f: &mut Frame<B>, rect: Rect, lines: &[String], style: Style) {
    let text: Vec<Spans> = lines.iter().map(|line| Spans::from(Span::styled(line.clone(), style))).collect();
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded).border_style(style));
    f.render_widget(widget, rect);
}

fn draw_slider<B: Backend>(f: &mut Frame<B>, track: Rect, slider: SliderView) {
    let region = region(track);
    let knob = (slider_position(&region, slider.value, slider.max) - region.x) as usize;
    let color = if slider.dragging { Color::Red } else { Color::Blue };

    // 先画两端的数值，再把轨道覆盖在中间
    let labels = Spans::from(vec![
        Span::raw(format!("{:>4} ", slider.min)),
        Span::raw(" ".repeat(track.width as usize)),
        Span::raw(format!(" {}", slider.max)),
    ]);
    f.render_widget(Paragraph::new(labels), Rect::new(track.x - 5, track.y, track.width + 10, 1));

    let line: String = (0..track.width as usize).map(|i| if i == knob { '█' } else { '─' }).collect();
    f.render_widget(Paragraph::new(line).style(Style::default().fg(color)), track);
}
