use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Scrollbar,
        ScrollbarOrientation, ScrollbarState, Tabs, Wrap,
    },
};

use folio_core::profile::PROFILE;
use folio_core::showcase::{CASE_STUDIES, PRINCIPLES, SKILLS};
use folio_core::ChatRole;

use crate::app::{App, InputMode, Screen};
use crate::config::Theme;

struct Palette {
    accent: Color,
    text: Color,
    muted: Color,
    bg: Color,
    bar: Color,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette {
            accent: Color::Rgb(0x38, 0xF2, 0xFF),
            text: Color::Rgb(0xE6, 0xEA, 0xF2),
            muted: Color::Rgb(0x9A, 0xA4, 0xBF),
            bg: Color::Rgb(0x05, 0x05, 0x05),
            bar: Color::DarkGray,
        },
        Theme::Light => Palette {
            accent: Color::Blue,
            text: Color::Black,
            muted: Color::DarkGray,
            bg: Color::White,
            bar: Color::Gray,
        },
    }
}

/// Turns `**bold**` spans into styled text. Unbalanced markers are left as-is.
fn markdown_line(text: &str) -> Line<'static> {
    let (indent, body) = match text.trim_start().strip_prefix("* ") {
        Some(rest) => ("• ", rest),
        None => ("", text),
    };

    let segments: Vec<&str> = body.split("**").collect();
    if segments.len() % 2 == 0 {
        return Line::from(format!("{}{}", indent, body));
    }

    let mut spans: Vec<Span<'static>> = Vec::new();
    if !indent.is_empty() {
        spans.push(Span::raw(indent));
    }
    for (i, segment) in segments.into_iter().enumerate() {
        if segment.is_empty() {
            continue;
        }
        if i % 2 == 1 {
            spans.push(Span::styled(segment.to_string(), Style::default().add_modifier(Modifier::BOLD)));
        } else {
            spans.push(Span::raw(segment.to_string()));
        }
    }
    Line::from(spans)
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    let colors = palette(app.theme);
    frame.render_widget(Block::default().style(Style::default().bg(colors.bg)), area);

    if app.is_booting() {
        render_boot_screen(app, frame, area, &colors);
        return;
    }

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area, &colors);

    match app.screen {
        Screen::Home => render_home_screen(app, frame, body_area, &colors),
        Screen::Skills => render_skills_screen(app, frame, body_area, &colors),
        Screen::Projects => render_projects_screen(app, frame, body_area, &colors),
        Screen::Contact => render_contact_screen(frame, body_area, &colors),
        Screen::Boot => {}
    }

    render_footer(app, frame, footer_area, &colors);

    if app.chat_open {
        render_chat_panel(app, frame, body_area, &colors);
    }
}

fn render_boot_screen(app: &App, frame: &mut Frame, area: Rect, colors: &Palette) {
    let [_, column, _] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(44),
        Constraint::Min(0),
    ])
    .areas(area);
    let [_, status_area, gauge_area, log_area, _] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(6),
        Constraint::Min(0),
    ])
    .areas(column);

    let status = Line::from(vec![
        Span::styled("SYSTEM BOOT", Style::default().fg(colors.accent).bold()),
        Span::raw(" "),
        Span::styled(format!("{}%", app.boot_progress), Style::default().fg(colors.accent)),
    ]);
    frame.render_widget(Paragraph::new(status), status_area);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(colors.accent).bg(colors.bar))
        .percent(app.boot_progress.min(100) as u16)
        .label("");
    frame.render_widget(gauge, gauge_area);

    let lines: Vec<Line> = app
        .boot_lines
        .iter()
        .map(|line| Line::styled(format!("> {}", line), Style::default().fg(colors.muted)))
        .collect();
    frame.render_widget(Paragraph::new(lines), log_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect, colors: &Palette) {
    let [title_area, tabs_area] = Layout::horizontal([
        Constraint::Length(26),
        Constraint::Min(0),
    ])
    .areas(area);

    let title = Line::from(vec![
        Span::styled(" AK.SYS ", Style::default().fg(colors.accent).bold()),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(colors.muted),
        ),
    ]);
    frame.render_widget(Paragraph::new(title), title_area);

    let titles: Vec<String> = Screen::TABS
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{} {}", i + 1, s.title()))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.screen.tab_index().unwrap_or(0))
        .style(Style::default().fg(colors.muted))
        .highlight_style(Style::default().fg(colors.accent).bold());
    frame.render_widget(tabs, tabs_area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect, colors: &Palette) {
    let key_style = Style::default().bg(colors.bar).fg(Color::White);
    let label_style = Style::default().fg(colors.text);

    let hints: Vec<(&str, &str)> = match (app.chat_open, app.input_mode) {
        (true, InputMode::Editing) => vec![
            ("Enter", "send"),
            ("↑/↓", "scroll"),
            ("Esc", "close"),
        ],
        _ => vec![
            ("Tab", "next"),
            ("1-4", "jump"),
            ("j/k", "move"),
            ("c", "ask AI"),
            ("t", "theme"),
            ("q", "quit"),
        ],
    };

    let mut spans = Vec::new();
    for (key, label) in hints {
        spans.push(Span::styled(format!(" {} ", key), key_style));
        spans.push(Span::styled(format!(" {} ", label), label_style));
    }
    if app.is_waiting() {
        spans.push(Span::styled(" AI busy ", Style::default().fg(colors.accent).italic()));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn section_title(text: &str, colors: &Palette) -> Line<'static> {
    Line::styled(text.to_string(), Style::default().fg(colors.accent).bold())
}

fn render_home_screen(app: &App, frame: &mut Frame, area: Rect, colors: &Palette) {
    let mut lines = vec![
        Line::default(),
        Line::styled("ENGINEERING SYSTEMS.", Style::default().fg(colors.text).bold()),
        Line::styled(
            format!("{} · {}", PROFILE.name, PROFILE.education),
            Style::default().fg(colors.muted),
        ),
        Line::default(),
        Line::from(vec![
            Span::styled("My work sits at the intersection of ", Style::default().fg(colors.muted)),
            Span::styled("software engineering", Style::default().fg(colors.text).underlined()),
            Span::styled(" and ", Style::default().fg(colors.muted)),
            Span::styled("intelligent systems", Style::default().fg(colors.text).underlined()),
            Span::styled(".", Style::default().fg(colors.muted)),
        ]),
        Line::default(),
        section_title("PRINCIPLES", colors),
    ];

    for principle in PRINCIPLES {
        lines.push(Line::default());
        lines.push(Line::styled(format!("◆ {}", principle.title), Style::default().fg(colors.text).bold()));
        lines.push(Line::styled(format!("  {}", principle.description), Style::default().fg(colors.muted)));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(colors.bar)))
        .wrap(Wrap { trim: false })
        .scroll((app.content_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_skills_screen(app: &App, frame: &mut Frame, area: Rect, colors: &Palette) {
    let mut lines = vec![Line::default()];
    for skill in SKILLS {
        lines.push(section_title(&skill.category.to_uppercase(), colors));
        lines.push(Line::styled(
            format!("  {}", skill.items.join("  ·  ")),
            Style::default().fg(colors.text),
        ));
        lines.push(Line::default());
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.bar))
                .title(" TECHNICAL ARSENAL "),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.content_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_projects_screen(app: &mut App, frame: &mut Frame, area: Rect, colors: &Palette) {
    let [list_area, detail_area] = Layout::horizontal([
        Constraint::Length(32),
        Constraint::Min(0),
    ])
    .areas(area);

    let items: Vec<ListItem> = CASE_STUDIES
        .iter()
        .map(|study| ListItem::new(format!("{}  {}", study.id, study.title)))
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.bar))
                .title(" SYSTEM CASE STUDIES "),
        )
        .style(Style::default().fg(colors.text))
        .highlight_style(Style::default().fg(colors.accent).add_modifier(Modifier::BOLD))
        .highlight_symbol("▶ ");
    frame.render_stateful_widget(list, list_area, &mut app.project_state);

    let Some(study) = app.project_state.selected().and_then(|i| CASE_STUDIES.get(i)) else {
        return;
    };

    let label = |text: &str| Span::styled(format!("{:<14}", text), Style::default().fg(colors.muted));
    let lines = vec![
        Line::styled(study.title.to_string(), Style::default().fg(colors.text).bold()),
        Line::styled(study.role.to_string(), Style::default().fg(colors.accent)),
        Line::default(),
        Line::from(vec![label("OUTCOME"), Span::styled(study.outcome, Style::default().fg(colors.text).bold())]),
        Line::default(),
        Line::from(vec![label("CONSTRAINT"), Span::styled(study.constraint, Style::default().fg(colors.text))]),
        Line::default(),
        Line::from(vec![label("ARCHITECTURE"), Span::styled(study.architecture, Style::default().fg(colors.text))]),
        Line::default(),
        Line::from(vec![label("STACK"), Span::styled(study.tech.join(", "), Style::default().fg(colors.text))]),
        Line::from(vec![label("LINK"), Span::styled(study.link, Style::default().fg(colors.accent).underlined())]),
    ];

    let detail = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(colors.bar)))
        .wrap(Wrap { trim: true });
    frame.render_widget(detail, detail_area);
}

fn render_contact_screen(frame: &mut Frame, area: Rect, colors: &Palette) {
    let lines = vec![
        Line::default(),
        Line::styled("SYSTEMS READY.", Style::default().fg(colors.text).bold()),
        Line::styled(
            "Open to roles and collaborations where reliability matters.",
            Style::default().fg(colors.muted),
        ),
        Line::default(),
        Line::from(vec![
            Span::styled("EMAIL  ", Style::default().fg(colors.muted)),
            Span::styled(PROFILE.email, Style::default().fg(colors.accent)),
        ]),
        Line::from(vec![
            Span::styled("PHONE  ", Style::default().fg(colors.muted)),
            Span::styled(PROFILE.phone, Style::default().fg(colors.accent)),
        ]),
        Line::from(vec![
            Span::styled("GITHUB ", Style::default().fg(colors.muted)),
            Span::styled("github.com/AK47GT18", Style::default().fg(colors.accent)),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(colors.bar)));
    frame.render_widget(paragraph, area);
}

fn render_chat_panel(app: &mut App, frame: &mut Frame, area: Rect, colors: &Palette) {
    // Dock on the right, like the floating widget it replaces
    let width = (area.width / 2).max(40).min(area.width);
    let panel = Rect {
        x: area.x + area.width - width,
        y: area.y,
        width,
        height: area.height,
    };
    frame.render_widget(Clear, panel);

    let [chat_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(panel);

    // Inner size for wrap/scroll calculations (minus borders)
    app.chat_height = chat_area.height.saturating_sub(2);
    app.chat_width = chat_area.width.saturating_sub(2);

    let mut lines: Vec<Line> = Vec::new();
    for msg in app.session.transcript().messages() {
        let (label, style) = match msg.role {
            ChatRole::User => ("Operator", Style::default().fg(colors.text).bold()),
            ChatRole::Assistant => ("AI_System", Style::default().fg(colors.accent).bold()),
        };
        lines.push(Line::styled(label, style));
        for line in msg.text.lines() {
            lines.push(markdown_line(line));
        }
        lines.push(Line::default());
    }
    if app.is_waiting() {
        let dots = ".".repeat(app.animation_frame as usize + 1);
        lines.push(Line::styled("AI_System", Style::default().fg(colors.accent).bold()));
        lines.push(Line::styled(format!("Processing{}", dots), Style::default().fg(colors.muted).italic()));
    }

    let total_lines = lines.len();
    let chat = Paragraph::new(Text::from(lines))
        .style(Style::default().fg(colors.text).bg(colors.bg))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.accent))
                .title(" AI_TERMINAL "),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.chat_scroll, 0));
    frame.render_widget(chat, chat_area);

    let mut scrollbar_state = ScrollbarState::new(total_lines).position(app.chat_scroll as usize);
    frame.render_stateful_widget(
        Scrollbar::new(ScrollbarOrientation::VerticalRight),
        chat_area,
        &mut scrollbar_state,
    );

    let (input_text, input_style) = if app.is_waiting() {
        ("waiting for reply...".to_string(), Style::default().fg(colors.muted).italic())
    } else {
        (app.chat_input.clone(), Style::default().fg(colors.text))
    };
    let input = Paragraph::new(input_text)
        .style(input_style.bg(colors.bg))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.bar))
                .title(" Ask about projects, stack, experience "),
        );
    frame.render_widget(input, input_area);

    if app.input_mode == InputMode::Editing && !app.is_waiting() {
        let cursor_x = input_area.x + 1 + app.chat_cursor as u16;
        let max_x = input_area.x + input_area.width.saturating_sub(2);
        frame.set_cursor_position((cursor_x.min(max_x), input_area.y + 1));
    }
}
