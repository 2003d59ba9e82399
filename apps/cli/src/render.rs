use crossterm::style::{Color, Stylize};
use remote_list::{DetailView, DisplayUnit, PaginationControls, Renderer};
use std::io::{self, IsTerminal, Write};

const BAR_WIDTH: usize = 20;

/// Draws cards, detail panels and pagination as plain terminal lines.
pub struct TerminalRenderer<W: Write + Send> {
    out: W,
    color: bool,
}

impl TerminalRenderer<io::Stdout> {
    /// Colour is only used when stdout is a terminal and `color` is set.
    pub fn stdout(color: bool) -> Self {
        let out = io::stdout();
        let color = color && out.is_terminal();
        Self { out, color }
    }
}

impl<W: Write + Send> TerminalRenderer<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, line: impl AsRef<str>) {
        if let Err(e) = writeln!(self.out, "{}", line.as_ref()) {
            tracing::warn!(error = %e, "Failed to write to terminal");
        }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.with(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.color {
            text.dim().to_string()
        } else {
            text.to_string()
        }
    }
}

/// `#rrggbb` to a terminal colour.
pub fn parse_hex(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(Color::Rgb {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}

fn bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

impl<W: Write + Send> Renderer for TerminalRenderer<W> {
    fn render_list(&mut self, units: &[DisplayUnit]) {
        self.emit("");
        if units.is_empty() {
            let line = self.dim("(no results)");
            self.emit(line);
            return;
        }

        for unit in units {
            let caption = unit.caption.as_deref().unwrap_or_default();
            let image = self.dim(unit.image.as_deref().unwrap_or("-"));
            self.emit(format!("[{:>4}] {:<24} {:<20} {}", unit.id.to_string(), unit.name, caption, image));
        }
        let footer = self.dim(&format!("{} result(s)", units.len()));
        self.emit(footer);
    }

    fn render_detail(&mut self, detail: &DetailView) {
        let accent = detail
            .accent
            .as_deref()
            .and_then(parse_hex)
            .unwrap_or(Color::Yellow);

        self.emit("");
        let title = self.paint(&format!("#{} {}", detail.id, detail.name), accent);
        self.emit(title);
        if let Some(image) = &detail.image {
            let image = self.dim(image);
            self.emit(image);
        }

        for fact in &detail.facts {
            self.emit(format!("  {}: {}", fact.label, fact.value));
        }

        if !detail.stats.is_empty() {
            self.emit("  Base stats");
            for stat in &detail.stats {
                let color = parse_hex(&stat.color).unwrap_or(accent);
                let filled = self.paint(&bar(stat.percent), color);
                self.emit(format!("  {:<16} {:>3} {}", stat.name, stat.value, filled));
            }
        }
    }

    fn render_error(&mut self, message: &str) {
        self.emit("");
        let line = self.paint(message, Color::Red);
        self.emit(line);
    }

    fn set_busy(&mut self, busy: bool) {
        if busy {
            let line = self.dim("Loading...");
            self.emit(line);
        }
    }

    fn render_pagination(&mut self, controls: Option<&PaginationControls>) {
        let Some(controls) = controls else {
            return;
        };

        let previous = if controls.previous_enabled { "[prev]" } else { "      " };
        let next = if controls.next_enabled { "[next]" } else { "" };
        self.emit(format!("{} {} {}", previous, controls.label(), next).trim_end());
    }
}
