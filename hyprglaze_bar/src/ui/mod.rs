//! UI module
//!
//! Widgets turn [`AppState`] into [`Segment`]s; [`Bar`] lays them out on a
//! single line and keeps a failing widget from taking the others down.

pub mod components;

use crate::app::state::AppState;
use crate::config::OutputFormat;
use crate::constants::{app, icons};
use crate::utils::{AppError, Result};
use chrono::{DateTime, Local};
use hyprglaze_core::theme::{resolve, ColorPalette};
use log::{info, warn};
use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Piece of text with an optional color and click action
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    /// CSS color from the active palette
    pub color: Option<&'static str>,
    /// Input line sent back when the span is clicked
    pub action: Option<String>,
}

impl Span {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            color: None,
            action: None,
        }
    }

    pub fn color(mut self, color: &'static str) -> Self {
        self.color = Some(color);
        self
    }

    pub fn action<S: Into<String>>(mut self, action: S) -> Self {
        self.action = Some(action.into());
        self
    }
}

/// Output of one widget
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segment {
    pub spans: Vec<Span>,
}

impl Segment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, span: Span) -> Self {
        self.spans.push(span);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|s| s.text.is_empty())
    }

    /// Text without color or action markup
    pub fn plain_text(&self) -> String {
        self.spans
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Inputs shared by every widget during one render
pub struct RenderContext<'a> {
    pub state: &'a AppState,
    pub palette: ColorPalette,
    pub now: DateTime<Local>,
}

impl<'a> RenderContext<'a> {
    pub fn new(state: &'a AppState, now: DateTime<Local>) -> Self {
        Self {
            state,
            palette: resolve(state.theme()).colors,
            now,
        }
    }
}

/// A bar widget; `Ok(None)` hides it
pub trait Widget {
    fn name(&self) -> &'static str;

    fn render(&self, ctx: &RenderContext<'_>) -> Result<Option<Segment>>;

    /// Action attached to the retry marker shown after a failure
    fn retry_action(&self) -> Option<&'static str> {
        None
    }
}

/// Ordered widgets with a per-widget error boundary
pub struct Bar {
    widgets: Vec<Box<dyn Widget>>,
    failed: HashSet<&'static str>,
}

impl Bar {
    pub fn new(widgets: Vec<Box<dyn Widget>>) -> Self {
        Self {
            widgets,
            failed: HashSet::new(),
        }
    }

    /// Workspaces, tiling, system stats, volume, weather, tray, theme picker and clock
    pub fn with_default_widgets() -> Self {
        Self::new(components::default_widgets())
    }

    pub fn failed_widgets(&self) -> impl Iterator<Item = &&'static str> {
        self.failed.iter()
    }

    /// Render every widget; failures show a retry marker and are tried again
    /// on the next render
    pub fn render(&mut self, ctx: &RenderContext<'_>) -> Vec<Segment> {
        let mut segments = Vec::with_capacity(self.widgets.len());

        for widget in &self.widgets {
            let name = widget.name();
            let outcome = catch_unwind(AssertUnwindSafe(|| widget.render(ctx)))
                .unwrap_or_else(|_| Err(AppError::ui(format!("Widget '{}' panicked", name))));

            match outcome {
                Ok(segment) => {
                    if self.failed.remove(name) {
                        info!("Widget '{}' recovered", name);
                    }
                    if let Some(segment) = segment.filter(|s| !s.is_empty()) {
                        segments.push(segment);
                    }
                }
                Err(e) => {
                    // Report once per failure streak
                    if self.failed.insert(name) {
                        e.report(&format!("widget:{}", name)).log();
                    }
                    let mut marker = Span::new(format!("{} {}", icons::RETRY_MARKER, name))
                        .color(ctx.palette.text_muted);
                    if let Some(action) = widget.retry_action() {
                        marker = marker.action(action);
                    }
                    segments.push(Segment::new().push(marker));
                }
            }
        }
        segments
    }
}

/// Join segments into one output line
pub fn format_line(segments: &[Segment], format: OutputFormat) -> String {
    segments
        .iter()
        .map(|segment| {
            segment
                .spans
                .iter()
                .filter(|s| !s.text.is_empty())
                .map(|span| format_span(span, format))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join(app::SEGMENT_SEPARATOR)
}

fn format_span(span: &Span, format: OutputFormat) -> String {
    match format {
        OutputFormat::Plain => span.text.clone(),
        OutputFormat::Lemonbar => {
            let text = span.text.replace('%', "%%");
            let mut out = match span.color.and_then(css_to_hex) {
                Some(hex) => format!("%{{F{}}}{}%{{F-}}", hex, text),
                None => text,
            };
            if let Some(action) = &span.action {
                // ':' terminates the action
                out = format!("%{{A:{}:}}{}%{{A}}", action.replace(':', "\\:"), out);
            }
            out
        }
    }
}

/// `rgb(59 130 246)` or `#3b82f6` to `#3b82f6`
pub fn css_to_hex(color: &str) -> Option<String> {
    let color = color.trim();
    if let Some(hex) = color.strip_prefix('#') {
        return (hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
            .then(|| format!("#{}", hex.to_ascii_lowercase()));
    }

    let inner = color.strip_prefix("rgb(")?.strip_suffix(')')?;
    let channels: Vec<u8> = inner
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().ok())
        .collect::<Option<_>>()?;
    match channels.as_slice() {
        [r, g, b] => Some(format!("#{:02x}{:02x}{:02x}", r, g, b)),
        _ => {
            warn!("Unsupported color {}", color);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BarConfig;
    use hyprglaze_core::preferences::Preferences;

    struct Flaky {
        fail: bool,
    }

    impl Widget for Flaky {
        fn name(&self) -> &'static str {
            "flaky"
        }

        fn render(&self, _ctx: &RenderContext<'_>) -> Result<Option<Segment>> {
            if self.fail {
                Err(AppError::ui("no data"))
            } else {
                Ok(Some(Segment::new().push(Span::new("ok"))))
            }
        }
    }

    struct Panicky;

    impl Widget for Panicky {
        fn name(&self) -> &'static str {
            "panicky"
        }

        fn render(&self, _ctx: &RenderContext<'_>) -> Result<Option<Segment>> {
            panic!("boom")
        }
    }

    struct Fixed(&'static str);

    impl Widget for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn render(&self, _ctx: &RenderContext<'_>) -> Result<Option<Segment>> {
            Ok(Some(Segment::new().push(Span::new(self.0))))
        }
    }

    fn state() -> AppState {
        AppState::new(BarConfig::default(), Preferences::default())
    }

    #[test]
    fn failing_widgets_are_contained() {
        let state = state();
        let ctx = RenderContext::new(&state, Local::now());
        let mut bar = Bar::new(vec![
            Box::new(Fixed("left")),
            Box::new(Panicky),
            Box::new(Fixed("right")),
        ]);

        let line = format_line(&bar.render(&ctx), OutputFormat::Plain);
        assert_eq!(line, "left | ⟳ panicky | right");
        assert_eq!(bar.failed_widgets().count(), 1);
    }

    #[test]
    fn failed_widget_is_retried_on_next_render() {
        let state = state();
        let ctx = RenderContext::new(&state, Local::now());
        let mut bar = Bar::new(vec![Box::new(Flaky { fail: true })]);

        let first = bar.render(&ctx);
        assert_eq!(first[0].plain_text(), "⟳ flaky");

        bar.widgets[0] = Box::new(Flaky { fail: false });
        let second = bar.render(&ctx);
        assert_eq!(second[0].plain_text(), "ok");
        assert_eq!(bar.failed_widgets().count(), 0);
    }

    #[test]
    fn empty_segments_are_skipped() {
        let state = state();
        let ctx = RenderContext::new(&state, Local::now());
        let mut bar = Bar::new(vec![Box::new(Fixed("")), Box::new(Fixed("x"))]);
        assert_eq!(format_line(&bar.render(&ctx), OutputFormat::Plain), "x");
    }

    #[test]
    fn lemonbar_output_carries_colors_and_actions() {
        let segment = Segment::new()
            .push(
                Span::new("1")
                    .color("rgb(59 130 246)")
                    .action("workspace 1"),
            )
            .push(Span::new("100%"));
        let line = format_line(&[segment], OutputFormat::Lemonbar);
        assert_eq!(
            line,
            "%{A:workspace 1:}%{F#3b82f6}1%{F-}%{A} 100%%"
        );
    }

    #[test]
    fn css_colors_convert_to_hex() {
        assert_eq!(css_to_hex("rgb(15 15 15)").as_deref(), Some("#0f0f0f"));
        assert_eq!(css_to_hex("rgb(255, 0, 128)").as_deref(), Some("#ff0080"));
        assert_eq!(css_to_hex("#ABCDEF").as_deref(), Some("#abcdef"));
        assert_eq!(css_to_hex("rgb(300 0 0)"), None);
        assert_eq!(css_to_hex("hsl(1 2 3)"), None);
    }
}
