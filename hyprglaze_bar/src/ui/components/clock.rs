//! Date and time

use crate::ui::{RenderContext, Segment, Span, Widget};
use crate::utils::Result;

pub struct ClockWidget;

impl Widget for ClockWidget {
    fn name(&self) -> &'static str {
        "clock"
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<Option<Segment>> {
        let time_format = if ctx.state.show_seconds() {
            "%H:%M:%S"
        } else {
            "%H:%M"
        };
        Ok(Some(
            Segment::new()
                .push(Span::new(ctx.now.format("%a %d %b").to_string()).color(ctx.palette.text_muted))
                .push(
                    Span::new(ctx.now.format(time_format).to_string())
                        .color(ctx.palette.text)
                        .action("seconds"),
                ),
        ))
    }
}
