//! Binding modes, tiling direction and the auto-tiling connection

use crate::constants::icons;
use crate::ui::{RenderContext, Segment, Span, Widget};
use crate::utils::Result;
use hyprglaze_core::providers::TilingDirection;
use hyprglaze_core::tiling::ConnectionState;

pub struct TilingWidget;

impl Widget for TilingWidget {
    fn name(&self) -> &'static str {
        "tiling"
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<Option<Segment>> {
        let state = ctx.state;
        let mut segment = Segment::new();

        if let Some(wm) = state.providers.window_manager.as_ref() {
            for mode in &wm.binding_modes {
                segment = segment.push(Span::new(mode.label()).color(ctx.palette.primary));
            }
            let icon = match wm.tiling_direction {
                TilingDirection::Horizontal => icons::TILING_HORIZONTAL,
                TilingDirection::Vertical => icons::TILING_VERTICAL,
            };
            segment = segment.push(
                Span::new(icon)
                    .color(ctx.palette.icon)
                    .action("tiling-toggle"),
            );
        }

        // Only call out the connection when it is not doing its job
        match state.tiling {
            Some(ConnectionState::Subscribed) | None => {}
            Some(other) => {
                segment = segment.push(
                    Span::new(format!("auto-tiling {}", other)).color(ctx.palette.text_muted),
                );
            }
        }

        Ok((!segment.spans.is_empty()).then_some(segment))
    }
}
