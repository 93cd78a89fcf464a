//! Workspace list

use crate::ui::{RenderContext, Segment, Span, Widget};
use crate::utils::Result;

pub struct WorkspaceWidget;

impl Widget for WorkspaceWidget {
    fn name(&self) -> &'static str {
        "workspaces"
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<Option<Segment>> {
        let Some(wm) = ctx.state.providers.window_manager.as_ref() else {
            return Ok(None);
        };

        let segment = wm.workspaces.iter().fold(Segment::new(), |segment, ws| {
            let (label, color) = if ws.has_focus {
                (format!("[{}]", ws.label()), ctx.palette.primary)
            } else if ws.is_displayed {
                (ws.label().to_string(), ctx.palette.text)
            } else {
                (ws.label().to_string(), ctx.palette.text_muted)
            };
            segment.push(
                Span::new(label)
                    .color(color)
                    .action(format!("workspace {}", ws.name)),
            )
        });
        Ok(Some(segment))
    }
}
