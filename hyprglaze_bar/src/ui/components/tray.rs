//! System tray, collapsed to a count until expanded

use crate::constants::icons;
use crate::ui::{RenderContext, Segment, Span, Widget};
use crate::utils::Result;
use hyprglaze_core::providers::TrayIcon;

pub struct TrayWidget;

fn icon_label(icon: &TrayIcon) -> &str {
    if !icon.process_name.is_empty() {
        &icon.process_name
    } else if !icon.tooltip.is_empty() {
        &icon.tooltip
    } else {
        &icon.id
    }
}

impl Widget for TrayWidget {
    fn name(&self) -> &'static str {
        "tray"
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<Option<Segment>> {
        let state = ctx.state;
        if !state.config.ui.show_tray {
            return Ok(None);
        }
        let Some(tray) = state.providers.system_tray.as_ref() else {
            return Ok(None);
        };
        if tray.icons.is_empty() {
            return Ok(None);
        }

        if !state.ui_state.tray_expanded {
            return Ok(Some(
                Segment::new().push(
                    Span::new(format!("{} {}", icons::TRAY_COLLAPSED, tray.icons.len()))
                        .color(ctx.palette.icon)
                        .action("tray-toggle"),
                ),
            ));
        }

        let segment = tray
            .icons
            .iter()
            .take(state.config.ui.max_tray_icons)
            .fold(
                Segment::new().push(
                    Span::new(icons::TRAY_EXPANDED)
                        .color(ctx.palette.icon)
                        .action("tray-toggle"),
                ),
                |segment, icon| {
                    segment.push(
                        Span::new(icon_label(icon))
                            .color(ctx.palette.text)
                            .action(format!("tray {}", icon.id)),
                    )
                },
            );
        Ok(Some(segment))
    }
}
