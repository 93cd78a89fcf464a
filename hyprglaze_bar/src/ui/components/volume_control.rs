//! Volume of the default playback device

use crate::constants::icons;
use crate::ui::{RenderContext, Segment, Span, Widget};
use crate::utils::Result;

pub struct VolumeWidget;

pub fn volume_icon(volume: f32, is_muted: bool) -> &'static str {
    if is_muted || volume <= 0.0 {
        icons::VOLUME_MUTED
    } else if volume < 30.0 {
        icons::VOLUME_LOW
    } else if volume < 70.0 {
        icons::VOLUME_MEDIUM
    } else {
        icons::VOLUME_HIGH
    }
}

impl Widget for VolumeWidget {
    fn name(&self) -> &'static str {
        "volume"
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<Option<Segment>> {
        let Some(device) = ctx.state.master_audio_device() else {
            return Ok(None);
        };
        // Show the value the user asked for while it is still debounced
        let volume = ctx.state.effective_volume().unwrap_or(device.volume);

        let text_color = if device.is_muted {
            ctx.palette.text_muted
        } else {
            ctx.palette.text
        };
        Ok(Some(
            Segment::new()
                .push(
                    Span::new(volume_icon(volume, device.is_muted))
                        .color(ctx.palette.icon)
                        .action("mute"),
                )
                .push(
                    Span::new(format!("{:.0}%", volume))
                        .color(text_color)
                        .action("volume +5"),
                ),
        ))
    }
}
