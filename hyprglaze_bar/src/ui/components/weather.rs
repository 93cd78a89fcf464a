//! Current weather from the refresher

use crate::constants::icons;
use crate::ui::{RenderContext, Segment, Span, Widget};
use crate::utils::Result;
use hyprglaze_core::weather::FetchState;

pub struct WeatherWidget;

impl Widget for WeatherWidget {
    fn name(&self) -> &'static str {
        "weather"
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<Option<Segment>> {
        let state = ctx.state;
        if !state.config.weather.enabled {
            return Ok(None);
        }
        let status = &state.weather;

        let segment = match (&status.data, status.state) {
            (Some(data), fetch_state) => {
                let mut segment = Segment::new()
                    .push(
                        Span::new(icons::weather(data.icon_name()))
                            .color(ctx.palette.icon)
                            .action("weather-refresh"),
                    )
                    .push(Span::new(format!("{}°C", data.temperature)).color(ctx.palette.text))
                    .push(Span::new(data.city.clone()).color(ctx.palette.text_muted));
                // Stale data stays visible while a refresh is failing
                if fetch_state == FetchState::Error {
                    segment = segment.push(
                        Span::new(icons::RETRY_MARKER)
                            .color(ctx.palette.text_muted)
                            .action("weather-refresh"),
                    );
                }
                segment
            }
            (None, FetchState::Idle) => return Ok(None),
            (None, FetchState::Loading) | (None, FetchState::Success) => {
                Segment::new().push(Span::new("…").color(ctx.palette.text_muted))
            }
            (None, FetchState::Error) => Segment::new().push(
                Span::new(format!(
                    "{} {}",
                    icons::RETRY_MARKER,
                    status.error.as_deref().unwrap_or("weather unavailable")
                ))
                .color(ctx.palette.text_muted)
                .action("weather-refresh"),
            ),
        };
        Ok(Some(segment))
    }

    fn retry_action(&self) -> Option<&'static str> {
        Some("weather-refresh")
    }
}
