//! Theme picker: the active preset, expanded into one entry per preset

use crate::constants::icons;
use crate::ui::{RenderContext, Segment, Span, Widget};
use crate::utils::Result;
use hyprglaze_core::theme::{all, metadata, preview};

pub struct ThemeSelectorWidget;

impl Widget for ThemeSelectorWidget {
    fn name(&self) -> &'static str {
        "theme"
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<Option<Segment>> {
        let state = ctx.state;
        let active = state.theme();

        if !state.ui_state.theme_menu_expanded {
            return Ok(Some(
                Segment::new()
                    .push(
                        Span::new(icons::THEME)
                            .color(ctx.palette.icon)
                            .action("theme-menu"),
                    )
                    .push(
                        Span::new(metadata(active).name)
                            .color(ctx.palette.text)
                            .action("theme-menu"),
                    ),
            ));
        }

        let header = Segment::new()
            .push(
                Span::new(icons::TRAY_EXPANDED)
                    .color(ctx.palette.icon)
                    .action("theme-menu"),
            )
            .push(
                Span::new(icons::THEME_MODE_TOGGLE)
                    .color(ctx.palette.icon)
                    .action("theme-toggle"),
            );

        let segment = all().iter().fold(header, |segment, id| {
            let label = if *id == active {
                format!("[{}]", id.as_str())
            } else {
                id.as_str().to_string()
            };
            segment.push(
                Span::new(label)
                    .color(preview(*id).primary)
                    .action(format!("theme {}", id.as_str())),
            )
        });
        Ok(Some(segment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::AppState;
    use crate::config::BarConfig;
    use chrono::Local;
    use hyprglaze_core::preferences::Preferences;
    use hyprglaze_core::ThemeId;

    fn render(state: &AppState) -> Segment {
        ThemeSelectorWidget
            .render(&RenderContext::new(state, Local::now()))
            .unwrap()
            .unwrap()
    }

    #[test]
    fn collapsed_shows_the_active_preset() {
        let mut state = AppState::new(BarConfig::default(), Preferences::default());
        state.preferences.theme.preset = ThemeId::NordLight;

        let segment = render(&state);
        assert_eq!(
            segment.plain_text(),
            format!("{} {}", icons::THEME, metadata(ThemeId::NordLight).name)
        );
        assert!(segment
            .spans
            .iter()
            .all(|s| s.action.as_deref() == Some("theme-menu")));
    }

    #[test]
    fn expanded_lists_every_preset_with_its_action() {
        let mut state = AppState::new(BarConfig::default(), Preferences::default());
        state.ui_state.toggle_theme_menu();

        let segment = render(&state);
        assert_eq!(segment.spans.len(), all().len() + 2);
        assert_eq!(segment.spans[1].action.as_deref(), Some("theme-toggle"));

        let active = &segment.spans[2];
        assert_eq!(active.text, "[hypr-dark]");
        assert_eq!(active.action.as_deref(), Some("theme hypr-dark"));

        let last = segment.spans.last().unwrap();
        assert_eq!(last.text, "aurora");
        assert_eq!(last.action.as_deref(), Some("theme aurora"));
    }
}
