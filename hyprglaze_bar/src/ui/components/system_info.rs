//! CPU and memory usage

use crate::constants::icons;
use crate::ui::{RenderContext, Segment, Span, Widget};
use crate::utils::Result;

pub struct SystemInfoWidget;

impl Widget for SystemInfoWidget {
    fn name(&self) -> &'static str {
        "system"
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<Option<Segment>> {
        let state = ctx.state;
        let mut segment = Segment::new();

        if let Some(cpu) = state.providers.cpu {
            let color = if state.is_cpu_high() {
                ctx.palette.primary
            } else {
                ctx.palette.text
            };
            segment = segment
                .push(Span::new(icons::CPU_ICON).color(ctx.palette.icon))
                .push(Span::new(format!("{:.0}%", cpu.usage)).color(color));
        }

        if let Some(memory) = state.providers.memory {
            let color = if state.is_memory_high() {
                ctx.palette.primary
            } else {
                ctx.palette.text
            };
            segment = segment
                .push(Span::new(icons::MEMORY_ICON).color(ctx.palette.icon))
                .push(
                    Span::new(format!(
                        "{:.0}% {:.1}G",
                        memory.usage,
                        memory.used as f64 / 1e9
                    ))
                    .color(color),
                );
        }

        if state.is_cpu_high() || state.is_memory_high() {
            segment = segment.push(Span::new(icons::WARNING));
        }

        if segment.spans.is_empty() {
            return Ok(None);
        }
        for span in &mut segment.spans {
            span.action = Some("task-manager".to_string());
        }
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
    use hyprglaze_core::providers::{CpuStats, MemoryStats};

    #[test]
    fn renders_whatever_has_been_sampled() {
        let mut state = AppState::new(BarConfig::default(), Preferences::default());
        let render = |state: &AppState| {
            SystemInfoWidget
                .render(&RenderContext::new(state, Local::now()))
                .unwrap()
        };
        assert!(render(&state).is_none());

        state.providers.memory = Some(MemoryStats {
            usage: 50.0,
            total: 16_000_000_000,
            used: 8_000_000_000,
        });
        assert_eq!(
            render(&state).unwrap().plain_text(),
            format!("{} 50% 8.0G", icons::MEMORY_ICON)
        );

        state.providers.cpu = Some(CpuStats { usage: 97.4 });
        let text = render(&state).unwrap().plain_text();
        assert!(text.starts_with(&format!("{} 97%", icons::CPU_ICON)));
        assert!(text.ends_with(icons::WARNING));
    }

    #[test]
    fn clicking_the_stats_opens_the_task_manager() {
        let mut state = AppState::new(BarConfig::default(), Preferences::default());
        state.providers.cpu = Some(CpuStats { usage: 12.0 });

        let segment = SystemInfoWidget
            .render(&RenderContext::new(&state, Local::now()))
            .unwrap()
            .unwrap();
        assert!(segment
            .spans
            .iter()
            .all(|s| s.action.as_deref() == Some("task-manager")));
        assert_eq!(
            crate::app::input::parse_line("task-manager").unwrap(),
            Some(crate::app::events::AppEvent::OpenTaskManager)
        );
        assert_eq!(state.config.system.task_manager_command, "shell-exec taskmgr");
    }
}
