//! Integration tests for hyprglaze_bar

use hyprglaze_bar::app::events::{AppEvent, ProviderUpdate};
use hyprglaze_bar::app::spawn_agent_writer;
use hyprglaze_bar::constants::icons;
use hyprglaze_bar::{BarApp, BarConfig, Services};
use hyprglaze_core::preferences::MemoryStorage;
use hyprglaze_core::providers::{ProviderCommand, WindowManagerState, Workspace};
use hyprglaze_core::theme::CssFile;
use hyprglaze_core::ThemeId;
use std::time::Duration;
use tempfile::tempdir;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

fn offline_config() -> BarConfig {
    let mut config = BarConfig::default();
    config.weather.enabled = false;
    config.tiling.enabled = false;
    config
}

#[test]
fn test_config_save_load() {
    use std::env;

    let temp_dir = tempdir().unwrap();
    env::set_var("XDG_CONFIG_HOME", temp_dir.path());

    let mut original_config = BarConfig::default();
    original_config.tiling.threshold = 0.3;
    original_config.ui.show_tray = false;
    let config_path = BarConfig::config_file_path().unwrap();
    assert!(original_config.save_to(&config_path).is_ok());
    assert!(temp_dir
        .path()
        .join("hyprglaze")
        .join("config.toml")
        .exists());

    let loaded_config = BarConfig::load().unwrap();
    assert_eq!(loaded_config.tiling.threshold, 0.3);
    assert!(!loaded_config.ui.show_tray);

    env::remove_var("XDG_CONFIG_HOME");
}

#[tokio::test]
async fn test_bar_applies_actions_and_renders_provider_state() {
    let temp_dir = tempdir().unwrap();
    let css_path = temp_dir.path().join("theme.css");

    let (services, mut agent_rx) = Services::start(
        &offline_config(),
        Box::new(MemoryStorage::new()),
        Box::new(CssFile::new(&css_path)),
    )
    .unwrap();
    let mut bar = BarApp::new(offline_config(), services, Vec::<u8>::new());
    let mut snapshots = bar.services().aggregator.subscribe();
    let sender = bar.event_sender();
    let token = CancellationToken::new();

    let driver = async {
        sender.send(AppEvent::ThemeChanged(ThemeId::NordLight)).unwrap();
        sender.send(AppEvent::TimeFormatToggle).unwrap();
        sender.send(AppEvent::SetVolume(140.0)).unwrap();
        // no window manager connection; logged and ignored
        sender
            .send(AppEvent::FocusWorkspace("2".into()))
            .unwrap();
        sender
            .send(AppEvent::ProviderUpdate(ProviderUpdate {
                window_manager: Some(WindowManagerState {
                    workspaces: vec![Workspace {
                        name: "1".into(),
                        display_name: None,
                        has_focus: true,
                        is_displayed: true,
                    }],
                    ..Default::default()
                }),
                ..Default::default()
            }))
            .unwrap();

        tokio::time::timeout(
            Duration::from_secs(5),
            snapshots.wait_for(|s| s.window_manager.is_some()),
        )
        .await
        .unwrap()
        .unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        sender.send(AppEvent::Shutdown).unwrap();
    };

    let (result, ()) = tokio::join!(bar.run(token.clone()), driver);
    result.unwrap();

    assert_eq!(bar.state().theme(), ThemeId::NordLight);
    assert!(bar.state().show_seconds());
    assert!(bar.last_line().unwrap().starts_with("[1]"));

    assert_eq!(agent_rx.try_recv().unwrap(), ProviderCommand::SetVolume(100.0));

    let css = std::fs::read_to_string(&css_path).unwrap();
    assert!(css.contains("--color-background"));

    bar.shutdown().await;
}

#[tokio::test]
async fn test_once_mode_waits_for_system_sample() {
    let temp_dir = tempdir().unwrap();
    let (services, _agent_rx) = Services::start(
        &offline_config(),
        Box::new(MemoryStorage::new()),
        Box::new(CssFile::new(temp_dir.path().join("theme.css"))),
    )
    .unwrap();
    let mut bar = BarApp::new(offline_config(), services, Vec::<u8>::new());

    let line = bar.run_once(Duration::from_secs(5)).await.unwrap();
    assert!(line.contains(icons::CPU_ICON));
    assert!(line.contains(icons::MEMORY_ICON));

    bar.shutdown().await;
}

#[tokio::test]
async fn test_theme_picker_collapses_after_a_choice() {
    let temp_dir = tempdir().unwrap();
    let (services, _agent_rx) = Services::start(
        &offline_config(),
        Box::new(MemoryStorage::new()),
        Box::new(CssFile::new(temp_dir.path().join("theme.css"))),
    )
    .unwrap();
    let mut bar = BarApp::new(offline_config(), services, Vec::<u8>::new());

    assert!(bar.handle_event(AppEvent::ThemeMenuToggle));
    assert!(bar.render_line().contains("[hypr-dark]"));

    assert!(bar.handle_event(AppEvent::ThemeChanged(ThemeId::Dracula)));
    assert!(!bar.state().ui_state.theme_menu_expanded);
    assert_eq!(bar.state().theme(), ThemeId::Dracula);
    assert!(!bar.render_line().contains("[dracula]"));

    bar.shutdown().await;
}

#[tokio::test]
async fn test_agent_commands_are_written_as_json_lines() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("agent.jsonl");
    let (tx, rx) = mpsc::unbounded_channel();

    let writer = spawn_agent_writer(rx, Some(path.clone()));
    tx.send(ProviderCommand::SetVolume(35.0)).unwrap();
    tx.send(ProviderCommand::ToggleMute).unwrap();
    drop(tx);
    writer.await.unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<serde_json::Value> = content
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["type"], "setVolume");
    assert_eq!(lines[0]["payload"], 35.0);
    assert_eq!(lines[1]["type"], "toggleMute");
}

#[test]
fn test_theme_listing_covers_every_preset() {
    let ids = hyprglaze_core::theme::all();
    assert_eq!(ids.len(), 20);
    assert_eq!(ids[0], ThemeId::HyprDark);
}
