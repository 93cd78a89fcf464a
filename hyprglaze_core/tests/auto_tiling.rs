//! Auto-tiling against a local WebSocket server standing in for the window manager

use futures_util::{SinkExt, StreamExt};
use hyprglaze_core::tiling::{AutoTilingController, AutoTilingOptions, ConnectionState, TriggerMode};
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_async, WebSocketStream};

const WAIT: Duration = Duration::from_secs(5);

fn event(tiling_size: &str) -> Message {
    Message::Text(
        format!(
            r#"{{"messageType":"event_subscription","data":{{"managedWindow":{{"tilingSize":{}}}}}}}"#,
            tiling_size
        )
        .into(),
    )
}

async fn listen() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    (listener, url)
}

async fn accept(listener: &TcpListener) -> WebSocketStream<TcpStream> {
    let (stream, _) = timeout(WAIT, listener.accept()).await.unwrap().unwrap();
    accept_async(stream).await.unwrap()
}

async fn next_text(ws: &mut WebSocketStream<TcpStream>) -> Option<String> {
    loop {
        match timeout(WAIT, ws.next()).await.ok()?? {
            Ok(Message::Text(text)) => return Some(text.to_string()),
            Ok(Message::Close(_)) | Err(_) => return None,
            Ok(_) => continue,
        }
    }
}

fn options(url: String, trigger: TriggerMode) -> AutoTilingOptions {
    AutoTilingOptions {
        url,
        trigger,
        ..Default::default()
    }
}

#[tokio::test]
async fn subscribes_and_toggles_on_small_windows() {
    let (listener, url) = listen().await;
    let controller = AutoTilingController::activate(options(url, TriggerMode::Level));
    let mut server = accept(&listener).await;

    assert_eq!(next_text(&mut server).await.as_deref(), Some("sub -e window_managed"));

    server
        .send(Message::Text(
            r#"{"messageType":"client_response","success":true}"#.into(),
        ))
        .await
        .unwrap();
    server.send(event("0.51")).await.unwrap();
    server.send(event("null")).await.unwrap();
    server.send(Message::Text("definitely not json".into())).await.unwrap();
    server.send(event("0.4")).await.unwrap();
    server.send(event("0.5")).await.unwrap();

    // one toggle per qualifying event, nothing for 0.51, null or garbage
    assert_eq!(
        next_text(&mut server).await.as_deref(),
        Some("c toggle-tiling-direction")
    );
    assert_eq!(
        next_text(&mut server).await.as_deref(),
        Some("c toggle-tiling-direction")
    );

    let mut sizes = controller.subscribe_tiling_size();
    let last = timeout(WAIT, sizes.wait_for(|s| *s == Some(0.5)))
        .await
        .unwrap()
        .unwrap()
        .clone();
    assert_eq!(last, Some(0.5));
    assert_eq!(controller.state(), ConnectionState::Subscribed);

    controller.deactivate().await;
    assert_eq!(next_text(&mut server).await, None);
}

#[tokio::test]
async fn edge_mode_toggles_once_per_crossing() {
    let (listener, url) = listen().await;
    let controller = AutoTilingController::activate(options(url, TriggerMode::Edge));
    let mut server = accept(&listener).await;
    next_text(&mut server).await.unwrap();

    for size in ["0.3", "0.2", "0.8", "0.45"] {
        server.send(event(size)).await.unwrap();
    }

    assert_eq!(
        next_text(&mut server).await.as_deref(),
        Some("c toggle-tiling-direction")
    );
    assert_eq!(
        next_text(&mut server).await.as_deref(),
        Some("c toggle-tiling-direction")
    );

    // a marker command proves nothing else was queued in between
    controller
        .command_sender()
        .run_command("focus --workspace 2")
        .unwrap();
    assert_eq!(
        next_text(&mut server).await.as_deref(),
        Some("c focus --workspace 2")
    );

    drop(controller);
    assert_eq!(next_text(&mut server).await, None);
}

#[tokio::test]
async fn server_close_returns_to_disconnected() {
    let (listener, url) = listen().await;
    let controller = AutoTilingController::activate(options(url, TriggerMode::Level));
    let mut server = accept(&listener).await;
    next_text(&mut server).await.unwrap();

    let mut state = controller.subscribe_state();
    timeout(WAIT, state.wait_for(|s| *s == ConnectionState::Subscribed))
        .await
        .unwrap()
        .unwrap();

    server.close(None).await.unwrap();
    timeout(WAIT, state.wait_for(|s| *s == ConnectionState::Disconnected))
        .await
        .unwrap()
        .unwrap();

    assert!(controller.command_sender().run_command("noop").is_err());
}
