// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::net::SocketAddr;
use std::time::Duration;

use scene_bridge::config::DEFAULT_VACATE_MESSAGE;
use scene_bridge::host::{Asset, MemoryScene, MeshPart, SceneHost};
use scene_bridge::model::Vec3;
use scene_bridge::server::{bind, request_vacate, serve, Server, ServerError};
use scene_bridge::{BridgeConfig, Error};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

const TIMEOUT: Duration = Duration::from_secs(10);

fn test_config() -> BridgeConfig {
    BridgeConfig {
        port: 0,
        handoff_delay_ms: 50,
        ..BridgeConfig::default()
    }
}

async fn start(
    scene: MemoryScene,
    config: BridgeConfig,
) -> (SocketAddr, JoinHandle<Result<MemoryScene, ServerError>>) {
    let listener = TcpListener::bind(("127.0.0.1", 0)).await.expect("bind");
    let server = Server::new(listener, config).expect("server");
    let addr = server.local_addr().expect("addr");
    (addr, tokio::spawn(server.run(scene)))
}

async fn stop(
    addr: SocketAddr,
    server: JoinHandle<Result<MemoryScene, ServerError>>,
) -> MemoryScene {
    let vacated = request_vacate("127.0.0.1", addr.port(), DEFAULT_VACATE_MESSAGE).await;
    assert!(vacated);
    tokio::time::timeout(TIMEOUT, server)
        .await
        .expect("server stops after vacate")
        .expect("join")
        .expect("serve")
}

/// Reads until the accumulated reply text satisfies `done`.
async fn read_until(stream: &mut TcpStream, done: impl Fn(&str) -> bool) -> String {
    let mut text = String::new();
    let mut buf = [0u8; 4096];
    tokio::time::timeout(TIMEOUT, async {
        while !done(&text) {
            let n = stream.read(&mut buf).await.expect("read");
            assert!(n > 0, "connection closed early, got {text:?}");
            text.push_str(&String::from_utf8_lossy(&buf[..n]));
        }
    })
    .await
    .expect("reply in time");
    text
}

async fn request(stream: &mut TcpStream, line: &str, expected: &str) -> String {
    stream.write_all(format!("{line}\n").as_bytes()).await.expect("write");
    read_until(stream, |text| text.len() >= expected.len()).await
}

#[tokio::test]
async fn replies_go_back_to_the_sending_connection() {
    let (addr, server) = start(MemoryScene::demo(), test_config()).await;
    let mut a = TcpStream::connect(addr).await.expect("connect a");
    let mut b = TcpStream::connect(addr).await.expect("connect b");

    assert_eq!(request(&mut b, "report_done", "\"Done\"").await, "\"Done\"");
    assert_eq!(
        request(&mut a, "get_scene_name", "room.ma").await,
        "room.ma"
    );

    stop(addr, server).await;
}

#[tokio::test]
async fn commands_from_many_connections_apply_in_submission_order() {
    let (addr, server) = start(MemoryScene::new(), test_config()).await;

    let mut clients = Vec::new();
    for prefix in ["a", "b", "c"] {
        clients.push(tokio::spawn(async move {
            let mut stream = TcpStream::connect(addr).await.expect("connect");
            let mut payload = String::new();
            for i in 0..10 {
                let item =
                    format!(r#"{{"name": "{prefix}{i}", "group": true, "location": [0, 0, 0]}}"#);
                payload.push_str(&format!("add_objects {{\"t{i}\": {item}}}\n"));
            }
            payload.push_str("report_done\n");
            stream.write_all(payload.as_bytes()).await.expect("write");
            read_until(&mut stream, |text| text.ends_with("\"Done\"")).await
        }));
    }
    for client in clients {
        let replies = client.await.expect("client");
        assert_eq!(replies.matches("#").count(), 10);
    }

    let scene = stop(addr, server).await;
    for prefix in ["a", "b", "c"] {
        let handles: Vec<_> = (0..10)
            .map(|i| {
                let found = scene.find_by_label(&format!("{prefix}{i}"));
                assert_eq!(found.len(), 1, "{prefix}{i}");
                found[0]
            })
            .collect();
        assert!(
            handles.windows(2).all(|w| w[0] < w[1]),
            "{prefix}: {handles:?}"
        );
    }
    assert_eq!(scene.node_count(), 30);
}

#[tokio::test]
async fn vacate_closes_the_listener_and_returns_the_host() {
    let (addr, server) = start(MemoryScene::demo(), test_config()).await;
    let mut stream = TcpStream::connect(addr).await.expect("connect");
    stream.write_all(b"rename table desk\nreport_done\n").await.expect("write");
    read_until(&mut stream, |text| text.ends_with("\"Done\"")).await;

    let scene = stop(addr, server).await;
    assert_eq!(scene.find_by_label("desk").len(), 1);
    assert!(TcpStream::connect(addr).await.is_err());
}

#[tokio::test]
async fn ignored_vacate_is_just_an_unknown_command() {
    let config = BridgeConfig {
        ignore_vacate: true,
        allow_script_passthrough: false,
        ..test_config()
    };
    let (addr, server) = start(MemoryScene::demo(), config).await;
    let mut stream = TcpStream::connect(addr).await.expect("connect");
    let reply = request(&mut stream, DEFAULT_VACATE_MESSAGE, "None").await;
    assert_eq!(reply, "None");
    assert_eq!(
        request(&mut stream, "report_done", "\"Done\"").await,
        "\"Done\""
    );
    server.abort();
}

#[tokio::test]
async fn failed_commands_reply_none_and_leave_one_undo_step() {
    let mut scene = MemoryScene::demo();
    scene.register_asset(
        "assets/broken.ma",
        Asset::single(MeshPart::resting_box("broken", Vec3::repeat(10.0))).broken(),
    );
    let before = scene.node_count();
    let (addr, server) = start(scene, test_config()).await;

    let mut stream = TcpStream::connect(addr).await.expect("connect");
    let line = concat!(
        r#"add_objects {"a": {"asset_path": "assets/chair.ma", "location": [0, 0, 0]}, "#,
        r#""b": {"asset_path": "assets/broken.ma", "location": [90, 0, 0]}}"#,
    );
    assert_eq!(request(&mut stream, line, "None").await, "None");
    assert_eq!(
        request(&mut stream, "report_done", "\"Done\"").await,
        "\"Done\""
    );

    let mut scene = stop(addr, server).await;
    assert_eq!(scene.undo_depth(), 0);
    assert_eq!(scene.undo_steps(), 1, "report_done leaves no undo step");
    assert!(scene.node_count() > before);
    assert!(scene.undo());
    assert_eq!(scene.node_count(), before);
}

#[tokio::test]
async fn repeated_assets_are_imported_once() {
    let (addr, server) = start(MemoryScene::demo(), test_config()).await;
    let mut stream = TcpStream::connect(addr).await.expect("connect");
    let place = |tmp: &str, x: i32| {
        let item = format!(r#"{{"asset_path": "assets/chair.ma", "location": [{x}, 0, 300]}}"#);
        format!(r#"add_objects {{"{tmp}": {item}}}"#)
    };
    let payload = format!("{}\n{}\nreport_done\n", place("one", 0), place("two", 100));
    stream.write_all(payload.as_bytes()).await.expect("write");
    read_until(&mut stream, |text| text.ends_with("\"Done\"")).await;

    let scene = stop(addr, server).await;
    assert_eq!(scene.import_count(), 1);
    assert_eq!(scene.duplicate_count(), 1);
}

#[tokio::test]
async fn unknown_commands_run_as_script_without_a_reply() {
    let (addr, server) = start(MemoryScene::demo(), test_config()).await;
    let mut stream = TcpStream::connect(addr).await.expect("connect");
    stream.write_all(b"polyCube -w 2\nreport_done\n").await.expect("write");
    assert_eq!(
        read_until(&mut stream, |text| text.ends_with("\"Done\"")).await,
        "\"Done\""
    );

    let scene = stop(addr, server).await;
    assert_eq!(scene.executed_scripts(), ["polyCube -w 2"]);
}

#[tokio::test]
async fn a_new_instance_takes_the_port_over() {
    let listener = bind(&test_config()).await.expect("first bind");
    let port = listener.local_addr().expect("addr").port();
    let old = Server::new(listener, test_config()).expect("server");
    let old = tokio::spawn(old.run(MemoryScene::new()));

    let config = BridgeConfig {
        port,
        handoff_delay_ms: 200,
        ..test_config()
    };
    let listener = bind(&config).await.expect("hand-off bind");
    assert_eq!(listener.local_addr().expect("addr").port(), port);

    tokio::time::timeout(TIMEOUT, old)
        .await
        .expect("old instance stopped")
        .expect("join")
        .expect("serve");
}

#[tokio::test]
async fn a_port_that_is_never_handed_over_fails_to_bind() {
    // Accepts connections at the kernel level but never reads, so vacate requests go nowhere.
    let squatter = TcpListener::bind(("127.0.0.1", 0)).await.expect("squat");
    let port = squatter.local_addr().expect("addr").port();
    let config = BridgeConfig {
        port,
        handoff_delay_ms: 20,
        ..test_config()
    };

    let err = tokio::time::timeout(TIMEOUT, bind(&config))
        .await
        .expect("gives up in time")
        .expect_err("port stays taken");
    assert_eq!(err.port, port);
    assert_eq!(err.source.kind(), std::io::ErrorKind::AddrInUse);
    assert!(
        err.to_string().contains(&format!("127.0.0.1:{port}")),
        "{err}"
    );

    let served = serve(MemoryScene::new(), config).await;
    assert!(matches!(served, Err(Error::Bind(ref e)) if e.port == port));
    drop(squatter);
}

#[tokio::test]
async fn silent_editor_commands_never_reach_the_script_host() {
    let (addr, server) = start(MemoryScene::demo(), test_config()).await;
    let mut stream = TcpStream::connect(addr).await.expect("connect");
    let payload = "focus table\nisolate_selection\nscreenshot C:/tmp/a.jpg\nreport_done\n";
    stream.write_all(payload.as_bytes()).await.expect("write");
    let replies = read_until(&mut stream, |text| text.ends_with("\"Done\"")).await;
    assert_eq!(replies, "\"Done\"");

    let scene = stop(addr, server).await;
    assert!(scene.executed_scripts().is_empty());
}

#[tokio::test]
async fn endless_lines_drop_only_their_connection() {
    let config = BridgeConfig {
        max_line_bytes: 1024,
        ..test_config()
    };
    let (addr, server) = start(MemoryScene::demo(), config).await;

    let mut flood = TcpStream::connect(addr).await.expect("connect flood");
    let mut closed = false;
    for _ in 0..64 {
        if flood.write_all(&[b'x'; 256]).await.is_err() {
            closed = true;
            break;
        }
    }
    if !closed {
        let mut buf = [0u8; 16];
        let read = tokio::time::timeout(TIMEOUT, flood.read(&mut buf))
            .await
            .expect("closed in time");
        assert!(matches!(read, Ok(0) | Err(_)), "{read:?}");
    }

    let mut other = TcpStream::connect(addr).await.expect("connect");
    assert_eq!(
        request(&mut other, "report_done", "\"Done\"").await,
        "\"Done\""
    );
    stop(addr, server).await;
}
