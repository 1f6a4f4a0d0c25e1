use std::net::TcpListener;
use std::process::Command;
use std::thread;
use std::time::Duration;

use fclink_mock::{BlockSource, StreamServer};
use fclink_wire::{Command as WireCommand, FrameReader, WireError};

#[test]
fn send_transmits_a_decodable_frame() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("listener should bind");
    let addr = listener.local_addr().expect("listener should have an addr");

    let receiver = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("client should connect");
        let mut reader = FrameReader::new(stream);
        reader.read_frame().expect("frame should decode")
    });

    let status = Command::new(env!("CARGO_BIN_EXE_fclink"))
        .args([
            "--log-level",
            "error",
            "send",
            &addr.to_string(),
            "--command",
            "send-data",
            "--data",
            "AB",
        ])
        .status()
        .expect("send command should run");
    assert!(status.success());

    let frame = receiver.join().expect("receiver thread should complete");
    assert_eq!(frame.command, WireCommand::SendData);
    assert_eq!(frame.payload.as_ref(), b"AB");
}

#[test]
fn send_burst_delivers_count_frames() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("listener should bind");
    let addr = listener.local_addr().expect("listener should have an addr");

    let receiver = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("client should connect");
        let mut reader = FrameReader::new(stream);
        let mut frames = Vec::new();
        loop {
            match reader.read_frame() {
                Ok(frame) => frames.push(frame),
                Err(WireError::ConnectionClosed) => break,
                Err(err) => panic!("unexpected read error: {err}"),
            }
        }
        frames
    });

    let status = Command::new(env!("CARGO_BIN_EXE_fclink"))
        .args([
            "--log-level",
            "error",
            "send",
            &addr.to_string(),
            "--burst",
            "3",
            "--interval",
            "0ms",
            "--data",
            "load",
        ])
        .status()
        .expect("send command should run");
    assert!(status.success());

    let frames = receiver.join().expect("receiver thread should complete");
    assert_eq!(frames.len(), 3);
    for frame in &frames {
        assert_eq!(frame.command, WireCommand::SendData);
        assert_eq!(frame.payload.as_ref(), b"load");
    }
}

#[test]
fn tail_prints_count_blocks_as_json() {
    let server =
        StreamServer::bind("127.0.0.1:0".parse().expect("addr should parse")).expect("bind");
    let addr = server.local_addr();

    let serving = thread::spawn(move || {
        let mut source = BlockSource::new();
        server
            .serve_one(&mut source, 5, Duration::ZERO)
            .expect("serve should succeed")
    });

    let output = Command::new(env!("CARGO_BIN_EXE_fclink"))
        .args([
            "--log-level",
            "error",
            "--format",
            "json",
            "tail",
            &addr.to_string(),
            "--count",
            "5",
            "--retry-delay",
            "100ms",
        ])
        .output()
        .expect("tail command should run");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("stdout should be utf8");
    let ids: Vec<u64> = stdout
        .lines()
        .map(|line| {
            let value: serde_json::Value =
                serde_json::from_str(line).expect("each line should be json");
            value["header"]["id"].as_u64().expect("id field")
        })
        .collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4]);

    assert_eq!(serving.join().expect("server thread should complete"), 5);
}

#[test]
fn version_prints_package_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_fclink"))
        .arg("version")
        .output()
        .expect("version command should run");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("stdout should be utf8");
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn send_rejects_payload_on_control_commands() {
    let output = Command::new(env!("CARGO_BIN_EXE_fclink"))
        .args([
            "send",
            "127.0.0.1:9",
            "--command",
            "start-stream",
            "--data",
            "nope",
        ])
        .output()
        .expect("send command should run");

    assert_eq!(output.status.code(), Some(64));
}
