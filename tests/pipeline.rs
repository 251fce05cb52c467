use std::time::Duration;

use rgbw_light_controller::input::spawn_listener;
use rgbw_light_controller::serial::FRAME_LEN;
use rgbw_light_controller::{
    BridgeAdapter, BridgeConfig, Command, Controller, ControllerConfig, Effect, InputEvent,
    SerialClient, SerialCommand,
};
use tokio::io::{AsyncReadExt, DuplexStream};
use tokio::time::timeout;

async fn next_frame(device: &mut DuplexStream, wait: Duration) -> Option<SerialCommand> {
    let mut frame = [0u8; FRAME_LEN];
    match timeout(wait, device.read_exact(&mut frame)).await {
        Ok(Ok(_)) => Some(SerialCommand::decode(&frame).expect("valid frame")),
        _ => None,
    }
}

async fn frame_matching(device: &mut DuplexStream, expected: SerialCommand) {
    for _ in 0..32 {
        match next_frame(device, Duration::from_secs(1)).await {
            Some(frame) if frame == expected => return,
            Some(_) => continue,
            None => break,
        }
    }
    panic!("never received {expected:?}");
}

fn config() -> ControllerConfig {
    ControllerConfig {
        tick_ms: 5,
        ..ControllerConfig::default()
    }
}

#[tokio::test]
async fn test_bridge_and_input_reach_the_wire() {
    let (link, mut device) = tokio::io::duplex(1024);
    let serial = SerialClient::start(link);
    let mut controller = Controller::start(&config(), serial.clone());

    // initial sync of a dark fixture
    assert_eq!(
        next_frame(&mut device, Duration::from_secs(1)).await,
        Some(SerialCommand::OFF)
    );

    let bridge = BridgeAdapter::new(
        BridgeConfig::default(),
        controller.sender(),
        controller.subscribe(),
    );
    let queued = bridge
        .handle_message(
            br#"{"state": "ON", "brightness": 128, "color": {"r": 255, "g": 0, "b": 0, "w": 0}}"#,
        )
        .unwrap();
    assert_eq!(queued, 3);
    frame_matching(&mut device, SerialCommand::new(128, 0, 0, 0)).await;

    spawn_listener(vec![InputEvent::Click], controller.sender(), 8)
        .join()
        .unwrap();
    frame_matching(&mut device, SerialCommand::OFF).await;

    // nothing changes, nothing is sent
    assert_eq!(next_frame(&mut device, Duration::from_millis(100)).await, None);
    assert!(!bridge.status().emitting());

    controller.stop().await;
    assert!(serial.diagnostics().frames_sent >= 3);
    assert_eq!(serial.diagnostics().frames_failed, 0);
}

#[tokio::test]
async fn test_animation_streams_until_solid() {
    let (link, mut device) = tokio::io::duplex(64 * 1024);
    let mut controller = Controller::start(&config(), SerialClient::start(link));

    controller
        .add_input_command(Command::select_effect(Effect::Rainbow))
        .unwrap();
    controller.add_input_command(Command::SetPower(true)).unwrap();

    let mut distinct = Vec::new();
    while distinct.len() < 5 {
        let frame = next_frame(&mut device, Duration::from_secs(1))
            .await
            .expect("rainbow keeps streaming");
        if distinct.last() != Some(&frame) {
            distinct.push(frame);
        }
    }

    controller
        .add_input_command(Command::select_effect(Effect::Solid))
        .unwrap();
    let white = SerialCommand::new(0, 0, 0, 255);
    frame_matching(&mut device, white).await;
    assert_eq!(next_frame(&mut device, Duration::from_millis(100)).await, None);
    assert_eq!(controller.light().active_effect(), Some(Effect::Solid));

    controller.stop().await;
}

#[tokio::test]
async fn test_stopped_controller_sends_nothing_more() {
    let (link, mut device) = tokio::io::duplex(1024);
    let mut controller = Controller::start(&config(), SerialClient::start(link));
    assert!(next_frame(&mut device, Duration::from_secs(1)).await.is_some());

    controller.stop().await;
    assert!(!controller.is_running());
    assert!(controller.add_input_command(Command::TogglePower).is_err());
    assert_eq!(next_frame(&mut device, Duration::from_millis(50)).await, None);
}
