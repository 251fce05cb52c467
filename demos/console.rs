//! Console front-end for the controller.
//!
//! Lines typed on stdin act as the input device:
//! `+`/`-` rotate, `click`, `double`, `long`, `effect <name>`,
//! `color r,g,b,w`, `bridge <json>`, `status`, `quit`.
//!
//! Frames go to `--device` if given (an already configured tty), otherwise
//! they are decoded and printed.
//!
//! Run with: cargo run --example console -- --tick-ms 20

use std::io::BufRead;
use std::path::PathBuf;

use clap::Parser;
use rgbw_light_controller::input::InputEvent;
use rgbw_light_controller::serial::FRAME_LEN;
use rgbw_light_controller::{
    BridgeAdapter, BridgeConfig, ColorRGBW, Command, CommandSender, Controller,
    ControllerConfig, SerialClient, SerialCommand,
};
use tokio::io::AsyncReadExt;

#[derive(Parser)]
#[command(name = "rgbw-console")]
#[command(about = "Drive an RGBW fixture from the terminal", long_about = None)]
struct Cli {
    /// Serial device to write frames to
    #[arg(short, long)]
    device: Option<PathBuf>,

    /// Control loop tick in milliseconds
    #[arg(short, long, default_value = "20")]
    tick_ms: u64,

    /// Brightness change per rotation detent
    #[arg(short, long, default_value = "8")]
    step: u8,
}

enum Line {
    Command(Command),
    Bridge(String),
    Status,
    Quit,
}

fn parse_line(line: &str, step: u8) -> Option<Line> {
    let (word, rest) = line.trim().split_once(' ').unwrap_or((line.trim(), ""));
    let event = match word {
        "+" => InputEvent::Rotate(1),
        "-" => InputEvent::Rotate(-1),
        "click" => InputEvent::Click,
        "double" => InputEvent::DoubleClick,
        "long" => InputEvent::LongPress,
        "effect" => return Some(Line::Command(Command::SelectEffect(rest.to_string()))),
        "color" => {
            return rest
                .parse::<ColorRGBW>()
                .ok()
                .map(|c| Line::Command(Command::SetColor(c)));
        }
        "bridge" => return Some(Line::Bridge(rest.to_string())),
        "status" => return Some(Line::Status),
        "quit" => return Some(Line::Quit),
        _ => return None,
    };
    event.into_command(step).map(Line::Command)
}

fn read_stdin(sender: CommandSender, lines: tokio::sync::mpsc::UnboundedSender<Line>, step: u8) {
    for line in std::io::stdin().lock().lines() {
        let Ok(line) = line else { break };
        match parse_line(&line, step) {
            Some(Line::Command(command)) => {
                if sender.enqueue(command).is_err() {
                    break;
                }
            }
            Some(other) => {
                let quit = matches!(other, Line::Quit);
                if lines.send(other).is_err() || quit {
                    break;
                }
            }
            None => eprintln!("unrecognized input: {line}"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = ControllerConfig {
        tick_ms: cli.tick_ms,
        brightness_step: cli.step,
    };

    let serial = match &cli.device {
        Some(path) => {
            let port = tokio::fs::OpenOptions::new().write(true).open(path).await?;
            SerialClient::start(port)
        }
        None => {
            let (link, mut device) = tokio::io::duplex(4096);
            tokio::spawn(async move {
                let mut frame = [0u8; FRAME_LEN];
                while device.read_exact(&mut frame).await.is_ok() {
                    match SerialCommand::decode(&frame) {
                        Ok(command) => println!("frame {:?}", command.channels()),
                        Err(e) => eprintln!("bad frame: {e}"),
                    }
                }
            });
            SerialClient::start(link)
        }
    };

    let mut controller = Controller::start(&config, serial.clone());
    let bridge = BridgeAdapter::new(
        BridgeConfig::default(),
        controller.sender(),
        controller.subscribe(),
    );
    println!("bridge state topic: {}", bridge.config().state_topic());

    let (lines_tx, mut lines) = tokio::sync::mpsc::unbounded_channel();
    let sender = controller.sender();
    std::thread::spawn(move || read_stdin(sender, lines_tx, cli.step));

    while let Some(line) = lines.recv().await {
        match line {
            Line::Bridge(json) => match bridge.handle_message(json.as_bytes()) {
                Ok(count) => println!("queued {count} commands"),
                Err(e) => eprintln!("bridge: {e}"),
            },
            Line::Status => {
                println!("{}", String::from_utf8_lossy(&bridge.state_payload()?));
                println!("{}", serde_json::to_string(&serial.diagnostics())?);
            }
            Line::Quit => break,
            Line::Command(_) => {}
        }
    }

    controller.stop().await;
    Ok(())
}
