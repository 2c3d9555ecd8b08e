//! Desktop simulator for the two-button Zigbee switch.
//!
//! Runs the hue-switch-core controller against a simulated Zigbee stack and
//! Hue bulb. Lines typed on stdin stand in for the buttons and for stack
//! events that would normally come from the radio.
//!
//! # Commands
//!
//! | Input | Action                                   |
//! |-------|------------------------------------------|
//! | 0     | Release BTN0 (create and open network)   |
//! | 1     | Release BTN1 (toggle the joined bulb)    |
//! | j     | Let another device join                  |
//! | d     | Drop the network                         |
//! | c     | Radio asks for calibration               |
//! | q     | Quit                                     |
//!
//! Set `RUST_LOG=debug` for frame-level output.

mod config;
mod sim_stack;

use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use hue_switch_core::{ButtonId, ButtonState, Controller, InputLatch, NotificationChannel};
use log::{error, info};

use config::{ConfigError, SimulatorConfig};
use sim_stack::SimulatedStack;

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Written by the stdin thread the way a button interrupt would write it
static LATCH: InputLatch = InputLatch::new();

/// Stack callbacks waiting for the next tick
static NOTIFICATIONS: NotificationChannel = NotificationChannel::new();

/// Commands that drive the simulated stack rather than the buttons
#[derive(Debug)]
enum SimCommand {
    JoinDevice,
    DropNetwork,
    Calibrate,
    Quit,
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Read stdin lines, latching buttons directly and forwarding the rest
fn spawn_input_thread() -> Receiver<SimCommand> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let input = line.trim();

            // Buttons bypass the scheduler, like an interrupt would
            if let Some(button) = input.parse().ok().and_then(ButtonId::from_index) {
                LATCH.on_button_change(button, ButtonState::Pressed);
                LATCH.on_button_change(button, ButtonState::Released);
                continue;
            }

            let command = match input {
                "j" => SimCommand::JoinDevice,
                "d" => SimCommand::DropNetwork,
                "c" => SimCommand::Calibrate,
                "q" => SimCommand::Quit,
                "" => continue,
                other => {
                    error!("Unknown command {:?}", other);
                    continue;
                }
            };
            if tx.send(command).is_err() {
                break;
            }
        }
        // stdin closed
        let _ = tx.send(SimCommand::Quit);
    });

    rx
}

// ---------------------------------------------------------------------------
// Main loop
// ---------------------------------------------------------------------------

fn main() -> Result<(), ConfigError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SimulatorConfig::from_env()?;
    info!(
        "Switch simulator: source endpoint {}, bulb endpoint {}, tick {:?}",
        config.controller.source_endpoint, config.controller.target_endpoint, config.tick
    );
    info!(
        "Commands: 0 = create network, 1 = toggle bulb, j = join device, \
         d = drop network, c = calibrate, q = quit"
    );

    let mut stack = SimulatedStack::new(NOTIFICATIONS.sender());
    let mut controller = Controller::new(config.controller, &LATCH);
    let commands = spawn_input_thread();
    let receiver = NOTIFICATIONS.receiver();

    loop {
        match commands.try_recv() {
            Ok(SimCommand::Quit) | Err(TryRecvError::Disconnected) => break,
            Ok(SimCommand::JoinDevice) => stack.join_other_device(),
            Ok(SimCommand::DropNetwork) => stack.drop_network(),
            Ok(SimCommand::Calibrate) => stack.request_calibration(),
            Err(TryRecvError::Empty) => {}
        }

        stack.advance();
        let reaction = controller.poll(&receiver, &mut stack);
        for transition in &reaction.transitions {
            info!("Network: {:?} -> {:?}", transition.from, transition.to);
        }

        thread::sleep(config.tick);
    }

    info!(
        "Exiting in state {:?}, bulb {}",
        controller.state(),
        if stack.bulb_on() { "ON" } else { "OFF" }
    );
    Ok(())
}
