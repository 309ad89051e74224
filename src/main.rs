mod settings; // brings `settings.rs` in as `crate::settings`
mod sim; // brings `sim.rs` in as `crate::sim`

use std::time::Duration;

use anyhow::Context;
use settings::{Settings, Step};
use sim::{SimBoard, SimOutput, SimPwm};
use sn754410::Sn754410;
use spin_sleep::SpinSleeper;
use tracing::{info, warn};
use tracing_subscriber::{self, EnvFilter};

type Driver = Sn754410<SimPwm, SimOutput>;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    info!("SN754410 bench started. Loading board settings...");
    let settings = settings::load_settings().context("loading bench settings")?;

    let mut board = SimBoard::new();
    let mut driver = build_driver(&mut board, &settings)?;

    run_sequence(&mut driver, &settings.sequence)?;

    info!(writes = board.write_count(), "Sequence finished.");
    board.report();
    Ok(())
}

fn build_driver(board: &mut SimBoard, settings: &Settings) -> anyhow::Result<Driver> {
    let config = settings.driver_config();
    info!(
        platform = ?settings.board.platform,
        pwm_pins = config.pwm_pins.len(),
        period_us = config.period_us,
        "Building driver"
    );

    let driver = if settings.is_dual() {
        Sn754410::dual(board, &config, settings.motor1, settings.motor2)
    } else {
        Sn754410::single(board, &config, settings.motor1)
    };
    driver.context("constructing SN754410 driver")
}

fn run_sequence(driver: &mut Driver, steps: &[Step]) -> anyhow::Result<()> {
    let sleeper = SpinSleeper::default();

    for (i, step) in steps.iter().enumerate() {
        let selector = step.selector();
        if selector.is_empty() {
            warn!(step = i, "Step selects no motor, skipping");
            continue;
        }

        if let Some(direction) = step.direction {
            driver
                .set_direction(selector, direction)
                .with_context(|| format!("step {i}: setting direction {direction:?}"))?;
        }
        if let Some(speed) = step.speed {
            driver
                .set_speed(selector, speed)
                .with_context(|| format!("step {i}: setting speed {speed}%"))?;
        }
        info!(step = i, ?selector, speed = ?step.speed, direction = ?step.direction, "Step applied");

        if step.hold_ms > 0 {
            sleeper.sleep(Duration::from_millis(step.hold_ms));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::PinState;
    use settings::BoardSettings;
    use sim::PinValue;
    use sn754410::{Direction, Motor, MotorPins, Pin, Platform, SharedEnablePin};

    fn step(motors: &[Motor], direction: Option<Direction>, speed: Option<i32>) -> Step {
        Step {
            motors: motors.to_vec(),
            speed,
            direction,
            hold_ms: 0,
        }
    }

    fn uno_settings() -> Settings {
        Settings {
            board: BoardSettings {
                platform: Platform::ArduinoUno,
                pwm_pins: None,
                period_us: 50_000,
                shared_enable: SharedEnablePin::Skip,
            },
            motor1: MotorPins::new(Some(Pin(9)), Some(Pin(7)), Some(Pin(8))),
            motor2: MotorPins::new(Some(Pin(10)), Some(Pin(12)), Some(Pin(13))),
            sequence: Vec::new(),
        }
    }

    #[test]
    fn test_sequence_applies_steps_in_order() {
        let mut board = SimBoard::new();
        let mut driver = build_driver(&mut board, &uno_settings()).unwrap();
        let built = board.write_count();

        let steps = [
            step(&[], Some(Direction::Forward), Some(80)),
            step(&[Motor::Motor1], Some(Direction::Reverse), Some(40)),
        ];
        run_sequence(&mut driver, &steps).unwrap();

        // The empty step writes nothing, the second writes two levels and one pulse.
        assert_eq!(board.write_count(), built + 3);
        assert_eq!(board.value(Pin(7)), Some(PinValue::Level(PinState::High)));
        assert_eq!(board.value(Pin(8)), Some(PinValue::Level(PinState::Low)));
        assert_eq!(
            board.value(Pin(9)),
            Some(PinValue::Pulse { period_us: 50_000, duty_us: 20_000 })
        );
        assert_eq!(board.value(Pin(12)), Some(PinValue::Level(PinState::Low)));
    }

    #[test]
    fn test_sequence_stops_at_failing_step() {
        let mut board = SimBoard::new();
        let mut driver = build_driver(&mut board, &uno_settings()).unwrap();

        let steps = [
            step(&[Motor::Motor2], Some(Direction::Forward), Some(150)),
            step(&[Motor::Motor1], None, Some(60)),
        ];
        let err = run_sequence(&mut driver, &steps).unwrap_err();
        assert!(err.to_string().starts_with("step 0: setting speed 150%"), "{err}");

        // Direction goes out before the speed is checked; nothing after the failure runs.
        assert_eq!(board.value(Pin(13)), Some(PinValue::Level(PinState::High)));
        assert_eq!(
            board.value(Pin(10)),
            Some(PinValue::Pulse { period_us: 50_000, duty_us: 0 })
        );
        assert_eq!(
            board.value(Pin(9)),
            Some(PinValue::Pulse { period_us: 50_000, duty_us: 0 })
        );
    }
}
