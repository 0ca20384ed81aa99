//! End-to-end protocol tests: request line in, exactly one reply line out.

use rigctl::app::service::Rig;
use rigctl::cli::args::{Args, Reply};
use rigctl::cli::engine::{CommandHandler, POLL_BUDGET};
use rigctl::config::RigConfig;
use rigctl::error::{Result, SensorError};
use smart_leds::RGB8;

use crate::mock_hw::{LoopbackTransport, MockBoard, RegisterCall, RigBuilder, TestRig};

// ── Handshake and tag placement ──────────────────────────────

#[test]
fn handshake_echoes_tag_in_either_position() {
    let mut t = TestRig::new();
    assert_eq!(t.send("x1 handshake\n"), "x1 OK :)\n");
    assert_eq!(t.send("handshake x2\n"), "x2 OK :)\n");
    assert_eq!(t.send("handshake\n"), "OK :)\n");
}

#[test]
fn trailing_arguments_are_ignored() {
    let mut t = TestRig::new();
    assert_eq!(t.send("x1 handshake extra stuff\n"), "x1 OK :)\n");
}

#[test]
fn unrecognized_command_reports_name() {
    let mut t = TestRig::new();
    assert_eq!(
        t.send("x1 bogus\n"),
        "x1 ERROR Unrecognized command [bogus]!\n"
    );
    assert_eq!(t.send("bogus\n"), "ERROR Unrecognized command [bogus]!\n");
}

#[test]
fn unrecognized_name_is_truncated() {
    let mut t = TestRig::new();
    let name = "z".repeat(80);
    let reply = t.send(&format!("x1 {name}\n"));
    assert_eq!(
        reply,
        format!("x1 ERROR Unrecognized command [{}]!\n", "z".repeat(32))
    );
}

#[test]
fn command_names_are_case_sensitive() {
    let mut t = TestRig::new();
    assert_eq!(
        t.send("x1 HANDSHAKE\n"),
        "x1 ERROR Unrecognized command [HANDSHAKE]!\n"
    );
}

// ── set_relay ────────────────────────────────────────────────

#[test]
fn close_single_relay() {
    let mut t = TestRig::new();
    assert_eq!(t.send("x1 set_relay close 3\n"), "x1 OK\n");
    assert!(t.relay_bits()[3]);
    assert_eq!(t.relay_bits().iter().filter(|b| **b).count(), 1);
    assert_eq!(t.register_calls().last(), Some(&RegisterCall::Set(3, true)));
}

#[test]
fn broadcast_closes_all_in_one_write() {
    let mut t = TestRig::new();
    let before = t.register_calls().len();
    assert_eq!(t.send("x1 set_relay close 255\n"), "x1 OK\n");
    assert!(t.relay_bits().iter().all(|b| *b));
    assert_eq!(t.register_calls().len(), before + 1);
    assert_eq!(t.register_calls().last(), Some(&RegisterCall::SetAll(true)));

    assert_eq!(t.send("x1 set_relay open 255\n"), "x1 OK\n");
    assert!(t.relay_bits().iter().all(|b| !*b));
}

#[test]
fn inverted_bank_drives_inverse_level() {
    let mut t = RigBuilder {
        config: RigConfig {
            relays_inverted: true,
            ..RigConfig::default()
        },
        ..RigBuilder::default()
    }
    .build();
    assert_eq!(t.send("x1 set_relay close 5\n"), "x1 OK\n");
    assert!(!t.relay_bits()[5]);
    assert!(t.relay_bits()[4]);
}

#[test]
fn set_relay_argument_errors() {
    let mut t = TestRig::new();
    assert_eq!(t.send("x1 set_relay\n"), "x1 ERROR No action specified!\n");
    assert_eq!(
        t.send("x1 set_relay toggle 3\n"),
        "x1 ERROR Invalid action!\n"
    );
    assert_eq!(
        t.send("x1 set_relay close\n"),
        "x1 ERROR No relay id specified!\n"
    );
    assert_eq!(
        t.send("x1 set_relay close abc\n"),
        "x1 ERROR Invalid relay id!\n"
    );
    assert_eq!(
        t.send("x1 set_relay close 256\n"),
        "x1 ERROR Invalid relay id!\n"
    );
}

#[test]
fn action_is_validated_before_id() {
    let mut t = TestRig::new();
    assert_eq!(
        t.send("x1 set_relay toggle abc\n"),
        "x1 ERROR Invalid action!\n"
    );
}

#[test]
fn out_of_range_relay_writes_nothing() {
    let mut t = TestRig::new();
    let before = t.register_calls().to_vec();
    assert_eq!(
        t.send("x1 set_relay close 32\n"),
        "x1 ERROR Invalid relay id!\n"
    );
    assert_eq!(t.register_calls(), before.as_slice());
}

#[test]
fn register_failure_is_reported() {
    let mut t = TestRig::new();
    t.rig.relays.register_mut().fail = true;
    assert_eq!(
        t.send("x1 set_relay close 1\n"),
        "x1 ERROR Relay write failed!\n"
    );
}

// ── get_sensor ───────────────────────────────────────────────

#[test]
fn scale_reading_in_calibrated_units() {
    let mut t = TestRig::new();
    t.raw.set(Some(2_500));
    assert_eq!(t.send("x1 get_sensor scale\n"), "x1 OK 2.50\n");
    let (samples, timeout) = *t.requests.borrow().last().unwrap();
    assert_eq!(samples, 5);
    assert_eq!(timeout, 200);
}

#[test]
fn scale_not_ready() {
    let mut t = TestRig::new();
    t.raw.set(None);
    assert_eq!(
        t.send("x1 get_sensor scale\n"),
        "x1 ERROR Scale not ready!\n"
    );
}

#[test]
fn temperature_reading_and_faults() {
    let mut t = TestRig::new();
    assert_eq!(t.send("x1 get_sensor temperature\n"), "x1 OK 21.50\n");

    t.temp.set(Err(SensorError::OutOfRange));
    assert_eq!(
        t.send("x1 get_sensor temperature\n"),
        "x1 ERROR Temperature out of range!\n"
    );

    t.temp.set(Err(SensorError::AdcReadFailed));
    assert_eq!(
        t.send("x1 get_sensor temperature\n"),
        "x1 ERROR Temperature sensor fault!\n"
    );
}

#[test]
fn get_sensor_argument_errors() {
    let mut t = TestRig::new();
    assert_eq!(t.send("x1 get_sensor\n"), "x1 ERROR No sensor specified!\n");
    assert_eq!(
        t.send("x1 get_sensor humidity\n"),
        "x1 ERROR Invalid sensor!\n"
    );
}

// ── calibrate_sensor ─────────────────────────────────────────

#[test]
fn tare_then_calibrate_then_read() {
    let mut t = TestRig::new();

    t.raw.set(Some(1_000));
    assert_eq!(t.send("x1 calibrate_sensor scale tare\n"), "x1 OK\n");
    assert_eq!(t.rig.scale.offset(), 1_000);

    t.raw.set(Some(44_000));
    assert_eq!(
        t.send("x1 calibrate_sensor scale weight 200\n"),
        "x1 OK\n"
    );
    assert_eq!(t.rig.scale.factor(), 215.0);
    assert_eq!(t.send("x1 get_sensor scale\n"), "x1 OK 200.00\n");

    let image = t.rig.scale.store().eeprom().inner.image();
    assert_eq!(&image[0..4], &215.0f32.to_le_bytes());
}

#[test]
fn tare_never_fails() {
    let mut t = TestRig::new();
    t.raw.set(None);
    assert_eq!(t.send("x1 calibrate_sensor scale tare\n"), "x1 OK\n");
    assert_eq!(t.rig.scale.offset(), 0);
}

#[test]
fn calibrate_without_reading() {
    let mut t = TestRig::new();
    t.raw.set(None);
    assert_eq!(
        t.send("x1 calibrate_sensor scale weight 100\n"),
        "x1 ERROR Scale not ready!\n"
    );

    t.raw.set(Some(0));
    assert_eq!(
        t.send("x1 calibrate_sensor scale weight 100\n"),
        "x1 ERROR Scale reading out of range!\n"
    );
    assert_eq!(t.rig.scale.factor(), 1000.0);
}

#[test]
fn failed_persistence_keeps_new_factor() {
    let mut t = RigBuilder {
        fail_writes: true,
        ..RigBuilder::default()
    }
    .build();
    t.raw.set(Some(5_000));
    assert_eq!(
        t.send("x1 calibrate_sensor scale weight 10\n"),
        "x1 ERROR Calibration not persisted!\n"
    );
    assert_eq!(t.rig.scale.factor(), 500.0);
    assert_eq!(t.send("x1 get_sensor scale\n"), "x1 OK 10.00\n");
}

#[test]
fn calibrate_argument_errors() {
    let mut t = TestRig::new();
    let cases = [
        ("x1 calibrate_sensor\n", "x1 ERROR No sensor specified!\n"),
        (
            "x1 calibrate_sensor temperature tare\n",
            "x1 ERROR Invalid sensor!\n",
        ),
        (
            "x1 calibrate_sensor scale\n",
            "x1 ERROR No calibration specified!\n",
        ),
        (
            "x1 calibrate_sensor scale zero\n",
            "x1 ERROR Invalid calibration!\n",
        ),
        (
            "x1 calibrate_sensor scale weight\n",
            "x1 ERROR No weight specified!\n",
        ),
        (
            "x1 calibrate_sensor scale weight abc\n",
            "x1 ERROR Invalid weight!\n",
        ),
        (
            "x1 calibrate_sensor scale weight -5\n",
            "x1 ERROR Invalid weight!\n",
        ),
        (
            "x1 calibrate_sensor scale weight inf\n",
            "x1 ERROR Invalid weight!\n",
        ),
    ];
    for (input, expected) in cases {
        assert_eq!(t.send(input), expected, "input {input:?}");
    }
    assert_eq!(t.rig.scale.factor(), 1000.0);
}

// ── set_light ────────────────────────────────────────────────

#[test]
fn set_light_targets() {
    let mut t = TestRig::new();
    assert_eq!(t.send("x1 set_light color 0 0 255\n"), "x1 OK\n");
    assert_eq!(t.rig.pixels.target_color(), RGB8::new(0, 0, 255));

    assert_eq!(t.send("x1 set_light intensity 40\n"), "x1 OK\n");
    assert_eq!(t.rig.pixels.target_brightness(), 40);

    assert_eq!(t.send("x1 set_light transition 0\n"), "x1 OK\n");
    assert_eq!(t.rig.pixels.transition_time(), 0);
}

#[test]
fn set_light_argument_errors_change_nothing() {
    let mut t = TestRig::new();
    let target = t.rig.pixels.target_color();
    let cases = [
        ("x1 set_light\n", "x1 ERROR No action specified!\n"),
        ("x1 set_light blink\n", "x1 ERROR Invalid action!\n"),
        ("x1 set_light color\n", "x1 ERROR No red value specified!\n"),
        ("x1 set_light color 1\n", "x1 ERROR No green value specified!\n"),
        ("x1 set_light color 1 2\n", "x1 ERROR No blue value specified!\n"),
        ("x1 set_light color 1 2 300\n", "x1 ERROR Invalid blue value!\n"),
        ("x1 set_light color x 2 3\n", "x1 ERROR Invalid red value!\n"),
        ("x1 set_light intensity\n", "x1 ERROR No intensity specified!\n"),
        ("x1 set_light intensity 256\n", "x1 ERROR Invalid intensity!\n"),
        (
            "x1 set_light transition\n",
            "x1 ERROR No transition time specified!\n",
        ),
        (
            "x1 set_light transition -1\n",
            "x1 ERROR Invalid transition time!\n",
        ),
    ];
    for (input, expected) in cases {
        assert_eq!(t.send(input), expected, "input {input:?}");
    }
    assert_eq!(t.rig.pixels.target_color(), target);
    assert_eq!(t.rig.pixels.target_brightness(), 255);
    assert_eq!(t.rig.pixels.transition_time(), 300);
}

// ── Framing ──────────────────────────────────────────────────

#[test]
fn one_reply_per_line_in_order() {
    let mut t = TestRig::new();
    let out = t.send("a handshake\r\n\n   \nb set_relay close 1\nc nope\n");
    assert_eq!(
        out,
        "a OK :)\nb OK\nc ERROR Unrecognized command [nope]!\n"
    );
}

#[test]
fn repeated_separators_are_ignored() {
    let mut t = TestRig::new();
    assert_eq!(t.send("x1   set_relay  close   3\n"), "x1 OK\n");
}

#[test]
fn overlong_line_is_dropped_silently() {
    let mut t = TestRig::new();
    let junk = "x".repeat(1_100);
    assert_eq!(t.send(&format!("{junk}\nx1 handshake\n")), "x1 OK :)\n");
}

#[test]
fn poll_drains_transport_in_small_reads() {
    let mut t = TestRig::new();
    let mut uart =
        LoopbackTransport::with_input(b"x1 handshake\r\nx2 set_relay close 1\nx3 hand", 3);
    assert_eq!(t.engine.poll(&mut uart, &mut t.rig), 2);
    assert_eq!(uart.output(), "x1 OK :)\nx2 OK\n");
    assert_eq!(uart.flushes, 1);

    uart.rx.extend(b"shake\n");
    assert_eq!(t.engine.poll(&mut uart, &mut t.rig), 1);
    assert_eq!(uart.output(), "x1 OK :)\nx2 OK\nx3 OK :)\n");
}

#[test]
fn busy_line_is_served_over_several_polls() {
    let mut t = TestRig::new();
    let input = "x handshake\n".repeat(100);
    let mut uart = LoopbackTransport::with_input(input.as_bytes(), 64);

    assert_eq!(t.engine.poll(&mut uart, &mut t.rig), POLL_BUDGET / 12);
    assert_eq!(uart.rx.len(), input.len() - POLL_BUDGET);

    let mut replies = POLL_BUDGET / 12;
    let mut now = 0;
    while !uart.rx.is_empty() {
        now += 20;
        t.rig.tick(now);
        replies += t.engine.poll(&mut uart, &mut t.rig);
    }
    assert_eq!(replies, 100);
    assert_eq!(uart.output(), "x OK :)\n".repeat(100));
}

#[test]
fn poll_with_nothing_pending_writes_nothing() {
    let mut t = TestRig::new();
    let mut uart = LoopbackTransport::default();
    assert_eq!(t.engine.poll(&mut uart, &mut t.rig), 0);
    assert!(uart.tx.is_empty());
    assert_eq!(uart.flushes, 0);
}

#[test]
fn custom_separator_and_line_break() {
    let config = RigConfig {
        separator: ',',
        line_break: b';',
        ..RigConfig::default()
    };
    let mut t = RigBuilder {
        config,
        ..RigBuilder::default()
    }
    .build();
    assert_eq!(t.send("x1,set_relay,close,2;"), "x1,OK;");
    assert_eq!(t.send("x1,set_relay;"), "x1,ERROR,No action specified!;");
}

// ── Extensibility ────────────────────────────────────────────

struct Ping;

impl CommandHandler<MockBoard> for Ping {
    fn execute(&self, _rig: &mut Rig<MockBoard>, _args: &mut Args<'_>) -> Result<Reply> {
        Ok(Reply::Text("pong"))
    }
}

#[test]
fn registered_handler_is_dispatched() {
    let mut t = TestRig::new();
    assert!(!t.engine.table().contains("ping"));
    t.engine.table_mut().register("ping", Ping);
    assert_eq!(t.send("t ping\n"), "t OK pong\n");
    assert_eq!(t.send("ping u\n"), "u OK pong\n");
    assert_eq!(t.engine.table().names().count(), 6);
}
