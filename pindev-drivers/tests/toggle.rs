//! Interrupt toggle driver on the simulated board

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pindev_core::config::ToggleConfig;
use pindev_core::{InitError, Stage};
use pindev_drivers::InterruptToggleDriver;
use pindev_hal::{
    Direction, Edge, EdgeHandler, GpioController, InterruptController, IrqError, IrqNumber,
    IrqReturn,
};
use pindev_hal_sim::{Fault, SimBoard, IRQ_BASE};
use proptest::prelude::*;

const LED: u32 = 592;
const BUTTON: u32 = 585;

type Driver = InterruptToggleDriver<SimBoard, SimBoard, SimBoard>;

fn load(board: &SimBoard) -> Result<Driver, InitError> {
    InterruptToggleDriver::load(&ToggleConfig::default(), board, board, board)
}

#[test]
fn test_load_claims_everything() {
    let board = SimBoard::new();
    let driver = load(&board).unwrap();

    assert_eq!(board.device_files(), ["gpio_driver"]);
    assert_eq!(board.classes(), ["dummy_class"]);
    assert_eq!(board.owner(LED).as_deref(), Some("rpi-gpio-21"));
    assert_eq!(board.direction(LED), Some(Direction::Output));
    assert!(!board.level(LED));
    assert_eq!(board.owner(BUTTON).as_deref(), Some("rpi-gpio-14"));
    assert_eq!(board.direction(BUTTON), Some(Direction::Input));
    assert_eq!(driver.irq(), IRQ_BASE + BUTTON);
    assert_eq!(board.bound_irqs(), [IRQ_BASE + BUTTON]);
    assert_eq!(board.irq_name(driver.irq()).as_deref(), Some("button_handler"));
    assert!(!driver.light_on());
}

#[test]
fn test_button_presses_toggle_led() {
    let board = SimBoard::new();
    let driver = load(&board).unwrap();
    let file = board.open("gpio_driver").unwrap();

    board.press_button(BUTTON);
    assert!(driver.light_on());
    assert!(board.level(LED));
    assert_eq!(file.read(8), b"1\n");

    board.press_button(BUTTON);
    assert!(!driver.light_on());
    assert!(!board.level(LED));
    assert_eq!(file.read(8), b"0\n");
    assert_eq!(driver.edge_count(), 2);
}

#[test]
fn test_holding_the_button_is_one_edge() {
    let board = SimBoard::new();
    let driver = load(&board).unwrap();

    board.drive_input(BUTTON, true);
    board.drive_input(BUTTON, true);
    assert_eq!(driver.edge_count(), 1);

    // Release is a falling edge and is not serviced
    board.drive_input(BUTTON, false);
    assert_eq!(driver.edge_count(), 1);
    assert!(driver.light_on());
}

#[test]
fn test_write_one_then_zero() {
    let board = SimBoard::new();
    let driver = load(&board).unwrap();
    let file = board.open("gpio_driver").unwrap();

    assert_eq!(file.write(b"1"), 1);
    assert!(board.level(LED));
    assert_eq!(file.write(b"0"), 1);
    assert!(!board.level(LED));
    assert!(!driver.light_on());
    assert_eq!(file.read(3), b"0\n");
}

#[test]
fn test_other_bytes_consume_one_byte() {
    let board = SimBoard::new();
    let driver = load(&board).unwrap();
    let file = board.open("gpio_driver").unwrap();
    file.write(b"1");

    assert_eq!(file.write(b"hello"), 1);
    assert_eq!(file.write(b"\n"), 1);
    assert!(driver.light_on());
    assert!(board.level(LED));
}

#[test]
fn test_short_transfers() {
    let board = SimBoard::new();
    let driver = load(&board).unwrap();
    let file = board.open("gpio_driver").unwrap();

    // Faulting on the first byte applies nothing
    assert_eq!(file.write_faulting(b"1", 0), 0);
    assert!(!driver.light_on());

    file.write(b"1");
    assert_eq!(file.read(1), b"1");
    assert_eq!(file.read_faulting(8, 1), b"1");
    assert_eq!(file.read_faulting(8, 0), b"");
    assert_eq!(file.read(0), b"");
}

#[test]
fn test_unload_releases_in_reverse() {
    let board = SimBoard::new();
    let driver = load(&board).unwrap();
    board.open("gpio_driver").unwrap().write(b"1");
    assert!(board.level(LED));

    drop(driver);

    assert!(board.is_idle());
    assert!(board.violations().is_empty());
    assert!(!board.level(LED));
    assert!(board.open("gpio_driver").is_none());

    // Nothing is listening any more
    board.press_button(BUTTON);
    assert!(board.violations().is_empty());
}

#[test]
fn test_busy_led_fails_load() {
    let board = SimBoard::new();
    board.acquire(LED, "someone-else").unwrap();

    assert_eq!(load(&board).err(), Some(InitError::PinBusy(LED)));
    assert_eq!(board.held_pins(), [LED]);
    assert!(board.device_files().is_empty());
    assert!(board.classes().is_empty());
}

#[test]
fn test_failure_at_every_step_unwinds() {
    let steps = [
        (Fault::DeviceNumber, InitError::Allocation(Stage::DeviceNumber)),
        (Fault::Class, InitError::Allocation(Stage::Class)),
        (Fault::DeviceFile, InitError::Allocation(Stage::DeviceFile)),
        (Fault::CharDevice, InitError::Allocation(Stage::CharDevice)),
        (Fault::Acquire(LED), InitError::PinBusy(LED)),
        (Fault::Direction(LED), InitError::PinConfig(LED)),
        (Fault::Acquire(BUTTON), InitError::PinBusy(BUTTON)),
        (Fault::Direction(BUTTON), InitError::PinConfig(BUTTON)),
        (
            Fault::IrqMapping(BUTTON),
            InitError::InterruptBinding(IrqError::NoMapping),
        ),
        (
            Fault::IrqRequest(IRQ_BASE + BUTTON),
            InitError::InterruptBinding(IrqError::Busy),
        ),
    ];

    for (fault, expected) in steps {
        let board = SimBoard::new();
        board.inject(fault);

        assert_eq!(load(&board).err(), Some(expected), "{:?}", fault);
        assert!(board.is_idle(), "{:?} left resources held", fault);
        assert!(board.violations().is_empty(), "{:?}: {:?}", fault, board.violations());

        board.clear_faults();
        let driver = load(&board);
        assert!(driver.is_ok(), "{:?}: reload failed", fault);
    }
}

#[test]
fn test_reload_after_unload() {
    let board = SimBoard::new();
    drop(load(&board).unwrap());
    let driver = load(&board).unwrap();

    board.press_button(BUTTON);
    assert!(driver.light_on());
    assert!(board.violations().is_empty());
}

#[test]
fn test_second_instance_fails_cleanly() {
    let board = SimBoard::new();
    let _first = load(&board).unwrap();

    // Same class name is rejected before any line is touched
    assert_eq!(load(&board).err(), Some(InitError::Allocation(Stage::Class)));
    assert_eq!(board.held_pins(), [BUTTON, LED]);
    assert!(board.violations().is_empty());
}

#[test]
fn test_edges_race_writes() {
    let board = SimBoard::new();
    let driver = load(&board).unwrap();

    std::thread::scope(|s| {
        s.spawn(|| {
            for _ in 0..500 {
                board.press_button(BUTTON);
            }
        });
        s.spawn(|| {
            let file = board.open("gpio_driver").unwrap();
            for i in 0..500 {
                let cmd = if i % 2 == 0 { b"1" } else { b"0" };
                assert_eq!(file.write(cmd), 1);
                assert!(driver.led_in_sync());
                let report = file.read(2);
                assert!(report == b"0\n" || report == b"1\n");
            }
        });
    });

    assert_eq!(driver.edge_count(), 500);
    assert_eq!(board.level(LED), driver.light_on());
    assert_eq!(driver.led_level(), driver.light_on());
    assert!(driver.led_in_sync());
}

#[test]
fn test_commands_during_unload_never_reach_the_line() {
    let board = SimBoard::new();
    let driver = load(&board).unwrap();
    let file = board.open("gpio_driver").unwrap();

    // The open file outlives the driver; the line has a new owner
    drop(driver);
    board.acquire(LED, "next-owner").unwrap();
    board.direction_output(LED, false).unwrap();

    assert_eq!(file.write(b"1"), 1);
    assert!(!board.level(LED));
    assert_eq!(file.read(2), b"0\n");
    assert!(board.violations().is_empty());
}

#[derive(Default)]
struct Stall {
    started: AtomicBool,
    done: AtomicBool,
}

/// Handler wrapper that sleeps before running the real handler
struct Stalled {
    inner: Arc<dyn EdgeHandler>,
    stall: Arc<Stall>,
}

impl EdgeHandler for Stalled {
    fn handle(&self, irq: IrqNumber) -> IrqReturn {
        self.stall.started.store(true, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(100));
        let ret = self.inner.handle(irq);
        self.stall.done.store(true, Ordering::SeqCst);
        ret
    }
}

#[derive(Clone)]
struct StallingIrq {
    board: SimBoard,
    stall: Arc<Stall>,
}

impl InterruptController for StallingIrq {
    fn register_edge_handler(
        &self,
        irq: IrqNumber,
        edge: Edge,
        name: &str,
        handler: Arc<dyn EdgeHandler>,
    ) -> Result<(), IrqError> {
        let stalled = Stalled {
            inner: handler,
            stall: self.stall.clone(),
        };
        self.board.register_edge_handler(irq, edge, name, Arc::new(stalled))
    }

    fn unregister_handler(&self, irq: IrqNumber) {
        self.board.unregister_handler(irq);
    }
}

#[test]
fn test_unload_waits_for_running_handler() {
    let board = SimBoard::new();
    let stall = Arc::new(Stall::default());
    let ctrl = StallingIrq {
        board: board.clone(),
        stall: stall.clone(),
    };
    let driver = InterruptToggleDriver::load(&ToggleConfig::default(), &board, &ctrl, &board).unwrap();

    std::thread::scope(|s| {
        s.spawn(|| board.drive_input(BUTTON, true));

        while !stall.started.load(Ordering::SeqCst) {
            std::thread::yield_now();
        }
        drop(driver);
        assert!(stall.done.load(Ordering::SeqCst));
    });

    assert!(!board.level(LED));
    assert!(board.is_idle());
    assert!(board.violations().is_empty());
}

#[derive(Debug, Clone)]
enum Op {
    Press,
    Write(u8),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Press),
        any::<u8>().prop_map(Op::Write),
        prop_oneof![Just(b'0'), Just(b'1')].prop_map(Op::Write),
    ]
}

proptest! {
    #[test]
    fn prop_led_follows_model(ops in proptest::collection::vec(op(), 0..64)) {
        let board = SimBoard::new();
        let driver = load(&board).unwrap();
        let file = board.open("gpio_driver").unwrap();
        let mut model = false;

        for op in ops {
            match op {
                Op::Press => {
                    board.press_button(BUTTON);
                    model = !model;
                }
                Op::Write(byte) => {
                    prop_assert_eq!(file.write(&[byte]), 1);
                    match byte {
                        b'0' => model = false,
                        b'1' => model = true,
                        _ => {}
                    }
                }
            }
            prop_assert_eq!(driver.light_on(), model);
            prop_assert_eq!(board.level(LED), model);
        }

        let expected = if model { b"1\n" } else { b"0\n" };
        prop_assert_eq!(file.read(2), expected.to_vec());
    }

    #[test]
    fn prop_edge_parity(presses in 0usize..50) {
        let board = SimBoard::new();
        let driver = load(&board).unwrap();

        for _ in 0..presses {
            board.press_button(BUTTON);
        }
        prop_assert_eq!(driver.light_on(), presses % 2 == 1);
        prop_assert_eq!(driver.edge_count() as usize, presses);
    }
}
