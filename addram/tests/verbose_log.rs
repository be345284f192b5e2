//! What a verbose run prints.

use std::sync::Mutex;

use addram::board::BoardHandle;
use addram::logging;
use addram::probe::{ProbeRange, Prober};
use addram::{Config, machine};
use drivers::platform::Platform;

static LINES: Mutex<Vec<String>> = Mutex::new(Vec::new());

struct Capture;

impl log::Log for Capture {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            LINES.lock().unwrap().push(record.args().to_string());
        }
    }

    fn flush(&self) {}
}

static CAPTURE: Capture = Capture;

fn captured() -> Vec<String> {
    LINES.lock().unwrap().clone()
}

#[test]
fn verbose_level_shows_every_tested_stride() {
    log::set_logger(&CAPTURE).unwrap();

    let machine = machine::classic(machine::MachineOptions {
        bonus_backed: 0x2_0000,
        ..machine::MachineOptions::default()
    });
    let board = BoardHandle::at(machine::BOARD_BASE);
    board.set_enabled(&mut machine.bus(), true);

    log::set_max_level(logging::level(false));
    Prober::new(machine.bus()).probe(ProbeRange::bonus_ram());
    assert!(!captured().iter().any(|l| l.starts_with("testing address")));

    log::set_max_level(logging::level(true));
    Prober::new(machine.bus()).probe(ProbeRange::bonus_ram());
    let lines = captured();
    for stride in ["0xa00000", "0xa10000", "0xa20000"] {
        assert!(
            lines.contains(&format!("testing address {stride}")),
            "missing {stride} in {lines:?}"
        );
    }

    // A full run reports the same sweep.
    let fresh = machine::classic(machine::MachineOptions::default());
    addram::run::run(&fresh, &Config::new().dry_run(true)).unwrap();
    assert!(captured().contains(&"testing address 0xbe0000".to_string()));
}
