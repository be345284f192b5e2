//! End-to-end runs against the simulated machine.

use addram::layout::{BONUS_RAM_START, LEGACY_RAM_BASE};
use addram::machine::{self, BOARD_BASE, MachineOptions};
use addram::rebalance::LEGACY_CLEARED_ATTRIBUTES;
use addram::run::{Outcome, disable, run};
use addram::splice::{BONUS_RAM_ATTRIBUTES, Splice};
use addram::{AddRamError, Config};
use drivers::platform::sim::SimPlatform;
use std::sync::Arc;

fn with_bonus(bonus_backed: u32) -> MachineOptions {
    MachineOptions {
        bonus_backed,
        ..MachineOptions::default()
    }
}

fn control(machine: &SimPlatform) -> u8 {
    machine.sim_memory().control()
}

#[test]
fn adds_bonus_region_next_to_empty_slot() {
    let machine = machine::classic(MachineOptions {
        adjacent_fast: false,
        ..with_bonus(0x10_0000)
    });
    let config = Config::new().target_priority(5);

    let report = run(&machine, &config).unwrap();
    assert_eq!(report.detected, 0x10_0000);
    assert_eq!(report.board.base_address(), BOARD_BASE);
    assert_eq!(report.outcome, Outcome::Spliced(Splice::Added { priority: 3 }));

    let list = machine.snapshot();
    let bonus = list.get(list.find_base(BONUS_RAM_START).unwrap()).unwrap();
    assert_eq!((bonus.lower(), bonus.upper()), (0xA0_0000, 0xB0_0000));
    assert_eq!(bonus.priority, 3);
    assert_eq!(bonus.attributes, BONUS_RAM_ATTRIBUTES);
    assert_eq!(bonus.name.as_deref(), Some("GottaGoFast!!!"));

    let legacy = list.get(list.find_base(LEGACY_RAM_BASE).unwrap()).unwrap();
    assert_eq!(legacy.priority, 4);
    assert!(!legacy.attributes.intersects(LEGACY_CLEARED_ATTRIBUTES));

    let fast = list.get(list.find_base(BOARD_BASE).unwrap()).unwrap();
    assert_eq!(fast.priority, 5);
    assert_eq!(fast.name.as_deref(), Some("GottaGoFast!!!"));

    assert_ne!(control(&machine) & 0x20, 0);
}

#[test]
fn bonus_and_board_regions_share_one_name() {
    let machine = machine::classic(MachineOptions::default());
    run(&machine, &Config::new().target_priority(5)).unwrap();

    let list = machine.snapshot();
    let name_of = |base| {
        list.get(list.find_base(base).unwrap())
            .unwrap()
            .name
            .clone()
            .unwrap()
    };
    let bonus = name_of(BONUS_RAM_START);
    let fast = name_of(BOARD_BASE);
    assert_eq!(&*bonus, "GottaGoFast!!!");
    assert!(Arc::ptr_eq(&bonus, &fast));
}

#[test]
fn regions_end_up_in_priority_order() {
    let machine = machine::classic(MachineOptions::default());
    run(&machine, &Config::new().target_priority(5)).unwrap();

    let order: Vec<_> = machine
        .snapshot()
        .iter()
        .map(|r| (r.base(), r.priority))
        .collect();
    assert_eq!(
        order,
        [
            (BOARD_BASE, 5),
            (LEGACY_RAM_BASE, 4),
            (BONUS_RAM_START, 3),
            (0x1000, -10)
        ]
    );
}

#[test]
fn second_run_is_rejected_without_changes() {
    for merge in [false, true] {
        let machine = machine::classic(MachineOptions::default());
        let config = Config::new().merge_with_adjacent(merge).target_priority(5);

        run(&machine, &config).unwrap();
        let before = machine.snapshot();

        let err = run(&machine, &config).unwrap_err();
        assert_eq!(err, AddRamError::AlreadyPresent);
        assert_eq!(err.exit_code(), 5);
        assert_eq!(machine.snapshot(), before);
    }
}

#[test]
fn merge_grows_adjacent_region() {
    let machine = machine::classic(MachineOptions::default());
    let regions_before = machine.snapshot().len();
    let config = Config::new().merge_with_adjacent(true);

    let report = run(&machine, &config).unwrap();
    assert_eq!(
        report.outcome,
        Outcome::Spliced(Splice::Merged { base: BOARD_BASE })
    );

    let list = machine.snapshot();
    assert_eq!(list.len(), regions_before);
    assert!(list.find_base(BONUS_RAM_START).is_none());
    let fast = list.get(list.find_base(BOARD_BASE).unwrap()).unwrap();
    assert_eq!(fast.upper(), BONUS_RAM_START + 0x1F_0000);
}

#[test]
fn dry_run_leaves_list_and_register_untouched() {
    let machine = machine::classic(MachineOptions::default());
    let list_before = machine.snapshot();
    let control_before = control(&machine);

    let report = run(&machine, &Config::new().dry_run(true).target_priority(5)).unwrap();
    assert_eq!(report.outcome, Outcome::Skipped);
    assert_eq!(report.detected, 0x1F_0000);

    assert_eq!(machine.snapshot(), list_before);
    assert_eq!(control(&machine), control_before);
}

#[test]
fn dry_run_still_reports_detection_failures() {
    let config = Config::new().dry_run(true);

    let empty = machine::classic(with_bonus(0));
    let err = run(&empty, &config).unwrap_err();
    assert_eq!(err, AddRamError::NoMemoryDetected);
    assert_eq!(err.exit_code(), 10);

    let added = machine::classic(MachineOptions::default());
    run(&added, &Config::new()).unwrap();
    assert_eq!(run(&added, &config), Err(AddRamError::AlreadyPresent));
}

#[test]
fn missing_board_and_service_are_reported() {
    let machine = machine::classic(MachineOptions {
        board_present: false,
        ..MachineOptions::default()
    });
    let err = run(&machine, &Config::new()).unwrap_err();
    assert!(matches!(err, AddRamError::BoardNotFound { .. }));
    assert_eq!(err.exit_code(), 5);
    assert_eq!(machine.open_services(), 0);

    let machine = machine::classic(MachineOptions {
        expansion_service: false,
        ..MachineOptions::default()
    });
    let err = run(&machine, &Config::new()).unwrap_err();
    assert_eq!(err, AddRamError::ServiceUnavailable("expansion.library"));
    assert_eq!(err.exit_code(), 20);
}

#[test]
fn service_is_closed_after_success_and_failure() {
    let machine = machine::classic(MachineOptions::default());
    run(&machine, &Config::new()).unwrap();
    assert_eq!(machine.open_services(), 0);

    run(&machine, &Config::new()).unwrap_err();
    assert_eq!(machine.open_services(), 0);
}

#[test]
fn partial_bonus_ram_never_disturbs_cia() {
    let machine = machine::classic(with_bonus(0x8_0000));
    let report = run(&machine, &Config::new()).unwrap();

    assert_eq!(report.detected, 0x8_0000);
    assert_eq!(machine.sim_memory().side_effects(), 0);
}

#[test]
fn caches_are_cleared_only_on_later_systems() {
    let old = machine::classic(MachineOptions {
        soft_version: 34,
        ..with_bonus(0x2_0000)
    });
    run(&old, &Config::new().dry_run(true)).unwrap();
    assert_eq!(old.sim_memory().cache_clears(), 0);

    let new = machine::classic(MachineOptions {
        soft_version: 36,
        ..with_bonus(0x2_0000)
    });
    run(&new, &Config::new().dry_run(true)).unwrap();
    assert_eq!(new.sim_memory().cache_clears(), 3);
}

#[test]
fn forbid_is_balanced_over_a_run() {
    let machine = machine::classic(MachineOptions::default());
    run(&machine, &Config::new().target_priority(5)).unwrap();

    // Presence check, splice and rebalance.
    assert_eq!(machine.scheduler().entries(), 3);
    assert_eq!(machine.scheduler().nest(), -1);
}

#[test]
fn disable_clears_only_the_enable_bit() {
    let machine = machine::classic(MachineOptions::default());
    run(&machine, &Config::new()).unwrap();
    let list = machine.snapshot();

    assert!(disable(&machine, &Config::new().disable(true)).unwrap());
    assert_eq!(control(&machine) & 0x20, 0);
    assert_eq!(machine.snapshot(), list);

    let fresh = machine::classic(MachineOptions::default());
    assert!(!disable(&fresh, &Config::new().disable(true).dry_run(true)).unwrap());
    assert_eq!(control(&fresh), 0);
}
