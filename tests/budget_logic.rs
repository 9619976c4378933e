mod common;

use common::{expense, setup_gateway, temp_root};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use stage_budget::{
    core::{EngineState, ProjectSession},
    domain::{ExpenseLedger, StageCatalog},
};

fn scenario_state() -> EngineState {
    let catalog =
        StageCatalog::from_estimates([("Foundation", dec!(1000)), ("Framing", dec!(2000))])
            .expect("valid estimates");
    EngineState::new(catalog, ExpenseLedger::new())
}

#[test]
fn foundation_overrun_scenario() {
    let mut state = scenario_state();
    assert_eq!(
        state.variance().project_totals().as_tuple(),
        (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
    );

    state
        .add_expense(expense((2024, 7, 1), "Foundation", dec!(1200)))
        .unwrap();

    let variance = state.variance();
    assert_eq!(variance.balance("Foundation"), dec!(-200));
    assert!(variance.is_overrun("Foundation"));
    assert_eq!(
        variance.project_totals().as_tuple(),
        (dec!(1200), dec!(1000), dec!(-200))
    );
}

#[test]
fn per_stage_report_follows_catalog_regardless_of_ledger() {
    let mut state = scenario_state();
    let names = |state: &EngineState| {
        state
            .variance()
            .per_stage_report()
            .into_iter()
            .map(|row| row.stage)
            .collect::<Vec<_>>()
    };
    assert_eq!(names(&state), ["Foundation", "Framing"]);

    state
        .add_expense(expense((2024, 7, 2), "Framing", dec!(5)))
        .unwrap();
    state
        .add_expense(expense((2024, 7, 3), "Landscaping", dec!(5)))
        .unwrap();
    assert_eq!(names(&state), ["Foundation", "Framing"]);
}

#[test]
fn estimate_changes_do_not_touch_actuals() {
    let mut state = scenario_state();
    state
        .add_expense(expense((2024, 7, 4), "Framing", dec!(2100)))
        .unwrap();
    assert!(state.variance().is_overrun("Framing"));

    state.update_estimate("Framing", dec!(2500)).unwrap();
    assert_eq!(state.ledger.total_for("Framing"), dec!(2100));
    assert_eq!(state.variance().balance("Framing"), dec!(400));
    assert!(!state.variance().is_overrun("Framing"));
}

#[test]
fn session_totals_survive_restart_without_drift() {
    let root = temp_root();
    let stages = ["Foundation", "Framing", "Finishing"];
    let (gateway, _) = setup_gateway(&root, &stages);
    let mut session = ProjectSession::open(gateway);

    for day in 1..=12u32 {
        let stage = stages[(day % 3) as usize];
        let cost = Decimal::new(i64::from(day) * 2_503, 2);
        session
            .record_expense(expense((2024, 8, day), stage, cost))
            .unwrap();
    }
    assert!(session.record_expense(expense((2024, 8, 13), "Framing", dec!(-1))).is_err());

    let (gateway, _) = setup_gateway(&root, &stages);
    let reopened = ProjectSession::open(gateway);
    let ledger = &reopened.state().ledger;
    assert_eq!(ledger.len(), 12);
    for stage in stages {
        let expected: Decimal = ledger
            .all_records()
            .iter()
            .filter(|record| record.stage == stage)
            .map(|record| record.actual_cost)
            .sum();
        assert_eq!(ledger.total_for(stage), expected);
        assert_eq!(ledger.total_for(stage), session.state().ledger.total_for(stage));
    }
}
