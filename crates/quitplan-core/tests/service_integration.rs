//! End-to-end tests for the quit-plan service.
//!
//! These tests drive the full workflow of recording a baseline, creating a
//! plan, logging progress and reading savings against an in-memory database.

use chrono::NaiveDate;
use quitplan_core::{Config, CoreError, Database, QuitPlanService};
use rust_decimal::Decimal;
use std::str::FromStr;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[test]
fn test_full_quit_workflow() {
    let db = Database::open_memory().unwrap();
    let config = Config::default();
    let svc = QuitPlanService::new(&db, &config);

    svc.record_baseline("alex", 10, dec("20000")).unwrap();
    let created = svc.create_plan("alex", date(2024, 1, 1), 1.0).unwrap();
    assert_eq!(created.milestones.len(), 10);

    // Ten days: target sum 81, smoked 31
    for day in 0..10u32 {
        let smoked = if day == 9 { 4 } else { 3 };
        svc.record_progress("alex", date(2024, 1, 1 + day), smoked, None)
            .unwrap();
    }

    let report = svc.savings("alex").unwrap();
    assert_eq!(report.plan_id, created.plan.id);
    assert_eq!(report.price_per_cigarette, dec("1000"));
    assert_eq!(report.days_logged, 10);
    assert_eq!(report.cigarettes_avoided, 50);
    assert_eq!(report.money_saved, dec("50000"));
    assert_eq!(report.time_saved_minutes, 250);
    assert_eq!(report.time_saved_hours, dec("4.17"));
}

#[test]
fn test_upsert_is_idempotent_for_savings() {
    let db = Database::open_memory().unwrap();
    let config = Config::default();
    let svc = QuitPlanService::new(&db, &config);

    svc.record_baseline("u", 10, dec("20")).unwrap();
    svc.create_plan("u", date(2024, 5, 1), 1.0).unwrap();

    svc.record_progress("u", date(2024, 5, 1), 9, Some("first try"))
        .unwrap();
    let before = svc.savings("u").unwrap();
    assert_eq!(before.cigarettes_avoided, 0);

    svc.record_progress("u", date(2024, 5, 1), 2, Some("corrected"))
        .unwrap();
    let after = svc.savings("u").unwrap();
    assert_eq!(after.days_logged, 1);
    assert_eq!(after.total_smoked, 2);
    assert_eq!(after.cigarettes_avoided, 7);

    let entries = svc.progress("u").unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].note.as_deref(), Some("corrected"));
}

#[test]
fn test_zero_data_report() {
    let db = Database::open_memory().unwrap();
    let config = Config::default();
    let svc = QuitPlanService::new(&db, &config);

    svc.record_baseline("u", 15, dec("9.99")).unwrap();
    svc.create_plan("u", date(2024, 5, 1), 3.0).unwrap();

    let report = svc.savings("u").unwrap();
    assert_eq!(report.days_logged, 0);
    assert_eq!(report.cigarettes_avoided, 0);
    assert_eq!(report.money_saved, Decimal::ZERO);
    assert_eq!(report.time_saved_minutes, 0);
    assert_eq!(report.time_saved_hours, Decimal::ZERO);
}

#[test]
fn test_new_plan_replaces_active_plan() {
    let db = Database::open_memory().unwrap();
    let config = Config::default();
    let svc = QuitPlanService::new(&db, &config);

    svc.record_baseline("u", 20, dec("10")).unwrap();
    let first = svc.create_plan("u", date(2024, 1, 1), 2.0).unwrap().plan;
    svc.record_progress("u", date(2024, 1, 2), 18, None).unwrap();

    // A later baseline drives the next plan
    svc.record_baseline("u", 12, dec("11")).unwrap();
    let second = svc.create_plan("u", date(2024, 2, 1), 1.5).unwrap();
    assert_eq!(second.plan.baseline_cigarettes, 12);
    assert_eq!(second.milestones.len(), 12);
    assert_eq!(second.milestones.last().unwrap().day_offset, 45);

    assert_eq!(svc.active_plan("u").unwrap().id, second.plan.id);
    let history = svc.plan_history("u").unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().any(|p| p.id == first.id && p.is_done));

    // Progress of the retired plan is kept but no longer counts
    assert!(svc.progress("u").unwrap().is_empty());
    let old = svc.plan_with_milestones("u", &first.id).unwrap();
    assert!(old.plan.is_done);
    assert_eq!(old.milestones.len(), 20);
}

#[test]
fn test_other_users_cannot_delete_or_read_plan() {
    let db = Database::open_memory().unwrap();
    let config = Config::default();
    let svc = QuitPlanService::new(&db, &config);

    svc.record_baseline("alice", 10, dec("10")).unwrap();
    let plan = svc.create_plan("alice", date(2024, 1, 1), 1.0).unwrap().plan;

    assert!(matches!(
        svc.delete_plan("bob", &plan.id),
        Err(CoreError::PlanNotFound(_))
    ));
    assert!(matches!(
        svc.plan_with_milestones("bob", &plan.id),
        Err(CoreError::PlanNotFound(_))
    ));

    assert_eq!(svc.active_plan("alice").unwrap().id, plan.id);
    assert_eq!(svc.plan_with_milestones("alice", &plan.id).unwrap().milestones.len(), 10);
}

#[test]
fn test_delete_plan_removes_everything() {
    let db = Database::open_memory().unwrap();
    let config = Config::default();
    let svc = QuitPlanService::new(&db, &config);

    svc.record_baseline("u", 10, dec("10")).unwrap();
    let plan = svc.create_plan("u", date(2024, 1, 1), 1.0).unwrap().plan;
    svc.record_progress("u", date(2024, 1, 1), 5, None).unwrap();

    svc.delete_plan("u", &plan.id).unwrap();
    assert!(matches!(
        svc.plan_with_milestones("u", &plan.id),
        Err(CoreError::PlanNotFound(_))
    ));
    assert!(matches!(svc.savings("u"), Err(CoreError::PlanNotFound(_))));
    let leftover: i64 = db
        .conn()
        .query_row("SELECT COUNT(*) FROM progress_entries", [], |row| row.get(0))
        .unwrap();
    assert_eq!(leftover, 0);
}

#[test]
fn test_users_are_isolated() {
    let db = Database::open_memory().unwrap();
    let config = Config::default();
    let svc = QuitPlanService::new(&db, &config);

    svc.record_baseline("a", 10, dec("10")).unwrap();
    svc.record_baseline("b", 30, dec("12")).unwrap();
    let a = svc.create_plan("a", date(2024, 1, 1), 1.0).unwrap().plan;
    let b = svc.create_plan("b", date(2024, 1, 1), 1.0).unwrap().plan;

    assert_eq!(svc.active_plan("a").unwrap().id, a.id);
    assert_eq!(svc.active_plan("b").unwrap().id, b.id);

    svc.complete_plan("a").unwrap();
    assert!(svc.active_plan("a").is_err());
    assert_eq!(svc.active_plan("b").unwrap().id, b.id);
}

#[test]
fn test_plan_on_disk_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quitplan.db");
    let config = Config::default();

    let plan_id = {
        let db = Database::open_at(&path).unwrap();
        let svc = QuitPlanService::new(&db, &config);
        svc.record_baseline("u", 10, dec("10")).unwrap();
        let id = svc.create_plan("u", date(2024, 1, 1), 1.0).unwrap().plan.id;
        svc.record_progress("u", date(2024, 1, 3), 4, None).unwrap();
        id
    };

    let db = Database::open_at(&path).unwrap();
    let svc = QuitPlanService::new(&db, &config);
    assert_eq!(svc.active_plan("u").unwrap().id, plan_id);
    assert_eq!(svc.savings("u").unwrap().cigarettes_avoided, 5);
}
