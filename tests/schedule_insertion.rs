// tests/schedule_insertion.rs

mod common;
use crate::common::builders::ScheduleBuilder;
use crate::common::init_tracing;
use crate::common::potential::{Potential, multiply_fn, sum_out_fn, var};
use crate::common::result_of;

use std::collections::BTreeSet;
use std::error::Error;

use tablesched::errors::TableschedError;
use tablesched::{ScheduleMultiDim, ScheduleOperation, ScheduleOptions};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn unknown_argument_is_rejected_without_side_effects() -> TestResult {
    init_tracing();
    let (mut schedule, ids) = ScheduleBuilder::new()
        .source("A", &[var("x", 2)])
        .build();

    let stray = ScheduleMultiDim::new(Potential::counting(vec![var("y", 2)]), vec![var("y", 2)]);
    let handles_before = schedule.nb_schedule_multi_dims();

    let result = schedule.emplace_binary_combination(ids["A"], stray.id(), multiply_fn(), false);

    match result {
        Err(TableschedError::UnknownScheduleMultiDim(id)) => assert_eq!(id, stray.id()),
        other => panic!("expected UnknownScheduleMultiDim, got {other:?}"),
    }
    assert_eq!(schedule.nb_operations(), 0);
    assert_eq!(schedule.dag().node_count(), 0);
    assert_eq!(schedule.nb_schedule_multi_dims(), handles_before);
    assert!(schedule.consumers(ids["A"])?.is_empty());
    Ok(())
}

#[test]
fn abstract_handle_cannot_be_a_source() {
    let mut schedule = tablesched::Schedule::<Potential>::new();
    let handle = ScheduleMultiDim::new_abstract(vec![var("x", 2)]);
    let id = handle.id();

    match schedule.insert_schedule_multi_dim(handle) {
        Err(TableschedError::AbstractScheduleMultiDim(got)) => assert_eq!(got, id),
        other => panic!("expected AbstractScheduleMultiDim, got {other:?}"),
    }
    assert!(schedule.is_empty());
}

#[test]
fn duplicate_ids_are_rejected() -> TestResult {
    let (mut schedule, ids) = ScheduleBuilder::new()
        .source("A", &[var("x", 2)])
        .build();

    let again = schedule.schedule_multi_dim(ids["A"])?.clone();
    assert!(matches!(
        schedule.insert_schedule_multi_dim(again),
        Err(TableschedError::DuplicateScheduleMultiDim(_))
    ));

    let table = Potential::filled(vec![var("x", 2)], 1.0);
    assert!(matches!(
        schedule.insert_table(table, vec![var("x", 2)], Some(ids["A"])),
        Err(TableschedError::DuplicateScheduleMultiDim(_))
    ));
    assert_eq!(schedule.nb_schedule_multi_dims(), 1);
    Ok(())
}

#[test]
fn caller_supplied_ids_are_used_for_lookup() -> TestResult {
    let mut schedule = tablesched::Schedule::<Potential>::new();
    let external = ScheduleMultiDim::new(Potential::counting(vec![var("x", 3)]), vec![var("x", 3)]);
    let wanted = external.duplicate().id();

    let id = schedule.insert_table(
        Potential::counting(vec![var("x", 3)]),
        vec![var("x", 3)],
        Some(wanted),
    )?;
    assert_eq!(id, wanted);

    let handle = schedule.schedule_multi_dim(wanted)?;
    assert_eq!(schedule.schedule_multi_dim_id(handle)?, wanted);
    assert!(matches!(
        schedule.schedule_multi_dim_id(&external),
        Err(TableschedError::UnknownScheduleMultiDim(_))
    ));
    assert_eq!(schedule.location(wanted)?, None);
    assert_eq!(schedule.sources().collect::<Vec<_>>(), vec![wanted]);
    Ok(())
}

#[test]
fn result_handles_get_inferred_variables() -> TestResult {
    let (x, y, z) = (var("x", 2), var("y", 3), var("z", 4));
    let (mut schedule, ids) = ScheduleBuilder::new()
        .source("A", &[x.clone(), y.clone()])
        .source("B", &[y.clone(), z.clone()])
        .build();

    let c = schedule.emplace_binary_combination(ids["A"], ids["B"], multiply_fn(), false)?;
    let c_result = result_of(&schedule, c);
    let d = schedule.emplace_projection(c_result, [y.clone()], sum_out_fn(), false)?;
    let d_result = result_of(&schedule, d);

    let c_handle = schedule.schedule_multi_dim(c_result)?;
    assert!(c_handle.is_abstract());
    assert_eq!(c_handle.variables(), &[x.clone(), y.clone(), z.clone()]);
    assert_eq!(schedule.location(c_result)?, Some((c, 0)));

    let d_handle = schedule.schedule_multi_dim(d_result)?;
    assert_eq!(d_handle.variables(), &[x, z]);
    assert_eq!(d_handle.domain_size(), 8);

    assert!(schedule.dag().contains_edge(c, d));
    assert_eq!(schedule.consumers(c_result)?.iter().copied().collect::<Vec<_>>(), vec![d]);
    Ok(())
}

#[test]
fn deleter_runs_after_other_readers_inserted_before_it() -> TestResult {
    let x = var("x", 2);
    let (mut schedule, ids) = ScheduleBuilder::new()
        .source("A", &[x.clone()])
        .source("B", &[x.clone()])
        .build();

    let reader = schedule.emplace_projection(ids["A"], [x.clone()], sum_out_fn(), false)?;
    let deleter = schedule.emplace_binary_combination(ids["A"], ids["B"], multiply_fn(), true)?;

    assert!(schedule.dag().contains_edge(reader, deleter));
    assert_eq!(schedule.deleter(ids["A"])?, Some(deleter));
    assert_eq!(schedule.deleter(ids["B"])?, Some(deleter));
    assert_eq!(schedule.available_operations().into_iter().collect::<Vec<_>>(), vec![reader]);
    Ok(())
}

#[test]
fn deleter_runs_after_other_readers_inserted_after_it() -> TestResult {
    let x = var("x", 2);
    let (mut schedule, ids) = ScheduleBuilder::new()
        .source("A", &[x.clone()])
        .build();

    let deletion = schedule.emplace_deletion(ids["A"])?;
    let reader = schedule.emplace_projection(ids["A"], [x], sum_out_fn(), false)?;

    assert!(schedule.dag().contains_edge(reader, deletion));
    assert!(schedule.available_operations().contains(&reader));
    assert!(!schedule.available_operations().contains(&deletion));
    Ok(())
}

#[test]
fn double_deletion_is_not_allowed() -> TestResult {
    let x = var("x", 2);
    let (mut schedule, ids) = ScheduleBuilder::new()
        .source("A", &[x.clone()])
        .source("B", &[x])
        .build();

    let first = ScheduleOperation::binary_combination(ids["A"], ids["B"], multiply_fn())
        .deleting_args();
    schedule.insert_operation(&first)?;

    let before = schedule.nb_schedule_multi_dims();
    assert!(matches!(
        schedule.insert_operation(&first),
        Err(TableschedError::OperationNotAllowed(_))
    ));
    assert!(matches!(
        schedule.emplace_deletion(ids["B"]),
        Err(TableschedError::OperationNotAllowed(_))
    ));
    assert_eq!(schedule.nb_operations(), 1);
    assert_eq!(schedule.nb_schedule_multi_dims(), before);
    Ok(())
}

#[test]
fn executed_deletion_with_pending_readers_is_not_allowed() -> TestResult {
    let x = var("x", 2);
    let (mut schedule, ids) = ScheduleBuilder::new()
        .source("A", &[x.clone()])
        .build();

    schedule.emplace_projection(ids["A"], [x], sum_out_fn(), false)?;

    let executed_deletion = ScheduleOperation::deletion(ids["A"]).already_executed();
    assert!(matches!(
        schedule.insert_operation(&executed_deletion),
        Err(TableschedError::OperationNotAllowed(_))
    ));
    assert_eq!(schedule.deleter(ids["A"])?, None);
    Ok(())
}

#[test]
fn executed_prototype_is_recorded_but_not_live() -> TestResult {
    let x = var("x", 2);
    let (mut schedule, ids) = ScheduleBuilder::new()
        .source("A", &[x.clone()])
        .build();

    let seeded = ScheduleOperation::projection(ids["A"], [x], sum_out_fn()).already_executed();
    let node = schedule.insert_operation(&seeded)?;

    assert_eq!(schedule.nb_operations(), 1);
    assert_eq!(schedule.dag().node_count(), 0);
    assert!(schedule.available_operations().is_empty());
    assert!(schedule.operation(node)?.is_executed());
    assert!(schedule.consumers(ids["A"])?.contains(&node));

    let full = schedule.full_dag();
    assert!(full.contains_node(node));
    assert_eq!(schedule.topological_order()?, vec![node]);
    Ok(())
}

#[test]
fn feeding_a_deleter_output_back_to_a_reader_is_rejected() -> TestResult {
    let x = var("x", 2);
    let (mut schedule, ids) = ScheduleBuilder::new()
        .source("X", &[x.clone()])
        .source("W", &[x.clone()])
        .build();

    let deleter = schedule.emplace_binary_combination(ids["X"], ids["W"], multiply_fn(), true)?;
    let r = result_of(&schedule, deleter);

    assert!(matches!(
        schedule.emplace_binary_combination(ids["X"], r, multiply_fn(), false),
        Err(TableschedError::OperationNotAllowed(_))
    ));
    assert!(!petgraph::algo::is_cyclic_directed(schedule.dag()));
    assert_eq!(schedule.nb_operations(), 1);
    Ok(())
}

#[test]
fn rejected_cycle_leaves_schedule_drainable_and_copyable() -> TestResult {
    let x = var("x", 2);
    let options = ScheduleOptions {
        checked_updates: false,
    };
    let (mut schedule, ids) = ScheduleBuilder::with_options(options)
        .source("X", &[x.clone()])
        .source("W", &[x])
        .build();

    let deleter = schedule.emplace_binary_combination(ids["X"], ids["W"], multiply_fn(), true)?;
    let r = result_of(&schedule, deleter);
    assert!(schedule
        .emplace_binary_combination(ids["X"], r, multiply_fn(), false)
        .is_err());

    assert_eq!(schedule.topological_order()?, vec![deleter]);
    assert!(schedule.clone() == schedule);
    assert_eq!(schedule.available_operations(), BTreeSet::from([deleter]));
    schedule.execute(deleter)?;
    assert_eq!(schedule.dag().node_count(), 0);
    Ok(())
}

#[test]
fn node_id_finds_operations_and_their_clones() -> TestResult {
    let x = var("x", 2);
    let (mut schedule, ids) = ScheduleBuilder::new()
        .source("A", &[x.clone()])
        .build();

    let node = schedule.emplace_projection(ids["A"], [x.clone()], sum_out_fn(), false)?;
    let owned = schedule.operation(node)?;
    assert_eq!(schedule.node_id(owned)?, node);

    let copy = owned.clone();
    assert_eq!(schedule.node_id(&copy)?, node);

    let prototype = ScheduleOperation::projection(ids["A"], [x], sum_out_fn());
    assert!(matches!(
        schedule.node_id(&prototype),
        Err(TableschedError::UnknownScheduleOperation(_))
    ));
    Ok(())
}

#[test]
fn clear_is_idempotent() -> TestResult {
    let x = var("x", 2);
    let (mut schedule, ids) = ScheduleBuilder::new()
        .source("A", &[x.clone()])
        .build();
    schedule.emplace_projection(ids["A"], [x], sum_out_fn(), true)?;

    schedule.clear();
    assert!(schedule.is_empty());
    assert_eq!(schedule.dag().node_count(), 0);
    assert!(matches!(
        schedule.schedule_multi_dim(ids["A"]),
        Err(TableschedError::UnknownScheduleMultiDim(_))
    ));

    schedule.clear();
    assert!(schedule.is_empty());
    Ok(())
}
