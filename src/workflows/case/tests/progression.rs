use super::common::{case_with_header, complete_assessment, controller, day};
use crate::workflows::case::domain::{CaseStatus, ReevaluationOutcome};
use crate::workflows::case::progression::{
    AssessmentEdit, AssessmentSlot, CaseError, CaseProgressionController, DerivedChange,
    GeneralInfoUpdate, NavigationGate, SectionLock, WorkflowRefusal,
};
use crate::workflows::case::steps::{StepId, StepStatus};
use crate::workflows::case::ChainState;

fn controller_with_chain_base() -> CaseProgressionController {
    let mut controller = controller(case_with_header());
    controller
        .apply_assessment(
            AssessmentSlot::A,
            AssessmentEdit::StartDate(Some(day(2024, 1, 1))),
        )
        .expect("start date applies");
    controller
        .apply_assessment(AssessmentSlot::A, AssessmentEdit::Duration("10".to_string()))
        .expect("duration applies");
    controller
}

#[test]
fn general_info_edit_updates_the_derived_step_status() {
    let mut controller = controller(case_with_header());

    let change = controller
        .apply_general_info(GeneralInfoUpdate {
            dni: Some("1234567".to_string()),
            ..GeneralInfoUpdate::default()
        })
        .expect("edit applies");

    assert_eq!(change, DerivedChange::Changed);
    let step = &controller.view().steps[0];
    assert_eq!(step.step, StepId::GeneralInfo);
    assert_eq!(step.status, StepStatus::Partial);
}

#[test]
fn reapplying_the_same_value_reports_unchanged() {
    let mut controller = controller(case_with_header());

    let update = GeneralInfoUpdate {
        dni: Some("12345678".to_string()),
        ..GeneralInfoUpdate::default()
    };
    controller
        .apply_general_info(update.clone())
        .expect("edit applies");
    let second = controller
        .apply_general_info(update)
        .expect("edit applies");

    assert_eq!(second, DerivedChange::Unchanged);
}

#[test]
fn chain_dates_follow_the_worked_example() {
    let mut controller = controller_with_chain_base();

    let first = controller.append_reevaluation(false).expect("append");
    let second = controller.append_reevaluation(false).expect("append");
    controller
        .set_reevaluation_outcome(&first, Some(ReevaluationOutcome::Continuacion))
        .expect("outcome applies");
    controller.set_additional_days(&first, 5).expect("days apply");
    controller
        .set_reevaluation_outcome(&second, Some(ReevaluationOutcome::Continuacion))
        .expect("outcome applies");
    controller.set_additional_days(&second, 3).expect("days apply");

    let views = &controller.view().reevaluations;
    assert_eq!(views[0].fecha, Some(day(2024, 1, 11)));
    assert_eq!(views[0].total_dias, 15);
    assert_eq!(views[1].fecha, Some(day(2024, 1, 16)));
    assert_eq!(views[1].total_dias, 18);
}

#[test]
fn discharge_zeroes_days_and_updates_downstream_entries() {
    let mut controller = controller_with_chain_base();

    let first = controller.append_reevaluation(false).expect("append");
    let second = controller.append_reevaluation(false).expect("append");
    controller.set_additional_days(&first, 5).expect("days apply");
    controller
        .set_reevaluation_outcome(&second, Some(ReevaluationOutcome::Continuacion))
        .expect("outcome applies");
    controller.set_additional_days(&second, 3).expect("days apply");

    controller
        .set_reevaluation_outcome(&first, Some(ReevaluationOutcome::Alta))
        .expect("discharge applies");

    let views = &controller.view().reevaluations;
    assert_eq!(views[0].dias_adicionales, 0);
    assert_eq!(views[0].total_dias, 10);
    // The second entry now follows immediately after the first.
    assert_eq!(views[1].fecha, Some(day(2024, 1, 11)));
    assert_eq!(views[1].total_dias, 13);
    assert_eq!(controller.chain_state(), ChainState::Discharged);
}

#[test]
fn days_cannot_be_set_on_a_discharge_entry() {
    let mut controller = controller_with_chain_base();
    let id = controller.append_reevaluation(false).expect("append");
    controller
        .set_reevaluation_outcome(&id, Some(ReevaluationOutcome::Alta))
        .expect("discharge applies");

    let result = controller.set_additional_days(&id, 7);
    assert_eq!(
        result,
        Err(CaseError::Refusal(WorkflowRefusal::DischargedEntry(
            id.clone()
        )))
    );
    assert_eq!(controller.view().reevaluations[0].dias_adicionales, 0);
}

#[test]
fn appending_after_discharge_is_refused_and_leaves_the_chain_untouched() {
    let mut controller = controller_with_chain_base();
    let id = controller.append_reevaluation(false).expect("append");
    controller
        .set_reevaluation_outcome(&id, Some(ReevaluationOutcome::Alta))
        .expect("discharge applies");

    let result = controller.append_reevaluation(false);
    assert_eq!(
        result,
        Err(CaseError::Refusal(WorkflowRefusal::CaseDischarged))
    );
    assert_eq!(controller.case().reevaluaciones.len(), 1);
}

#[test]
fn outcome_edits_on_specialty_entries_are_refused() {
    let mut controller = controller_with_chain_base();
    let id = controller.append_reevaluation(true).expect("append");

    let result =
        controller.set_reevaluation_outcome(&id, Some(ReevaluationOutcome::Continuacion));
    assert_eq!(
        result,
        Err(CaseError::Refusal(WorkflowRefusal::VariantMismatch(
            id.clone()
        )))
    );

    controller
        .set_specialist_name(&id, "Dra. Huamán, traumatología".to_string())
        .expect("specialist name applies");
}

#[test]
fn removing_an_unknown_entry_is_refused() {
    use crate::workflows::case::domain::ReevaluationId;

    let mut controller = controller_with_chain_base();
    let ghost = ReevaluationId("reev-000000".to_string());

    let result = controller.remove_reevaluation(&ghost);
    assert_eq!(
        result,
        Err(CaseError::Refusal(WorkflowRefusal::ReevaluationNotFound(
            ghost
        )))
    );
}

#[test]
fn locked_sections_refuse_edits_until_unlocked() {
    let mut controller = controller(case_with_header());

    let outcome = controller
        .lock_section(StepId::GeneralInfo)
        .expect("lock applies");
    assert_eq!(outcome.lock, SectionLock::Locked);
    assert!(outcome.warnings.is_empty());

    let refused = controller.apply_general_info(GeneralInfoUpdate {
        empresa: Some("Otra Empresa SAC".to_string()),
        ..GeneralInfoUpdate::default()
    });
    assert_eq!(
        refused,
        Err(CaseError::Refusal(WorkflowRefusal::SectionLocked(
            StepId::GeneralInfo
        )))
    );

    controller
        .unlock_section(StepId::GeneralInfo)
        .expect("unlock applies");
    controller
        .apply_general_info(GeneralInfoUpdate {
            empresa: Some("Otra Empresa SAC".to_string()),
            ..GeneralInfoUpdate::default()
        })
        .expect("edit applies after unlock");
}

#[test]
fn locking_an_incomplete_section_reports_warnings() {
    let mut controller = controller(case_with_header());

    let outcome = controller
        .lock_section(StepId::JobAnalysis)
        .expect("lock applies");
    assert_eq!(outcome.lock, SectionLock::Locked);
    assert_eq!(outcome.warnings.len(), 4);
    assert!(outcome
        .warnings
        .contains(&"Tareas a realizar".to_string()));
}

#[test]
fn gated_navigation_refuses_to_advance_past_pending_fields() {
    let case = case_with_header();
    let mut gated = CaseProgressionController::new(case, NavigationGate::RequireValidStep)
        .expect("controller builds");

    // General info is valid, so the first advance goes through.
    assert_eq!(gated.advance(), Ok(StepId::AssessmentA));

    // The assessment still misses its auxiliary fields.
    let refused = gated.advance();
    assert!(matches!(
        refused,
        Err(WorkflowRefusal::StepIncomplete {
            step: StepId::AssessmentA,
            ..
        })
    ));
}

#[test]
fn free_navigation_moves_through_all_steps_and_back() {
    let mut controller = controller(case_with_header());

    assert_eq!(controller.advance(), Ok(StepId::AssessmentA));
    assert_eq!(controller.advance(), Ok(StepId::AssessmentA2));
    assert_eq!(controller.advance(), Ok(StepId::JobAnalysis));
    assert_eq!(controller.advance(), Ok(StepId::Reevaluations));
    // Advancing past the last step stays put.
    assert_eq!(controller.advance(), Ok(StepId::Reevaluations));

    assert_eq!(controller.back(), StepId::JobAnalysis);
    controller.go_to(StepId::GeneralInfo);
    assert_eq!(controller.current_step(), StepId::GeneralInfo);
}

#[test]
fn completing_both_assessments_drives_their_statuses_complete() {
    let mut controller = controller(case_with_header());
    complete_assessment(&mut controller, AssessmentSlot::A);
    complete_assessment(&mut controller, AssessmentSlot::A2);

    let statuses: Vec<_> = controller
        .view()
        .steps
        .iter()
        .map(|step| (step.step, step.status))
        .collect();
    assert!(statuses.contains(&(StepId::AssessmentA, StepStatus::Complete)));
    assert!(statuses.contains(&(StepId::AssessmentA2, StepStatus::Complete)));
}

#[test]
fn closing_the_case_flows_into_the_derived_state() {
    let mut controller = controller(case_with_header());

    let change = controller.set_status(CaseStatus::Cerrado).expect("status applies");
    assert_eq!(change, DerivedChange::Changed);
    assert_eq!(controller.view().status, CaseStatus::Cerrado);
}
