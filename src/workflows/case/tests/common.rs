use chrono::NaiveDate;

use crate::workflows::case::domain::{CaseData, Diagnosis, Sex};
use crate::workflows::case::progression::{
    AssessmentEdit, AssessmentSlot, CaseProgressionController, NavigationGate,
};

pub(super) fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn registration_day() -> NaiveDate {
    day(2024, 1, 1)
}

/// Case with a fully valid general-info header.
pub(super) fn case_with_header() -> CaseData {
    let mut case = CaseData::new(registration_day());
    case.trabajador_nombre = "Quispe Mamani, Rosa".to_string();
    case.dni = "12345678".to_string();
    case.sexo = Some(Sex::Femenino);
    case.jornada_laboral = "14x7".to_string();
    case.puesto = "Operadora de planta".to_string();
    case.telf_contacto = "987654321".to_string();
    case.empresa = "Minera Andina SAC".to_string();
    case.gerencia = "Operaciones".to_string();
    case.supervisor = "Rojas, Daniel".to_string();
    case.supervisor_telf = "912345678".to_string();
    case
}

pub(super) fn controller(case: CaseData) -> CaseProgressionController {
    CaseProgressionController::new(case, NavigationGate::Free).expect("controller builds")
}

/// Fills the auxiliary assessment fields so the step can reach Complete.
/// The pre-filled functional items already carry their table defaults.
pub(super) fn complete_assessment(
    controller: &mut CaseProgressionController,
    slot: AssessmentSlot,
) {
    let edits = [
        AssessmentEdit::Diagnoses(vec![Diagnosis {
            descripcion: "Lumbalgia mecánica".to_string(),
            cie10: "M54.5".to_string(),
        }]),
        AssessmentEdit::PhysicianName("Dr. Paredes".to_string()),
        AssessmentEdit::Duration("10 días".to_string()),
    ];
    for edit in edits {
        controller
            .apply_assessment(slot, edit)
            .expect("assessment edit applies");
    }
}
