use super::domain::{CaseData, PhysicalAssessment, ReevaluationDetail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The five logical sections of the case form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    GeneralInfo,
    AssessmentA,
    AssessmentA2,
    JobAnalysis,
    Reevaluations,
}

impl StepId {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::GeneralInfo,
            Self::AssessmentA,
            Self::AssessmentA2,
            Self::JobAnalysis,
            Self::Reevaluations,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::GeneralInfo => "Paso 1",
            Self::AssessmentA => "Paso 2",
            Self::AssessmentA2 => "Paso 2.1",
            Self::JobAnalysis => "Paso 3",
            Self::Reevaluations => "Paso 4",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::GeneralInfo => "Datos Generales",
            Self::AssessmentA => "Sec. A: Capacidad Funcional",
            Self::AssessmentA2 => "Sec. A: Capacidad Funcional (2.1)",
            Self::JobAnalysis => "Sec. B & C: Puesto y Compromiso",
            Self::Reevaluations => "Sec. D & E: Seguimiento",
        }
    }

    pub fn next(self) -> Option<Self> {
        let ordered = Self::ordered();
        let position = ordered.iter().position(|step| *step == self)?;
        ordered.get(position + 1).copied()
    }

    pub fn previous(self) -> Option<Self> {
        let ordered = Self::ordered();
        let position = ordered.iter().position(|step| *step == self)?;
        position.checked_sub(1).map(|prev| ordered[prev])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Empty,
    Partial,
    Complete,
}

impl StepStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Empty => "Sin datos",
            Self::Partial => "Incompleto",
            Self::Complete => "Completo",
        }
    }
}

pub type StepStatuses = BTreeMap<StepId, StepStatus>;

fn status_from_counts(filled: usize, total: usize) -> StepStatus {
    if filled == total && total > 0 {
        StepStatus::Complete
    } else if filled > 0 {
        StepStatus::Partial
    } else {
        StepStatus::Empty
    }
}

fn general_info_fields(case: &CaseData) -> [bool; 12] {
    [
        !case.trabajador_nombre.is_empty(),
        !case.dni.is_empty(),
        case.sexo.is_some(),
        !case.jornada_laboral.is_empty(),
        !case.empresa.is_empty(),
        !case.supervisor.is_empty(),
        !case.puesto.is_empty(),
        !case.telf_contacto.is_empty(),
        case.fecha.is_some(),
        !case.gerencia.is_empty(),
        !case.supervisor_telf.is_empty(),
        // The event type always carries a default, so it always counts.
        true,
    ]
}

fn general_info_status(case: &CaseData) -> StepStatus {
    let fields = general_info_fields(case);
    let filled = fields.iter().filter(|field| **field).count();

    let dni_valid = case.dni.chars().count() >= 8;
    let phone_valid = case.telf_contacto.chars().count() == 9;

    if filled == fields.len() && dni_valid && phone_valid {
        StepStatus::Complete
    } else if filled > 0 {
        StepStatus::Partial
    } else {
        StepStatus::Empty
    }
}

// Filled-row counting deliberately looks only at the graded functional
// items, not at the demand/capacity matrix: a step can read Complete while
// the scoring matrix is untouched, matching the source system.
fn assessment_status(assessment: &PhysicalAssessment) -> StepStatus {
    let items_total = assessment.functional.len();
    let items_filled = assessment
        .functional
        .values()
        .filter(|item| item.value.is_some())
        .count();

    let aux = [
        assessment.alerta_farmacologica.is_some(),
        assessment.lateralidad.is_some(),
        assessment.has_diagnosis(),
        !assessment.medico_nombre.is_empty(),
        assessment.indicacion_inicio.is_some(),
        !assessment.indicacion_duracion.is_empty(),
    ];
    let aux_filled = aux.iter().filter(|field| **field).count();

    let total = items_total + aux.len();
    let filled = items_filled + aux_filled;

    if filled == total && items_total > 0 {
        StepStatus::Complete
    } else if filled > 0 {
        StepStatus::Partial
    } else {
        StepStatus::Empty
    }
}

fn job_analysis_status(case: &CaseData) -> StepStatus {
    let fields = [
        !case.tareas_realizar.is_empty(),
        !case.area_lugar.is_empty(),
        !case.tareas_principales.is_empty(),
        !case.comentarios_supervisor.is_empty(),
    ];
    let filled = fields.iter().filter(|field| **field).count();
    status_from_counts(filled, fields.len())
}

fn reevaluations_status(case: &CaseData) -> StepStatus {
    if case.reevaluaciones.is_empty() {
        return StepStatus::Empty;
    }

    let all_complete = case.reevaluaciones.iter().all(|entry| {
        let dated = entry.fecha.is_some();
        match &entry.detail {
            ReevaluationDetail::Specialty {
                nombre_especialista,
            } => dated && !nombre_especialista.is_empty(),
            ReevaluationDetail::Standard {
                outcome,
                dias_adicionales,
            } => dated && outcome.is_some() && *dias_adicionales >= 0,
        }
    });

    if all_complete {
        StepStatus::Complete
    } else {
        StepStatus::Partial
    }
}

/// Recomputes every section status from the snapshot. Pure and idempotent;
/// the controller calls this after each mutation.
pub fn evaluate_steps(case: &CaseData) -> StepStatuses {
    StepId::ordered()
        .into_iter()
        .map(|step| {
            let status = match step {
                StepId::GeneralInfo => general_info_status(case),
                StepId::AssessmentA => assessment_status(&case.assessment),
                StepId::AssessmentA2 => assessment_status(&case.assessment2),
                StepId::JobAnalysis => job_analysis_status(case),
                StepId::Reevaluations => reevaluations_status(case),
            };
            (step, status)
        })
        .collect()
}

fn assessment_missing_fields(assessment: &PhysicalAssessment) -> Vec<String> {
    let mut missing = Vec::new();

    let unset_items = assessment
        .functional
        .values()
        .filter(|item| item.value.is_none())
        .count();
    if unset_items > 0 {
        missing.push(format!("{unset_items} ítems de evaluación física"));
    }

    if assessment.lateralidad.is_none() {
        missing.push("Lateralidad Afectada".to_string());
    }
    if assessment.alerta_farmacologica.is_none() {
        missing.push("Alerta Farmacológica".to_string());
    }
    if !assessment.has_diagnosis() {
        missing.push("Diagnóstico Médico".to_string());
    }
    if assessment.indicacion_inicio.is_none() {
        missing.push("Indicación Inicio".to_string());
    }
    if assessment.indicacion_duracion.is_empty() {
        missing.push("Duración".to_string());
    }
    if assessment.medico_nombre.is_empty() {
        missing.push("Médico".to_string());
    }

    missing
}

/// Field-level validity for one step, as shown to the user when locking a
/// section with pending data or when gated navigation refuses to advance.
pub fn missing_fields(case: &CaseData, step: StepId) -> Vec<String> {
    let mut missing = Vec::new();

    match step {
        StepId::GeneralInfo => {
            if case.fecha.is_none() {
                missing.push("Fecha de Registro".to_string());
            }
            if case.trabajador_nombre.is_empty() {
                missing.push("Nombre del Trabajador".to_string());
            }
            if case.dni.is_empty() {
                missing.push("DNI / CE / PAS".to_string());
            }
            if case.sexo.is_none() {
                missing.push("Sexo".to_string());
            }
            if case.jornada_laboral.is_empty() {
                missing.push("Jornada Laboral".to_string());
            }
            if case.telf_contacto.is_empty() {
                missing.push("Telf. Trabajador".to_string());
            }
            if case.puesto.is_empty() {
                missing.push("Puesto de Trabajo".to_string());
            }
            if case.empresa.is_empty() {
                missing.push("Empresa".to_string());
            }
            if case.gerencia.is_empty() {
                missing.push("Gerencia".to_string());
            }
            if case.supervisor.is_empty() {
                missing.push("Supervisor".to_string());
            }
            if case.supervisor_telf.is_empty() {
                missing.push("Telf. Supervisor".to_string());
            }
        }
        StepId::AssessmentA => missing.extend(assessment_missing_fields(&case.assessment)),
        StepId::AssessmentA2 => missing.extend(assessment_missing_fields(&case.assessment2)),
        StepId::JobAnalysis => {
            if case.tareas_realizar.is_empty() {
                missing.push("Tareas a realizar".to_string());
            }
            if case.area_lugar.is_empty() {
                missing.push("Área y lugar".to_string());
            }
            if case.tareas_principales.is_empty() {
                missing.push("Tareas principales".to_string());
            }
            if case.comentarios_supervisor.is_empty() {
                missing.push("Comentarios del Supervisor".to_string());
            }
        }
        StepId::Reevaluations => {
            for (index, entry) in case.reevaluaciones.iter().enumerate() {
                let ordinal = index + 1;
                if entry.fecha.is_none() {
                    missing.push(format!("Fecha (Reevaluación #{ordinal})"));
                }
                match &entry.detail {
                    ReevaluationDetail::Specialty {
                        nombre_especialista,
                    } => {
                        if nombre_especialista.is_empty() {
                            missing.push(format!("Nombre Especialista (Reevaluación #{ordinal})"));
                        }
                    }
                    ReevaluationDetail::Standard { outcome, .. } => {
                        if outcome.is_none() {
                            missing.push(format!("Tipo (Reevaluación #{ordinal})"));
                        }
                    }
                }
            }
        }
    }

    missing
}
