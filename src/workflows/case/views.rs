use super::domain::{
    CaseData, CaseStatus, ReevaluationDetail, ReevaluationId, ReevaluationOutcome,
};
use super::progression::{ChainState, SectionLock};
use super::scoring::{self, ScoringError};
use super::steps::{self, StepId, StepStatus};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepStatusView {
    pub step: StepId,
    pub label: &'static str,
    pub title: &'static str,
    pub status: StepStatus,
    pub lock: SectionLock,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreView {
    pub max_score: u8,
    pub contributing: Vec<&'static str>,
    pub definition: &'static str,
    pub percentage: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReevaluationView {
    pub id: ReevaluationId,
    pub ordinal: usize,
    pub fecha: Option<NaiveDate>,
    pub specialty: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<ReevaluationOutcome>,
    pub dias_adicionales: i64,
    pub total_dias: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre_especialista: Option<String>,
    pub comentarios: String,
}

/// Everything the presentation and persistence collaborators consume per
/// render cycle, derived in one pass from the case snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseViewState {
    pub status: CaseStatus,
    pub steps: Vec<StepStatusView>,
    pub assessment_score: ScoreView,
    pub assessment2_score: ScoreView,
    pub reevaluations: Vec<ReevaluationView>,
    pub chain_state: ChainState,
}

fn score_view(
    assessment: &super::domain::PhysicalAssessment,
) -> Result<ScoreView, ScoringError> {
    let score = scoring::score_assessment(assessment);
    let interpretation = scoring::interpret(score.max_score)?;
    Ok(ScoreView {
        max_score: score.max_score,
        contributing: score.contributing,
        definition: interpretation.definition,
        percentage: interpretation.percentage,
    })
}

fn reevaluation_view(ordinal: usize, entry: &super::domain::Reevaluation) -> ReevaluationView {
    let (specialty, outcome, dias, especialista) = match &entry.detail {
        ReevaluationDetail::Standard {
            outcome,
            dias_adicionales,
        } => (false, *outcome, *dias_adicionales, None),
        ReevaluationDetail::Specialty {
            nombre_especialista,
        } => (true, None, 0, Some(nombre_especialista.clone())),
    };

    ReevaluationView {
        id: entry.id.clone(),
        ordinal,
        fecha: entry.fecha,
        specialty,
        outcome,
        dias_adicionales: dias,
        total_dias: entry.total_dias,
        nombre_especialista: especialista,
        comentarios: entry.comentarios.clone(),
    }
}

/// Pure derivation of the whole view-state. Interpretation-table misses
/// abort the derivation; they indicate a broken scoring configuration, not
/// bad user input.
pub fn derive_view_state(
    case: &CaseData,
    lock_of: impl Fn(StepId) -> SectionLock,
) -> Result<CaseViewState, ScoringError> {
    let statuses = steps::evaluate_steps(case);

    let steps = StepId::ordered()
        .into_iter()
        .map(|step| StepStatusView {
            step,
            label: step.label(),
            title: step.title(),
            status: statuses
                .get(&step)
                .copied()
                .unwrap_or(StepStatus::Empty),
            lock: lock_of(step),
        })
        .collect();

    let reevaluations = case
        .reevaluaciones
        .iter()
        .enumerate()
        .map(|(index, entry)| reevaluation_view(index + 1, entry))
        .collect();

    let chain_state = if case.is_discharged() {
        ChainState::Discharged
    } else {
        ChainState::Active
    };

    Ok(CaseViewState {
        status: case.status,
        steps,
        assessment_score: score_view(&case.assessment)?,
        assessment2_score: score_view(&case.assessment2)?,
        reevaluations,
        chain_state,
    })
}
