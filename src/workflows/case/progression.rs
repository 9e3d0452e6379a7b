use super::catalog::Characteristic;
use super::chain;
use super::domain::{
    CapacityLevel, CaseData, CaseStatus, CharacteristicRating, DemandLevel, Diagnosis, EventType,
    FunctionalActivity, ItemRating, Laterality, PharmacologicalAlert, PhysicalAssessment,
    Reevaluation, ReevaluationDetail, ReevaluationId, ReevaluationOutcome, Sex,
};
use super::scoring::ScoringError;
use super::steps::{self, StepId};
use super::views::{self, CaseViewState};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Per-section edit state. Locking is an explicit user action, independent
/// of completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionLock {
    Editable,
    Locked,
}

/// Whether the follow-up chain still accepts entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainState {
    Active,
    Discharged,
}

/// Business-rule refusals. These are ordinary outcome values so callers
/// always branch on them; nothing in the engine throws for a refused edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowRefusal {
    SectionLocked(StepId),
    CaseDischarged,
    StepIncomplete { step: StepId, missing: Vec<String> },
    ReevaluationNotFound(ReevaluationId),
    VariantMismatch(ReevaluationId),
    DischargedEntry(ReevaluationId),
}

impl fmt::Display for WorkflowRefusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowRefusal::SectionLocked(step) => {
                write!(f, "section {} is locked for editing", step.label())
            }
            WorkflowRefusal::CaseDischarged => {
                write!(f, "the case is discharged; no further re-evaluations may be added")
            }
            WorkflowRefusal::StepIncomplete { step, missing } => write!(
                f,
                "step {} has {} pending field(s)",
                step.label(),
                missing.len()
            ),
            WorkflowRefusal::ReevaluationNotFound(id) => {
                write!(f, "re-evaluation {id} does not exist")
            }
            WorkflowRefusal::VariantMismatch(id) => {
                write!(f, "edit does not apply to re-evaluation {id}'s variant")
            }
            WorkflowRefusal::DischargedEntry(id) => {
                write!(f, "re-evaluation {id} is a discharge; days stay at zero")
            }
        }
    }
}

impl std::error::Error for WorkflowRefusal {}

/// Errors surfaced by controller operations: either a business-rule
/// refusal (branchable, expected) or a fatal scoring configuration fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseError {
    Refusal(WorkflowRefusal),
    Scoring(ScoringError),
}

impl fmt::Display for CaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseError::Refusal(refusal) => write!(f, "{refusal}"),
            CaseError::Scoring(err) => write!(f, "scoring configuration error: {err}"),
        }
    }
}

impl std::error::Error for CaseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CaseError::Refusal(refusal) => Some(refusal),
            CaseError::Scoring(err) => Some(err),
        }
    }
}

impl From<WorkflowRefusal> for CaseError {
    fn from(value: WorkflowRefusal) -> Self {
        Self::Refusal(value)
    }
}

impl From<ScoringError> for CaseError {
    fn from(value: ScoringError) -> Self {
        Self::Scoring(value)
    }
}

/// Reported after each successful mutation: whether the committed derived
/// state actually differs from the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivedChange {
    Changed,
    Unchanged,
}

/// Outcome of a lock request. Locking with pending fields is allowed; the
/// pending list comes back as warnings, never as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockOutcome {
    pub lock: SectionLock,
    pub warnings: Vec<String>,
}

/// Controls whether `advance` gates on the current step's field validity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationGate {
    Free,
    RequireValidStep,
}

/// Partial update for the general-info header; `None` leaves a field as
/// it is, mirroring how the form posts per-field edits.
#[derive(Debug, Clone, Default)]
pub struct GeneralInfoUpdate {
    pub fecha: Option<Option<NaiveDate>>,
    pub trabajador_nombre: Option<String>,
    pub dni: Option<String>,
    pub sexo: Option<Option<Sex>>,
    pub jornada_laboral: Option<String>,
    pub puesto: Option<String>,
    pub telf_contacto: Option<String>,
    pub empresa: Option<String>,
    pub gerencia: Option<String>,
    pub supervisor: Option<String>,
    pub supervisor_telf: Option<String>,
    pub tipo_evento: Option<EventType>,
}

#[derive(Debug, Clone, Default)]
pub struct JobAnalysisUpdate {
    pub tareas_realizar: Option<String>,
    pub area_lugar: Option<String>,
    pub tareas_principales: Option<String>,
    pub comentarios_supervisor: Option<String>,
}

/// Which of the two assessment instances an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssessmentSlot {
    A,
    A2,
}

impl AssessmentSlot {
    const fn step(self) -> StepId {
        match self {
            Self::A => StepId::AssessmentA,
            Self::A2 => StepId::AssessmentA2,
        }
    }
}

/// Field-level edit on an assessment, one command per form control.
#[derive(Debug, Clone)]
pub enum AssessmentEdit {
    Demand(Characteristic, Option<DemandLevel>),
    Capacity(Characteristic, Option<CapacityLevel>),
    ItemValue(FunctionalActivity, Option<ItemRating>),
    ItemDetail(FunctionalActivity, String),
    Alert(Option<PharmacologicalAlert>),
    Laterality(Option<Laterality>),
    Diagnoses(Vec<Diagnosis>),
    PhysicianName(String),
    StartDate(Option<NaiveDate>),
    Duration(String),
}

static REEVALUATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_reevaluation_id() -> ReevaluationId {
    let id = REEVALUATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ReevaluationId(format!("reev-{id:06}"))
}

/// Owns one case record and re-derives the full view-state after every
/// mutation. Derivation is a pure function of the snapshot; the controller
/// only commits the result when it differs from the previous one.
pub struct CaseProgressionController {
    case: CaseData,
    locks: BTreeMap<StepId, SectionLock>,
    current_step: StepId,
    gate: NavigationGate,
    derived: CaseViewState,
}

impl CaseProgressionController {
    pub fn new(case: CaseData, gate: NavigationGate) -> Result<Self, CaseError> {
        let locks: BTreeMap<StepId, SectionLock> = StepId::ordered()
            .into_iter()
            .map(|step| (step, SectionLock::Editable))
            .collect();

        let mut controller = Self {
            derived: views::derive_view_state(&case, |_| SectionLock::Editable)?,
            case,
            locks,
            current_step: StepId::GeneralInfo,
            gate,
        };
        // The initial snapshot may carry stale chain values (e.g. loaded
        // from persistence); normalize them up front.
        controller.rederive()?;
        Ok(controller)
    }

    pub fn case(&self) -> &CaseData {
        &self.case
    }

    pub fn view(&self) -> &CaseViewState {
        &self.derived
    }

    pub fn current_step(&self) -> StepId {
        self.current_step
    }

    pub fn lock_of(&self, step: StepId) -> SectionLock {
        self.locks
            .get(&step)
            .copied()
            .unwrap_or(SectionLock::Editable)
    }

    pub fn chain_state(&self) -> ChainState {
        self.derived.chain_state
    }

    fn ensure_editable(&self, step: StepId) -> Result<(), WorkflowRefusal> {
        match self.lock_of(step) {
            SectionLock::Editable => Ok(()),
            SectionLock::Locked => Err(WorkflowRefusal::SectionLocked(step)),
        }
    }

    /// Chain recompute plus full view derivation, committed only when the
    /// derived state differs from what collaborators already saw.
    fn rederive(&mut self) -> Result<DerivedChange, CaseError> {
        let base_start = self.case.assessment.indicacion_inicio;
        let base_duration = chain::parse_duration_days(&self.case.assessment.indicacion_duracion);

        let update = chain::recompute(base_start, base_duration, &self.case.reevaluaciones);
        if update.changed {
            self.case.reevaluaciones = update.entries;
        }

        let next = views::derive_view_state(&self.case, |step| self.lock_of(step))?;
        if next == self.derived {
            return Ok(DerivedChange::Unchanged);
        }

        self.derived = next;
        Ok(DerivedChange::Changed)
    }

    pub fn apply_general_info(
        &mut self,
        update: GeneralInfoUpdate,
    ) -> Result<DerivedChange, CaseError> {
        self.ensure_editable(StepId::GeneralInfo)?;

        let GeneralInfoUpdate {
            fecha,
            trabajador_nombre,
            dni,
            sexo,
            jornada_laboral,
            puesto,
            telf_contacto,
            empresa,
            gerencia,
            supervisor,
            supervisor_telf,
            tipo_evento,
        } = update;

        if let Some(value) = fecha {
            self.case.fecha = value;
        }
        if let Some(value) = trabajador_nombre {
            self.case.trabajador_nombre = value;
        }
        if let Some(value) = dni {
            self.case.dni = value;
        }
        if let Some(value) = sexo {
            self.case.sexo = value;
        }
        if let Some(value) = jornada_laboral {
            self.case.jornada_laboral = value;
        }
        if let Some(value) = puesto {
            self.case.puesto = value;
        }
        if let Some(value) = telf_contacto {
            self.case.telf_contacto = value;
        }
        if let Some(value) = empresa {
            self.case.empresa = value;
        }
        if let Some(value) = gerencia {
            self.case.gerencia = value;
        }
        if let Some(value) = supervisor {
            self.case.supervisor = value;
        }
        if let Some(value) = supervisor_telf {
            self.case.supervisor_telf = value;
        }
        if let Some(value) = tipo_evento {
            self.case.tipo_evento = value;
        }

        self.rederive()
    }

    pub fn apply_job_analysis(
        &mut self,
        update: JobAnalysisUpdate,
    ) -> Result<DerivedChange, CaseError> {
        self.ensure_editable(StepId::JobAnalysis)?;

        if let Some(value) = update.tareas_realizar {
            self.case.tareas_realizar = value;
        }
        if let Some(value) = update.area_lugar {
            self.case.area_lugar = value;
        }
        if let Some(value) = update.tareas_principales {
            self.case.tareas_principales = value;
        }
        if let Some(value) = update.comentarios_supervisor {
            self.case.comentarios_supervisor = value;
        }

        self.rederive()
    }

    pub fn apply_assessment(
        &mut self,
        slot: AssessmentSlot,
        edit: AssessmentEdit,
    ) -> Result<DerivedChange, CaseError> {
        self.ensure_editable(slot.step())?;

        let assessment = match slot {
            AssessmentSlot::A => &mut self.case.assessment,
            AssessmentSlot::A2 => &mut self.case.assessment2,
        };
        apply_assessment_edit(assessment, edit);

        self.rederive()
    }

    /// Appends a follow-up or specialist entry. Refused once the chain is
    /// terminated by a discharge; the list is left untouched in that case.
    pub fn append_reevaluation(&mut self, specialty: bool) -> Result<ReevaluationId, CaseError> {
        self.ensure_editable(StepId::Reevaluations)?;
        if self.case.is_discharged() {
            return Err(WorkflowRefusal::CaseDischarged.into());
        }

        let id = next_reevaluation_id();
        self.case
            .reevaluaciones
            .push(Reevaluation::new(id.clone(), specialty));
        self.rederive()?;
        debug!(%id, specialty, "re-evaluation appended");
        Ok(id)
    }

    pub fn remove_reevaluation(
        &mut self,
        id: &ReevaluationId,
    ) -> Result<DerivedChange, CaseError> {
        self.ensure_editable(StepId::Reevaluations)?;

        let before = self.case.reevaluaciones.len();
        self.case.reevaluaciones.retain(|entry| entry.id != *id);
        if self.case.reevaluaciones.len() == before {
            return Err(WorkflowRefusal::ReevaluationNotFound(id.clone()).into());
        }

        self.rederive()
    }

    fn entry_mut(&mut self, id: &ReevaluationId) -> Result<&mut Reevaluation, WorkflowRefusal> {
        self.case
            .reevaluaciones
            .iter_mut()
            .find(|entry| entry.id == *id)
            .ok_or_else(|| WorkflowRefusal::ReevaluationNotFound(id.clone()))
    }

    /// Sets a standard entry's outcome. Discharge forces the entry's
    /// additional days to zero right here, so the chain stabilizes on the
    /// next recompute instead of being patched retroactively.
    pub fn set_reevaluation_outcome(
        &mut self,
        id: &ReevaluationId,
        outcome: Option<ReevaluationOutcome>,
    ) -> Result<DerivedChange, CaseError> {
        self.ensure_editable(StepId::Reevaluations)?;

        let entry = self.entry_mut(id)?;
        match &mut entry.detail {
            ReevaluationDetail::Standard {
                outcome: current,
                dias_adicionales,
            } => {
                *current = outcome;
                if outcome == Some(ReevaluationOutcome::Alta) {
                    *dias_adicionales = 0;
                }
            }
            ReevaluationDetail::Specialty { .. } => {
                return Err(WorkflowRefusal::VariantMismatch(id.clone()).into());
            }
        }

        self.rederive()
    }

    pub fn set_additional_days(
        &mut self,
        id: &ReevaluationId,
        days: i64,
    ) -> Result<DerivedChange, CaseError> {
        self.ensure_editable(StepId::Reevaluations)?;

        let entry = self.entry_mut(id)?;
        match &mut entry.detail {
            ReevaluationDetail::Standard {
                outcome: Some(ReevaluationOutcome::Alta),
                ..
            } => Err(WorkflowRefusal::DischargedEntry(id.clone()).into()),
            ReevaluationDetail::Standard {
                dias_adicionales, ..
            } => {
                *dias_adicionales = days.max(0);
                self.rederive()
            }
            ReevaluationDetail::Specialty { .. } => {
                Err(WorkflowRefusal::VariantMismatch(id.clone()).into())
            }
        }
    }

    pub fn set_specialist_name(
        &mut self,
        id: &ReevaluationId,
        name: String,
    ) -> Result<DerivedChange, CaseError> {
        self.ensure_editable(StepId::Reevaluations)?;

        let entry = self.entry_mut(id)?;
        match &mut entry.detail {
            ReevaluationDetail::Specialty {
                nombre_especialista,
            } => {
                *nombre_especialista = name;
                self.rederive()
            }
            ReevaluationDetail::Standard { .. } => {
                Err(WorkflowRefusal::VariantMismatch(id.clone()).into())
            }
        }
    }

    pub fn set_reevaluation_comments(
        &mut self,
        id: &ReevaluationId,
        comments: String,
    ) -> Result<DerivedChange, CaseError> {
        self.ensure_editable(StepId::Reevaluations)?;

        let entry = self.entry_mut(id)?;
        entry.comentarios = comments;
        self.rederive()
    }

    pub fn set_status(&mut self, status: CaseStatus) -> Result<DerivedChange, CaseError> {
        self.case.status = status;
        self.rederive()
    }

    /// Locks the current section. Pending fields are surfaced as warnings;
    /// locking never fails because of them.
    pub fn lock_section(&mut self, step: StepId) -> Result<LockOutcome, CaseError> {
        let warnings = steps::missing_fields(&self.case, step);
        if !warnings.is_empty() {
            debug!(step = step.label(), pending = warnings.len(), "section locked with pending fields");
        }

        self.locks.insert(step, SectionLock::Locked);
        self.rederive()?;
        Ok(LockOutcome {
            lock: SectionLock::Locked,
            warnings,
        })
    }

    pub fn unlock_section(&mut self, step: StepId) -> Result<DerivedChange, CaseError> {
        self.locks.insert(step, SectionLock::Editable);
        self.rederive()
    }

    pub fn go_to(&mut self, step: StepId) {
        self.current_step = step;
    }

    /// Moves to the next step. With `RequireValidStep`, the currently
    /// viewed step must have no pending fields; the refusal carries the
    /// pending list.
    pub fn advance(&mut self) -> Result<StepId, WorkflowRefusal> {
        if self.gate == NavigationGate::RequireValidStep {
            let missing = steps::missing_fields(&self.case, self.current_step);
            if !missing.is_empty() {
                return Err(WorkflowRefusal::StepIncomplete {
                    step: self.current_step,
                    missing,
                });
            }
        }

        if let Some(next) = self.current_step.next() {
            self.current_step = next;
        }
        Ok(self.current_step)
    }

    pub fn back(&mut self) -> StepId {
        if let Some(previous) = self.current_step.previous() {
            self.current_step = previous;
        }
        self.current_step
    }
}

fn apply_assessment_edit(assessment: &mut PhysicalAssessment, edit: AssessmentEdit) {
    match edit {
        AssessmentEdit::Demand(row, level) => {
            assessment
                .matrix
                .entry(row)
                .or_insert_with(CharacteristicRating::default)
                .demand = level;
        }
        AssessmentEdit::Capacity(row, level) => {
            assessment
                .matrix
                .entry(row)
                .or_insert_with(CharacteristicRating::default)
                .capacity = level;
        }
        AssessmentEdit::ItemValue(activity, value) => {
            assessment.functional.entry(activity).or_default().value = value;
        }
        AssessmentEdit::ItemDetail(activity, detail) => {
            assessment.functional.entry(activity).or_default().detail = detail;
        }
        AssessmentEdit::Alert(alert) => assessment.alerta_farmacologica = alert,
        AssessmentEdit::Laterality(laterality) => assessment.lateralidad = laterality,
        AssessmentEdit::Diagnoses(diagnoses) => assessment.diagnosticos = diagnoses,
        AssessmentEdit::PhysicianName(name) => assessment.medico_nombre = name,
        AssessmentEdit::StartDate(date) => assessment.indicacion_inicio = date,
        AssessmentEdit::Duration(duration) => assessment.indicacion_duracion = duration,
    }
}
