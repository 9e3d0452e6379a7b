//! Occupational case assessment and progression.
//!
//! A case carries two functional-capacity assessments, the job analysis,
//! and the follow-up chain. Everything derived from those inputs — severity
//! scores, section statuses, chain dates — is recomputed as a pure function
//! of the snapshot; the [`CaseProgressionController`] owns the record and
//! re-derives after every mutation.

pub mod catalog;
pub mod chain;
pub mod domain;
pub mod progression;
pub mod repository;
pub mod scoring;
pub mod steps;
pub mod views;

#[cfg(test)]
mod tests;

pub use catalog::{Characteristic, Dimension, Variable};
pub use domain::{
    CapacityLevel, CaseData, CaseStatus, CharacteristicRating, DemandLevel, Diagnosis, EventType,
    FunctionalActivity, FunctionalGroup, FunctionalItem, ItemRating, Laterality,
    PharmacologicalAlert, PhysicalAssessment, Reevaluation, ReevaluationDetail, ReevaluationId,
    ReevaluationOutcome, Sex,
};
pub use progression::{
    AssessmentEdit, AssessmentSlot, CaseError, CaseProgressionController, ChainState,
    DerivedChange, GeneralInfoUpdate, JobAnalysisUpdate, LockOutcome, NavigationGate, SectionLock,
    WorkflowRefusal,
};
pub use repository::{CaseHeaderRecord, CaseRepository, PersistenceError};
pub use scoring::{RoleScore, ScoreInterpretation, ScoringError, SCORE_MATRIX};
pub use steps::{StepId, StepStatus, StepStatuses};
pub use views::{CaseViewState, ReevaluationView, ScoreView, StepStatusView};
