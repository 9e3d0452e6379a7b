use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{CaseData, EventType, Sex};

/// Header projection persisted per case. Derived state (scores, step
/// statuses, chain dates) is recomputed on load and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseHeaderRecord {
    pub fecha_registro: Option<NaiveDate>,
    pub apellidos_nombre: String,
    pub dni_ce_pas: String,
    pub telefono_trabajador: String,
    pub sexo: Option<Sex>,
    pub jornada_laboral: String,
    pub puesto_trabajo: String,
    pub empresa: String,
    pub gerencia: String,
    pub supervisor_responsable: String,
    pub telf_contacto_supervisor: String,
    pub tipo_evento: EventType,
}

impl CaseHeaderRecord {
    pub fn from_case(case: &CaseData) -> Self {
        Self {
            fecha_registro: case.fecha,
            apellidos_nombre: case.trabajador_nombre.clone(),
            dni_ce_pas: case.dni.clone(),
            telefono_trabajador: case.telf_contacto.clone(),
            sexo: case.sexo,
            jornada_laboral: case.jornada_laboral.clone(),
            puesto_trabajo: case.puesto.clone(),
            empresa: case.empresa.clone(),
            gerencia: case.gerencia.clone(),
            supervisor_responsable: case.supervisor.clone(),
            telf_contacto_supervisor: case.supervisor_telf.clone(),
            tipo_evento: case.tipo_evento,
        }
    }
}

/// Storage abstraction so the progression controller can be exercised
/// without a live backend.
pub trait CaseRepository: Send + Sync {
    fn insert(&self, record: CaseHeaderRecord) -> Result<CaseHeaderRecord, PersistenceError>;
    fn delete(&self, dni: &str) -> Result<(), PersistenceError>;
    fn fetch(&self, dni: &str) -> Result<Option<CaseHeaderRecord>, PersistenceError>;
}

/// Backend failures classified into the categories the UI distinguishes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    #[error("duplicate record")]
    Duplicate,
    #[error("referential integrity violation")]
    Referential,
    #[error("permission denied")]
    Permission,
    #[error("check constraint violated")]
    CheckConstraint,
    #[error("storage failure: {0}")]
    Unknown(String),
}

impl PersistenceError {
    /// Maps a backend error (SQLSTATE code plus message) onto the
    /// taxonomy. Unrecognized codes keep the raw message.
    pub fn classify(code: Option<&str>, message: &str) -> Self {
        match code {
            Some("23505") => Self::Duplicate,
            Some("23503") => Self::Referential,
            Some("42501") => Self::Permission,
            Some("23514") => Self::CheckConstraint,
            _ => {
                let lowered = message.to_lowercase();
                if lowered.contains("row-level security") || lowered.contains("rls") {
                    Self::Permission
                } else {
                    Self::Unknown(message.to_string())
                }
            }
        }
    }

    /// User-facing Spanish message for each category.
    pub fn user_message(&self) -> String {
        match self {
            Self::Duplicate => {
                "Ya existe un registro con este DNI. Verifique los datos.".to_string()
            }
            Self::Referential => {
                "El registro está vinculado a otros datos y no puede modificarse.".to_string()
            }
            Self::Permission => {
                "No tiene permisos para realizar esta operación.".to_string()
            }
            Self::CheckConstraint => {
                "Alguno de los valores no cumple las reglas de validación.".to_string()
            }
            Self::Unknown(detail) => format!("Error al guardar: {detail}"),
        }
    }
}
