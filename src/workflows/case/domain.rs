use super::catalog::Characteristic;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Required intensity of a job characteristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DemandLevel {
    Bajo,
    Medio,
    Alto,
    MuyAlto,
}

impl DemandLevel {
    pub const fn ordered() -> [Self; 4] {
        [Self::Bajo, Self::Medio, Self::Alto, Self::MuyAlto]
    }

    /// Column index into the score matrix.
    pub const fn index(self) -> usize {
        match self {
            Self::Bajo => 0,
            Self::Medio => 1,
            Self::Alto => 2,
            Self::MuyAlto => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Bajo => "BAJO",
            Self::Medio => "MEDIO",
            Self::Alto => "ALTO",
            Self::MuyAlto => "MUY ALTO",
        }
    }
}

/// Worker's residual ability for the same characteristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CapacityLevel {
    SinDificultad,
    DificultadNoSignificativa,
    DificultadLeve,
    DificultadModerada,
    DificultadSevera,
    SinCapacidad,
}

impl CapacityLevel {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::SinDificultad,
            Self::DificultadNoSignificativa,
            Self::DificultadLeve,
            Self::DificultadModerada,
            Self::DificultadSevera,
            Self::SinCapacidad,
        ]
    }

    /// Row index into the score matrix.
    pub const fn index(self) -> usize {
        match self {
            Self::SinDificultad => 0,
            Self::DificultadNoSignificativa => 1,
            Self::DificultadLeve => 2,
            Self::DificultadModerada => 3,
            Self::DificultadSevera => 4,
            Self::SinCapacidad => 5,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::SinDificultad => "SIN DIFICULTAD",
            Self::DificultadNoSignificativa => "CON DIFICULTAD NO SIGNIFICATIVA",
            Self::DificultadLeve => "CON DIFICULTAD LEVE",
            Self::DificultadModerada => "CON DIFICULTAD MODERADA",
            Self::DificultadSevera => "CON DIFICULTAD SEVERA",
            Self::SinCapacidad => "SIN CAPACIDAD",
        }
    }

    pub const fn short_label(self) -> &'static str {
        match self {
            Self::SinDificultad => "S/D",
            Self::DificultadNoSignificativa => "DNS",
            Self::DificultadLeve => "LEV",
            Self::DificultadModerada => "MOD",
            Self::DificultadSevera => "SEV",
            Self::SinCapacidad => "S/C",
        }
    }
}

/// Demand/capacity pair recorded for one matrix row. Either side may be
/// unset; the scorer skips rows until both are graded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacteristicRating {
    pub demand: Option<DemandLevel>,
    pub capacity: Option<CapacityLevel>,
}

/// Legacy musculoskeletal rows, grouped by the four printed tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionalGroup {
    LocomocionPostura,
    ManipulacionCargas,
    MiembrosSuperiores,
    SeguridadEntorno,
}

impl FunctionalGroup {
    pub const fn label(self) -> &'static str {
        match self {
            Self::LocomocionPostura => "I. Locomoción y Postura",
            Self::ManipulacionCargas => "II. Manipulación de Cargas",
            Self::MiembrosSuperiores => "III. Miembros Superiores",
            Self::SeguridadEntorno => "IV. Seguridad, Alerta y Entorno",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionalActivity {
    Deambulacion,
    TerrenoIrregular,
    EscalerasFijas,
    EscalasVerticales,
    Bipedestacion,
    Sedestacion,
    Arrodillarse,
    LevantamientoSuelo,
    LevantamientoCintura,
    TransporteCarga,
    EmpujeTraccion,
    Hombro,
    AlcanceFrontal,
    AgarreFuerza,
    MotricidadFina,
    VehiculosLivianos,
    MaquinariaPesada,
    TrabajosAltura,
    Vibracion,
    TurnoNocturno,
}

impl FunctionalActivity {
    pub const ALL: [Self; 20] = [
        Self::Deambulacion,
        Self::TerrenoIrregular,
        Self::EscalerasFijas,
        Self::EscalasVerticales,
        Self::Bipedestacion,
        Self::Sedestacion,
        Self::Arrodillarse,
        Self::LevantamientoSuelo,
        Self::LevantamientoCintura,
        Self::TransporteCarga,
        Self::EmpujeTraccion,
        Self::Hombro,
        Self::AlcanceFrontal,
        Self::AgarreFuerza,
        Self::MotricidadFina,
        Self::VehiculosLivianos,
        Self::MaquinariaPesada,
        Self::TrabajosAltura,
        Self::Vibracion,
        Self::TurnoNocturno,
    ];

    pub const fn group(self) -> FunctionalGroup {
        match self {
            Self::Deambulacion
            | Self::TerrenoIrregular
            | Self::EscalerasFijas
            | Self::EscalasVerticales
            | Self::Bipedestacion
            | Self::Sedestacion
            | Self::Arrodillarse => FunctionalGroup::LocomocionPostura,
            Self::LevantamientoSuelo
            | Self::LevantamientoCintura
            | Self::TransporteCarga
            | Self::EmpujeTraccion => FunctionalGroup::ManipulacionCargas,
            Self::Hombro | Self::AlcanceFrontal | Self::AgarreFuerza | Self::MotricidadFina => {
                FunctionalGroup::MiembrosSuperiores
            }
            Self::VehiculosLivianos
            | Self::MaquinariaPesada
            | Self::TrabajosAltura
            | Self::Vibracion
            | Self::TurnoNocturno => FunctionalGroup::SeguridadEntorno,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Deambulacion => "Deambulación",
            Self::TerrenoIrregular => "Terreno irregular",
            Self::EscalerasFijas => "Escaleras fijas",
            Self::EscalasVerticales => "Escalas verticales",
            Self::Bipedestacion => "Bipedestación",
            Self::Sedestacion => "Sedestación",
            Self::Arrodillarse => "Arrodillarse",
            Self::LevantamientoSuelo => "Levantamiento desde suelo",
            Self::LevantamientoCintura => "Levantamiento desde cintura",
            Self::TransporteCarga => "Transporte de carga",
            Self::EmpujeTraccion => "Empuje y tracción",
            Self::Hombro => "Hombro (encima de cabeza)",
            Self::AlcanceFrontal => "Alcance frontal",
            Self::AgarreFuerza => "Agarre de fuerza",
            Self::MotricidadFina => "Motricidad fina",
            Self::VehiculosLivianos => "Cond. Vehículos Livianos",
            Self::MaquinariaPesada => "Oper. Maquinaria Pesada",
            Self::TrabajosAltura => "Trabajos en Altura (>1.8m)",
            Self::Vibracion => "Exposición a Vibración",
            Self::TurnoNocturno => "Turno Nocturno",
        }
    }

    /// Safety rows grade fitness; everything else grades frequency.
    pub const fn default_rating(self) -> ItemRating {
        match self.group() {
            FunctionalGroup::SeguridadEntorno => ItemRating::NoAplica,
            _ => ItemRating::Constante,
        }
    }
}

/// Single rating shared by the frequency tables (N/O/F/C) and the safety
/// table (APTO / NO APTO / NO APLICA), exactly like the paper form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemRating {
    #[serde(rename = "N")]
    Nunca,
    #[serde(rename = "O")]
    Ocasional,
    #[serde(rename = "F")]
    Frecuente,
    #[serde(rename = "C")]
    Constante,
    #[serde(rename = "APTO")]
    Apto,
    #[serde(rename = "NO APTO")]
    NoApto,
    #[serde(rename = "NO APLICA")]
    NoAplica,
}

impl ItemRating {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Nunca => "Nunca",
            Self::Ocasional => "Ocasional",
            Self::Frecuente => "Frecuente",
            Self::Constante => "Constante",
            Self::Apto => "Apto",
            Self::NoApto => "No Apto",
            Self::NoAplica => "No Aplica",
        }
    }
}

/// Rating plus free-text observation for one functional row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionalItem {
    pub value: Option<ItemRating>,
    #[serde(default)]
    pub detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PharmacologicalAlert {
    SinEfecto,
    ConEfecto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Laterality {
    Derecha,
    Izquierda,
    Bilateral,
    Ninguno,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Masculino,
    Femenino,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "Accidente de Trabajo")]
    AccidenteTrabajo,
    #[serde(rename = "Enfermedad Ocupacional")]
    EnfermedadOcupacional,
    #[serde(rename = "Accidente Común")]
    AccidenteComun,
    #[serde(rename = "Enfermedad Común")]
    EnfermedadComun,
    #[serde(rename = "Otros")]
    Otros,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub descripcion: String,
    pub cie10: String,
}

/// Functional-capacity assessment for one evaluation round. Two
/// independent instances live on every case (`assessment`, `assessment2`);
/// they are scored identically and never merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalAssessment {
    pub matrix: BTreeMap<Characteristic, CharacteristicRating>,
    pub functional: BTreeMap<FunctionalActivity, FunctionalItem>,
    pub alerta_farmacologica: Option<PharmacologicalAlert>,
    pub lateralidad: Option<Laterality>,
    pub diagnosticos: Vec<Diagnosis>,
    pub indicacion_inicio: Option<NaiveDate>,
    /// Free-form duration in days; parsed permissively by the chain engine.
    pub indicacion_duracion: String,
    pub medico_nombre: String,
}

impl PhysicalAssessment {
    /// Fresh assessment with the form's prefill: every matrix row present
    /// with capacity SIN DIFICULTAD and demand unset, functional rows at
    /// their table default, one blank diagnosis line.
    pub fn new(start: NaiveDate) -> Self {
        let matrix = Characteristic::ALL
            .into_iter()
            .map(|row| {
                (
                    row,
                    CharacteristicRating {
                        demand: None,
                        capacity: Some(CapacityLevel::SinDificultad),
                    },
                )
            })
            .collect();

        let functional = FunctionalActivity::ALL
            .into_iter()
            .map(|row| {
                (
                    row,
                    FunctionalItem {
                        value: Some(row.default_rating()),
                        detail: String::new(),
                    },
                )
            })
            .collect();

        Self {
            matrix,
            functional,
            alerta_farmacologica: Some(PharmacologicalAlert::SinEfecto),
            lateralidad: Some(Laterality::Ninguno),
            diagnosticos: vec![Diagnosis::default()],
            indicacion_inicio: Some(start),
            indicacion_duracion: String::new(),
            medico_nombre: String::new(),
        }
    }

    pub fn has_diagnosis(&self) -> bool {
        self.diagnosticos
            .iter()
            .any(|diag| !diag.descripcion.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReevaluationId(pub String);

impl std::fmt::Display for ReevaluationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReevaluationOutcome {
    Continuacion,
    Alta,
}

impl ReevaluationOutcome {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Continuacion => "Continuación",
            Self::Alta => "Alta",
        }
    }
}

/// Variant-specific portion of a re-evaluation. Specialist reviews carry a
/// specialist name instead of an outcome and extension days, so the two
/// shapes cannot be mixed on one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReevaluationDetail {
    Standard {
        outcome: Option<ReevaluationOutcome>,
        dias_adicionales: i64,
    },
    Specialty {
        nombre_especialista: String,
    },
}

/// One entry of the follow-up chain. `fecha` and `total_dias` are derived
/// by the chain engine, never edited directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reevaluation {
    pub id: ReevaluationId,
    pub fecha: Option<NaiveDate>,
    pub detail: ReevaluationDetail,
    pub total_dias: i64,
    pub comentarios: String,
}

impl Reevaluation {
    pub fn new(id: ReevaluationId, specialty: bool) -> Self {
        let detail = if specialty {
            ReevaluationDetail::Specialty {
                nombre_especialista: String::new(),
            }
        } else {
            ReevaluationDetail::Standard {
                outcome: None,
                dias_adicionales: 0,
            }
        };

        Self {
            id,
            fecha: None,
            detail,
            total_dias: 0,
            comentarios: String::new(),
        }
    }

    /// Days this entry extends the chain by. Specialist reviews never add
    /// days.
    pub fn additional_days(&self) -> i64 {
        match &self.detail {
            ReevaluationDetail::Standard {
                dias_adicionales, ..
            } => *dias_adicionales,
            ReevaluationDetail::Specialty { .. } => 0,
        }
    }

    pub fn is_discharge(&self) -> bool {
        matches!(
            self.detail,
            ReevaluationDetail::Standard {
                outcome: Some(ReevaluationOutcome::Alta),
                ..
            }
        )
    }

    pub fn is_specialty(&self) -> bool {
        matches!(self.detail, ReevaluationDetail::Specialty { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseStatus {
    Activo,
    Cerrado,
}

/// Aggregate case record. Owned exclusively by one progression controller
/// at a time; persistence collaborators only ever see projections of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseData {
    pub status: CaseStatus,
    pub fecha: Option<NaiveDate>,
    pub trabajador_nombre: String,
    pub dni: String,
    pub sexo: Option<Sex>,
    pub jornada_laboral: String,
    pub puesto: String,
    pub telf_contacto: String,
    pub empresa: String,
    pub gerencia: String,
    pub supervisor: String,
    pub supervisor_telf: String,
    pub tipo_evento: EventType,
    pub assessment: PhysicalAssessment,
    pub assessment2: PhysicalAssessment,
    pub tareas_realizar: String,
    pub area_lugar: String,
    pub tareas_principales: String,
    pub comentarios_supervisor: String,
    pub reevaluaciones: Vec<Reevaluation>,
}

impl CaseData {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            status: CaseStatus::Activo,
            fecha: Some(today),
            trabajador_nombre: String::new(),
            dni: String::new(),
            sexo: None,
            jornada_laboral: String::new(),
            puesto: String::new(),
            telf_contacto: String::new(),
            empresa: String::new(),
            gerencia: String::new(),
            supervisor: String::new(),
            supervisor_telf: String::new(),
            tipo_evento: EventType::AccidenteTrabajo,
            assessment: PhysicalAssessment::new(today),
            assessment2: PhysicalAssessment::new(today),
            tareas_realizar: String::new(),
            area_lugar: String::new(),
            tareas_principales: String::new(),
            comentarios_supervisor: String::new(),
            reevaluaciones: Vec::new(),
        }
    }

    /// A discharge anywhere in the chain terminates it.
    pub fn is_discharged(&self) -> bool {
        self.reevaluaciones.iter().any(Reevaluation::is_discharge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).expect("valid date")
    }

    #[test]
    fn fresh_assessment_prefills_capacities_and_items() {
        let assessment = PhysicalAssessment::new(day());

        assert_eq!(assessment.matrix.len(), 35);
        assert!(assessment
            .matrix
            .values()
            .all(|rating| rating.demand.is_none()
                && rating.capacity == Some(CapacityLevel::SinDificultad)));

        assert_eq!(assessment.functional.len(), 20);
        let safety = &assessment.functional[&FunctionalActivity::TrabajosAltura];
        assert_eq!(safety.value, Some(ItemRating::NoAplica));
        let locomotion = &assessment.functional[&FunctionalActivity::Deambulacion];
        assert_eq!(locomotion.value, Some(ItemRating::Constante));
    }

    #[test]
    fn specialty_entries_never_extend_the_chain() {
        let entry = Reevaluation::new(ReevaluationId("reev-1".into()), true);
        assert_eq!(entry.additional_days(), 0);
        assert!(!entry.is_discharge());
    }

    #[test]
    fn discharge_is_detected_from_any_entry() {
        let mut case = CaseData::new(day());
        assert!(!case.is_discharged());

        let mut entry = Reevaluation::new(ReevaluationId("reev-1".into()), false);
        entry.detail = ReevaluationDetail::Standard {
            outcome: Some(ReevaluationOutcome::Alta),
            dias_adicionales: 0,
        };
        case.reevaluaciones.push(entry);
        assert!(case.is_discharged());
    }
}
