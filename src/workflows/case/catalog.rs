use serde::{Deserialize, Serialize};

/// Top-level grouping of the job-characteristic matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    CargaMental,
    CargaFisica,
    CargaEmocional,
    OtrosRiesgos,
}

impl Dimension {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::CargaMental,
            Self::CargaFisica,
            Self::CargaEmocional,
            Self::OtrosRiesgos,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::CargaMental => "Carga Mental",
            Self::CargaFisica => "Carga Física",
            Self::CargaEmocional => "Carga Emocional",
            Self::OtrosRiesgos => "Otros Riesgos",
        }
    }
}

/// Intermediate grouping between a dimension and its characteristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variable {
    ProcesamientoInformacion,
    ActitudesTrabajo,
    AptitudesFisicas,
    CargaEmocional,
    FactoresAmbientales,
}

impl Variable {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ProcesamientoInformacion => "Procesamiento de la información",
            Self::ActitudesTrabajo => "Actitudes en el trabajo",
            Self::AptitudesFisicas => "Aptitudes físicas",
            Self::CargaEmocional => "Carga Emocional",
            Self::FactoresAmbientales => "Factores ambientales",
        }
    }
}

/// One row of the demand/capacity matrix. The set is fixed by the paper
/// form; enumerating it keeps lookups exhaustive instead of going through
/// string-keyed field access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Characteristic {
    MemoriaVisual,
    SemejanzasDiferencias,
    OrientacionEspacial,
    ConocimientoNumerico,
    AprendizajeTareas,
    LenguajeExpresivo,
    ConocimientoEscritura,
    LenguajeComprensivo,
    ConocimientoLectura,
    ResponsabilidadAutonomia,
    Repetitividad,
    Atencion,
    Ritmo,
    Organizacion,
    RelacionesTrabajo,
    SeguridadMental,
    ManipulacionManualCarga,
    CoordinacionManipulativa,
    CargaPosturalRepetitivo,
    TrabajoPrecision,
    SedestacionMantenida,
    BipedestacionMantenida,
    MarchaTerrenoIrregular,
    CampoVisual,
    AgudezaVisual,
    RequerimientoAuditivo,
    RequerimientoFonatorio,
    RequerimientoOlfatoGusto,
    SensibilidadSuperficialProfunda,
    ControlEmocional,
    RelacionesPsicosociales,
    AmbienteTermico,
    AmbienteSonoro,
    CondicionesLuminicas,
    HigieneOcupacional,
}

impl Characteristic {
    /// Authoritative form order, used by the scorer so contributing labels
    /// come out in a stable sequence.
    pub const ALL: [Self; 35] = [
        Self::MemoriaVisual,
        Self::SemejanzasDiferencias,
        Self::OrientacionEspacial,
        Self::ConocimientoNumerico,
        Self::AprendizajeTareas,
        Self::LenguajeExpresivo,
        Self::ConocimientoEscritura,
        Self::LenguajeComprensivo,
        Self::ConocimientoLectura,
        Self::ResponsabilidadAutonomia,
        Self::Repetitividad,
        Self::Atencion,
        Self::Ritmo,
        Self::Organizacion,
        Self::RelacionesTrabajo,
        Self::SeguridadMental,
        Self::ManipulacionManualCarga,
        Self::CoordinacionManipulativa,
        Self::CargaPosturalRepetitivo,
        Self::TrabajoPrecision,
        Self::SedestacionMantenida,
        Self::BipedestacionMantenida,
        Self::MarchaTerrenoIrregular,
        Self::CampoVisual,
        Self::AgudezaVisual,
        Self::RequerimientoAuditivo,
        Self::RequerimientoFonatorio,
        Self::RequerimientoOlfatoGusto,
        Self::SensibilidadSuperficialProfunda,
        Self::ControlEmocional,
        Self::RelacionesPsicosociales,
        Self::AmbienteTermico,
        Self::AmbienteSonoro,
        Self::CondicionesLuminicas,
        Self::HigieneOcupacional,
    ];

    pub const fn dimension(self) -> Dimension {
        match self {
            Self::MemoriaVisual
            | Self::SemejanzasDiferencias
            | Self::OrientacionEspacial
            | Self::ConocimientoNumerico
            | Self::AprendizajeTareas
            | Self::LenguajeExpresivo
            | Self::ConocimientoEscritura
            | Self::LenguajeComprensivo
            | Self::ConocimientoLectura
            | Self::ResponsabilidadAutonomia
            | Self::Repetitividad
            | Self::Atencion
            | Self::Ritmo
            | Self::Organizacion
            | Self::RelacionesTrabajo
            | Self::SeguridadMental => Dimension::CargaMental,
            Self::ManipulacionManualCarga
            | Self::CoordinacionManipulativa
            | Self::CargaPosturalRepetitivo
            | Self::TrabajoPrecision
            | Self::SedestacionMantenida
            | Self::BipedestacionMantenida
            | Self::MarchaTerrenoIrregular
            | Self::CampoVisual
            | Self::AgudezaVisual
            | Self::RequerimientoAuditivo
            | Self::RequerimientoFonatorio
            | Self::RequerimientoOlfatoGusto
            | Self::SensibilidadSuperficialProfunda => Dimension::CargaFisica,
            Self::ControlEmocional | Self::RelacionesPsicosociales => Dimension::CargaEmocional,
            Self::AmbienteTermico
            | Self::AmbienteSonoro
            | Self::CondicionesLuminicas
            | Self::HigieneOcupacional => Dimension::OtrosRiesgos,
        }
    }

    pub const fn variable(self) -> Variable {
        match self {
            Self::MemoriaVisual
            | Self::SemejanzasDiferencias
            | Self::OrientacionEspacial
            | Self::ConocimientoNumerico
            | Self::AprendizajeTareas
            | Self::LenguajeExpresivo
            | Self::ConocimientoEscritura
            | Self::LenguajeComprensivo
            | Self::ConocimientoLectura => Variable::ProcesamientoInformacion,
            Self::ResponsabilidadAutonomia
            | Self::Repetitividad
            | Self::Atencion
            | Self::Ritmo
            | Self::Organizacion
            | Self::RelacionesTrabajo
            | Self::SeguridadMental => Variable::ActitudesTrabajo,
            Self::ManipulacionManualCarga
            | Self::CoordinacionManipulativa
            | Self::CargaPosturalRepetitivo
            | Self::TrabajoPrecision
            | Self::SedestacionMantenida
            | Self::BipedestacionMantenida
            | Self::MarchaTerrenoIrregular
            | Self::CampoVisual
            | Self::AgudezaVisual
            | Self::RequerimientoAuditivo
            | Self::RequerimientoFonatorio
            | Self::RequerimientoOlfatoGusto
            | Self::SensibilidadSuperficialProfunda => Variable::AptitudesFisicas,
            Self::ControlEmocional | Self::RelacionesPsicosociales => Variable::CargaEmocional,
            Self::AmbienteTermico
            | Self::AmbienteSonoro
            | Self::CondicionesLuminicas
            | Self::HigieneOcupacional => Variable::FactoresAmbientales,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::MemoriaVisual => "Memoria visual",
            Self::SemejanzasDiferencias => "Semejanzas y diferencias",
            Self::OrientacionEspacial => "Orientación espacial",
            Self::ConocimientoNumerico => "Conocimiento numérico",
            Self::AprendizajeTareas => "Aprendizaje de tareas",
            Self::LenguajeExpresivo => "Lenguaje expresivo",
            Self::ConocimientoEscritura => "Conocimiento de la escritura",
            Self::LenguajeComprensivo => "Lenguaje comprensivo",
            Self::ConocimientoLectura => "Conocimiento de la lectura",
            Self::ResponsabilidadAutonomia => {
                "Responsabilidad/ autonomía laboral y realización de la tarea"
            }
            Self::Repetitividad => "Repetitividad",
            Self::Atencion => "Atención",
            Self::Ritmo => "Ritmo",
            Self::Organizacion => "Organización",
            Self::RelacionesTrabajo => "Relaciones de trabajo",
            Self::SeguridadMental => "Seguridad",
            Self::ManipulacionManualCarga => "Manipulación Manual de carga",
            Self::CoordinacionManipulativa => "Coordinación manipulativa",
            Self::CargaPosturalRepetitivo => "Carga postural/Trabajo repetitivo",
            Self::TrabajoPrecision => "Trabajo de precisión",
            Self::SedestacionMantenida => "Sedestación Mantenida",
            Self::BipedestacionMantenida => "Bipedestación",
            Self::MarchaTerrenoIrregular => "Marcha por terreno irregular",
            Self::CampoVisual => "Campo visual",
            Self::AgudezaVisual => "Agudez visual",
            Self::RequerimientoAuditivo => "Requerimiento Auditivo",
            Self::RequerimientoFonatorio => "Requerimiento fonatorio",
            Self::RequerimientoOlfatoGusto => "Requerimiento de olfato y/o gusto",
            Self::SensibilidadSuperficialProfunda => "Sensibilidad: superficial y/o profunda",
            Self::ControlEmocional => "Control emocional",
            Self::RelacionesPsicosociales => "Relaciones Psicosociales",
            Self::AmbienteTermico => "Ambiente térmico",
            Self::AmbienteSonoro => "Ambiente sonoro",
            Self::CondicionesLuminicas => "Condiciones lumínicas",
            Self::HigieneOcupacional => "Higiene ocupacional",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn catalog_covers_thirty_five_distinct_rows() {
        let unique: BTreeSet<_> = Characteristic::ALL.iter().collect();
        assert_eq!(unique.len(), 35);
    }

    #[test]
    fn every_variable_belongs_to_its_dimension() {
        for row in Characteristic::ALL {
            let expected = match row.variable() {
                Variable::ProcesamientoInformacion | Variable::ActitudesTrabajo => {
                    Dimension::CargaMental
                }
                Variable::AptitudesFisicas => Dimension::CargaFisica,
                Variable::CargaEmocional => Dimension::CargaEmocional,
                Variable::FactoresAmbientales => Dimension::OtrosRiesgos,
            };
            assert_eq!(row.dimension(), expected, "row {row:?}");
        }
    }

    #[test]
    fn mental_load_groups_sixteen_rows() {
        let count = Characteristic::ALL
            .iter()
            .filter(|row| row.dimension() == Dimension::CargaMental)
            .count();
        assert_eq!(count, 16);
    }
}
