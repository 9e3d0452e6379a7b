use super::catalog::Characteristic;
use super::domain::PhysicalAssessment;
use serde::Serialize;

/// Severity matrix, row = capacity index (0..=5), column = demand index
/// (0..=3). Non-decreasing along both axes: a higher demand or a deeper
/// capacity deficit can never lower the severity.
pub const SCORE_MATRIX: [[u8; 4]; 6] = [
    [0, 0, 0, 0],
    [1, 1, 2, 2],
    [2, 2, 3, 3],
    [3, 3, 4, 4],
    [4, 4, 5, 5],
    [5, 5, 5, 5],
];

/// Worst-case severity over the whole matrix plus every row tied at it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleScore {
    pub max_score: u8,
    pub contributing: Vec<&'static str>,
}

/// Scores an assessment snapshot. Rows missing either the demand or the
/// capacity grade contribute nothing; ties at the running maximum
/// accumulate instead of replacing each other. A maximum of zero reports
/// no contributing rows.
pub fn score_assessment(assessment: &PhysicalAssessment) -> RoleScore {
    let mut max_score = 0u8;
    let mut contributing: Vec<&'static str> = Vec::new();

    for row in Characteristic::ALL {
        let Some(rating) = assessment.matrix.get(&row) else {
            continue;
        };
        let (Some(demand), Some(capacity)) = (rating.demand, rating.capacity) else {
            continue;
        };

        let severity = SCORE_MATRIX[capacity.index()][demand.index()];
        if severity > max_score {
            max_score = severity;
            contributing.clear();
            contributing.push(row.label());
        } else if severity == max_score && severity > 0 {
            contributing.push(row.label());
        }
    }

    RoleScore {
        max_score,
        contributing,
    }
}

/// Human-readable reading of a severity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreInterpretation {
    pub definition: &'static str,
    pub percentage: &'static str,
}

const INTERPRETATIONS: [ScoreInterpretation; 6] = [
    ScoreInterpretation {
        definition: "Sin limitaciones en el puesto de trabajo original",
        percentage: "0%",
    },
    ScoreInterpretation {
        definition: "Limitaciones leves para la actividad laboral en el puesto de trabajo original",
        percentage: "5%",
    },
    ScoreInterpretation {
        definition:
            "Limitaciones moderadas para la actividad laboral en el puesto de trabajo original",
        percentage: "10%",
    },
    ScoreInterpretation {
        definition:
            "Con limitaciones severas para la actividad laboral del puesto de trabajo original",
        percentage: "15%",
    },
    ScoreInterpretation {
        definition: "Con limitaciones severas para la actividad laboral del puesto de trabajo \
                     original y limitaciones leves para actividades laborales de otro puesto de \
                     trabajo",
        percentage: "20%",
    },
    ScoreInterpretation {
        definition: "Sin posibilidad de realizar actividades laborales",
        percentage: "25%",
    },
];

/// The interpretation table is exhaustive over 0..=5; anything outside is a
/// configuration fault and must surface, never be clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error("severity score {0} falls outside the interpretation table (0..=5)")]
    ScoreOutOfRange(u8),
}

pub fn interpret(score: u8) -> Result<&'static ScoreInterpretation, ScoringError> {
    INTERPRETATIONS
        .get(score as usize)
        .ok_or(ScoringError::ScoreOutOfRange(score))
}
