use super::common::registration_day;
use crate::workflows::case::catalog::Characteristic;
use crate::workflows::case::domain::{
    CapacityLevel, CharacteristicRating, DemandLevel, PhysicalAssessment,
};
use crate::workflows::case::scoring::score_assessment;

fn rate(
    assessment: &mut PhysicalAssessment,
    row: Characteristic,
    demand: DemandLevel,
    capacity: CapacityLevel,
) {
    assessment.matrix.insert(
        row,
        CharacteristicRating {
            demand: Some(demand),
            capacity: Some(capacity),
        },
    );
}

#[test]
fn prefilled_assessment_scores_zero_with_no_contributors() {
    // Fresh rows carry a capacity but no demand, so nothing is scoreable.
    let assessment = PhysicalAssessment::new(registration_day());

    let score = score_assessment(&assessment);
    assert_eq!(score.max_score, 0);
    assert!(score.contributing.is_empty());
}

#[test]
fn fully_graded_rows_at_minimum_severity_report_no_contributors() {
    let mut assessment = PhysicalAssessment::new(registration_day());
    for row in Characteristic::ALL {
        rate(&mut assessment, row, DemandLevel::MuyAlto, CapacityLevel::SinDificultad);
    }

    let score = score_assessment(&assessment);
    assert_eq!(score.max_score, 0);
    assert!(score.contributing.is_empty());
}

#[test]
fn single_worst_row_dominates_the_score() {
    let mut assessment = PhysicalAssessment::new(registration_day());
    rate(
        &mut assessment,
        Characteristic::MemoriaVisual,
        DemandLevel::Bajo,
        CapacityLevel::SinCapacidad,
    );
    rate(
        &mut assessment,
        Characteristic::BipedestacionMantenida,
        DemandLevel::Medio,
        CapacityLevel::DificultadLeve,
    );

    let score = score_assessment(&assessment);
    assert_eq!(score.max_score, 5);
    assert_eq!(score.contributing, vec!["Memoria visual"]);
}

#[test]
fn tied_rows_accumulate_and_lower_rows_stay_out() {
    let mut assessment = PhysicalAssessment::new(registration_day());
    rate(
        &mut assessment,
        Characteristic::MemoriaVisual,
        DemandLevel::Alto,
        CapacityLevel::DificultadModerada,
    );
    rate(
        &mut assessment,
        Characteristic::BipedestacionMantenida,
        DemandLevel::Alto,
        CapacityLevel::DificultadModerada,
    );
    rate(
        &mut assessment,
        Characteristic::CampoVisual,
        DemandLevel::Bajo,
        CapacityLevel::DificultadLeve,
    );

    let score = score_assessment(&assessment);
    assert_eq!(score.max_score, 4);
    assert_eq!(score.contributing.len(), 2);
    assert!(score.contributing.contains(&"Memoria visual"));
    assert!(score.contributing.contains(&"Bipedestación"));
}

#[test]
fn half_graded_rows_are_skipped() {
    let mut assessment = PhysicalAssessment::new(registration_day());
    // Demand set, capacity cleared: the row must not contribute.
    assessment.matrix.insert(
        Characteristic::MemoriaVisual,
        CharacteristicRating {
            demand: Some(DemandLevel::MuyAlto),
            capacity: None,
        },
    );

    let score = score_assessment(&assessment);
    assert_eq!(score.max_score, 0);
    assert!(score.contributing.is_empty());
}
