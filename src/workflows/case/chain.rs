use super::domain::Reevaluation;
use chrono::{Duration, NaiveDate};

/// Permissive day-count parse used for the free-form duration field:
/// everything but digits is stripped, an unusable remainder counts as 0.
pub fn parse_duration_days(raw: &str) -> i64 {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// Result of a chain pass. `changed` is false when every derived value
/// already matched, letting callers skip redundant writes and re-renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainUpdate {
    pub entries: Vec<Reevaluation>,
    pub changed: bool,
}

/// Rebuilds every derived date and cumulative day total from the base
/// values, front to back:
///
/// - entry 0 falls `base_duration_days` after `base_start`;
/// - entry i follows entry i-1 by that entry's additional days, and stays
///   undated while its predecessor is undated;
/// - each running total is the base duration plus all additional days up
///   to and including the entry.
///
/// Discharge zeroes an entry's additional days at the mutation site, so a
/// terminated chain stabilizes here without special handling. A missing
/// base start leaves the entries untouched.
pub fn recompute(
    base_start: Option<NaiveDate>,
    base_duration_days: i64,
    entries: &[Reevaluation],
) -> ChainUpdate {
    let Some(base_start) = base_start else {
        return ChainUpdate {
            entries: entries.to_vec(),
            changed: false,
        };
    };

    let mut updated = Vec::with_capacity(entries.len());
    let mut changed = false;
    let mut previous_fecha: Option<NaiveDate> = None;
    let mut accumulated = base_duration_days;

    for (index, entry) in entries.iter().enumerate() {
        let expected_fecha = if index == 0 {
            Some(base_start + Duration::days(base_duration_days))
        } else {
            previous_fecha.map(|fecha| fecha + Duration::days(entries[index - 1].additional_days()))
        };

        accumulated += entry.additional_days();

        let mut next = entry.clone();
        if next.fecha != expected_fecha || next.total_dias != accumulated {
            changed = true;
            next.fecha = expected_fecha;
            next.total_dias = accumulated;
        }

        previous_fecha = expected_fecha;
        updated.push(next);
    }

    ChainUpdate {
        entries: updated,
        changed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::case::domain::{
        ReevaluationDetail, ReevaluationId, ReevaluationOutcome,
    };

    fn standard_entry(id: &str, dias: i64) -> Reevaluation {
        let mut entry = Reevaluation::new(ReevaluationId(id.to_string()), false);
        entry.detail = ReevaluationDetail::Standard {
            outcome: Some(ReevaluationOutcome::Continuacion),
            dias_adicionales: dias,
        };
        entry
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn parses_duration_strings_permissively() {
        assert_eq!(parse_duration_days("15"), 15);
        assert_eq!(parse_duration_days(" 15 días "), 15);
        assert_eq!(parse_duration_days("aprox. 7d"), 7);
        assert_eq!(parse_duration_days(""), 0);
        assert_eq!(parse_duration_days("sin plazo"), 0);
    }

    #[test]
    fn forward_pass_matches_worked_example() {
        let entries = vec![standard_entry("r1", 5), standard_entry("r2", 3)];

        let update = recompute(Some(date(2024, 1, 1)), 10, &entries);

        assert!(update.changed);
        assert_eq!(update.entries[0].fecha, Some(date(2024, 1, 11)));
        assert_eq!(update.entries[0].total_dias, 15);
        assert_eq!(update.entries[1].fecha, Some(date(2024, 1, 16)));
        assert_eq!(update.entries[1].total_dias, 18);
    }

    #[test]
    fn recompute_is_idempotent() {
        let entries = vec![standard_entry("r1", 5), standard_entry("r2", 3)];

        let first = recompute(Some(date(2024, 1, 1)), 10, &entries);
        let second = recompute(Some(date(2024, 1, 1)), 10, &first.entries);

        assert!(first.changed);
        assert!(!second.changed);
        assert_eq!(first.entries, second.entries);
    }

    #[test]
    fn missing_base_start_leaves_entries_untouched() {
        let mut entry = standard_entry("r1", 5);
        entry.fecha = Some(date(2023, 12, 1));
        entry.total_dias = 42;
        let entries = vec![entry.clone()];

        let update = recompute(None, 10, &entries);

        assert!(!update.changed);
        assert_eq!(update.entries, vec![entry]);
    }

    #[test]
    fn month_boundaries_use_calendar_days() {
        let entries = vec![standard_entry("r1", 5)];

        let update = recompute(Some(date(2024, 1, 25)), 10, &entries);

        assert_eq!(update.entries[0].fecha, Some(date(2024, 2, 4)));
    }

    #[test]
    fn specialty_entries_forward_the_date_without_extension() {
        let specialty = Reevaluation::new(ReevaluationId("esp".to_string()), true);
        let entries = vec![standard_entry("r1", 5), specialty, standard_entry("r2", 3)];

        let update = recompute(Some(date(2024, 1, 1)), 10, &entries);

        // The specialist review sits on the same derived date offset as its
        // predecessor's extension, and adds nothing itself.
        assert_eq!(update.entries[1].fecha, Some(date(2024, 1, 16)));
        assert_eq!(update.entries[1].total_dias, 15);
        assert_eq!(update.entries[2].fecha, Some(date(2024, 1, 16)));
        assert_eq!(update.entries[2].total_dias, 18);
    }
}
