//! Merging a parsed report into the metric state.

use super::{field, RawReport};
use crate::metrics::MetricState;

/// Counts from one projection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Projection {
    /// Pairs whose key is in the field table.
    pub applied: usize,
    /// Applied pairs whose value fell back to zero.
    pub defaulted: usize,
    /// Pairs with keys not in the field table.
    pub ignored: usize,
}

/// Converts every known field in `report` and stores it in `state`.
///
/// Unknown keys are skipped. Later duplicates overwrite earlier ones.
/// Nothing is ever removed from `state`.
pub fn apply(report: &RawReport, state: &mut MetricState) -> Projection {
    let mut projection = Projection::default();

    for (key, raw) in report.iter() {
        let Some(def) = field(key) else {
            projection.ignored += 1;
            continue;
        };

        let conversion = def.convert(raw);
        if !conversion.is_parsed() {
            projection.defaulted += 1;
            tracing::trace!(key, raw, "value not understood, reporting 0");
        }

        state.get_or_create(def.metric_name, def.help);
        state.update(def.metric_name, conversion.value());
        projection.applied += 1;
    }

    projection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::parse;

    #[test]
    fn test_end_to_end_text() {
        let report = parse("STATUS: ONLINE\nLINEV: 230.1 Volts\nBADLINE\nLOADPCT: 12 Percent\n");
        let mut state = MetricState::new();
        let projection = apply(&report, &mut state);

        assert_eq!(projection.applied, 3);
        assert_eq!(state.len(), 3);
        assert_eq!(state.value("apcupsd_ups_status"), Some(0.0));
        assert_eq!(state.value("apcupsd_ups_linev"), Some(230.1));
        assert_eq!(state.value("apcupsd_ups_loadpct"), Some(12.0));
        assert!(state.iter().all(|(name, _)| !name.to_lowercase().contains("badline")));
    }

    #[test]
    fn test_apply_is_idempotent() {
        let report = parse("STATUS: ONBATT\nBCHARGE: 80.0 Percent\n");
        let mut state = MetricState::new();
        apply(&report, &mut state);
        let once = state.clone();
        apply(&report, &mut state);

        assert_eq!(state, once);
    }

    #[test]
    fn test_missing_key_keeps_last_value() {
        let mut state = MetricState::new();
        apply(&parse("LINEV: 230.1 Volts\nBCHARGE: 100.0 Percent\n"), &mut state);
        apply(&parse("BCHARGE: 95.0 Percent\n"), &mut state);

        assert_eq!(state.value("apcupsd_ups_linev"), Some(230.1));
        assert_eq!(state.value("apcupsd_ups_bcharge"), Some(95.0));
    }

    #[test]
    fn test_unknown_keys_and_defaults_counted() {
        let report = parse("APC: 001,036,0869\nHOSTNAME: ups1\nTIMELEFT: N/A\n");
        let mut state = MetricState::new();
        let projection = apply(&report, &mut state);

        assert_eq!(
            projection,
            Projection {
                applied: 1,
                defaulted: 1,
                ignored: 2
            }
        );
        assert_eq!(state.value("apcupsd_ups_timeleft"), Some(0.0));
    }

    #[test]
    fn test_later_duplicate_wins() {
        let mut state = MetricState::new();
        apply(&parse("LOADPCT: 10 Percent\nLOADPCT: 20 Percent\n"), &mut state);
        assert_eq!(state.value("apcupsd_ups_loadpct"), Some(20.0));
    }

    #[test]
    fn test_existing_metric_overwritten_with_first_help_kept() {
        let mut state = MetricState::new();
        state.get_or_create("apcupsd_ups_bcharge", "kept help").value = 50.0;

        apply(&parse("BCHARGE: N/A
"), &mut state);

        let entry = state.get("apcupsd_ups_bcharge").unwrap();
        assert_eq!(entry.value, 0.0);
        assert_eq!(entry.help, "kept help");
    }

    #[test]
    fn test_help_recorded_on_creation() {
        let mut state = MetricState::new();
        apply(&parse("LINEV: 230.1 Volts\n"), &mut state);
        assert_eq!(
            state.get("apcupsd_ups_linev").map(|e| e.help.as_str()),
            Some("Current input line voltage")
        );
    }
}
