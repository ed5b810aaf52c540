//! Aggregator status reconciliation
//!
//! Turns the two raw channel states of each aggregator (beast data feed and
//! MLAT) into the three indicators of the status table. The three indicators
//! are derived independently from the same two fields.
//!
//! | beast | mlat | enabled | data | mlat |
//! |-------|------|---------|------|------|
//! | good | good | on | on | on |
//! | good | disconnected/down/bad/error | warning | on | error |
//! | good | unknown | on | on | off |
//! | degraded/intermittent | any | off | warning | per mlat |
//! | anything else | any | off | off | per mlat |

use crate::models::{AggregatorRecord, AggregatorStatus, AggregatorView, QuadState, TriState};

/// Reconcile raw records into views, preserving input order
pub fn reconcile(records: &[AggregatorRecord]) -> Vec<AggregatorView> {
    records.iter().map(reconcile_record).collect()
}

/// Reconcile a single record
pub fn reconcile_record(record: &AggregatorRecord) -> AggregatorView {
    AggregatorView {
        name: record.display_name.clone(),
        enabled_indicator: enabled_indicator(record.beast_status, record.mlat_status),
        data_indicator: data_indicator(record.beast_status),
        mlat_indicator: mlat_indicator(record.mlat_status),
    }
}

/// MLAT is optional, so an unknown MLAT state never downgrades a good feed.
pub fn enabled_indicator(beast: AggregatorStatus, mlat: AggregatorStatus) -> TriState {
    let beast_good = beast.is_good();
    let mlat_good = mlat.is_good();
    let mlat_bad = mlat.is_failed();

    if beast_good && mlat_good {
        TriState::On
    } else if beast_good && mlat_bad {
        TriState::Warning
    } else if beast_good {
        TriState::On
    } else {
        TriState::Off
    }
}

pub fn data_indicator(beast: AggregatorStatus) -> TriState {
    if beast.is_good() {
        TriState::On
    } else if beast.is_impaired() {
        TriState::Warning
    } else {
        TriState::Off
    }
}

pub fn mlat_indicator(mlat: AggregatorStatus) -> QuadState {
    if mlat.is_good() {
        QuadState::On
    } else if mlat.is_impaired() {
        QuadState::Warning
    } else if mlat.is_failed() {
        QuadState::Error
    } else {
        QuadState::Off
    }
}
