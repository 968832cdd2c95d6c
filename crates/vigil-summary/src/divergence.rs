// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use vigil_core::{ClassifiedSeries, GroupKey, Period, Status, VigilError};

/// One point the two baseline models classified differently.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Divergence {
    pub group: GroupKey,
    pub period: Period,
    pub count: u64,
    pub static_status: Status,
    pub dynamic_status: Status,
    pub static_z: f64,
    pub dynamic_z: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct DivergenceReport {
    pub compared: usize,
    pub divergences: Vec<Divergence>,
    /// Share of points where both models agree; `1.0` for an empty series.
    pub agreement_rate: f64,
}

/// Point-by-point comparison of a static and a dynamic classification of the
/// same aggregated series.
pub fn divergences(
    static_series: &ClassifiedSeries,
    dynamic_series: &ClassifiedSeries,
) -> Result<DivergenceReport, VigilError> {
    if static_series.dimensions != dynamic_series.dimensions {
        return Err(VigilError::invalid_input(
            "cannot compare classifications grouped by different dimensions",
        ));
    }
    if static_series.points.len() != dynamic_series.points.len() {
        return Err(VigilError::invalid_input(format!(
            "cannot compare classifications of different series: {} vs {} points",
            static_series.points.len(),
            dynamic_series.points.len()
        )));
    }

    let mut out = Vec::new();
    for (lhs, rhs) in static_series.points.iter().zip(&dynamic_series.points) {
        if lhs.group != rhs.group || lhs.period != rhs.period || lhs.count != rhs.count {
            return Err(VigilError::invalid_input(format!(
                "cannot compare classifications of different series: '{}' {} ({}) vs '{}' {} ({})",
                lhs.group, lhs.period, lhs.count, rhs.group, rhs.period, rhs.count
            )));
        }
        if lhs.status != rhs.status {
            out.push(Divergence {
                group: lhs.group.clone(),
                period: lhs.period,
                count: lhs.count,
                static_status: lhs.status,
                dynamic_status: rhs.status,
                static_z: lhs.z_score,
                dynamic_z: rhs.z_score,
            });
        }
    }

    let compared = static_series.points.len();
    let agreement_rate = if compared == 0 {
        1.0
    } else {
        (compared - out.len()) as f64 / compared as f64
    };
    Ok(DivergenceReport {
        compared,
        divergences: out,
        agreement_rate,
    })
}
