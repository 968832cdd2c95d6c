// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use std::fmt;

/// Three-level volume classification, ordered by severity.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    #[default]
    Normal,
    #[cfg_attr(feature = "serde", serde(rename = "Alert-high"))]
    AlertHigh,
    #[cfg_attr(feature = "serde", serde(rename = "Alarm-high"))]
    AlarmHigh,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Normal, Status::AlertHigh, Status::AlarmHigh];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::AlertHigh => "Alert-high",
            Self::AlarmHigh => "Alarm-high",
        }
    }

    pub fn is_flagged(self) -> bool {
        self != Self::Normal
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::Status;

    #[test]
    fn severity_order_and_labels() {
        assert!(Status::Normal < Status::AlertHigh);
        assert!(Status::AlertHigh < Status::AlarmHigh);
        assert_eq!(Status::default(), Status::Normal);
        let labels: Vec<_> = Status::ALL.iter().map(|s| s.to_string()).collect();
        assert_eq!(labels, vec!["Normal", "Alert-high", "Alarm-high"]);
        assert!(!Status::Normal.is_flagged());
        assert!(Status::AlarmHigh.is_flagged());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_uses_dashboard_labels() {
        for status in Status::ALL {
            let encoded = serde_json::to_string(&status).expect("status should serialize");
            assert_eq!(encoded, format!("\"{}\"", status.as_str()));
            let decoded: Status = serde_json::from_str(&encoded).expect("status should deserialize");
            assert_eq!(decoded, status);
        }
    }
}
