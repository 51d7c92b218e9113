use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Storage model for one day of vital-sign observations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct HealthRecord {
    /// Calendar day of the observation, unique within a series
    pub date: NaiveDate,

    /// Heart rate in beats per minute
    pub heart_rate: f64,

    /// Systolic blood pressure in mmHg
    pub systolic_bp: f64,

    /// Diastolic blood pressure in mmHg
    pub diastolic_bp: f64,

    /// Blood glucose in mg/dL
    pub blood_glucose: f64,

    /// Optional body temperature in °F
    pub temperature: Option<f64>,

    /// Optional body weight in kg
    pub weight: Option<f64>,

    /// Optional hours slept
    pub sleep_hours: Option<f64>,
}

impl HealthRecord {
    /// Record with the four required vitals and no optional values
    pub fn new(
        date: NaiveDate,
        heart_rate: f64,
        systolic_bp: f64,
        diastolic_bp: f64,
        blood_glucose: f64,
    ) -> Self {
        Self {
            date,
            heart_rate,
            systolic_bp,
            diastolic_bp,
            blood_glucose,
            temperature: None,
            weight: None,
            sleep_hours: None,
        }
    }
}

/// A measurable column of a health series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    HeartRate,
    SystolicBp,
    DiastolicBp,
    BloodGlucose,
    Temperature,
    Weight,
    SleepHours,
}

impl Metric {
    /// Every metric, in column order
    pub const ALL: [Metric; 7] = [
        Metric::HeartRate,
        Metric::SystolicBp,
        Metric::DiastolicBp,
        Metric::BloodGlucose,
        Metric::Temperature,
        Metric::Weight,
        Metric::SleepHours,
    ];

    /// Metrics every record must carry
    pub const REQUIRED: [Metric; 4] = [
        Metric::HeartRate,
        Metric::SystolicBp,
        Metric::DiastolicBp,
        Metric::BloodGlucose,
    ];

    /// Column name used in tabular input
    pub fn column(&self) -> &'static str {
        match self {
            Metric::HeartRate => "heart_rate",
            Metric::SystolicBp => "systolic_bp",
            Metric::DiastolicBp => "diastolic_bp",
            Metric::BloodGlucose => "blood_glucose",
            Metric::Temperature => "temperature",
            Metric::Weight => "weight",
            Metric::SleepHours => "sleep_hours",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Metric::HeartRate => "bpm",
            Metric::SystolicBp | Metric::DiastolicBp => "mmHg",
            Metric::BloodGlucose => "mg/dL",
            Metric::Temperature => "°F",
            Metric::Weight => "kg",
            Metric::SleepHours => "hours",
        }
    }

    pub fn is_required(&self) -> bool {
        Self::REQUIRED.contains(self)
    }

    /// Read this metric from a record; `None` when an optional value is absent
    pub fn value(&self, record: &HealthRecord) -> Option<f64> {
        match self {
            Metric::HeartRate => Some(record.heart_rate),
            Metric::SystolicBp => Some(record.systolic_bp),
            Metric::DiastolicBp => Some(record.diastolic_bp),
            Metric::BloodGlucose => Some(record.blood_glucose),
            Metric::Temperature => record.temperature,
            Metric::Weight => record.weight,
            Metric::SleepHours => record.sleep_hours,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Metric::ALL
            .iter()
            .copied()
            .find(|metric| metric.column() == wanted)
            .ok_or_else(|| format!("Unknown metric: {}", s))
    }
}
