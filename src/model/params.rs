use super::StreamRole;
use serde::{Deserialize, Serialize};

/// Whether an allocation is a single flat share or varies by date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationCriteria {
    Flat,
    Dates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRow {
    pub period: String,
    pub value: f64,
}

/// Time-series allocation carried by standard edges, as a percentage of the source stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationSeries {
    pub criteria: AllocationCriteria,
    #[serde(default)]
    pub rows: Vec<AllocationRow>,
}

impl Default for AllocationSeries {
    fn default() -> Self {
        Self::flat(100.0)
    }
}

impl AllocationSeries {
    pub fn flat(value: f64) -> Self {
        Self {
            criteria: AllocationCriteria::Flat,
            rows: vec![AllocationRow {
                period: "Flat".to_string(),
                value,
            }],
        }
    }

    pub fn dated(rows: impl IntoIterator<Item = (String, f64)>) -> Self {
        Self {
            criteria: AllocationCriteria::Dates,
            rows: rows
                .into_iter()
                .map(|(period, value)| AllocationRow { period, value })
                .collect(),
        }
    }

    /// Canvas label: `"40%"` for a flat allocation, `"Dates*%"` when it varies by date.
    pub fn label(&self) -> String {
        match (self.criteria, self.rows.first()) {
            (AllocationCriteria::Dates, _) => "Dates*%".to_string(),
            (AllocationCriteria::Flat, Some(row)) => format!("{}%", format_percent(row.value)),
            (AllocationCriteria::Flat, None) => String::new(),
        }
    }
}

fn format_percent(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        let text = format!("{:.4}", value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// One input or output row of a custom calculation node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationRow {
    pub id: String,
    pub name: String,
    pub stream_role: StreamRole,
    #[serde(default)]
    pub assigned: bool,
}

/// The part of a custom calculation node's params that determines its ports.
///
/// Parsed as a view over the node's params; unknown keys stay in the node record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomCalculationParams {
    #[serde(default)]
    pub inputs: Vec<CalculationRow>,
    #[serde(default)]
    pub outputs: Vec<CalculationRow>,
    #[serde(default)]
    pub suppress_link_port: bool,
}

impl CustomCalculationParams {
    pub fn from_params(params: &serde_json::Value) -> Result<Self, serde_json::Error> {
        if params.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(params.clone())
    }

    pub fn assigned_inputs(&self) -> impl Iterator<Item = &CalculationRow> {
        self.inputs.iter().filter(|row| row.assigned)
    }

    pub fn assigned_outputs(&self) -> impl Iterator<Item = &CalculationRow> {
        self.outputs.iter().filter(|row| row.assigned)
    }
}
