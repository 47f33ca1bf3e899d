use std::fmt::{Display, Formatter};
use std::str::FromStr;

use millqc_core::AppError;
use serde::{Deserialize, Serialize};

/// Inspection workflow stage a rug passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InspectionStage {
    /// Weaving check while the rug is still on the loom.
    #[serde(rename = "On Loom")]
    OnLoom,
    /// Receiving inspection when the rug comes off the loom.
    #[serde(rename = "Bazaar")]
    Bazaar,
    /// Wash inspection.
    #[serde(rename = "Washing")]
    Washing,
    /// Post-wash stretching.
    #[serde(rename = "Stretching")]
    Stretching,
    /// Pile clipping and carving.
    #[serde(rename = "Clipping")]
    Clipping,
    /// Edge binding and fringe finishing.
    #[serde(rename = "Binding")]
    Binding,
    /// Full-lot finished goods check.
    #[serde(rename = "100% Finished QC")]
    FinishedQc,
    /// Pre-shipment inspection.
    #[serde(rename = "Final Inspection")]
    FinalInspection,
}

/// Every inspection stage in workflow order.
pub const ALL_INSPECTION_STAGES: [InspectionStage; 8] = [
    InspectionStage::OnLoom,
    InspectionStage::Bazaar,
    InspectionStage::Washing,
    InspectionStage::Stretching,
    InspectionStage::Clipping,
    InspectionStage::Binding,
    InspectionStage::FinishedQc,
    InspectionStage::FinalInspection,
];

impl InspectionStage {
    /// Returns the workflow label for this stage.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnLoom => "On Loom",
            Self::Bazaar => "Bazaar",
            Self::Washing => "Washing",
            Self::Stretching => "Stretching",
            Self::Clipping => "Clipping",
            Self::Binding => "Binding",
            Self::FinishedQc => "100% Finished QC",
            Self::FinalInspection => "Final Inspection",
        }
    }

    /// Returns the defect-table process inspected at this stage.
    #[must_use]
    pub fn process(&self) -> ProcessName {
        match self {
            Self::OnLoom => ProcessName::OnLoom,
            Self::Bazaar => ProcessName::PreInspection,
            Self::Washing | Self::Stretching => ProcessName::Washing,
            Self::Clipping => ProcessName::Clipping,
            Self::Binding => ProcessName::Binding,
            Self::FinishedQc | Self::FinalInspection => ProcessName::FinalInspection,
        }
    }

    /// Parses a workflow label, returning `None` when unknown.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        ALL_INSPECTION_STAGES
            .iter()
            .copied()
            .find(|stage| stage.as_str() == value)
    }
}

impl FromStr for InspectionStage {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
            .ok_or_else(|| AppError::Validation(format!("unknown inspection stage '{value}'")))
    }
}

impl Display for InspectionStage {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Process label used to key the defect catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProcessName {
    /// Weaving defects.
    #[serde(rename = "On Loom")]
    OnLoom,
    /// Defects found when the rug first comes off the loom.
    #[serde(rename = "Pre Inspection")]
    PreInspection,
    /// Wash and stretch defects.
    #[serde(rename = "Washing")]
    Washing,
    /// Clipping and carving defects.
    #[serde(rename = "Clipping")]
    Clipping,
    /// Binding and fringe defects.
    #[serde(rename = "Binding")]
    Binding,
    /// Finished goods and shipment defects.
    #[serde(rename = "Final Inspection")]
    FinalInspection,
}

impl ProcessName {
    /// Returns the process label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnLoom => "On Loom",
            Self::PreInspection => "Pre Inspection",
            Self::Washing => "Washing",
            Self::Clipping => "Clipping",
            Self::Binding => "Binding",
            Self::FinalInspection => "Final Inspection",
        }
    }

    /// Returns all processes.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[
            Self::OnLoom,
            Self::PreInspection,
            Self::Washing,
            Self::Clipping,
            Self::Binding,
            Self::FinalInspection,
        ]
    }

    /// Parses a process label with exact, case-sensitive matching.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|process| process.as_str() == value)
    }
}

impl Display for ProcessName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Translates a stage label into its process label.
///
/// Labels that are not a known stage pass through unchanged.
#[must_use]
pub fn map_inspection_stage_to_process(stage: &str) -> String {
    InspectionStage::parse(stage)
        .map(|stage| stage.process().as_str().to_owned())
        .unwrap_or_else(|| stage.to_owned())
}

/// Kind of order an inspector is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// Buyer samples and development pieces.
    Sampling,
    /// Bulk production orders.
    Production,
}

impl OrderType {
    /// Returns a stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sampling => "sampling",
            Self::Production => "production",
        }
    }
}

impl FromStr for OrderType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "sampling" => Ok(Self::Sampling),
            "production" => Ok(Self::Production),
            _ => Err(AppError::Validation(format!("unknown order type '{value}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ALL_INSPECTION_STAGES, InspectionStage, ProcessName, map_inspection_stage_to_process,
    };

    #[test]
    fn unknown_stage_passes_through() {
        assert_eq!(map_inspection_stage_to_process("UnknownStage"), "UnknownStage");
        assert_eq!(map_inspection_stage_to_process(""), "");
    }

    #[test]
    fn known_stages_map_to_process_labels() {
        assert_eq!(map_inspection_stage_to_process("Bazaar"), "Pre Inspection");
        assert_eq!(
            map_inspection_stage_to_process("100% Finished QC"),
            "Final Inspection"
        );
        assert_eq!(map_inspection_stage_to_process("Stretching"), "Washing");
    }

    #[test]
    fn stage_matching_is_case_sensitive() {
        assert_eq!(map_inspection_stage_to_process("bazaar"), "bazaar");
        assert!(InspectionStage::parse("bazaar").is_none());
    }

    #[test]
    fn every_stage_label_roundtrips() {
        for stage in ALL_INSPECTION_STAGES {
            assert_eq!(InspectionStage::parse(stage.as_str()), Some(stage));
        }
        assert_eq!(ALL_INSPECTION_STAGES.len(), 8);
    }

    #[test]
    fn serde_uses_workflow_labels() {
        let encoded = serde_json::to_string(&InspectionStage::FinishedQc);
        assert_eq!(encoded.unwrap_or_default(), "\"100% Finished QC\"");

        let decoded = serde_json::from_str::<ProcessName>("\"Pre Inspection\"");
        assert_eq!(decoded.ok(), Some(ProcessName::PreInspection));
    }
}
