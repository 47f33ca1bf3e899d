use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use millqc_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::stage::{InspectionStage, ProcessName};

/// Severity tier of a defect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// Rejects the piece outright.
    Critical,
    /// Requires rework before the piece moves on.
    Major,
    /// Cosmetic, tolerated within limits.
    Minor,
}

impl Severity {
    /// Returns the display label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::Major => "Major",
            Self::Minor => "Minor",
        }
    }

    /// Returns the styling bucket for this tier.
    #[must_use]
    pub fn display_class(&self) -> SeverityDisplayClass {
        match self {
            Self::Critical => SeverityDisplayClass::Critical,
            Self::Major => SeverityDisplayClass::Major,
            Self::Minor => SeverityDisplayClass::Minor,
        }
    }
}

impl FromStr for Severity {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Critical" => Ok(Self::Critical),
            "Major" => Ok(Self::Major),
            "Minor" => Ok(Self::Minor),
            _ => Err(AppError::Validation(format!("unknown severity '{value}'"))),
        }
    }
}

impl Display for Severity {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Presentation bucket for a severity label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityDisplayClass {
    /// Critical styling.
    Critical,
    /// Major styling.
    Major,
    /// Minor styling.
    Minor,
    /// Anything unrecognised.
    Unknown,
}

impl SeverityDisplayClass {
    /// Returns a stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Unknown => "unknown",
        }
    }

    /// Returns the styling token consumed by the UI.
    #[must_use]
    pub fn token(&self) -> &'static str {
        match self {
            Self::Critical => "bg-red-100 text-red-800",
            Self::Major => "bg-orange-100 text-orange-800",
            Self::Minor => "bg-yellow-100 text-yellow-800",
            Self::Unknown => "bg-gray-100 text-gray-800",
        }
    }
}

/// Returns the styling bucket for a severity label.
#[must_use]
pub fn severity_display_class(severity: &str) -> SeverityDisplayClass {
    Severity::from_str(severity)
        .map(|severity| severity.display_class())
        .unwrap_or(SeverityDisplayClass::Unknown)
}

/// Catalogued defect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefectDefinition {
    code: NonEmptyString,
    name: NonEmptyString,
    process: ProcessName,
    severity: Severity,
}

impl DefectDefinition {
    /// Creates a validated defect definition.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        process: ProcessName,
        severity: Severity,
    ) -> AppResult<Self> {
        Ok(Self {
            code: NonEmptyString::new(code)?,
            name: NonEmptyString::new(name)?,
            process,
            severity,
        })
    }

    /// Returns the globally unique defect code.
    #[must_use]
    pub fn code(&self) -> &str {
        self.code.as_str()
    }

    /// Returns the defect name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the process this defect belongs to.
    #[must_use]
    pub fn process(&self) -> ProcessName {
        self.process
    }

    /// Returns the severity tier.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }
}

/// Immutable, ordered defect catalog.
#[derive(Debug, Clone)]
pub struct DefectCatalog {
    definitions: Vec<DefectDefinition>,
}

impl DefectCatalog {
    /// Creates a catalog, rejecting duplicate codes.
    pub fn new(definitions: Vec<DefectDefinition>) -> AppResult<Self> {
        let mut seen = HashSet::new();
        for definition in &definitions {
            if !seen.insert(definition.code()) {
                return Err(AppError::Conflict(format!(
                    "defect code '{}' is defined more than once",
                    definition.code()
                )));
            }
        }

        Ok(Self { definitions })
    }

    /// Builds the organization's fixed defect catalog.
    pub fn standard() -> AppResult<Self> {
        let definitions = STANDARD_DEFECTS
            .iter()
            .map(|(code, name, process, severity)| {
                DefectDefinition::new(*code, *name, *process, *severity)
            })
            .collect::<AppResult<Vec<_>>>()?;

        Self::new(definitions)
    }

    /// Returns every definition in catalog order.
    #[must_use]
    pub fn definitions(&self) -> &[DefectDefinition] {
        self.definitions.as_slice()
    }

    /// Returns the definitions for `process` in catalog order.
    #[must_use]
    pub fn defects_for_process(&self, process: ProcessName) -> Vec<&DefectDefinition> {
        self.definitions
            .iter()
            .filter(|definition| definition.process() == process)
            .collect()
    }

    /// Returns the definitions for a process label. Unknown labels yield nothing.
    #[must_use]
    pub fn defects_for_process_label(&self, process: &str) -> Vec<&DefectDefinition> {
        ProcessName::parse(process)
            .map(|process| self.defects_for_process(process))
            .unwrap_or_default()
    }

    /// Returns the definitions inspected at `stage`.
    #[must_use]
    pub fn defects_for_stage(&self, stage: InspectionStage) -> Vec<&DefectDefinition> {
        self.defects_for_process(stage.process())
    }

    /// Finds a definition by code.
    #[must_use]
    pub fn find(&self, code: &str) -> Option<&DefectDefinition> {
        self.definitions
            .iter()
            .find(|definition| definition.code() == code)
    }
}

static STANDARD_DEFECTS: &[(&str, &str, ProcessName, Severity)] = &[
    ("L01", "Wrong design or pattern", ProcessName::OnLoom, Severity::Critical),
    ("L02", "Knot density below specification", ProcessName::OnLoom, Severity::Major),
    ("L03", "Yarn color variation", ProcessName::OnLoom, Severity::Major),
    ("L04", "Loose knots", ProcessName::OnLoom, Severity::Minor),
    ("L05", "Uneven weft packing", ProcessName::OnLoom, Severity::Minor),
    ("P001", "Size out of tolerance", ProcessName::PreInspection, Severity::Critical),
    ("P002", "Shade variation", ProcessName::PreInspection, Severity::Critical),
    ("P003", "Design mismatch", ProcessName::PreInspection, Severity::Critical),
    ("P004", "Missing knots", ProcessName::PreInspection, Severity::Major),
    ("P005", "Uneven pile height", ProcessName::PreInspection, Severity::Major),
    ("P006", "Weft visible on surface", ProcessName::PreInspection, Severity::Major),
    ("P007", "Loose ends on back", ProcessName::PreInspection, Severity::Minor),
    ("P008", "Dirt or stains", ProcessName::PreInspection, Severity::Minor),
    ("W01", "Color bleeding", ProcessName::Washing, Severity::Critical),
    ("W02", "Shrinkage after wash", ProcessName::Washing, Severity::Major),
    ("W03", "Water marks", ProcessName::Washing, Severity::Major),
    ("W04", "Chemical odor", ProcessName::Washing, Severity::Minor),
    ("W05", "Not fully dried", ProcessName::Washing, Severity::Minor),
    ("C1", "Pile clipped too low", ProcessName::Clipping, Severity::Critical),
    ("C2", "Uneven clipping", ProcessName::Clipping, Severity::Major),
    ("C3", "Carving lines not sharp", ProcessName::Clipping, Severity::Major),
    ("C4", "Clipping marks visible", ProcessName::Clipping, Severity::Minor),
    ("C5", "Loose fibers on surface", ProcessName::Clipping, Severity::Minor),
    ("C6", "Fringe not trimmed", ProcessName::Clipping, Severity::Minor),
    ("B1", "Binding color mismatch", ProcessName::Binding, Severity::Major),
    ("B2", "Wavy edges", ProcessName::Binding, Severity::Major),
    ("B3", "Loose binding stitches", ProcessName::Binding, Severity::Major),
    ("B4", "Uneven fringe length", ProcessName::Binding, Severity::Minor),
    ("B5", "Binding knots visible", ProcessName::Binding, Severity::Minor),
    ("F01", "Final size out of tolerance", ProcessName::FinalInspection, Severity::Critical),
    ("F02", "Odor", ProcessName::FinalInspection, Severity::Major),
    ("F03", "Excess shedding", ProcessName::FinalInspection, Severity::Major),
    ("F04", "Corners not square", ProcessName::FinalInspection, Severity::Major),
    ("F05", "Label or tag missing", ProcessName::FinalInspection, Severity::Minor),
    ("F06", "Packing damage", ProcessName::FinalInspection, Severity::Minor),
];

#[cfg(test)]
mod tests {
    use super::{
        DefectCatalog, DefectDefinition, Severity, SeverityDisplayClass, severity_display_class,
    };
    use crate::stage::{InspectionStage, ProcessName};

    fn catalog() -> DefectCatalog {
        DefectCatalog::standard().unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn pre_inspection_returns_eight_defects_in_order() {
        let catalog = catalog();
        let codes: Vec<&str> = catalog
            .defects_for_process_label("Pre Inspection")
            .into_iter()
            .map(DefectDefinition::code)
            .collect();

        assert_eq!(
            codes,
            vec!["P001", "P002", "P003", "P004", "P005", "P006", "P007", "P008"]
        );
    }

    #[test]
    fn unknown_process_returns_empty() {
        assert!(catalog().defects_for_process_label("Nonexistent").is_empty());
    }

    #[test]
    fn process_matching_is_case_sensitive() {
        assert!(catalog().defects_for_process_label("pre inspection").is_empty());
    }

    #[test]
    fn unmapped_stage_label_matches_no_defects() {
        let mapped = crate::map_inspection_stage_to_process("Dyeing");
        assert!(catalog().defects_for_process_label(mapped.as_str()).is_empty());
    }

    #[test]
    fn stage_lookup_uses_mapped_process() {
        let catalog = catalog();
        let from_stage = catalog.defects_for_stage(InspectionStage::Bazaar);
        let from_process = catalog.defects_for_process(ProcessName::PreInspection);
        assert_eq!(from_stage, from_process);
    }

    #[test]
    fn every_process_has_defects() {
        let catalog = catalog();
        for process in ProcessName::all() {
            assert!(!catalog.defects_for_process(*process).is_empty());
        }
    }

    #[test]
    fn duplicate_codes_are_rejected_across_processes() {
        let first = DefectDefinition::new("X1", "First", ProcessName::Washing, Severity::Minor);
        let second = DefectDefinition::new("X1", "Second", ProcessName::Binding, Severity::Major);
        let result = DefectCatalog::new(vec![
            first.unwrap_or_else(|_| unreachable!()),
            second.unwrap_or_else(|_| unreachable!()),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn find_returns_definition_by_code() {
        let catalog = catalog();
        let found = catalog.find("C1");
        assert_eq!(found.map(DefectDefinition::process), Some(ProcessName::Clipping));
        assert!(catalog.find("Z9").is_none());
    }

    #[test]
    fn severity_classes_include_unknown_bucket() {
        assert_eq!(severity_display_class("Critical"), SeverityDisplayClass::Critical);
        assert_eq!(severity_display_class("Major"), SeverityDisplayClass::Major);
        assert_eq!(severity_display_class("Minor"), SeverityDisplayClass::Minor);
        assert_eq!(severity_display_class("Cosmetic"), SeverityDisplayClass::Unknown);
        assert_ne!(
            SeverityDisplayClass::Unknown.token(),
            SeverityDisplayClass::Minor.token()
        );
    }
}
