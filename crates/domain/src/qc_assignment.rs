use std::collections::{BTreeSet, HashSet};
use std::str::FromStr;

use millqc_core::{AppError, AppResult, NonEmptyString, normalize_email};
use serde::{Deserialize, Serialize};

use crate::stage::{ALL_INSPECTION_STAGES, InspectionStage, OrderType};

/// Stable inspector identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InspectorId(NonEmptyString);

impl InspectorId {
    /// Creates a validated inspector identifier.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        Ok(Self(NonEmptyString::new(value)?))
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for InspectorId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::new(value)
    }
}

/// QC inspector and the stages they may sign off.
///
/// Stages are stored as one flat set across all order types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inspector {
    id: InspectorId,
    name: NonEmptyString,
    email: Option<String>,
    assigned_stages: BTreeSet<InspectionStage>,
    order_types: BTreeSet<OrderType>,
}

impl Inspector {
    /// Creates a validated inspector.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: Option<String>,
        assigned_stages: impl IntoIterator<Item = InspectionStage>,
        order_types: impl IntoIterator<Item = OrderType>,
    ) -> AppResult<Self> {
        Ok(Self {
            id: InspectorId::new(id)?,
            name: NonEmptyString::new(name)?,
            email: email
                .map(|value| normalize_email(value.as_str()))
                .filter(|value| !value.is_empty()),
            assigned_stages: assigned_stages.into_iter().collect(),
            order_types: order_types.into_iter().collect(),
        })
    }

    /// Returns the inspector identifier.
    #[must_use]
    pub fn id(&self) -> &InspectorId {
        &self.id
    }

    /// Returns the inspector name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the email once the inspector has signed in.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the assigned stages in workflow order.
    #[must_use]
    pub fn assigned_stages(&self) -> &BTreeSet<InspectionStage> {
        &self.assigned_stages
    }

    /// Returns the order types this inspector covers.
    #[must_use]
    pub fn order_types(&self) -> &BTreeSet<OrderType> {
        &self.order_types
    }
}

/// Immutable inspector roster.
#[derive(Debug, Clone)]
pub struct QcAssignmentTable {
    inspectors: Vec<Inspector>,
}

impl QcAssignmentTable {
    /// Creates a roster, rejecting duplicate inspector identifiers.
    pub fn new(inspectors: Vec<Inspector>) -> AppResult<Self> {
        let mut seen = HashSet::new();
        for inspector in &inspectors {
            if !seen.insert(inspector.id().as_str()) {
                return Err(AppError::Conflict(format!(
                    "inspector '{}' is defined more than once",
                    inspector.id().as_str()
                )));
            }
        }

        Ok(Self { inspectors })
    }

    /// Builds the organization's fixed inspector roster.
    pub fn standard() -> AppResult<Self> {
        use crate::stage::InspectionStage::{
            Bazaar, Binding, Clipping, FinalInspection, FinishedQc, OnLoom, Stretching, Washing,
        };
        use crate::stage::OrderType::{Production, Sampling};

        Self::new(vec![
            Inspector::new(
                "QC-01",
                "Ramesh Kumar",
                Some("ramesh.kumar@easternmills.com".to_owned()),
                [OnLoom, Bazaar],
                [Production],
            )?,
            Inspector::new(
                "QC-02",
                "Sunita Devi",
                Some("sunita.devi@easternmills.com".to_owned()),
                [Bazaar, Washing, Stretching],
                [Production, Sampling],
            )?,
            Inspector::new("QC-03", "Mohd. Irfan", None, [Clipping, Binding], [Production])?,
            Inspector::new(
                "QC-04",
                "Anil Yadav",
                Some("anil.yadav@easternmills.com".to_owned()),
                [Binding, FinishedQc],
                [Production],
            )?,
            Inspector::new(
                "QC-05",
                "Pooja Sharma",
                Some("pooja.sharma@easternmills.com".to_owned()),
                [FinishedQc, FinalInspection],
                [Production, Sampling],
            )?,
            Inspector::new(
                "QC-06",
                "Vikas Maurya",
                None,
                [OnLoom, Bazaar, Clipping],
                [Sampling],
            )?,
        ])
    }

    /// Returns the roster in table order.
    #[must_use]
    pub fn inspectors(&self) -> &[Inspector] {
        self.inspectors.as_slice()
    }

    /// Returns inspectors assigned to `stage`.
    #[must_use]
    pub fn inspectors_for_stage(&self, stage: InspectionStage) -> Vec<&Inspector> {
        self.inspectors
            .iter()
            .filter(|inspector| inspector.assigned_stages.contains(&stage))
            .collect()
    }

    /// Returns inspectors covering `order_type`.
    #[must_use]
    pub fn inspectors_for_order_type(&self, order_type: OrderType) -> Vec<&Inspector> {
        self.inspectors
            .iter()
            .filter(|inspector| inspector.order_types.contains(&order_type))
            .collect()
    }

    /// Returns the stages of an inspector. Unknown ids yield nothing.
    #[must_use]
    pub fn stages_for_inspector(&self, inspector_id: &str) -> Vec<InspectionStage> {
        self.inspectors
            .iter()
            .find(|inspector| inspector.id.as_str() == inspector_id)
            .map(|inspector| inspector.assigned_stages.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Finds the inspector linked to an email.
    #[must_use]
    pub fn find_inspector_by_email(&self, email: &str) -> Option<&Inspector> {
        let email = normalize_email(email);
        self.inspectors
            .iter()
            .find(|inspector| inspector.email.as_deref() == Some(email.as_str()))
    }
}

/// Per-user stage grant provisioned by an administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStagePermission {
    /// External user id.
    pub user_id: String,
    /// Email the grant applies to.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Stage labels as stored, possibly stale.
    pub assigned_stages: Vec<String>,
    /// Inactive grants are ignored.
    pub is_active: bool,
}

impl UserStagePermission {
    /// Returns whether this record belongs to `email`.
    #[must_use]
    pub fn matches_email(&self, email: &str) -> bool {
        normalize_email(self.email.as_str()) == normalize_email(email)
    }

    /// Returns the assigned stages that still exist.
    #[must_use]
    pub fn known_stages(&self) -> Vec<InspectionStage> {
        self.assigned_stages
            .iter()
            .filter_map(|label| InspectionStage::parse(label))
            .collect()
    }
}

/// What a user without a usable stage grant gets to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnprovisionedStagePolicy {
    /// Every inspection stage.
    #[default]
    ShowAll,
    /// No stages.
    Deny,
}

impl UnprovisionedStagePolicy {
    /// Returns a stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShowAll => "show_all",
            Self::Deny => "deny",
        }
    }
}

impl FromStr for UnprovisionedStagePolicy {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "show_all" => Ok(Self::ShowAll),
            "deny" => Ok(Self::Deny),
            _ => Err(AppError::Validation(format!(
                "unprovisioned stage policy must be 'show_all' or 'deny', got '{value}'"
            ))),
        }
    }
}

/// Returns the stage labels granted to `email`.
///
/// A missing or inactive record yields an empty list. Labels are returned
/// verbatim, including ones that no longer name a stage.
#[must_use]
pub fn visible_stages_for_user(email: &str, records: &[UserStagePermission]) -> Vec<String> {
    records
        .iter()
        .find(|record| record.matches_email(email))
        .filter(|record| record.is_active)
        .map(|record| record.assigned_stages.clone())
        .unwrap_or_default()
}

/// Returns the stages `email` may act on, every stage when nothing is granted.
#[must_use]
pub fn filter_stages_by_permission(email: &str, records: &[UserStagePermission]) -> Vec<String> {
    filter_stages_with_policy(email, records, UnprovisionedStagePolicy::ShowAll)
}

/// Returns the stages `email` may act on, applying `policy` when nothing is granted.
#[must_use]
pub fn filter_stages_with_policy(
    email: &str,
    records: &[UserStagePermission],
    policy: UnprovisionedStagePolicy,
) -> Vec<String> {
    let visible = visible_stages_for_user(email, records);
    if !visible.is_empty() {
        return visible;
    }

    match policy {
        UnprovisionedStagePolicy::ShowAll => ALL_INSPECTION_STAGES
            .iter()
            .map(|stage| stage.as_str().to_owned())
            .collect(),
        UnprovisionedStagePolicy::Deny => Vec::new(),
    }
}
