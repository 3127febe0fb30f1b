use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Board column a PR sits in. The five states form a nominal order
/// (initial through released) but any transition is allowed; the board
/// moves cards freely in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrStatus {
    Initial,
    InReview,
    Approved,
    Merged,
    Released,
}

impl PrStatus {
    /// All statuses in board-column order.
    pub const ALL: [Self; 5] = [
        Self::Initial,
        Self::InReview,
        Self::Approved,
        Self::Merged,
        Self::Released,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::InReview => "in_review",
            Self::Approved => "approved",
            Self::Merged => "merged",
            Self::Released => "released",
        }
    }

    /// Human-readable column title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Initial => "Initial",
            Self::InReview => "In Review",
            Self::Approved => "Approved",
            Self::Merged => "Merged",
            Self::Released => "Released",
        }
    }
}

impl fmt::Display for PrStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "initial" => Ok(Self::Initial),
            "in_review" => Ok(Self::InReview),
            "approved" => Ok(Self::Approved),
            "merged" => Ok(Self::Merged),
            "released" => Ok(Self::Released),
            other => Err(format!("unknown status '{other}'")),
        }
    }
}

/// Whether a PR belongs to a project or a service. The category decides
/// which of the two name fields is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Project,
    Service,
}

impl Category {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Service => "service",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "project" => Ok(Self::Project),
            "service" => Ok(Self::Service),
            other => Err(format!("unknown category '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(format!("unknown priority '{other}'")),
        }
    }
}

/// External link attached to a PR card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrLink {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// A tracked pull request as exchanged over the API and held by the board.
/// Server-assigned fields (id, owner) are opaque to the client; the owner
/// never appears in responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrItem {
    pub id: i32,
    pub title: String,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: PrStatus,
    pub priority: Priority,
    #[serde(default)]
    pub links: Vec<PrLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<String>,
    #[serde(default)]
    pub email_reminder: bool,
    #[serde(default)]
    pub calendar_event: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl PrItem {
    /// Name of the workspace this PR belongs to, per its category.
    #[must_use]
    pub fn workspace_name(&self) -> Option<&str> {
        match self.category {
            Category::Project => self.project.as_deref(),
            Category::Service => self.service.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_str() {
        for status in PrStatus::ALL {
            assert_eq!(status.as_str().parse::<PrStatus>().unwrap(), status);
        }
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&PrStatus::InReview).unwrap();
        assert_eq!(json, "\"in_review\"");
    }

    #[test]
    fn workspace_name_follows_category() {
        let pr = PrItem {
            id: 1,
            title: "Fix bug".to_string(),
            category: Category::Service,
            project: Some("Core".to_string()),
            service: Some("Billing".to_string()),
            author: "A".to_string(),
            description: None,
            status: PrStatus::Initial,
            priority: Priority::Medium,
            links: vec![],
            scheduled_date: None,
            scheduled_time: None,
            email_reminder: false,
            calendar_event: false,
            created_at: String::new(),
            updated_at: String::new(),
        };
        assert_eq!(pr.workspace_name(), Some("Billing"));
    }
}
