use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Display fallback for an empty name.
pub const UNKNOWN_NAME: &str = "Unknown";
/// Display fallback for a missing birth date.
pub const UNKNOWN_DATE: &str = "Unknown";
/// Display fallback for a missing death date. Intentionally differs from [`UNKNOWN_DATE`].
pub const UNKNOWN_DEATH: &str = "N/A";

fn display_or<'a>(value: Option<&'a str>, fallback: &'static str) -> &'a str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => fallback,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Individual {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub death_date: Option<String>,
    #[serde(default)]
    pub parent_families: Vec<String>,
    #[serde(default)]
    pub spouse_families: Vec<String>,
}

impl Individual {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            birth_date: None,
            death_date: None,
            parent_families: Vec::new(),
            spouse_families: Vec::new(),
        }
    }

    pub fn summary(&self) -> PersonSummary {
        PersonSummary {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }

    pub fn detail(&self) -> PersonDetail {
        PersonDetail {
            id: self.id.clone(),
            name: self.name.clone(),
            birth_date: self.birth_date.clone(),
            death_date: self.death_date.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Family {
    pub id: String,
    #[serde(default)]
    pub husband: Option<String>,
    #[serde(default)]
    pub wife: Option<String>,
    #[serde(default)]
    pub children: Vec<String>,
}

impl Family {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            husband: None,
            wife: None,
            children: Vec::new(),
        }
    }

    /// Husband then wife, skipping absent slots.
    pub fn partners(&self) -> impl Iterator<Item = &str> {
        self.husband
            .as_deref()
            .into_iter()
            .chain(self.wife.as_deref())
    }

    /// The partner of `person_id` in this family, if `person_id` is one of the two partners.
    pub fn partner_of(&self, person_id: &str) -> Option<&str> {
        match (self.husband.as_deref(), self.wife.as_deref()) {
            (Some(h), w) if h == person_id => w,
            (h, Some(w)) if w == person_id => h,
            _ => None,
        }
    }
}

/// A parsed record file: every individual and family, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSet {
    pub individuals: IndexMap<String, Individual>,
    pub families: IndexMap<String, Family>,
}

impl RecordSet {
    pub fn individual(&self, id: &str) -> Option<&Individual> {
        self.individuals.get(id)
    }

    pub fn family(&self, id: &str) -> Option<&Family> {
        self.families.get(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonSummary {
    pub id: String,
    pub name: String,
}

impl PersonSummary {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    pub fn display_name(&self) -> &str {
        display_or(Some(self.name.as_str()), UNKNOWN_NAME)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonDetail {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub death_date: Option<String>,
}

impl PersonDetail {
    pub fn summary(&self) -> PersonSummary {
        PersonSummary {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }

    pub fn display_name(&self) -> &str {
        display_or(Some(self.name.as_str()), UNKNOWN_NAME)
    }

    pub fn display_birth(&self) -> &str {
        display_or(self.birth_date.as_deref(), UNKNOWN_DATE)
    }

    pub fn display_death(&self) -> &str {
        display_or(self.death_date.as_deref(), UNKNOWN_DEATH)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Surroundings {
    #[serde(default)]
    pub parents: Vec<PersonSummary>,
    #[serde(default)]
    pub siblings: Vec<PersonSummary>,
    #[serde(default)]
    pub spouses: Vec<PersonSummary>,
    #[serde(default)]
    pub children: Vec<PersonSummary>,
}

impl Surroundings {
    /// The spouse shown in the diagram: only the first entry is ever displayed.
    pub fn displayed_spouse(&self) -> Option<&PersonSummary> {
        self.spouses.first()
    }

    /// Count of relatives that get a node: extra spouses are not placed.
    pub fn displayed_len(&self) -> usize {
        self.parents.len()
            + self.siblings.len()
            + self.spouses.len().min(1)
            + self.children.len()
    }
}
