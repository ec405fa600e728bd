use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub const MAX_ATTACHMENT_BYTES: u64 = 5 * 1024 * 1024;
pub const CHECKLIST_SIZE: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NominationStatus {
    Saved,
    Submitted,
}

impl fmt::Display for NominationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NominationStatus::Saved => f.write_str("Saved"),
            NominationStatus::Submitted => f.write_str("Submitted"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub name: &'static str,
    pub member_limit: usize,
}

pub const CATEGORIES: &[Category] = &[
    Category { name: "Account Management-Small/Mid", member_limit: 3 },
    Category { name: "Account Management-Large", member_limit: 5 },
    Category { name: "Development Center (DC) Management-Large", member_limit: 4 },
    Category { name: "Development Center (DC) Management-Small", member_limit: 6 },
    Category { name: "Infosys Champions-Technology Champion", member_limit: 2 },
    Category { name: "Infosys Champions-Domain Champion", member_limit: 7 },
    Category { name: "Innovation-IP, Products, Platforms and Solutions", member_limit: 5 },
    Category { name: "Innovation-Culture", member_limit: 4 },
    Category { name: "Internal Customer Delight", member_limit: 8 },
    Category { name: "People Development", member_limit: 6 },
    Category { name: "Complex/Business Transformation Program", member_limit: 9 },
    Category { name: "Large Business Operation Program", member_limit: 7 },
    Category { name: "Sales and Marketing - Brand Management", member_limit: 2 },
    Category { name: "Sales and Marketing - Sales Management", member_limit: 4 },
    Category { name: "Systems and Processes", member_limit: 5 },
    Category { name: "Value Champions", member_limit: 9 },
    Category { name: "Sustainability/Social Consciousness", member_limit: 10 },
];

pub const LEVELS: &[&str] = &[
    "Bangalore",
    "Bhubaneswar",
    "Chandigarh (including New Delhi, Mohali)",
    "Chennai (Mahindra City/ Sholinganallur)",
    "Hyderabad",
    "Jaipur",
    "Mangalore",
    "Mysore",
    "Pune",
    "Trivandrum",
    "Americas",
    "ANZ",
    "APAC",
    "EMEA",
];

/// `None` for a category outside the table: no limit applies.
pub fn member_limit(category: &str) -> Option<usize> {
    CATEGORIES
        .iter()
        .find(|c| c.name == category)
        .map(|c| c.member_limit)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Member {
    #[serde(rename = "employeeEmailID")]
    pub email: String,
    #[serde(rename = "eNo")]
    pub employee_no: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Unit")]
    pub unit: String,
    pub contribution: String,
}

/// Confirmation boxes keyed `"0"` to `"5"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Checklist(BTreeMap<String, bool>);

impl Default for Checklist {
    fn default() -> Self {
        Self(
            (0..CHECKLIST_SIZE)
                .map(|index| (index.to_string(), false))
                .collect(),
        )
    }
}

impl Checklist {
    pub fn set(&mut self, index: usize, confirmed: bool) {
        if index < CHECKLIST_SIZE {
            self.0.insert(index.to_string(), confirmed);
        }
    }

    pub fn confirm_all(&mut self) {
        for index in 0..CHECKLIST_SIZE {
            self.set(index, true);
        }
    }

    pub fn is_confirmed(&self, index: usize) -> bool {
        self.0.get(&index.to_string()).copied().unwrap_or(false)
    }

    pub fn is_complete(&self) -> bool {
        (0..CHECKLIST_SIZE).all(|index| self.is_confirmed(index))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Nomination {
    #[serde(rename = "selectedCategory")]
    pub category: String,
    #[serde(rename = "selectedLevel")]
    pub level: String,
    #[serde(rename = "nomination")]
    pub title: String,
    #[serde(rename = "sponsormailid")]
    pub sponsor_mail: String,
    #[serde(rename = "sponsorname")]
    pub sponsor_name: String,
    #[serde(rename = "sponsornumber")]
    pub sponsor_number: String,
    pub members: Vec<Member>,
    #[serde(rename = "filekey")]
    pub file_key: String,
    #[serde(rename = "filename")]
    pub file_name: String,
    #[serde(rename = "filetype")]
    pub file_type: String,
    #[serde(rename = "filesize", deserialize_with = "lenient_size")]
    pub file_size: Option<u64>,
    pub email: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<NominationStatus>,
    /// Local confirmation state; never sent to the server.
    #[serde(rename = "checkbox", skip_serializing)]
    pub checklist: Checklist,
    /// Server-owned fields (ids, timestamps) carried back unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Nomination {
    fn default() -> Self {
        Self {
            category: CATEGORIES[0].name.to_string(),
            level: LEVELS[0].to_string(),
            title: String::new(),
            sponsor_mail: String::new(),
            sponsor_name: String::new(),
            sponsor_number: String::new(),
            members: Vec::new(),
            file_key: String::new(),
            file_name: String::new(),
            file_type: String::new(),
            file_size: None,
            email: false,
            status: None,
            checklist: Checklist::default(),
            extra: Map::new(),
        }
    }
}

impl Nomination {
    pub fn is_saved(&self) -> bool {
        self.status == Some(NominationStatus::Saved)
    }

    pub fn has_attachment(&self) -> bool {
        !self.file_key.is_empty()
    }
}

/// Accepts a number, a numeric string, an empty string or null.
fn lenient_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_u64()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
        Some(other) => Err(serde::de::Error::custom(format!(
            "unexpected file size value {other}"
        ))),
    }
}

/// Directory entry returned by the employee lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Employee {
    pub mail: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "eNo")]
    pub employee_no: String,
    #[serde(rename = "Unit")]
    pub unit: String,
}

#[cfg(test)]
#[path = "tests/model_tests.rs"]
mod tests;
