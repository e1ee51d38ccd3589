//! Export profiles.
//!
//! A profile describes everything that differs between export variants:
//! which table and joins feed the query, which columns are selected and how
//! each is decoded, which columns are derived in-process, and how fields are
//! labelled in the CSV header.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::config::{AD_URL_TEMPLATE, ID_TEMPLATE_TOKEN, MISSING_DATE_PLACEHOLDER, UNKNOWN_NAME};
use crate::error_handling::InitializationError;

/// How a selected column is decoded and rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Text,
    Integer,
    Float,
    /// Native DATETIME/TIMESTAMP, read in a UTC session
    Datetime,
    /// Integer seconds since the Unix epoch
    EpochSeconds,
}

/// One selected column: `<expr> AS <name>`.
#[derive(Clone, Debug, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub expr: String,
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub fn new(name: &str, expr: &str, kind: ColumnKind) -> Self {
        Self {
            name: name.to_string(),
            expr: expr.to_string(),
            kind,
        }
    }
}

/// `LEFT JOIN <table> ON <on>`
#[derive(Clone, Debug, Deserialize)]
pub struct JoinSpec {
    pub table: String,
    pub on: String,
}

/// A column computed from the record id after fetching.
#[derive(Clone, Debug, Deserialize)]
pub struct DerivedColumn {
    pub name: String,
    /// Text with `{id}` placeholders
    pub template: String,
}

impl DerivedColumn {
    pub fn render(&self, id: &str) -> String {
        self.template.replace(ID_TEMPLATE_TOKEN, id)
    }
}

fn default_id_field() -> String {
    "id".to_string()
}

fn default_date_placeholder() -> String {
    MISSING_DATE_PLACEHOLDER.to_string()
}

fn default_filename_prefix() -> String {
    "ads".to_string()
}

/// Full description of one export variant.
#[derive(Clone, Debug, Deserialize)]
pub struct ExportProfile {
    /// Table named in the FROM clause
    pub entity_table: String,
    /// Qualified key column the id list is matched and ordered on
    pub id_column: String,
    /// Output field carrying the id, used to render derived columns
    #[serde(default = "default_id_field")]
    pub id_field: String,
    #[serde(default)]
    pub joins: Vec<JoinSpec>,
    pub columns: Vec<ColumnSpec>,
    #[serde(default)]
    pub derived: Vec<DerivedColumn>,
    /// Internal field name -> header label; unmapped fields keep their name
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(default = "default_date_placeholder")]
    pub date_placeholder: String,
    #[serde(default = "default_filename_prefix")]
    pub filename_prefix: String,
}

/// Table or optionally qualified column name
static IDENTIFIER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$")
        .expect("identifier pattern is valid")
});

/// Output field name, used unquoted as a column alias
static ALIAS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("alias pattern is valid"));

impl ExportProfile {
    /// The ad library export: ads joined to their funder and page.
    pub fn ads() -> Self {
        use ColumnKind::*;

        let funder_name = format!("COALESCE(funders.name, '{}')", UNKNOWN_NAME);
        let page_name = format!("COALESCE(pages.name, '{}')", UNKNOWN_NAME);

        let columns = vec![
            ColumnSpec::new("id", "ads.id", Integer),
            ColumnSpec::new("ad_body", "ads.body", Text),
            ColumnSpec::new("start_date", "ads.start_date", Datetime),
            ColumnSpec::new("end_date", "ads.end_date", Datetime),
            ColumnSpec::new("funder_name", &funder_name, Text),
            ColumnSpec::new("funder_id", "ads.funder_id", Integer),
            ColumnSpec::new("page_name", &page_name, Text),
            ColumnSpec::new("page_id", "ads.page_id", Integer),
            ColumnSpec::new("currency", "ads.currency", Text),
            ColumnSpec::new("audience_min", "ads.audience_min", Integer),
            ColumnSpec::new("audience_max", "ads.audience_max", Integer),
            ColumnSpec::new("views_min", "ads.views_min", Integer),
            ColumnSpec::new("views_max", "ads.views_max", Integer),
            ColumnSpec::new("cost_min", "ads.cost_min", Integer),
            ColumnSpec::new("cost_max", "ads.cost_max", Integer),
            ColumnSpec::new("link_title", "ads.link_title", Text),
            ColumnSpec::new("link_url", "ads.link_url", Text),
            ColumnSpec::new("description", "ads.description", Text),
            ColumnSpec::new("provinces", "ads.provinces", Text),
            ColumnSpec::new("demographics", "ads.demographics", Text),
            ColumnSpec::new("platforms", "ads.platforms", Text),
            ColumnSpec::new("languages", "ads.languages", Text),
        ];

        Self {
            entity_table: "ads".to_string(),
            id_column: "ads.id".to_string(),
            id_field: default_id_field(),
            joins: vec![
                JoinSpec {
                    table: "funders".to_string(),
                    on: "ads.funder_id = funders.id".to_string(),
                },
                JoinSpec {
                    table: "pages".to_string(),
                    on: "ads.page_id = pages.id".to_string(),
                },
            ],
            columns,
            derived: vec![DerivedColumn {
                name: "ad_url".to_string(),
                template: AD_URL_TEMPLATE.to_string(),
            }],
            labels: HashMap::new(),
            date_placeholder: default_date_placeholder(),
            filename_prefix: default_filename_prefix(),
        }
    }

    /// Reads and validates a profile from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, InitializationError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            InitializationError::ProfileError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, InitializationError> {
        let profile: ExportProfile = serde_json::from_str(text)
            .map_err(|e| InitializationError::ProfileError(format!("Invalid profile: {}", e)))?;
        profile.validate()?;
        Ok(profile)
    }

    /// Checks the profile can produce a well-formed query and a consistent
    /// header.
    pub fn validate(&self) -> Result<(), InitializationError> {
        let fail = |msg: String| Err(InitializationError::ProfileError(msg));

        if self.columns.is_empty() {
            return fail("profile selects no columns".to_string());
        }
        if !IDENTIFIER_PATTERN.is_match(&self.entity_table) {
            return fail(format!("invalid table name '{}'", self.entity_table));
        }
        if !IDENTIFIER_PATTERN.is_match(&self.id_column) {
            return fail(format!("invalid id column '{}'", self.id_column));
        }
        for join in &self.joins {
            if !IDENTIFIER_PATTERN.is_match(&join.table) {
                return fail(format!("invalid join table '{}'", join.table));
            }
        }

        let mut seen = HashSet::new();
        for name in self.output_fields() {
            if !ALIAS_PATTERN.is_match(name) {
                return fail(format!("invalid output field name '{}'", name));
            }
            if !seen.insert(name) {
                return fail(format!("duplicate output field '{}'", name));
            }
        }
        if !self.columns.iter().any(|c| c.name == self.id_field) {
            return fail(format!(
                "id field '{}' is not among the selected columns",
                self.id_field
            ));
        }
        Ok(())
    }

    /// Internal field names in output order: derived columns first, then the
    /// selected columns.
    pub fn output_fields(&self) -> impl Iterator<Item = &str> {
        self.derived
            .iter()
            .map(|d| d.name.as_str())
            .chain(self.columns.iter().map(|c| c.name.as_str()))
    }

    /// Header label for a field.
    pub fn label_for<'a>(&'a self, field: &'a str) -> &'a str {
        self.labels.get(field).map(String::as_str).unwrap_or(field)
    }

    /// Header labels in output order.
    pub fn headers(&self) -> Vec<String> {
        self.output_fields()
            .map(|f| self.label_for(f).to_string())
            .collect()
    }
}
