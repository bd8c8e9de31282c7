use crate::catalog::query::CatalogQuery;
use crate::error::CatalogError;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

/// Appended to every tool description: rows are plain serde_json output, so
/// `/` and non-ASCII text arrive unescaped.
const OUTPUT_NOTE: &str = "Returns a JSON array of objects keyed by catalog column; \
     `/` and non-ASCII characters are not escaped.";

/// Named operations exposed to the chat agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogAction {
    ProjectsByYear,
    ProjectIds,
    ProjectFiles,
}

#[derive(Debug, Deserialize)]
struct YearInput {
    year: String,
}

#[derive(Debug, Deserialize)]
struct ProjectNamesInput {
    project_names: Vec<String>,
}

impl CatalogAction {
    pub const ALL: [CatalogAction; 3] = [Self::ProjectsByYear, Self::ProjectIds, Self::ProjectFiles];

    pub fn name(self) -> &'static str {
        match self {
            Self::ProjectsByYear => "get_projects_by_year",
            Self::ProjectIds => "get_project_ids",
            Self::ProjectFiles => "get_project_files",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.name() == name.trim())
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::ProjectsByYear => {
                "List every archived project filed under the given year, with its project ID."
            }
            Self::ProjectIds => {
                "Look up project IDs and years for approximately remembered project names."
            }
            Self::ProjectFiles => {
                "List the files stored for approximately remembered project names."
            }
        }
    }

    fn parameters(self) -> Value {
        match self {
            Self::ProjectsByYear => json!({
                "type": "object",
                "properties": {
                    "year": {
                        "type": "string",
                        "description": "Archive year folder, e.g. 2023",
                    },
                },
                "required": ["year"],
            }),
            Self::ProjectIds | Self::ProjectFiles => json!({
                "type": "object",
                "properties": {
                    "project_names": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Project names as the user remembers them",
                    },
                },
                "required": ["project_names"],
            }),
        }
    }

    /// Function-tool definition used when registering the assistant.
    pub fn tool_definition(self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name(),
                "description": format!("{} {OUTPUT_NOTE}", self.description()),
                "parameters": self.parameters(),
            },
        })
    }
}

pub fn tool_definitions() -> Value {
    Value::Array(
        CatalogAction::ALL
            .into_iter()
            .map(CatalogAction::tool_definition)
            .collect(),
    )
}

fn parse_input<T: DeserializeOwned>(action: CatalogAction, data: &Value) -> Result<T, CatalogError> {
    T::deserialize(data)
        .map_err(|err| CatalogError::InvalidAction(format!("{}: {err}", action.name())))
}

/// Run `action` with the agent-supplied `data` object and return the result
/// rows as a compact JSON array.
pub fn dispatch(
    query: &CatalogQuery,
    action: CatalogAction,
    data: &Value,
) -> Result<String, CatalogError> {
    let (rows, out) = match action {
        CatalogAction::ProjectsByYear => {
            let input: YearInput = parse_input(action, data)?;
            let rows = query.by_year(&input.year)?;
            (rows.len(), serde_json::to_string(&rows))
        }
        CatalogAction::ProjectIds => {
            let input: ProjectNamesInput = parse_input(action, data)?;
            let rows = query.by_fuzzy_name_to_ids(&input.project_names)?;
            (rows.len(), serde_json::to_string(&rows))
        }
        CatalogAction::ProjectFiles => {
            let input: ProjectNamesInput = parse_input(action, data)?;
            let rows = query.by_fuzzy_name_to_files(&input.project_names)?;
            (rows.len(), serde_json::to_string(&rows))
        }
    };
    let out =
        out.map_err(|err| CatalogError::InvalidAction(format!("{}: {err}", action.name())))?;

    tracing::debug!(action = action.name(), rows, "dispatched catalog action");
    Ok(out)
}

pub fn dispatch_named(query: &CatalogQuery, name: &str, data: &Value) -> Result<String, CatalogError> {
    let action = CatalogAction::from_name(name)
        .ok_or_else(|| CatalogError::InvalidAction(format!("unknown action `{name}`")))?;
    dispatch(query, action, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::record::ProjectRecord;
    use crate::catalog::store::{DEFAULT_DELIMITER, write_catalog};
    use tempfile::{TempDir, tempdir};

    fn seeded() -> (TempDir, CatalogQuery) {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("projects.csv");
        write_catalog(
            &path,
            &[
                ProjectRecord {
                    name: "Harbor Bridge Survey".to_string(),
                    id: "1234".to_string(),
                    year_bucket: "2023".to_string(),
                    files: "report.pdf plan.dwg".to_string(),
                },
                ProjectRecord {
                    name: "Old Depot".to_string(),
                    id: "".to_string(),
                    year_bucket: "2022".to_string(),
                    files: "".to_string(),
                },
            ],
            DEFAULT_DELIMITER,
        )
        .expect("seed");
        (tmp, CatalogQuery::new(path))
    }

    #[test]
    fn by_year_action_returns_compact_records() {
        let (_tmp, query) = seeded();
        let out = dispatch_named(&query, "get_projects_by_year", &json!({"year": "2022"}))
            .expect("dispatch");
        assert_eq!(
            out,
            r#"[{"Project Name":"Old Depot","Project ID":"","Year":"2022"}]"#
        );
    }

    #[test]
    fn files_action_projects_name_and_manifest() {
        let (_tmp, query) = seeded();
        let out = dispatch_named(
            &query,
            "get_project_files",
            &json!({"project_names": ["harbor bridge survey", "Harbor Bridge Survy"]}),
        )
        .expect("dispatch");
        assert_eq!(
            out,
            r#"[{"Project Name":"Harbor Bridge Survey","Files":"report.pdf plan.dwg"}]"#
        );
    }

    #[test]
    fn empty_name_list_is_empty_array() {
        let (_tmp, query) = seeded();
        let out = dispatch_named(&query, "get_project_ids", &json!({"project_names": []}))
            .expect("dispatch");
        assert_eq!(out, "[]");
    }

    #[test]
    fn missing_or_mistyped_input_is_rejected() {
        let (_tmp, query) = seeded();
        for (name, data) in [
            ("get_projects_by_year", json!({})),
            ("get_projects_by_year", json!({"year": 2023})),
            ("get_project_ids", json!({"project_names": "Harbor"})),
            ("get_project_files", json!(null)),
        ] {
            let err = dispatch_named(&query, name, &data).expect_err("invalid");
            assert!(matches!(err, CatalogError::InvalidAction(_)), "{name} {data}");
        }
    }

    #[test]
    fn unknown_action_is_rejected() {
        let (_tmp, query) = seeded();
        let err = dispatch_named(&query, "getCurrentWeather", &json!({})).expect_err("unknown");
        assert!(err.to_string().contains("getCurrentWeather"));
    }

    #[test]
    fn tool_definitions_cover_every_action() {
        let tools = tool_definitions();
        let names: Vec<_> = tools
            .as_array()
            .expect("array")
            .iter()
            .filter_map(|tool| tool["function"]["name"].as_str())
            .collect();
        assert_eq!(
            names,
            vec!["get_projects_by_year", "get_project_ids", "get_project_files"]
        );
        assert_eq!(
            tools[1]["function"]["parameters"]["required"],
            json!(["project_names"])
        );
    }

    #[test]
    fn tool_descriptions_state_output_escaping() {
        for tool in tool_definitions().as_array().expect("array") {
            let description = tool["function"]["description"].as_str().expect("description");
            assert!(description.ends_with(OUTPUT_NOTE), "{description}");
        }
    }

    #[test]
    fn slashes_and_accents_are_emitted_verbatim() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("projects.csv");
        write_catalog(
            &path,
            &[ProjectRecord {
                name: "Café A/B".to_string(),
                id: "0001".to_string(),
                year_bucket: "2024".to_string(),
                files: "".to_string(),
            }],
            DEFAULT_DELIMITER,
        )
        .expect("seed");
        let query = CatalogQuery::new(path);

        let out = dispatch_named(&query, "get_projects_by_year", &json!({"year": "2024"}))
            .expect("dispatch");
        assert_eq!(
            out,
            r#"[{"Project Name":"Café A/B","Project ID":"0001","Year":"2024"}]"#
        );
    }
}
