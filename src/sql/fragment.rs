//! Statement assembly from named stages.
//!
//! Each generation path builds its statement as an ordered list of named
//! common-table-expression stages plus a final body, collected immutably and
//! rendered exactly once. Keeping the pieces structured until the end avoids
//! growing a statement by string surgery and keeps every stage independently
//! inspectable in tests.

/// One named stage of a statement.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Stage {
    pub name: String,
    pub sql: String,
}

/// An in-progress statement: CTE stages plus a final body.
#[derive(Debug, Clone, Default)]
#[must_use = "builders have no effect until rendered"]
pub(crate) struct Statement {
    stages: Vec<Stage>,
}

impl Statement {
    pub(crate) fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a named stage.
    pub(crate) fn stage(mut self, name: impl Into<String>, sql: impl Into<String>) -> Self {
        self.stages.push(Stage {
            name: name.into(),
            sql: sql.into(),
        });
        self
    }

    /// Name of the most recently appended stage.
    ///
    /// Paths that append stages conditionally use this to reference whatever
    /// stage currently sits on top.
    pub(crate) fn head(&self) -> &str {
        &self
            .stages
            .last()
            .expect("statement has no stages yet")
            .name
    }

    /// Render the statement: `WITH` chain joined once, then the body.
    pub(crate) fn render(self, body: impl Into<String>) -> String {
        let body = body.into();
        if self.stages.is_empty() {
            return body;
        }
        let ctes: Vec<String> = self
            .stages
            .iter()
            .map(|s| format!("{} AS ({})", s.name, s.sql))
            .collect();
        format!("WITH {}\n{}", ctes.join(",\n"), body)
    }
}
