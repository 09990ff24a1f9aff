//! Query-execution collaborator interface.
//!
//! The engine never talks to a database driver directly. It builds a
//! [`SqlRequest`] from a dialect template plus named parameters and hands it
//! to whatever [`SqlExecutor`] the schema has registered. Executors return
//! plain [`Row`]s made of [`Value`]s, which keeps the engine independent of
//! any driver's type system.

use crate::error::IntrospectError;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// A single cell value returned by the execution collaborator.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Renders the value as the driver would print it, `None` for SQL NULL.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(b.to_string()),
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Text(s) => Some(s.clone()),
        }
    }

    /// Coerces numeric-looking values to an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            Value::Text(s) => {
                let trimmed = s.trim();
                trimmed
                    .parse::<i64>()
                    .ok()
                    .or_else(|| {
                        trimmed
                            .parse::<f64>()
                            .ok()
                            .filter(|f| f.is_finite())
                            .map(|f| f.trunc() as i64)
                    })
            }
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_text() {
            Some(text) => f.write_str(&text),
            None => f.write_str("NULL"),
        }
    }
}

/// One result row: ordered `(label, value)` pairs.
///
/// Labels are dialect-defined, so lookups ignore ASCII case.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Row {
    cells: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append.
    pub fn with(mut self, label: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(label, value);
        self
    }

    pub fn push(&mut self, label: impl Into<String>, value: impl Into<Value>) {
        self.cells.push((label.into(), value.into()));
    }

    pub fn get(&self, label: &str) -> Option<&Value> {
        self.cells
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(label))
            .map(|(_, value)| value)
    }

    /// Text rendering of a non-null cell.
    pub fn get_string(&self, label: &str) -> Option<String> {
        self.get(label).and_then(Value::as_text)
    }

    pub fn get_i64(&self, label: &str) -> Option<i64> {
        self.get(label).and_then(Value::as_i64)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.cells.iter().map(|(label, value)| (label.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<L: Into<String>> FromIterator<(L, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (L, Value)>>(iter: I) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(label, value)| (label.into(), value))
                .collect(),
        }
    }
}

impl IntoIterator for Row {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}

/// How positional placeholders are spelled for a given driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaceholderStyle {
    /// `?` (MySQL, SQLite)
    #[default]
    QuestionMark,
    /// `$1`, `$2`, ... (PostgreSQL)
    Numbered,
}

/// Named parameters for a SQL template.
pub type Params = HashMap<String, Value>;

/// A catalog query compiled from a `#{name}` template.
///
/// The template text is split around its placeholders, so it can be rendered
/// in any [`PlaceholderStyle`] without re-scanning the SQL.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlRequest {
    template: String,
    fragments: Vec<String>,
    bindings: Vec<(String, Value)>,
}

impl SqlRequest {
    /// Compiles `sql`, replacing every `#{name}` with a positional bind.
    ///
    /// Placeholders missing from `params` are bound as [`Value::Null`].
    pub fn template(sql: impl Into<String>, params: &Params) -> Self {
        static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
        let re = PLACEHOLDER
            .get_or_init(|| Regex::new(r"#\{\s*(\w+)\s*\}").expect("Invalid regex pattern"));

        let template = sql.into();
        let mut fragments = Vec::new();
        let mut bindings = Vec::new();
        let mut last = 0;

        for caps in re.captures_iter(&template) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            fragments.push(template[last..whole.start()].to_string());
            let value = params.get(name.as_str()).cloned().unwrap_or_default();
            bindings.push((name.as_str().to_string(), value));
            last = whole.end();
        }
        fragments.push(template[last..].to_string());

        Self {
            template,
            fragments,
            bindings,
        }
    }

    /// The original, uncompiled template text.
    pub fn template_sql(&self) -> &str {
        &self.template
    }

    /// Renders the SQL text with positional placeholders.
    pub fn sql(&self, style: PlaceholderStyle) -> String {
        let mut out = String::with_capacity(self.template.len());
        for (index, fragment) in self.fragments.iter().enumerate() {
            out.push_str(fragment);
            if index < self.bindings.len() {
                match style {
                    PlaceholderStyle::QuestionMark => out.push('?'),
                    PlaceholderStyle::Numbered => {
                        out.push('$');
                        out.push_str(&(index + 1).to_string());
                    }
                }
            }
        }
        out
    }

    /// Bind values in placeholder order.
    pub fn parameters(&self) -> impl Iterator<Item = &Value> {
        self.bindings.iter().map(|(_, value)| value)
    }

    /// Value bound to the named parameter, if the template references it.
    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.bindings
            .iter()
            .find(|(binding, _)| binding == name)
            .map(|(_, value)| value)
    }
}

/// Streaming row callback. Executors may invoke it from several threads.
pub type RowConsumer<'a> = dyn Fn(Row) -> Result<(), IntrospectError> + Sync + 'a;

/// The query-execution collaborator.
///
/// Timeouts and retries belong to implementations; the engine treats any
/// failure as fatal for the operation in progress.
pub trait SqlExecutor: Send + Sync {
    /// Runs the request and returns every row.
    fn select(&self, request: &SqlRequest) -> Result<Vec<Row>, IntrospectError>;

    /// Runs the request and returns the first row, if any.
    fn select_one(&self, request: &SqlRequest) -> Result<Option<Row>, IntrospectError> {
        Ok(self.select(request)?.into_iter().next())
    }

    /// Runs the request and feeds rows to `consumer` as they arrive.
    fn for_each_row(
        &self,
        request: &SqlRequest,
        consumer: &RowConsumer<'_>,
    ) -> Result<(), IntrospectError> {
        for row in self.select(request)? {
            consumer(row)?;
        }
        Ok(())
    }
}

/// Maps result rows onto freshly created objects, one label at a time.
pub trait RowWrapper {
    /// Mutable per-row state populated by [`RowWrapper::wrap_column`].
    type Instance;
    /// Finished object produced for each row.
    type Output;

    fn new_row_instance(&self) -> Self::Instance;

    fn wrap_column(&self, instance: &mut Self::Instance, label: &str, value: Value);

    /// Runs once per row after every column has been applied.
    fn completed_wrap_row(&self, instance: Self::Instance) -> Result<Self::Output, IntrospectError>;

    fn wrap_row(&self, row: Row) -> Result<Self::Output, IntrospectError> {
        let mut instance = self.new_row_instance();
        for (label, value) in row {
            self.wrap_column(&mut instance, &label, value);
        }
        self.completed_wrap_row(instance)
    }
}

/// Runs `request` and maps every row through `wrapper`, preserving row order.
pub fn select_list<W: RowWrapper>(
    executor: &dyn SqlExecutor,
    request: &SqlRequest,
    wrapper: &W,
) -> Result<Vec<W::Output>, IntrospectError> {
    executor
        .select(request)?
        .into_iter()
        .map(|row| wrapper.wrap_row(row))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, Value)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_template_compiles_named_placeholders() {
        let request = SqlRequest::template(
            "SELECT 1 FROM t WHERE schema = #{schema} AND name = #{table}",
            &params(&[("table", "users".into()), ("schema", "app".into())]),
        );

        assert_eq!(
            request.sql(PlaceholderStyle::QuestionMark),
            "SELECT 1 FROM t WHERE schema = ? AND name = ?"
        );
        assert_eq!(
            request.sql(PlaceholderStyle::Numbered),
            "SELECT 1 FROM t WHERE schema = $1 AND name = $2"
        );
        let values: Vec<_> = request.parameters().cloned().collect();
        assert_eq!(values, vec![Value::from("app"), Value::from("users")]);
    }

    #[test]
    fn test_template_repeated_and_missing_parameters() {
        let request = SqlRequest::template(
            "SELECT #{ a }, #{a}, #{missing}",
            &params(&[("a", Value::Int(7))]),
        );

        assert_eq!(request.sql(PlaceholderStyle::Numbered), "SELECT $1, $2, $3");
        assert_eq!(request.parameter("a"), Some(&Value::Int(7)));
        assert_eq!(request.parameter("missing"), Some(&Value::Null));
        assert_eq!(request.parameter("absent"), None);
    }

    #[test]
    fn test_template_without_placeholders() {
        let request = SqlRequest::template("SELECT name FROM sqlite_master", &Params::new());
        assert_eq!(
            request.sql(PlaceholderStyle::Numbered),
            "SELECT name FROM sqlite_master"
        );
        assert_eq!(request.parameters().count(), 0);
        assert_eq!(request.template_sql(), "SELECT name FROM sqlite_master");
    }

    #[test]
    fn test_row_lookup_ignores_case() {
        let row = Row::new().with("TABLE_NAME", "users").with("Total", 3_i64);
        assert_eq!(row.get_string("table_name").as_deref(), Some("users"));
        assert_eq!(row.get_i64("total"), Some(3));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn test_value_text_rendering() {
        assert_eq!(Value::Null.as_text(), None);
        assert_eq!(Value::Int(1).as_text().as_deref(), Some("1"));
        assert_eq!(Value::Bool(true).as_text().as_deref(), Some("true"));
        assert_eq!(Value::from("Y").to_string(), "Y");
        assert_eq!(Value::Null.to_string(), "NULL");
    }

    #[test]
    fn test_value_integer_coercion() {
        assert_eq!(Value::from("11").as_i64(), Some(11));
        assert_eq!(Value::from(" 12 ").as_i64(), Some(12));
        assert_eq!(Value::from("10.0").as_i64(), Some(10));
        assert_eq!(Value::Float(3.9).as_i64(), Some(3));
        assert_eq!(Value::from("abc").as_i64(), None);
        assert_eq!(Value::from("inf").as_i64(), None);
        assert_eq!(Value::from("NaN").as_i64(), None);
        assert_eq!(Value::Bool(true).as_i64(), None);
        assert_eq!(Value::Null.as_i64(), None);
    }

    struct UpperNames;

    impl RowWrapper for UpperNames {
        type Instance = Vec<String>;
        type Output = String;

        fn new_row_instance(&self) -> Self::Instance {
            Vec::new()
        }

        fn wrap_column(&self, instance: &mut Self::Instance, label: &str, value: Value) {
            instance.push(format!("{}={}", label.to_uppercase(), value));
        }

        fn completed_wrap_row(&self, instance: Self::Instance) -> Result<String, IntrospectError> {
            Ok(instance.join(","))
        }
    }

    struct FixedRows(Vec<Row>);

    impl SqlExecutor for FixedRows {
        fn select(&self, _request: &SqlRequest) -> Result<Vec<Row>, IntrospectError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_select_list_preserves_row_order() {
        let executor = FixedRows(vec![
            Row::new().with("a", 1_i64),
            Row::new().with("a", 2_i64).with("b", "x"),
        ]);
        let request = SqlRequest::template("SELECT", &Params::new());

        let out = select_list(&executor, &request, &UpperNames).unwrap();
        assert_eq!(out, vec!["A=1".to_string(), "A=2,B=x".to_string()]);
        assert_eq!(
            executor.select_one(&request).unwrap(),
            Some(Row::new().with("a", 1_i64))
        );
    }

    #[test]
    fn test_for_each_row_stops_on_consumer_error() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let executor = FixedRows(vec![Row::new(), Row::new(), Row::new()]);
        let request = SqlRequest::template("SELECT", &Params::new());
        let seen = AtomicUsize::new(0);

        let result = executor.for_each_row(&request, &|_row| {
            if seen.fetch_add(1, Ordering::SeqCst) == 1 {
                return Err(IntrospectError::MissingField("table_name"));
            }
            Ok(())
        });

        assert!(matches!(result, Err(IntrospectError::MissingField(_))));
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }
}
