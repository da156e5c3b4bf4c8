use serde_json::{Map, Value};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::{Column, Row as _, TypeInfo, ValueRef};

/// A scalar value bound positionally into a prepared statement.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Integer(i64),
    Real(f64),
}

impl From<&str> for BindValue {
    fn from(value: &str) -> Self {
        BindValue::Text(value.to_string())
    }
}

impl From<String> for BindValue {
    fn from(value: String) -> Self {
        BindValue::Text(value)
    }
}

impl From<i64> for BindValue {
    fn from(value: i64) -> Self {
        BindValue::Integer(value)
    }
}

impl From<f64> for BindValue {
    fn from(value: f64) -> Self {
        BindValue::Real(value)
    }
}

/// A SQL template plus the ordered parameters to bind into it.
/// Built by a route handler, consumed once by [`execute`].
#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl QueryRequest {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    pub fn bind(mut self, value: impl Into<BindValue>) -> Self {
        self.params.push(value.into());
        self
    }
}

/// One result row, field name to value, in column order.
pub type Row = Map<String, Value>;

/// SELECT statements yield all matching rows; anything else yields the
/// number of rows affected.
#[derive(Debug)]
pub enum QueryOutcome {
    Rows(Vec<Row>),
    Done(u64),
}

impl QueryOutcome {
    /// The materialized rows, or empty if the statement was not a SELECT.
    pub fn rows(self) -> Vec<Row> {
        match self {
            QueryOutcome::Rows(rows) => rows,
            QueryOutcome::Done(_) => Vec::new(),
        }
    }
}

/// Prepare the template, bind parameters in order, and execute it.
/// Store faults propagate to the caller; there is no retry.
pub async fn execute(
    pool: &SqlitePool,
    request: QueryRequest,
) -> Result<QueryOutcome, sqlx::Error> {
    let QueryRequest { sql, params } = request;

    let mut query = sqlx::query(&sql);
    for param in params {
        query = match param {
            BindValue::Text(v) => query.bind(v),
            BindValue::Integer(v) => query.bind(v),
            BindValue::Real(v) => query.bind(v),
        };
    }

    if is_select(&sql) {
        let rows = query.fetch_all(pool).await?;
        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            out.push(row_to_map(row)?);
        }
        Ok(QueryOutcome::Rows(out))
    } else {
        let result = query.execute(pool).await?;
        Ok(QueryOutcome::Done(result.rows_affected()))
    }
}

/// True when "select" occurs within the first 6 characters of the trimmed
/// template, case-insensitive. Covers both `SELECT ...` and `(SELECT ...)`.
pub fn is_select(sql: &str) -> bool {
    let head: String = sql
        .trim_start()
        .chars()
        .take(12)
        .collect::<String>()
        .to_lowercase();
    match head.find("select") {
        Some(pos) => pos < 6,
        None => false,
    }
}

/// Wrap a trimmed search term in `%` wildcards for a substring LIKE match.
/// `\`, `%` and `_` inside the term are escaped so user input always matches
/// literally; pair with `LIKE ? ESCAPE '\'` in the query template.
pub fn like_pattern(term: &str) -> String {
    let trimmed = term.trim();
    let mut pattern = String::with_capacity(trimmed.len() + 2);
    pattern.push('%');
    for c in trimmed.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn row_to_map(row: &SqliteRow) -> Result<Row, sqlx::Error> {
    let mut map = Map::new();
    for (idx, column) in row.columns().iter().enumerate() {
        map.insert(column.name().to_string(), decode_value(row, idx)?);
    }
    Ok(map)
}

fn decode_value(row: &SqliteRow, idx: usize) -> Result<Value, sqlx::Error> {
    let raw = row.try_get_raw(idx)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let type_name = raw.type_info().name().to_string();
    drop(raw);

    let value = match type_name.as_str() {
        "INTEGER" => Value::from(row.try_get::<i64, _>(idx)?),
        "REAL" => Value::from(row.try_get::<f64, _>(idx)?),
        "BLOB" => {
            let bytes = row.try_get::<Vec<u8>, _>(idx)?;
            Value::from(String::from_utf8_lossy(&bytes).into_owned())
        }
        _ => Value::from(row.try_get::<String, _>(idx)?),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    #[test]
    fn select_detection() {
        assert!(is_select("SELECT * FROM team"));
        assert!(is_select("  select name FROM team"));
        assert!(is_select("(SELECT 1)"));
        assert!(!is_select("INSERT INTO team VALUES (1)"));
        assert!(!is_select("EXPLAIN SELECT * FROM team"));
        assert!(!is_select(""));
    }

    #[test]
    fn like_pattern_wraps_and_trims() {
        assert_eq!(like_pattern("Jo"), "%Jo%");
        assert_eq!(like_pattern("  Jo  "), "%Jo%");
    }

    #[test]
    fn like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("J_hn"), "%J\\_hn%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
        assert_eq!(like_pattern("O'Neal"), "%O'Neal%");
    }

    async fn memory_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool")
    }

    #[tokio::test]
    async fn non_select_returns_rows_affected() {
        let pool = memory_pool().await;
        let outcome = execute(
            &pool,
            QueryRequest::new("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT)"),
        )
        .await
        .unwrap();
        assert!(matches!(outcome, QueryOutcome::Done(_)));

        let outcome = execute(
            &pool,
            QueryRequest::new("INSERT INTO t (id, name) VALUES (?, ?)")
                .bind(1_i64)
                .bind("alpha"),
        )
        .await
        .unwrap();
        assert!(matches!(outcome, QueryOutcome::Done(1)));
    }

    #[tokio::test]
    async fn select_materializes_all_rows_in_order() {
        let pool = memory_pool().await;
        execute(
            &pool,
            QueryRequest::new("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT, score REAL)"),
        )
        .await
        .unwrap();
        for (id, name, score) in [(1_i64, "alpha", 1.5), (2, "beta", 2.5)] {
            execute(
                &pool,
                QueryRequest::new("INSERT INTO t (id, name, score) VALUES (?, ?, ?)")
                    .bind(id)
                    .bind(name)
                    .bind(score),
            )
            .await
            .unwrap();
        }

        let rows = execute(
            &pool,
            QueryRequest::new("SELECT id, name, score FROM t ORDER BY id"),
        )
        .await
        .unwrap()
        .rows();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["id"], Value::from(1));
        assert_eq!(rows[0]["name"], Value::from("alpha"));
        assert_eq!(rows[1]["score"], Value::from(2.5));
        // column order survives into the mapping
        let keys: Vec<&str> = rows[0].keys().map(String::as_str).collect();
        assert_eq!(keys, ["id", "name", "score"]);
    }

    #[tokio::test]
    async fn null_columns_decode_as_null() {
        let pool = memory_pool().await;
        execute(&pool, QueryRequest::new("CREATE TABLE t (id INTEGER, name TEXT)"))
            .await
            .unwrap();
        execute(
            &pool,
            QueryRequest::new("INSERT INTO t (id, name) VALUES (?, NULL)").bind(7_i64),
        )
        .await
        .unwrap();

        let rows = execute(&pool, QueryRequest::new("SELECT * FROM t"))
            .await
            .unwrap()
            .rows();
        assert_eq!(rows[0]["name"], Value::Null);
    }

    #[tokio::test]
    async fn malformed_sql_propagates() {
        let pool = memory_pool().await;
        let result = execute(&pool, QueryRequest::new("SELECT * FROM no_such_table")).await;
        assert!(result.is_err());
    }
}
