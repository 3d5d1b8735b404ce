pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS budgets (
    category      TEXT PRIMARY KEY,
    limit_amount  TEXT NOT NULL,
    updated_at    TEXT NOT NULL
);
"#;

pub(crate) const CURRENT_VERSION: i32 = 1;
