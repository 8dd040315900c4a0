#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        CREATE TABLE IF NOT EXISTS headings (
          uuid TEXT PRIMARY KEY,
          heading TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS titles (
          uuid TEXT PRIMARY KEY,
          title TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS bodies (
          uuid TEXT PRIMARY KEY,
          body TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS resources (
          uuid TEXT PRIMARY KEY,
          resource BLOB NOT NULL
        );
"#;
