#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        CREATE TABLE IF NOT EXISTS children (
          parent_uuid TEXT NOT NULL,
          child_uuid TEXT NOT NULL,
          PRIMARY KEY (parent_uuid, child_uuid)
        );

        -- Only top-level alias placements are stored; nested ones are derived.
        CREATE TABLE IF NOT EXISTS aliases (
          src_uuid TEXT NOT NULL,
          dst_uuid TEXT NOT NULL,
          PRIMARY KEY (src_uuid, dst_uuid)
        );

        CREATE TABLE IF NOT EXISTS attributes (
          parent_uuid TEXT NOT NULL,
          child_uuid TEXT NOT NULL,
          PRIMARY KEY (parent_uuid, child_uuid)
        );
"#;
