#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        CREATE INDEX IF NOT EXISTS idx_children_child ON children(child_uuid);
        CREATE INDEX IF NOT EXISTS idx_aliases_dst ON aliases(dst_uuid);
        CREATE INDEX IF NOT EXISTS idx_attributes_child ON attributes(child_uuid);
        CREATE INDEX IF NOT EXISTS idx_headings_heading ON headings(heading);
"#;
