#![forbid(unsafe_code)]

use std::fmt;

/// The closed set of persisted relations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    Nodes,
    Headings,
    Titles,
    Bodies,
    Children,
    Aliases,
    Attributes,
    Resources,
}

/// Column layout of a table: either keyed by one id with an optional value
/// column, or keyed by an id pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    Keyed {
        key: &'static str,
        value: Option<&'static str>,
    },
    Pair {
        left: &'static str,
        right: &'static str,
    },
}

impl Table {
    pub const ALL: [Table; 8] = [
        Table::Nodes,
        Table::Headings,
        Table::Titles,
        Table::Bodies,
        Table::Children,
        Table::Aliases,
        Table::Attributes,
        Table::Resources,
    ];

    /// Cascade order for whole-node erasure: dependents first, node row last.
    pub const ERASE_ORDER: [Table; 8] = [
        Table::Headings,
        Table::Titles,
        Table::Bodies,
        Table::Resources,
        Table::Attributes,
        Table::Children,
        Table::Aliases,
        Table::Nodes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Nodes => "nodes",
            Self::Headings => "headings",
            Self::Titles => "titles",
            Self::Bodies => "bodies",
            Self::Children => "children",
            Self::Aliases => "aliases",
            Self::Attributes => "attributes",
            Self::Resources => "resources",
        }
    }

    pub fn layout(self) -> Layout {
        match self {
            Self::Nodes => Layout::Keyed {
                key: "uuid",
                value: None,
            },
            Self::Headings => Layout::Keyed {
                key: "uuid",
                value: Some("heading"),
            },
            Self::Titles => Layout::Keyed {
                key: "uuid",
                value: Some("title"),
            },
            Self::Bodies => Layout::Keyed {
                key: "uuid",
                value: Some("body"),
            },
            Self::Resources => Layout::Keyed {
                key: "uuid",
                value: Some("resource"),
            },
            Self::Children | Self::Attributes => Layout::Pair {
                left: "parent_uuid",
                right: "child_uuid",
            },
            Self::Aliases => Layout::Pair {
                left: "src_uuid",
                right: "dst_uuid",
            },
        }
    }

    pub(crate) fn upsert_sql(self) -> String {
        let name = self.name();
        match self.layout() {
            Layout::Keyed { key, value: None } => {
                format!("INSERT OR REPLACE INTO {name}({key}) VALUES (?1)")
            }
            Layout::Keyed {
                key,
                value: Some(value),
            } => format!("INSERT OR REPLACE INTO {name}({key}, {value}) VALUES (?1, ?2)"),
            Layout::Pair { left, right } => {
                format!("INSERT OR REPLACE INTO {name}({left}, {right}) VALUES (?1, ?2)")
            }
        }
    }

    pub(crate) fn delete_sql(self) -> String {
        let name = self.name();
        match self.layout() {
            Layout::Keyed { key, .. } => format!("DELETE FROM {name} WHERE {key} = ?1"),
            Layout::Pair { left, right } => {
                format!("DELETE FROM {name} WHERE {left} = ?1 AND {right} = ?2")
            }
        }
    }

    pub(crate) fn select_sql(self) -> String {
        let name = self.name();
        match self.layout() {
            Layout::Keyed { key, value: None } => format!("SELECT {key} FROM {name}"),
            Layout::Keyed {
                key,
                value: Some(value),
            } => format!("SELECT {key}, {value} FROM {name}"),
            Layout::Pair { left, right } => format!("SELECT {left}, {right} FROM {name}"),
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
