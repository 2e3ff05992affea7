use serde::{Deserialize, Serialize};

/// What clicking a relation's status slot does.
///
/// Persisted settings encode the variants as `"0"`, `"1"`, `"2"`; older
/// settings blobs used the variant names, so the parse accepts both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StatusBehavior {
    #[default]
    None,
    OpenFile,
    HighlightFile,
}

/// Total parse: anything unrecognized falls back to `None`.
pub fn status_behavior_parse(s: &str) -> StatusBehavior {
    match s {
        "1" | "OpenFile" => StatusBehavior::OpenFile,
        "2" | "HighlightFile" => StatusBehavior::HighlightFile,
        _ => StatusBehavior::None,
    }
}

impl From<String> for StatusBehavior {
    fn from(s: String) -> Self {
        status_behavior_parse(&s)
    }
}

impl From<StatusBehavior> for String {
    fn from(behavior: StatusBehavior) -> Self {
        match behavior {
            StatusBehavior::None => "0",
            StatusBehavior::OpenFile => "1",
            StatusBehavior::HighlightFile => "2",
        }
        .to_string()
    }
}
