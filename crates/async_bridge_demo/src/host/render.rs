use std::fmt;
use std::io::Write;

use async_bridge_engine::{BridgeSnapshot, Snapshot};
use serde::Serialize;

use super::config::OutputFormat;
use super::script::Button;

/// What one button's row shows in a frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RowState {
    /// Never clicked.
    Null,
    Pending,
    Resolved { value: String },
    Rejected { error: String },
}

impl RowState {
    pub fn from_snapshot(snapshot: Option<&BridgeSnapshot<String, String>>) -> Self {
        match snapshot {
            None => RowState::Null,
            Some(Snapshot::Pending) => RowState::Pending,
            Some(Snapshot::Resolved(value)) => RowState::Resolved {
                value: value.clone(),
            },
            Some(Snapshot::Rejected(error)) => RowState::Rejected {
                error: error.to_string(),
            },
        }
    }
}

impl fmt::Display for RowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowState::Null => write!(f, "null"),
            RowState::Pending => write!(f, "pending"),
            RowState::Resolved { value } => write!(f, "resolved({value:?})"),
            RowState::Rejected { error } => write!(f, "rejected({error:?})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub button: Button,
    pub state: RowState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub index: usize,
    pub rendered_at: String,
    pub rows: Vec<Row>,
}

pub fn write_frame(out: &mut dyn Write, frame: &Frame, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            write!(out, "[{}] {}", frame.index, frame.rendered_at)?;
            for row in &frame.rows {
                write!(out, " {}={}", row.button, row.state)?;
            }
            writeln!(out)?;
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, frame)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use async_bridge_engine::OperationError;

    use super::*;

    fn sample_frame() -> Frame {
        Frame {
            index: 5,
            rendered_at: "2026-01-01T00:00:00+00:00".to_string(),
            rows: vec![
                Row {
                    button: Button::Resolve,
                    state: RowState::Resolved {
                        value: "HELLO THERE".to_string(),
                    },
                },
                Row {
                    button: Button::Reject,
                    state: RowState::Rejected {
                        error: "operation failed: General kenobi".to_string(),
                    },
                },
                Row {
                    button: Button::Slow,
                    state: RowState::Null,
                },
            ],
        }
    }

    #[test]
    fn rejected_snapshot_shows_error_message() {
        let snapshot: BridgeSnapshot<String, String> =
            Snapshot::Rejected(OperationError::Failed("General kenobi".to_string()));
        assert_eq!(
            RowState::from_snapshot(Some(&snapshot)),
            RowState::Rejected {
                error: "operation failed: General kenobi".to_string()
            }
        );
        assert_eq!(RowState::from_snapshot(None), RowState::Null);
    }

    #[test]
    fn text_frame_lists_every_row() {
        let mut out = Vec::new();
        write_frame(&mut out, &sample_frame(), OutputFormat::Text).unwrap();

        let line = String::from_utf8(out).unwrap();
        assert_eq!(
            line,
            "[5] 2026-01-01T00:00:00+00:00 resolve=resolved(\"HELLO THERE\") \
             reject=rejected(\"operation failed: General kenobi\") slow=null\n"
        );
    }

    #[test]
    fn json_frame_tags_row_status() {
        let mut out = Vec::new();
        write_frame(&mut out, &sample_frame(), OutputFormat::Json).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["index"], 5);
        assert_eq!(value["rows"][0]["button"], "resolve");
        assert_eq!(value["rows"][0]["state"]["status"], "resolved");
        assert_eq!(value["rows"][0]["state"]["value"], "HELLO THERE");
        assert_eq!(value["rows"][2]["state"]["status"], "null");
    }
}
