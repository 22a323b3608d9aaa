//! Viewer configuration: interaction mode, visibility matrix, and the
//! host-supplied options object.
//!
//! Options arrive as loosely-typed JSON from the host page. Parsing is
//! tolerant: anything missing or malformed falls back to an empty default
//! and is logged, so a bad options object never prevents the viewer from
//! showing the image.

#[cfg(test)]
#[path = "options_test.rs"]
mod options_test;

use serde_json::Value;

use crate::camera::Point;
use crate::doc::AnnotationRecord;
use crate::error::ViewerError;

/// What the viewer shows and lets the user edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Answer visible; canvas clicks set the answer.
    EditAnswer,
    /// Solution and answer visible, nothing editable.
    ShowSolution,
    /// Solution visible and editable.
    EditSolution,
    /// Annotations visible and editable.
    EditAnnotations,
    /// Annotations visible, nothing editable.
    ShowAnnotations,
    /// Image only.
    #[default]
    None,
}

impl Mode {
    /// Parse the host's mode string. Unknown strings map to [`Mode::None`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "editAnswer" => Self::EditAnswer,
            "showSolution" => Self::ShowSolution,
            "editSolution" => Self::EditSolution,
            "editAnnotations" => Self::EditAnnotations,
            "showAnnotations" => Self::ShowAnnotations,
            _ => Self::None,
        }
    }

    /// The host-facing name of this mode (`""` for [`Mode::None`]).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EditAnswer => "editAnswer",
            Self::ShowSolution => "showSolution",
            Self::EditSolution => "editSolution",
            Self::EditAnnotations => "editAnnotations",
            Self::ShowAnnotations => "showAnnotations",
            Self::None => "",
        }
    }

    #[must_use]
    pub fn visibility(self) -> Visibility {
        let answer_editable = self == Self::EditAnswer;
        let solution_editable = self == Self::EditSolution;
        let annotations_editable = self == Self::EditAnnotations;
        Visibility {
            answer_editable,
            answer_visible: answer_editable || self == Self::ShowSolution,
            solution_editable,
            solution_visible: solution_editable || self == Self::ShowSolution,
            annotations_editable,
            annotations_visible: annotations_editable || self == Self::ShowAnnotations,
        }
    }
}

/// Derived visibility and editability flags. Editable always implies visible.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Visibility {
    pub answer_visible: bool,
    pub answer_editable: bool,
    pub solution_visible: bool,
    pub solution_editable: bool,
    pub annotations_visible: bool,
    pub annotations_editable: bool,
}

impl Visibility {
    /// Whether polygon vertices can currently be edited.
    #[must_use]
    pub fn polygon_editing(&self) -> bool {
        self.solution_editable || self.annotations_editable
    }
}

/// Parsed viewer options.
#[derive(Debug, Clone, Default)]
pub struct ViewerOptions {
    pub mode: Mode,
    pub answer: Option<Value>,
    pub solution: Option<Vec<Point>>,
    pub annotations: Option<Vec<AnnotationRecord>>,
}

impl ViewerOptions {
    /// Parse options from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::InvalidOptions`] if `json` is not valid JSON.
    /// Valid JSON of the wrong shape is tolerated (see [`ViewerOptions::from_json`]).
    pub fn parse(json: &str) -> Result<Self, ViewerError> {
        let value: Value = serde_json::from_str(json).map_err(ViewerError::InvalidOptions)?;
        Ok(Self::from_json(&value))
    }

    /// Extract options from an already-parsed value, substituting defaults for
    /// anything missing or malformed.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        if !value.is_object() {
            if !value.is_null() {
                log::warn!("viewer options is not an object; using defaults");
            }
            return Self::default();
        }

        let mode = value.get("mode").and_then(Value::as_str).map_or(Mode::None, Mode::parse);
        let answer = value.get("answer").filter(|a| a.is_object() || a.is_array()).cloned();

        Self {
            mode,
            answer,
            solution: array_field(value, "solution"),
            annotations: array_field(value, "annotations"),
        }
    }
}

/// Decode `value[key]` when it is an array. Decode failures are logged and dropped.
fn array_field<T>(value: &Value, key: &str) -> Option<T>
where
    T: serde::de::DeserializeOwned,
{
    let field = value.get(key).filter(|v| v.is_array())?;
    match decode_records(field) {
        Ok(records) => Some(records),
        Err(err) => {
            log::warn!("ignoring option {key}: {err}");
            None
        }
    }
}

/// Decode polygon or annotation records from a JSON value.
///
/// # Errors
///
/// Returns [`ViewerError::InvalidRecords`] when the value doesn't match the
/// record schema.
pub fn decode_records<T>(value: &Value) -> Result<T, ViewerError>
where
    T: serde::de::DeserializeOwned,
{
    T::deserialize(value).map_err(ViewerError::InvalidRecords)
}
