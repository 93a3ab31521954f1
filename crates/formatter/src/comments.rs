//! Comment extraction from SourceCodeInfo
//!
//! Locations are addressed by their numeric descriptor path, so the
//! formatter tracks the path of every node it visits and looks it up here.

use prost_types::FileDescriptorProto;
use std::collections::HashMap;

// Field numbers used in SourceCodeInfo paths
pub const FILE_MESSAGE_TYPE: i32 = 4;
pub const FILE_ENUM_TYPE: i32 = 5;
pub const MESSAGE_FIELD: i32 = 2;
pub const MESSAGE_NESTED_TYPE: i32 = 3;
pub const MESSAGE_ENUM_TYPE: i32 = 4;
pub const ENUM_VALUE: i32 = 2;

/// Comments of one file keyed by descriptor path
#[derive(Debug, Default)]
pub struct CommentMap {
    comments: HashMap<Vec<i32>, String>,
}

impl CommentMap {
    /// Collect leading comments, falling back to trailing ones
    pub fn from_file(file: &FileDescriptorProto) -> Self {
        let mut comments = HashMap::new();

        let Some(source_code_info) = file.source_code_info.as_ref() else {
            return Self { comments };
        };

        for location in &source_code_info.location {
            let comment = location
                .leading_comments
                .as_deref()
                .or(location.trailing_comments.as_deref());

            let Some(comment) = comment else {
                continue;
            };

            let trimmed = trim_comment(comment);
            if !trimmed.is_empty() {
                comments.insert(location.path.clone(), trimmed);
            }
        }

        Self { comments }
    }

    pub fn get(&self, path: &[i32]) -> Option<&str> {
        self.comments.get(path).map(String::as_str)
    }

    /// JSDoc lines for the node at `path`
    pub fn doc(&self, path: &[i32], deprecated: bool) -> Vec<String> {
        let mut lines: Vec<String> = self
            .get(path)
            .map(|comment| comment.lines().map(str::to_string).collect())
            .unwrap_or_default();

        if deprecated {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push("@deprecated".to_string());
        }

        lines
    }
}

/// Extend a descriptor path by a field number and an index
pub fn child_path(parent: &[i32], field_number: i32, index: usize) -> Vec<i32> {
    let mut path = Vec::with_capacity(parent.len() + 2);
    path.extend_from_slice(parent);
    path.push(field_number);
    path.push(index as i32);
    path
}

/// Trim each line and keep the text from closing the surrounding JSDoc block
fn trim_comment(comment: &str) -> String {
    comment
        .lines()
        .map(|line| line.trim())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .replace("*/", "*\\/")
}
