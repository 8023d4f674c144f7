//! Tool selection and the style applied to new ink.

use crate::config::HighlighterConfig;
use crate::shapes::{InkStyle, StrokeTool};
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Pen,
    Highlighter,
    Eraser,
    Select,
}

impl ToolKind {
    /// The stroke tool this lays down ink with, if it draws at all.
    pub fn stroke_tool(self) -> Option<StrokeTool> {
        match self {
            ToolKind::Pen => Some(StrokeTool::Pen),
            ToolKind::Highlighter => Some(StrokeTool::Highlighter),
            ToolKind::Eraser | ToolKind::Select => None,
        }
    }

    /// Only pen strokes may snap into shapes.
    pub fn snaps_shapes(self) -> bool {
        self == ToolKind::Pen
    }
}

/// Manages the current tool and its style.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Current style to apply to new strokes and shapes.
    pub current_style: InkStyle,
}

impl ToolManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool. Returns true when the tool actually changed.
    pub fn set_tool(&mut self, tool: ToolKind) -> bool {
        let changed = self.current_tool != tool;
        self.current_tool = tool;
        changed
    }

    /// Style for a new stroke drawn with `tool`.
    ///
    /// Highlighter ink is wider and semi-transparent.
    pub fn stroke_style(&self, tool: StrokeTool, highlighter: &HighlighterConfig) -> InkStyle {
        let mut style = self.current_style.clone();
        if tool == StrokeTool::Highlighter {
            style.width = style.width.max(highlighter.min_width);
            style.opacity = highlighter.opacity;
        }
        style
    }
}
