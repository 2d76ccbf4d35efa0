//! Color and styling helpers for CLI output.
//!
//! Semantic Color Theme:
//!   - Success:        green   (clean checks, tables)
//!   - Warning:        yellow  (truncation, has-more markers, views)
//!   - Error:          red     (cycles, failed loads)
//!   - Reference:      cyan    (object ids, root tree node)
//!   - Accent:         magenta (UDFs and procedures)
//!   - Muted:          dimmed  (field labels, connectors, edge labels)
//!   - Emphasis:       bold    (section headers)

use crate::domain::ObjectType;
use colored::Colorize;

use super::OutputConfig;

/// Apply semantic "success" color (green) to text.
pub fn success(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.green().to_string()
}

/// Apply semantic "error" color (red) to text.
pub fn error(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.red().to_string()
}

/// Apply semantic "warning" color (yellow) to text.
pub fn warning(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.yellow().to_string()
}

/// Colorize an object id (cyan).
pub(crate) fn colorize_id(id: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return id.to_string();
    }
    id.cyan().to_string()
}

/// Object type name, colored by family.
pub(crate) fn colorize_type(object_type: ObjectType, config: &OutputConfig) -> String {
    let text = object_type.as_str();
    if !config.use_colors {
        return text.to_string();
    }
    match object_type {
        ObjectType::Table | ObjectType::BigqueryTable => text.green().to_string(),
        ObjectType::View | ObjectType::BigqueryView => text.yellow().to_string(),
        ObjectType::LuaUdf | ObjectType::BigqueryUdf | ObjectType::BigqueryProcedure => {
            text.magenta().to_string()
        }
        ObjectType::VirtualSchema | ObjectType::Connection => text.blue().to_string(),
        ObjectType::ComposerDag => text.white().to_string(),
    }
}

/// Apply dimmed style to text (for labels/field names).
pub(crate) fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

/// Apply bold style to text (for section headers).
pub(crate) fn bold(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}

/// Apply cyan color to text (for arrows).
pub(crate) fn cyan(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.cyan().to_string()
}

/// Marker appended to nodes whose lineage continues past the result.
pub(crate) fn has_more_marker(config: &OutputConfig) -> String {
    let marker = if config.use_ascii { "[+]" } else { "…" };
    warning(marker, config)
}

/// Single-character glyph per object type, with ASCII fallback support.
pub(crate) fn type_icon(object_type: ObjectType, config: &OutputConfig) -> &'static str {
    if config.use_ascii {
        match object_type {
            ObjectType::Table | ObjectType::BigqueryTable => "#",
            ObjectType::View | ObjectType::BigqueryView => "~",
            ObjectType::LuaUdf | ObjectType::BigqueryUdf | ObjectType::BigqueryProcedure => "f",
            ObjectType::VirtualSchema => "@",
            ObjectType::Connection => "&",
            ObjectType::ComposerDag => ">",
        }
    } else {
        match object_type {
            ObjectType::Table | ObjectType::BigqueryTable => "▦",
            ObjectType::View | ObjectType::BigqueryView => "◇",
            ObjectType::LuaUdf | ObjectType::BigqueryUdf | ObjectType::BigqueryProcedure => "ƒ",
            ObjectType::VirtualSchema => "◎",
            ObjectType::Connection => "⇄",
            ObjectType::ComposerDag => "▶",
        }
    }
}
