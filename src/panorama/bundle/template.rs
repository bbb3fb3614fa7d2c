use std::path::Path;

use crate::panorama::bundle::error::BundleError;
use crate::panorama::geometry::PanoramaDescriptor;

const BUILTIN_TEMPLATE: &str = include_str!("../../../templates/streetview.html");

/// Values substituted into a viewer page.
#[derive(Debug, Clone, Copy)]
pub struct ViewerPage<'a> {
    pub image_name: &'a str,
    pub descriptor: &'a PanoramaDescriptor,
    pub generator: &'a str,
}

/// Viewer page template with `{{name}}` placeholders.
///
/// Loaded once and shared read-only. Recognised placeholders: `header`, `image`,
/// `image_json`, `full_width`, `full_height`, `cropped_width`, `cropped_height`,
/// `cropped_left`, `cropped_top`. Unknown placeholders are left untouched.
#[derive(Debug, Clone)]
pub struct ViewerTemplate {
    source: String,
}

impl Default for ViewerTemplate {
    fn default() -> Self {
        Self::new(BUILTIN_TEMPLATE)
    }
}

impl ViewerTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, BundleError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| BundleError::Template {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(source))
    }

    pub fn render(&self, page: &ViewerPage<'_>) -> String {
        let mut out = String::with_capacity(self.source.len() + 256);
        let mut rest = self.source.as_str();

        while let Some(open) = rest.find("{{") {
            out.push_str(&rest[..open]);
            let after = &rest[open + 2..];
            let Some(close) = after.find("}}") else {
                rest = &rest[open..];
                break;
            };
            let key = after[..close].trim();
            match lookup(page, key) {
                Some(value) => out.push_str(&value),
                None => out.push_str(&rest[open..open + 2 + close + 2]),
            }
            rest = &after[close + 2..];
        }
        out.push_str(rest);
        out
    }
}

fn lookup(page: &ViewerPage<'_>, key: &str) -> Option<String> {
    let d = page.descriptor;
    let value = match key {
        "header" => format!("<!-- Generated by {} -->", escape_html(&page.generator.replace("--", "- -"))),
        "image" => escape_html(page.image_name),
        "image_json" => script_string(page.image_name),
        "full_width" => d.full_width.to_string(),
        "full_height" => d.full_height.to_string(),
        "cropped_width" => d.cropped_width.to_string(),
        "cropped_height" => d.cropped_height.to_string(),
        "cropped_left" => d.cropped_left.to_string(),
        "cropped_top" => d.cropped_top.to_string(),
        _ => return None,
    };
    Some(value)
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// JSON string literal that is also safe inside a `<script>` element.
fn script_string(text: &str) -> String {
    let json = serde_json::Value::String(text.to_string()).to_string();
    json.replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}
