//! Code fence titles: `lang:filename` info strings
//!
//! ````markdown
//! ```typescript:src/example.ts
//! export const x = 1;
//! ```
//! ````
//!
//! becomes `lang = "typescript"` and
//! `meta = r#"data-filename="src/example.ts" data-language="typescript""#`,
//! which the highlighter later turns into element attributes.

use crate::mdast::{Code, Root};

use super::Transform;

/// Moves an embedded filename out of a code block's language tag
#[derive(Debug, Clone, Copy, Default)]
pub struct FenceMetadataTransform;

impl Transform for FenceMetadataTransform {
    fn name(&self) -> &'static str {
        "fence-metadata"
    }

    fn apply(&self, root: &mut Root) {
        root.visit_code_mut(annotate);
    }
}

/// Split a language tag at the first `:`.
///
/// Everything after that colon is the filename, further colons included.
pub fn split_lang(tag: &str) -> (&str, Option<&str>) {
    match tag.split_once(':') {
        Some((lang, filename)) => (lang, Some(filename)),
        None => (tag, None),
    }
}

fn annotate(code: &mut Code) {
    let tag = match code.lang.as_deref() {
        Some(tag) if !tag.is_empty() => tag.to_string(),
        _ => return,
    };

    let (lang, filename) = split_lang(&tag);

    let mut parts: Vec<String> = Vec::new();
    if let Some(meta) = code.meta.take().filter(|meta| !meta.is_empty()) {
        parts.push(meta);
    }
    // Not escaped here: the highlighter owns escaping for the attribute context
    if let Some(filename) = filename {
        parts.push(format!(r#"data-filename="{}""#, filename));
    }
    parts.push(format!(r#"data-language="{}""#, lang));

    tracing::trace!(lang, ?filename, "annotated code fence");

    code.meta = Some(parts.join(" "));
    code.lang = Some(lang.to_string());
}
