//! Cross-reference extraction from note content.
//!
//! Notes reference each other with `[[Target]]` or `[[Target|display alias]]`
//! tokens. Extraction is a pure function of the text: targets come back
//! exactly as written, aliases are dropped, duplicates collapse.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// Matches `[[target]]` and `[[target|alias]]`. The target is a non-empty
/// run of characters excluding `]` and `|`; the alias excludes `]`.
static LINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\]|]+)(?:\|[^\]]+)?\]\]").expect("link regex"));

/// Set of note identifiers referenced by one note, duplicates collapsed.
pub type ReferenceSet = BTreeSet<String>;

/// Extract the referenced note identifiers from note content.
///
/// Targets are not normalized in any way: case, spacing, `#` fragments, and
/// any extension are preserved as written. Alias text never appears in the
/// result.
pub fn extract(content: &str) -> ReferenceSet {
    LINK_REGEX
        .captures_iter(content)
        .map(|caps| caps[1].to_string())
        .collect()
}
