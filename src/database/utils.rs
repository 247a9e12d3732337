use std::sync::LazyLock;

use regex::Regex;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\?").unwrap()
});

/// Collapses whitespace and rewrites `?` placeholders into Postgres `$n` parameters.
pub fn sql(query: &str) -> String {
    let cleaned = query.split_whitespace().collect::<Vec<&str>>().join(" ");
    let mut param_index = 1;
    let mut result = cleaned;
    while let Some(mat) = PLACEHOLDER.find(&result) {
        let replacement = format!("${}", param_index);
        result.replace_range(mat.range(), &replacement);
        param_index += 1;
    }
    result
}
