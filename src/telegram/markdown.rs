//! MarkdownV2 escaping

/// Escapes special characters for Telegram MarkdownV2 text.
///
/// # Example
///
/// ```
/// use terabox_bot::telegram::markdown::escape_markdown_v2;
///
/// assert_eq!(escape_markdown_v2("12.4 MB!"), "12\\.4 MB\\!");
/// ```
pub fn escape_markdown_v2(text: &str) -> String {
    let mut result = String::with_capacity(text.len() * 2);

    for c in text.chars() {
        if matches!(
            c,
            '\\' | '_' | '*' | '[' | ']' | '(' | ')' | '~' | '`' | '>' | '#' | '+' | '-' | '=' | '|' | '{' | '}' | '.' | '!'
        ) {
            result.push('\\');
        }
        result.push(c);
    }

    result
}

/// Escapes the URL part of an inline link `[text](url)`.
///
/// Inside the parentheses only `)` and `\` are special.
pub fn escape_link_url(url: &str) -> String {
    let mut result = String::with_capacity(url.len());
    for c in url.chars() {
        if c == ')' || c == '\\' {
            result.push('\\');
        }
        result.push(c);
    }
    result
}
