//! Message template rendering
//!
//! `{Name}` is replaced by the property value, `{@Name}` and `{$Name}` are
//! accepted as aliases, `{{` / `}}` are literal braces, and placeholders with
//! no matching property are kept verbatim. A `:format` suffix is ignored.

use crate::core::context::PropertyBag;

pub fn render(template: &str, properties: &PropertyBag) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(index) = rest.find(['{', '}']) {
        output.push_str(&rest[..index]);
        let tail = &rest[index..];

        if tail.starts_with("{{") {
            output.push('{');
            rest = &tail[2..];
        } else if tail.starts_with("}}") {
            output.push('}');
            rest = &tail[2..];
        } else if tail.starts_with('{') {
            match tail.find('}') {
                Some(end) => {
                    let token = &tail[1..end];
                    match lookup(token, properties) {
                        Some(value) => output.push_str(&value),
                        None => output.push_str(&tail[..=end]),
                    }
                    rest = &tail[end + 1..];
                }
                None => {
                    output.push_str(tail);
                    rest = "";
                }
            }
        } else {
            output.push('}');
            rest = &tail[1..];
        }
    }

    output.push_str(rest);
    output
}

fn lookup(token: &str, properties: &PropertyBag) -> Option<String> {
    let name = token.trim_start_matches(['@', '$']);
    let name = name.split_once([':', ',']).map_or(name, |(n, _)| n);
    if name.is_empty() {
        return None;
    }
    properties.get(name).map(|v| v.to_string())
}
