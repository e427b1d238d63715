use leptos::prelude::*;

use crate::commands::UploadResult;

/// Characters of raw specification text shown in the preview.
pub const PREVIEW_CHARS: usize = 500;

/// First `limit` characters of `raw` followed by an ellipsis.
pub fn preview_text(raw: &str, limit: usize) -> String {
    let head: String = raw.chars().take(limit).collect();
    format!("{}...", head)
}

/// Read-only summary of a parsed specification.
#[component]
pub fn SpecPreview(spec: UploadResult) -> impl IntoView {
    let parsed = spec.parsed_data;
    let interfaces = parsed.interfaces.join(", ");
    let protocols = parsed.protocols.join(", ");
    let parameters: Vec<(String, String)> = parsed.parameters.into_iter().collect();
    let raw = preview_text(&parsed.raw_text, PREVIEW_CHARS);

    view! {
        <div class="spec-preview">
            <h3>"Parsed Specification: " {spec.filename}</h3>

            {(!interfaces.is_empty()).then(|| view! {
                <div class="spec-field">
                    <span class="spec-label">"Interfaces:"</span>
                    <span class="spec-value">{interfaces}</span>
                </div>
            })}

            {(!protocols.is_empty()).then(|| view! {
                <div class="spec-field">
                    <span class="spec-label">"Protocols:"</span>
                    <span class="spec-value">{protocols}</span>
                </div>
            })}

            {(!parameters.is_empty()).then(|| view! {
                <div class="spec-field">
                    <span class="spec-label">"Parameters:"</span>
                    <ul class="spec-parameters">
                        {parameters
                            .into_iter()
                            .map(|(name, value)| view! {
                                <li><code>{name}</code> " = " {value}</li>
                            })
                            .collect_view()}
                    </ul>
                </div>
            })}

            <div class="spec-field">
                <span class="spec-label">"Preview:"</span>
                <pre class="spec-raw">{raw}</pre>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_on_chars() {
        let long = "é".repeat(600);
        let preview = preview_text(&long, PREVIEW_CHARS);
        assert_eq!(preview.chars().count(), 503);
        assert!(preview.ends_with("..."));

        assert_eq!(preview_text("short spec", PREVIEW_CHARS), "short spec...");
        assert_eq!(preview_text("", PREVIEW_CHARS), "...");
    }
}
