//! Markup and script injection signatures

use regex::Regex;
use std::sync::LazyLock;

/// A detection rule for markup/script injection content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionSignature {
    /// `<script ...>` tag, open or closed
    ScriptTag,
    /// `javascript:` URI scheme
    JavascriptUri,
    /// `vbscript:` URI scheme
    VbscriptUri,
    /// Inline event-handler attribute such as `onclick=`
    EventHandler,
    /// `<iframe ...>` tag
    IframeTag,
    /// `data:text/html` URI
    HtmlDataUri,
}

static SIGNATURES: LazyLock<Vec<(InjectionSignature, Regex)>> = LazyLock::new(|| {
    [
        (InjectionSignature::ScriptTag, r"(?is)<script\b[^>]*>"),
        (InjectionSignature::JavascriptUri, r"(?i)javascript:"),
        (InjectionSignature::VbscriptUri, r"(?i)vbscript:"),
        (InjectionSignature::EventHandler, r"(?i)\bon[a-z]+\s*="),
        (InjectionSignature::IframeTag, r"(?is)<iframe\b[^>]*>"),
        (InjectionSignature::HtmlDataUri, r"(?i)data:\s*text/html"),
    ]
    .into_iter()
    .map(|(signature, pattern)| {
        let regex = Regex::new(pattern).expect("injection signature regex should compile");
        (signature, regex)
    })
    .collect()
});

/// Find the first signature matching anywhere in `input`
pub fn find_injection(input: &str) -> Option<InjectionSignature> {
    SIGNATURES
        .iter()
        .find(|(_, regex)| regex.is_match(input))
        .map(|(signature, _)| *signature)
}
