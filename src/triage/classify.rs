use std::sync::LazyLock;

use regex::Regex;

fn checkbox(label: &str) -> Regex {
    Regex::new(&format!(r"(?im)^\s*(?:[-*]\s*)?\[x\]\s*{}", label))
        .expect("checkbox regex should compile")
}

static FEATURE_REQUEST_BOX: LazyLock<Regex> = LazyLock::new(|| checkbox(r"feature request\b"));
static BUG_BOX: LazyLock<Regex> = LazyLock::new(|| checkbox(r"bug\b"));
static DOCUMENTATION_BOX: LazyLock<Regex> =
    LazyLock::new(|| checkbox(r"documentation request\b"));
static NEW_CONFIGURATION_BOX: LazyLock<Regex> =
    LazyLock::new(|| checkbox(r"[^\n]*\bnew config(?:uration)? (?:option|directive)"));

static ENHANCEMENT_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)enhancement|feature request").expect("title regex should compile")
});

/// Links produced by the log upload service.
static LOG_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://logs\.i3wm\.org\b").expect("log link regex should compile")
});

/// What an issue looks like, judging only from its text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassificationFlags {
    pub enhancement: bool,
    pub requires_new_configuration: bool,
    pub documentation: bool,
    pub bug: bool,
    pub has_log_link: bool,
}

/// The kind of report, as decided for newly opened issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    Enhancement,
    Documentation,
    Bug,
}

impl ClassificationFlags {
    /// Enhancement requests win over documentation requests, which win over bugs.
    pub fn kind(&self) -> Option<IssueKind> {
        if self.enhancement {
            Some(IssueKind::Enhancement)
        } else if self.documentation {
            Some(IssueKind::Documentation)
        } else if self.bug {
            Some(IssueKind::Bug)
        } else {
            None
        }
    }
}

pub fn classify(title: &str, body: &str) -> ClassificationFlags {
    ClassificationFlags {
        enhancement: FEATURE_REQUEST_BOX.is_match(body) || ENHANCEMENT_TITLE.is_match(title),
        requires_new_configuration: NEW_CONFIGURATION_BOX.is_match(body),
        documentation: DOCUMENTATION_BOX.is_match(body),
        bug: BUG_BOX.is_match(body),
        has_log_link: has_log_link(body),
    }
}

pub fn has_log_link(text: &str) -> bool {
    LOG_LINK.is_match(text)
}
