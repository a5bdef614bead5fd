//! Canned comments posted by the bot.

pub const MISSING_LOG: &str = "I don’t see a link to logs.i3wm.org. \
    Did you follow https://i3wm.org/docs/debugging.html? \
    (In case you actually provided a link to a logfile, please ignore me.)";

pub const MISSING_VERSION: &str = "I don’t see a version number. \
    Could you please copy & paste the output of `i3 --version` into this issue?";

pub const FEATURE_POLICY: &str = "Thanks for the suggestion! \
    Please note that i3 has a strict feature policy: we only add features that fit the existing \
    design and are useful to a broad range of users. Features that need a new configuration \
    option are especially unlikely to be accepted. \
    Please read https://i3wm.org/docs/contribute.html before investing time in a patch.";

pub fn upgrade(from: &str, to: &str) -> String {
    format!(
        "Sorry, we can only support the latest major version. \
         Please upgrade from {} to {}, verify the bug still exists, and re-open this issue.",
        from, to
    )
}
