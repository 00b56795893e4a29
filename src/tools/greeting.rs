//! Greeting resource.
//!
//! Exposed as the `greeting://{name}` resource template. Pure string
//! formatting; the datastore is never touched.

/// URI template advertised to clients.
pub const GREETING_URI_TEMPLATE: &str = "greeting://{name}";

const GREETING_SCHEME: &str = "greeting://";

/// Personalized greeting for `name`.
pub fn greet(name: &str) -> String {
    format!(
        "👋 Hello, {}! I’m here to help manage student leave requests in the MySQL database.",
        name
    )
}

/// Extract the name from a `greeting://{name}` URI.
///
/// Returns `None` for other schemes or an empty name.
pub fn greeting_name(uri: &str) -> Option<&str> {
    uri.strip_prefix(GREETING_SCHEME)
        .map(|rest| rest.trim_end_matches('/'))
        .filter(|name| !name.is_empty())
}
