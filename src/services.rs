//! The monitored service list.
//!
//! Compiled in and intentionally not configurable at runtime. Edit
//! [`MONITORED_SERVICES`] and rebuild to change what the dashboard watches.

use crate::probe::ServiceEndpoint;

/// `(display name, url)` pairs, in the order they appear on the dashboard.
pub const MONITORED_SERVICES: &[(&str, &str)] = &[
    ("Frontend (www)", "https://www.example.com/"),
    ("Frontend (app)", "https://app.example.com/"),
    ("Backend API", "https://api.example.com"),
    ("Postgres Database", "https://db.example.com"),
];

/// Owned copy of [`MONITORED_SERVICES`], ready to hand to a [`crate::probe::Prober`].
pub fn monitored_services() -> Vec<ServiceEndpoint> {
    MONITORED_SERVICES
        .iter()
        .map(|&(name, url)| ServiceEndpoint::new(name, url))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monitored_services_keeps_declaration_order() {
        let services = monitored_services();
        assert_eq!(services.len(), MONITORED_SERVICES.len());
        for (endpoint, (name, url)) in services.iter().zip(MONITORED_SERVICES) {
            assert_eq!(endpoint.name, *name);
            assert_eq!(endpoint.url, *url);
        }
    }

    #[test]
    fn urls_are_unique() {
        // The status page keys table rows by URL.
        let mut urls: Vec<&str> = MONITORED_SERVICES.iter().map(|(_, url)| *url).collect();
        urls.sort_unstable();
        urls.dedup();
        assert_eq!(urls.len(), MONITORED_SERVICES.len());
    }

    #[test]
    fn urls_are_absolute_http() {
        for (name, url) in MONITORED_SERVICES {
            assert!(
                url.starts_with("https://") || url.starts_with("http://"),
                "service `{name}` has non-http url `{url}`"
            );
        }
    }
}
