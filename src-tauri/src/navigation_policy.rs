use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NavigationDecision {
    Allow,
    OpenExternally,
    Deny,
}

pub(crate) fn is_app_origin(url: &Url) -> bool {
    match url.scheme() {
        "tauri" | "asset" => true,
        "http" | "https" => url.host_str() == Some("tauri.localhost"),
        "about" => url.path() == "blank",
        _ => false,
    }
}

/// The bundled frontend may navigate within itself. Web links leave the app
/// and open in the system browser; everything else is cancelled.
pub(crate) fn decide_navigation(url: &Url) -> NavigationDecision {
    if is_app_origin(url) {
        return NavigationDecision::Allow;
    }
    match url.scheme() {
        "http" | "https" => NavigationDecision::OpenExternally,
        _ => NavigationDecision::Deny,
    }
}
