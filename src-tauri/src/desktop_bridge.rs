use crate::BACKEND_READY_EVENT;

/// Script installed into every webview before page scripts run. It exposes
/// `window.desktopBridge`, a value-typed wrapper over the two bridge commands
/// and the readiness event, and nothing else.
///
/// Webviews never get a second top-level window: `window.open` and links with
/// a `target` are turned into a navigation of the current page, which the
/// navigation handler cancels and hands to the system browser.
pub(crate) fn desktop_bridge_script() -> String {
    let event_name = serde_json::to_string(BACKEND_READY_EVENT)
        .unwrap_or_else(|_| "\"backend://ready\"".to_string());
    let platform =
        serde_json::to_string(std::env::consts::OS).unwrap_or_else(|_| "\"\"".to_string());
    let arch =
        serde_json::to_string(std::env::consts::ARCH).unwrap_or_else(|_| "\"\"".to_string());

    format!(
        r#"(function () {{
  if (window.desktopBridge) {{
    return;
  }}
  var openOutsideApp = function (target) {{
    var url;
    try {{
      url = new URL(String(target), window.location.href);
    }} catch (error) {{
      return;
    }}
    if (url.origin === window.location.origin) {{
      return;
    }}
    if (url.protocol === "http:" || url.protocol === "https:") {{
      window.location.href = url.href;
    }}
  }};
  window.open = function (target) {{
    if (target !== undefined && target !== null && String(target) !== "") {{
      openOutsideApp(target);
    }}
    return null;
  }};
  document.addEventListener(
    "click",
    function (event) {{
      var anchor = event.target && event.target.closest ? event.target.closest("a[target]") : null;
      if (!anchor || ["", "_self", "_parent", "_top"].indexOf(anchor.target) !== -1) {{
        return;
      }}
      event.preventDefault();
      openOutsideApp(anchor.href);
    }},
    true
  );
  var tauri = window.__TAURI__;
  if (!tauri || !tauri.core) {{
    return;
  }}
  var invoke = tauri.core.invoke;
  Object.defineProperty(window, "desktopBridge", {{
    configurable: false,
    writable: false,
    value: Object.freeze({{
      getApiKey: function () {{
        return invoke("desktop_bridge_get_api_key");
      }},
      saveApiKey: function (apiKey) {{
        return invoke("desktop_bridge_save_api_key", {{ apiKey: String(apiKey) }});
      }},
      onBackendReady: function (callback) {{
        return tauri.event.listen({event_name}, function (event) {{
          callback(event.payload);
        }});
      }},
      platform: {platform},
      arch: {arch}
    }})
  }});
}})();"#
    )
}

#[cfg(test)]
mod tests {
    use super::desktop_bridge_script;

    #[test]
    fn desktop_bridge_script_only_references_bridge_commands() {
        let script = desktop_bridge_script();
        assert!(script.contains("\"desktop_bridge_get_api_key\""));
        assert!(script.contains("\"desktop_bridge_save_api_key\""));
        assert!(script.contains("\"backend://ready\""));
        assert_eq!(script.matches("invoke(\"").count(), 2);
    }

    #[test]
    fn desktop_bridge_script_routes_new_windows_through_navigation() {
        let script = desktop_bridge_script();
        assert!(script.contains("window.open = function (target)"));
        assert!(script.contains("return null;"));
        assert!(script.contains("closest(\"a[target]\")"));
        assert!(script.contains("window.location.href = url.href"));
        assert!(script.contains("url.protocol === \"http:\" || url.protocol === \"https:\""));
    }

    #[test]
    fn capabilities_grant_events_and_self_close_only() {
        let permissions = |source: &str| -> Vec<String> {
            let capability: serde_json::Value =
                serde_json::from_str(source).expect("capability should be valid json");
            capability["permissions"]
                .as_array()
                .expect("permissions should be an array")
                .iter()
                .map(|permission| permission.as_str().unwrap_or_default().to_string())
                .collect()
        };

        assert_eq!(
            permissions(include_str!("../capabilities/default.json")),
            vec!["core:event:default"]
        );
        assert_eq!(
            permissions(include_str!("../capabilities/api-key.json")),
            vec!["core:event:default", "core:window:allow-close"]
        );
    }

    #[test]
    fn desktop_bridge_script_embeds_platform_as_json_string() {
        let script = desktop_bridge_script();
        assert!(script.contains(&format!("platform: \"{}\"", std::env::consts::OS)));
    }
}
