use crate::{
    webview_zoom::ZoomStep, DOCUMENTATION_URL, GEMINI_API_KEY_URL, GITHUB_REPOSITORY_URL, REPORT_ISSUE_URL,
};

pub const MENU_CONFIGURE_API_KEY: &str = "menu_configure_api_key";
pub const MENU_QUIT: &str = "menu_quit";
pub const MENU_NEW_ANALYSIS: &str = "menu_new_analysis";
pub const MENU_OPEN_REPOSITORY: &str = "menu_open_repository";
pub const MENU_RELOAD: &str = "menu_reload";
pub const MENU_FORCE_RELOAD: &str = "menu_force_reload";
pub const MENU_RESET_ZOOM: &str = "menu_reset_zoom";
pub const MENU_ZOOM_IN: &str = "menu_zoom_in";
pub const MENU_ZOOM_OUT: &str = "menu_zoom_out";
pub const MENU_GET_API_KEY: &str = "menu_get_api_key";
pub const MENU_DOCUMENTATION: &str = "menu_documentation";
pub const MENU_REPORT_ISSUE: &str = "menu_report_issue";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ConfigureApiKey,
    Quit,
    ReloadMainWindow,
    ForceReloadMainWindow,
    Zoom(ZoomStep),
    OpenExternal(&'static str),
}

pub fn action_from_menu_id(menu_id: &str) -> Option<MenuAction> {
    match menu_id {
        MENU_CONFIGURE_API_KEY => Some(MenuAction::ConfigureApiKey),
        MENU_QUIT => Some(MenuAction::Quit),
        MENU_NEW_ANALYSIS | MENU_RELOAD => Some(MenuAction::ReloadMainWindow),
        MENU_FORCE_RELOAD => Some(MenuAction::ForceReloadMainWindow),
        MENU_RESET_ZOOM => Some(MenuAction::Zoom(ZoomStep::Reset)),
        MENU_ZOOM_IN => Some(MenuAction::Zoom(ZoomStep::In)),
        MENU_ZOOM_OUT => Some(MenuAction::Zoom(ZoomStep::Out)),
        MENU_OPEN_REPOSITORY => Some(MenuAction::OpenExternal(GITHUB_REPOSITORY_URL)),
        MENU_GET_API_KEY => Some(MenuAction::OpenExternal(GEMINI_API_KEY_URL)),
        MENU_DOCUMENTATION => Some(MenuAction::OpenExternal(DOCUMENTATION_URL)),
        MENU_REPORT_ISSUE => Some(MenuAction::OpenExternal(REPORT_ISSUE_URL)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_from_menu_id_maps_all_known_actions() {
        assert_eq!(
            action_from_menu_id(MENU_CONFIGURE_API_KEY),
            Some(MenuAction::ConfigureApiKey)
        );
        assert_eq!(action_from_menu_id(MENU_QUIT), Some(MenuAction::Quit));
        assert_eq!(
            action_from_menu_id(MENU_NEW_ANALYSIS),
            Some(MenuAction::ReloadMainWindow)
        );
        assert_eq!(
            action_from_menu_id(MENU_RELOAD),
            Some(MenuAction::ReloadMainWindow)
        );
        assert_eq!(
            action_from_menu_id(MENU_GET_API_KEY),
            Some(MenuAction::OpenExternal(GEMINI_API_KEY_URL))
        );
        assert_eq!(
            action_from_menu_id(MENU_REPORT_ISSUE),
            Some(MenuAction::OpenExternal(REPORT_ISSUE_URL))
        );
    }

    #[test]
    fn action_from_menu_id_maps_view_actions() {
        assert_eq!(
            action_from_menu_id(MENU_FORCE_RELOAD),
            Some(MenuAction::ForceReloadMainWindow)
        );
        assert_eq!(
            action_from_menu_id(MENU_RESET_ZOOM),
            Some(MenuAction::Zoom(ZoomStep::Reset))
        );
        assert_eq!(
            action_from_menu_id(MENU_ZOOM_IN),
            Some(MenuAction::Zoom(ZoomStep::In))
        );
        assert_eq!(
            action_from_menu_id(MENU_ZOOM_OUT),
            Some(MenuAction::Zoom(ZoomStep::Out))
        );
    }

    #[test]
    fn external_menu_targets_are_openable() {
        for menu_id in [
            MENU_OPEN_REPOSITORY,
            MENU_GET_API_KEY,
            MENU_DOCUMENTATION,
            MENU_REPORT_ISSUE,
        ] {
            let Some(MenuAction::OpenExternal(url)) = action_from_menu_id(menu_id) else {
                panic!("{menu_id} should open an external url");
            };
            assert!(crate::external_url::parse_openable_url(url).is_ok());
        }
    }

    #[test]
    fn action_from_menu_id_returns_none_for_unknown_menu_id() {
        assert_eq!(action_from_menu_id("unknown-menu"), None);
    }
}
