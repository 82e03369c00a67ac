use web_sys::{window, UrlSearchParams};

/// Connection state of the auto-connect flow.
///
/// `NoAutoConnectParams`, `Unauthorized` and `Authorized` are terminal;
/// the only way back to `Checking` is losing the active account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Checking,
    NoAutoConnectParams,
    Unauthorized,
    Authorized,
}

impl ConnectionState {
    /// State at mount, before any account has been observed.
    /// Without eligible URL parameters no wallet handshake is attempted.
    pub fn initial(params_eligible: bool) -> Self {
        if params_eligible {
            ConnectionState::Checking
        } else {
            ConnectionState::NoAutoConnectParams
        }
    }

    /// Transition applied whenever the presence of an active account changes.
    ///
    /// A connected account after an eligible auto-connect attempt is accepted
    /// as proof of authorization (only wallets issued by our factory can
    /// complete the handshake); no secondary on-chain verification is done.
    pub fn with_account(self, has_account: bool) -> Self {
        match self {
            ConnectionState::NoAutoConnectParams => ConnectionState::NoAutoConnectParams,
            _ if has_account => ConnectionState::Authorized,
            // account loss re-enters the checking state
            ConnectionState::Authorized => ConnectionState::Checking,
            other => other,
        }
    }

    /// Transition applied when the bounded auto-connect wait expires.
    /// A timer that fires after the account already arrived must not
    /// regress the state.
    pub fn on_timeout(self, has_account: bool) -> Self {
        match self {
            ConnectionState::Checking if !has_account => ConnectionState::Unauthorized,
            other => other,
        }
    }
}

/// Auto-connect parameters taken from the page URL. Consumed read-only;
/// this module never mutates the location.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AutoConnectParams {
    pub wallet_id: Option<String>,
    pub auth_cookie: Option<String>,
    pub auto_connect: Option<String>,
}

impl AutoConnectParams {
    pub fn new(
        wallet_id: Option<&str>,
        auth_cookie: Option<&str>,
        auto_connect: Option<&str>,
    ) -> Self {
        Self {
            wallet_id: wallet_id.map(str::to_string),
            auth_cookie: auth_cookie.map(str::to_string),
            auto_connect: auto_connect.map(str::to_string),
        }
    }

    /// Read `walletId`, `authCookie` and `autoConnect` from the current URL.
    pub fn from_window() -> Self {
        let search = window()
            .and_then(|win| win.location().search().ok())
            .unwrap_or_default();

        match UrlSearchParams::new_with_str(&search) {
            Ok(params) => Self {
                wallet_id: params.get("walletId"),
                auth_cookie: params.get("authCookie"),
                auto_connect: params.get("autoConnect"),
            },
            Err(e) => {
                log::warn!("Failed to parse query string: {:?}", e);
                Self::default()
            }
        }
    }

    /// Auto-connect policy: an in-app wallet id with a non-empty auth cookie,
    /// or an explicit `autoConnect=true`. Anything else means the page was
    /// not reached through the portal and no handshake is attempted.
    ///
    /// Deliberately strict: wallet type is never inferred from third-party
    /// localStorage markers.
    pub fn eligible(&self) -> bool {
        let in_app = self.wallet_id.as_deref() == Some("inApp")
            && self.auth_cookie.as_deref().map_or(false, |c| !c.is_empty());
        in_app || self.auto_connect.as_deref() == Some("true")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_params_is_not_eligible() {
        assert!(!AutoConnectParams::default().eligible());
    }

    #[test]
    fn in_app_wallet_requires_auth_cookie() {
        let with_cookie = AutoConnectParams::new(Some("inApp"), Some("abc123"), None);
        assert!(with_cookie.eligible());

        let empty_cookie = AutoConnectParams::new(Some("inApp"), Some(""), None);
        assert!(!empty_cookie.eligible());

        let missing_cookie = AutoConnectParams::new(Some("inApp"), None, None);
        assert!(!missing_cookie.eligible());
    }

    #[test]
    fn explicit_auto_connect_flag_is_eligible() {
        assert!(AutoConnectParams::new(None, None, Some("true")).eligible());
        assert!(!AutoConnectParams::new(None, None, Some("false")).eligible());
        assert!(!AutoConnectParams::new(None, None, Some("TRUE")).eligible());
    }

    #[test]
    fn cookie_alone_without_in_app_wallet_is_not_eligible() {
        assert!(!AutoConnectParams::new(Some("metamask"), Some("abc123"), None).eligible());
        assert!(!AutoConnectParams::new(None, Some("abc123"), None).eligible());
    }

    #[test]
    fn ineligible_params_skip_the_handshake() {
        // scenario: query string has no relevant parameters
        let state = ConnectionState::initial(false);
        assert_eq!(state, ConnectionState::NoAutoConnectParams);
        // account events never move it
        assert_eq!(state.with_account(true), ConnectionState::NoAutoConnectParams);
        assert_eq!(state.on_timeout(false), ConnectionState::NoAutoConnectParams);
    }

    #[test]
    fn account_within_timeout_authorizes() {
        // scenario: autoConnect=true, account resolves before the deadline
        let state = ConnectionState::initial(true);
        assert_eq!(state, ConnectionState::Checking);
        let state = state.with_account(true);
        assert_eq!(state, ConnectionState::Authorized);
    }

    #[test]
    fn timeout_without_account_is_terminal_unauthorized() {
        let state = ConnectionState::initial(true).on_timeout(false);
        assert_eq!(state, ConnectionState::Unauthorized);
        // still unauthorized even if further timeouts fire
        assert_eq!(state.on_timeout(false), ConnectionState::Unauthorized);
    }

    #[test]
    fn stale_timer_does_not_regress_authorized_state() {
        let state = ConnectionState::initial(true).with_account(true);
        assert_eq!(state.on_timeout(true), ConnectionState::Authorized);
        assert_eq!(state.on_timeout(false), ConnectionState::Authorized);
    }

    #[test]
    fn account_loss_reenters_checking() {
        let state = ConnectionState::initial(true).with_account(true);
        assert_eq!(state.with_account(false), ConnectionState::Checking);
    }
}
