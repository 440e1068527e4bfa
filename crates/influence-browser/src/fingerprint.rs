use rand::Rng;
use serde_json::{json, Value};

/// Desktop user agent sent by default.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
const ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8";

/// Static browser identity applied to every page of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerprintConfig {
    pub user_agent: String,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub accept_language: String,
    pub accept: String,
}

impl FingerprintConfig {
    /// Fixed desktop identity with the given viewport
    pub fn desktop(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            viewport_width,
            viewport_height,
            accept_language: ACCEPT_LANGUAGE.to_string(),
            accept: ACCEPT.to_string(),
        }
    }

    /// Desktop identity with a user agent drawn from a small pool
    pub fn randomized(viewport_width: u32, viewport_height: u32) -> Self {
        let mut rng = rand::thread_rng();

        let user_agents = [
            DEFAULT_USER_AGENT,
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        ];

        let ua_idx = rng.gen_range(0..user_agents.len());

        Self {
            user_agent: user_agents[ua_idx].to_string(),
            ..Self::desktop(viewport_width, viewport_height)
        }
    }

    /// Build the identity described by the browser settings
    pub fn from_config(config: &influence_core::BrowserConfig) -> Self {
        if config.randomize_user_agent {
            Self::randomized(config.window_width, config.window_height)
        } else {
            Self::desktop(config.window_width, config.window_height)
        }
    }

    /// Extra HTTP headers sent with every request
    pub fn headers(&self) -> Value {
        json!({
            "Accept-Language": self.accept_language,
            "Accept": self.accept,
        })
    }
}
