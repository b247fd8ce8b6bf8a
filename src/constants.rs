// -
// External endpoints

/// Live network snapshot (all connected participants, replaced wholesale
/// each publication).
pub(crate) const DEFAULT_FEED_URL: &str = "https://data.vatsim.net/v3/vatsim-data.json";

/// Member directory used to resolve an account id into a display name.
pub(crate) const DEFAULT_MEMBER_API_URL: &str = "https://api.vatusa.net/v2/user";

/// JSON advisory event source (restricted-airspace intrusion events).
pub(crate) const DEFAULT_ADVISORY_URL: &str = "http://127.0.0.1:8000/api/v1/p56/";

/// Low-frequency advisory bulletin page.
pub(crate) const DEFAULT_BULLETIN_URL: &str = "https://www.fly.faa.gov/adv/adv_spt";

// -
// Store documents (all JSON, under the configured data directory)

pub(crate) const ACCOUNT_WATCH_FILE: &str = "account_watches.json";
pub(crate) const CALLSIGN_WATCH_FILE: &str = "callsign_watches.json";
pub(crate) const TYPE_WATCH_FILE: &str = "type_watches.json";
pub(crate) const A1_KEYWORD_FILE: &str = "a1_keywords.json";
pub(crate) const A9_KEYWORD_FILE: &str = "a9_keywords.json";
pub(crate) const FAKE_NAME_FILE: &str = "fake_names.json";
pub(crate) const POLICY_ALERT_FILE: &str = "policy_alerts.json";
pub(crate) const HIGHEST_ACCOUNT_FILE: &str = "highest_account.json";
pub(crate) const SEEN_ADVISORY_FILE: &str = "advisory_state.json";
pub(crate) const SEEN_BULLETIN_FILE: &str = "seen_bulletins.json";
