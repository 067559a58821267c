use tracecheck_domain::policy::EffectiveConfig;

pub const PROFILES: &[&str] = &["default", "strict"];

/// Preset profiles are opinionated defaults.
///
/// Keep these small and readable. Anything complex should go into repo config.
pub fn preset(profile: &str) -> Option<EffectiveConfig> {
    match profile {
        "default" => Some(EffectiveConfig::default()),
        "strict" => Some(strict_profile()),
        _ => None,
    }
}

fn strict_profile() -> EffectiveConfig {
    EffectiveConfig {
        profile: "strict".to_string(),
        require_string_key: true,
        no_printf_like: true,
        ..EffectiveConfig::default()
    }
}
