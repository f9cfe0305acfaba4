use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdUnit {
    Banner,
    Interstitial,
    Rewarded,
}

/// Ad SDK callbacks, re-expressed as channel messages. The shell publishes
/// these; core components subscribe for exactly the scope that needs them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AdEvent {
    Loaded { unit: AdUnit },
    Closed { unit: AdUnit },
    EarnedReward { reward_type: String, amount: f64 },
}
