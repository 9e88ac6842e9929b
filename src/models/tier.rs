use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 订阅等级
///
/// 声明顺序即权益顺序：`Starter < Professional < Enterprise`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// 免费入门
    Starter,
    /// 专业版
    Professional,
    /// 企业版
    Enterprise,
}

impl Tier {
    /// 全部等级，按权益升序
    pub const ALL: [Tier; 3] = [Tier::Starter, Tier::Professional, Tier::Enterprise];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Starter => "starter",
            Tier::Professional => "professional",
            Tier::Enterprise => "enterprise",
        }
    }

    /// 展示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Tier::Starter => "Starter",
            Tier::Professional => "Professional",
            Tier::Enterprise => "Enterprise",
        }
    }
}

impl Default for Tier {
    fn default() -> Self {
        Tier::Starter
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 未知等级字符串
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid tier: {0}")]
pub struct ParseTierError(pub String);

impl FromStr for Tier {
    type Err = ParseTierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "starter" => Ok(Tier::Starter),
            "professional" => Ok(Tier::Professional),
            "enterprise" => Ok(Tier::Enterprise),
            other => Err(ParseTierError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_total_order() {
        assert!(Tier::Starter < Tier::Professional);
        assert!(Tier::Professional < Tier::Enterprise);
        assert!(Tier::Starter < Tier::Enterprise);
        assert_eq!(Tier::ALL.iter().max(), Some(&Tier::Enterprise));
    }

    #[test]
    fn test_tier_parse_is_exact() {
        assert_eq!("professional".parse::<Tier>(), Ok(Tier::Professional));
        assert!("Professional".parse::<Tier>().is_err());
        assert!("premium".parse::<Tier>().is_err());
    }

    #[test]
    fn test_tier_serde_lowercase() {
        let json = serde_json::to_string(&Tier::Enterprise).unwrap();
        assert_eq!(json, "\"enterprise\"");
        let tier: Tier = serde_json::from_str("\"starter\"").unwrap();
        assert_eq!(tier, Tier::Starter);
    }
}
