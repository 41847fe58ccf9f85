//! Tier classification over a geometry profile.
//!
//! The ladder is an ordered table of (tier, predicate) pairs evaluated top to
//! bottom; the first predicate that holds decides the tier. Higher rules
//! overlap lower ones on purpose, so the order is part of the contract.
//! A missing profile, or a profile no rule accepts, rates `N/A`.

use crate::domain::geometry::{GeometryProfile, Horizon};
use std::fmt;

/// Minimum acceleration for the AAA tier.
pub const AAA_MIN_ACCELERATION: f64 = 20.0;
/// Minimum acceleration for the Reversal tier.
pub const REVERSAL_MIN_ACCELERATION: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tier {
    Sss,
    Aaa,
    Phoenix,
    Launchpad,
    AaPlus,
    Aa,
    AaMinus,
    APlus,
    A,
    BbbPlus,
    Bbb,
    BbbMinus,
    Divergence,
    BbPlus,
    Bb,
    BbMinus,
    BPlus,
    B,
    C,
    D,
    Reversal,
    NotApplicable,
}

impl Tier {
    pub const ALL: [Tier; 22] = [
        Tier::Sss,
        Tier::Aaa,
        Tier::Phoenix,
        Tier::Launchpad,
        Tier::AaPlus,
        Tier::Aa,
        Tier::AaMinus,
        Tier::APlus,
        Tier::A,
        Tier::BbbPlus,
        Tier::Bbb,
        Tier::BbbMinus,
        Tier::Divergence,
        Tier::BbPlus,
        Tier::Bb,
        Tier::BbMinus,
        Tier::BPlus,
        Tier::B,
        Tier::C,
        Tier::D,
        Tier::Reversal,
        Tier::NotApplicable,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Tier::Sss => "SSS",
            Tier::Aaa => "AAA",
            Tier::Phoenix => "Phoenix",
            Tier::Launchpad => "Launchpad",
            Tier::AaPlus => "AA+",
            Tier::Aa => "AA",
            Tier::AaMinus => "AA-",
            Tier::APlus => "A+",
            Tier::A => "A",
            Tier::BbbPlus => "BBB+",
            Tier::Bbb => "BBB",
            Tier::BbbMinus => "BBB-",
            Tier::Divergence => "Divergence",
            Tier::BbPlus => "BB+",
            Tier::Bb => "BB",
            Tier::BbMinus => "BB-",
            Tier::BPlus => "B+",
            Tier::B => "B",
            Tier::C => "C",
            Tier::D => "D",
            Tier::Reversal => "Reversal",
            Tier::NotApplicable => "N/A",
        }
    }

    /// (display name, description, hex color)
    fn presentation(self) -> (&'static str, &'static str, &'static str) {
        match self {
            Tier::Sss => ("Titan (泰坦)", "全週期超過45度，神級標的", "#FFD700"),
            Tier::Aaa => ("Dominator (統治者)", "短期加速向上，完美趨勢", "#FF4500"),
            Tier::Phoenix => ("Phoenix (浴火重生)", "長空短多，逆轉信號", "#FF6347"),
            Tier::Launchpad => ("Launchpad (發射台)", "線性度極高，蓄勢待發", "#32CD32"),
            Tier::AaPlus => ("Elite (精英)", "一年期強勢上攻", "#FFA500"),
            Tier::Aa => ("Strong Bull (強多)", "中短期穩定上升", "#FFD700"),
            Tier::AaMinus => ("Steady Bull (穩健多)", "趨勢健康向上", "#ADFF2F"),
            Tier::APlus => ("Moderate Bull (溫和多)", "短期表現良好", "#7FFF00"),
            Tier::A => ("Weak Bull (弱多)", "短期微幅上揚", "#98FB98"),
            Tier::BbbPlus => ("Neutral+ (中性偏多)", "盤整偏多", "#F0E68C"),
            Tier::Bbb => ("Neutral (中性)", "橫盤震蕩", "#D3D3D3"),
            Tier::BbbMinus => ("Neutral- (中性偏空)", "盤整偏弱", "#DDA0DD"),
            Tier::Divergence => ("Divergence (背離)", "價格創高但動能衰竭", "#FF1493"),
            Tier::BbPlus => ("Weak Bear (弱空)", "短期下跌", "#FFA07A"),
            Tier::Bb => ("Moderate Bear (中等空)", "下跌趨勢明確", "#FF6347"),
            Tier::BbMinus => ("Strong Bear (強空)", "跌勢凌厲", "#DC143C"),
            Tier::BPlus => ("Severe Bear (重度空)", "崩跌模式", "#8B0000"),
            Tier::B => ("Depression (蕭條)", "長期熊市", "#800000"),
            Tier::C => ("Structural Decline (結構衰退)", "世代熊市", "#4B0082"),
            Tier::D => ("Collapse (崩盤)", "極度危險", "#000000"),
            Tier::Reversal => ("Reversal (觸底反彈)", "熊市中的V型反轉", "#00CED1"),
            Tier::NotApplicable => ("Unknown (未分類)", "無法歸類", "#808080"),
        }
    }

    pub fn result(self) -> RatingResult {
        let (name, description, color) = self.presentation();
        RatingResult {
            level: self,
            name,
            description,
            color,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RatingResult {
    pub level: Tier,
    pub name: &'static str,
    pub description: &'static str,
    pub color: &'static str,
}

impl RatingResult {
    /// Rating returned when there is no profile at all.
    pub fn no_data() -> Self {
        RatingResult {
            level: Tier::NotApplicable,
            name: "無數據",
            description: "數據不足",
            color: "#808080",
        }
    }
}

/// One rung of the ladder.
pub struct TierRule {
    pub tier: Tier,
    /// Human readable form of the predicate.
    pub condition: &'static str,
    pub predicate: fn(&Signals) -> bool,
}

/// The profile values the rules read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signals {
    pub y35: f64,
    pub y10: f64,
    pub y5: f64,
    pub y3: f64,
    pub y1: f64,
    pub m6: f64,
    pub m3: f64,
    pub r2_1y: f64,
    pub r2_3m: f64,
    pub acceleration: f64,
    pub phoenix: bool,
}

impl From<&GeometryProfile> for Signals {
    fn from(p: &GeometryProfile) -> Self {
        Signals {
            y35: p.angle(Horizon::Y35),
            y10: p.angle(Horizon::Y10),
            y5: p.angle(Horizon::Y5),
            y3: p.angle(Horizon::Y3),
            y1: p.angle(Horizon::Y1),
            m6: p.angle(Horizon::M6),
            m3: p.angle(Horizon::M3),
            r2_1y: p.r_squared(Horizon::Y1),
            r2_3m: p.r_squared(Horizon::M3),
            acceleration: p.acceleration,
            phoenix: p.phoenix_signal,
        }
    }
}

fn between(low: f64, value: f64, high: f64) -> bool {
    low < value && value < high
}

static RULES: [TierRule; 21] = [
    TierRule {
        tier: Tier::Sss,
        condition: "35Y>45 and 10Y>45 and 1Y>45 and 3M>45",
        predicate: |s| s.y35 > 45.0 && s.y10 > 45.0 && s.y1 > 45.0 && s.m3 > 45.0,
    },
    TierRule {
        tier: Tier::Aaa,
        condition: "1Y>40 and 6M>45 and 3M>50 and accel>20",
        predicate: |s| {
            s.y1 > 40.0 && s.m6 > 45.0 && s.m3 > 50.0 && s.acceleration > AAA_MIN_ACCELERATION
        },
    },
    TierRule {
        tier: Tier::Phoenix,
        condition: "phoenix and 3M>30",
        predicate: |s| s.phoenix && s.m3 > 30.0,
    },
    TierRule {
        tier: Tier::Launchpad,
        condition: "r2(1Y)>0.95 and 20<1Y<40 and accel>0",
        predicate: |s| s.r2_1y > 0.95 && between(20.0, s.y1, 40.0) && s.acceleration > 0.0,
    },
    TierRule {
        tier: Tier::AaPlus,
        condition: "1Y>35 and 3M>40 and r2(3M)>0.85",
        predicate: |s| s.y1 > 35.0 && s.m3 > 40.0 && s.r2_3m > 0.85,
    },
    TierRule {
        tier: Tier::Aa,
        condition: "1Y>30 and 6M>35",
        predicate: |s| s.y1 > 30.0 && s.m6 > 35.0,
    },
    TierRule {
        tier: Tier::AaMinus,
        condition: "1Y>25 and 3M>30",
        predicate: |s| s.y1 > 25.0 && s.m3 > 30.0,
    },
    TierRule {
        tier: Tier::APlus,
        condition: "6M>20 and 3M>25",
        predicate: |s| s.m6 > 20.0 && s.m3 > 25.0,
    },
    TierRule {
        tier: Tier::A,
        condition: "3M>15",
        predicate: |s| s.m3 > 15.0,
    },
    TierRule {
        tier: Tier::BbbPlus,
        condition: "-5<3M<15 and 1Y>0",
        predicate: |s| between(-5.0, s.m3, 15.0) && s.y1 > 0.0,
    },
    TierRule {
        tier: Tier::Bbb,
        condition: "-10<3M<10 and -10<1Y<10",
        predicate: |s| between(-10.0, s.m3, 10.0) && between(-10.0, s.y1, 10.0),
    },
    TierRule {
        tier: Tier::BbbMinus,
        condition: "-15<3M<5 and 1Y<0",
        predicate: |s| between(-15.0, s.m3, 5.0) && s.y1 < 0.0,
    },
    TierRule {
        tier: Tier::Divergence,
        condition: "1Y>20 and 3M<-10",
        predicate: |s| s.y1 > 20.0 && s.m3 < -10.0,
    },
    TierRule {
        tier: Tier::BbPlus,
        condition: "-25<3M<-15 and 1Y>-10",
        predicate: |s| between(-25.0, s.m3, -15.0) && s.y1 > -10.0,
    },
    TierRule {
        tier: Tier::Bb,
        condition: "-35<3M<-25",
        predicate: |s| between(-35.0, s.m3, -25.0),
    },
    TierRule {
        tier: Tier::BbMinus,
        condition: "-45<3M<-35",
        predicate: |s| between(-45.0, s.m3, -35.0),
    },
    TierRule {
        tier: Tier::BPlus,
        condition: "3M<-45 and 1Y<-30",
        predicate: |s| s.m3 < -45.0 && s.y1 < -30.0,
    },
    TierRule {
        tier: Tier::B,
        condition: "10Y<-30 and 3M<-40",
        predicate: |s| s.y10 < -30.0 && s.m3 < -40.0,
    },
    TierRule {
        tier: Tier::C,
        condition: "35Y<-20 and 10Y<-35",
        predicate: |s| s.y35 < -20.0 && s.y10 < -35.0,
    },
    TierRule {
        tier: Tier::D,
        condition: "3M<-60",
        predicate: |s| s.m3 < -60.0,
    },
    TierRule {
        tier: Tier::Reversal,
        condition: "10Y<-20 and 3M>15 and accel>30",
        predicate: |s| s.y10 < -20.0 && s.m3 > 15.0 && s.acceleration > REVERSAL_MIN_ACCELERATION,
    },
];

/// The ladder in evaluation order; the `N/A` fallthrough is implicit.
pub fn rules() -> &'static [TierRule] {
    &RULES
}

pub fn classify_signals(signals: &Signals) -> Tier {
    rules()
        .iter()
        .find(|rule| (rule.predicate)(signals))
        .map(|rule| rule.tier)
        .unwrap_or(Tier::NotApplicable)
}

pub fn classify(profile: Option<&GeometryProfile>) -> RatingResult {
    let Some(profile) = profile else {
        return RatingResult::no_data();
    };
    let tier = classify_signals(&Signals::from(profile));
    tracing::debug!(tier = %tier, "profile classified");
    tier.result()
}
