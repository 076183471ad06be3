// ==========================================
// 跳伞场载次排班系统 - 领域类型定义
// ==========================================
// 依据: 载次分配引擎 - 3. 数据模型
// ==========================================

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::DomainError;

// ==========================================
// 跳伞类型 (Jump Type)
// ==========================================
// Video 仅出现在历史记录中（纯摄像任务）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JumpType {
    Tandem, // 双人伞
    Aff,    // 加速自由落体带飞
    Video,  // 纯摄像
}

impl fmt::Display for JumpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JumpType::Tandem => write!(f, "tandem"),
            JumpType::Aff => write!(f, "aff"),
            JumpType::Video => write!(f, "video"),
        }
    }
}

// ==========================================
// AFF 等级段 (AFF Level)
// ==========================================
// Lower: 1-4 级; Upper: 5-7 级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffLevel {
    Lower,
    Upper,
}

impl AffLevel {
    /// 按 AFF 级数归段
    pub fn from_stage(stage: u8) -> Self {
        if stage <= 4 {
            AffLevel::Lower
        } else {
            AffLevel::Upper
        }
    }
}

impl fmt::Display for AffLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AffLevel::Lower => write!(f, "lower"),
            AffLevel::Upper => write!(f, "upper"),
        }
    }
}

// ==========================================
// 轮休队伍 (Team)
// ==========================================
// 红线: gold 队永不轮休
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Red,
    Blue,
    Gold,
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::Red => write!(f, "red"),
            Team::Blue => write!(f, "blue"),
            Team::Gold => write!(f, "gold"),
        }
    }
}

impl FromStr for Team {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "red" => Ok(Team::Red),
            "blue" => Ok(Team::Blue),
            "gold" => Ok(Team::Gold),
            other => Err(DomainError::Parse {
                field: "team".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

// ==========================================
// 载次状态 (Load Status)
// ==========================================
// 正向: building -> ready -> departed -> completed
// 回退: ready -> building, departed -> ready
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    Building,  // 组建中
    Ready,     // 已就绪（倒计时）
    Departed,  // 已起飞
    Completed, // 已完成（转为历史）
}

impl LoadStatus {
    /// 检查状态转换是否允许
    pub fn can_transition_to(self, next: LoadStatus) -> bool {
        use LoadStatus::*;
        if self == next {
            return true;
        }
        matches!(
            (self, next),
            (Building, Ready)
                | (Ready, Departed)
                | (Departed, Completed)
                | (Ready, Building)
                | (Departed, Ready)
        )
    }

    /// 是否仍可编辑分配
    pub fn is_editable(self) -> bool {
        matches!(self, LoadStatus::Building | LoadStatus::Ready)
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadStatus::Building => write!(f, "building"),
            LoadStatus::Ready => write!(f, "ready"),
            LoadStatus::Departed => write!(f, "departed"),
            LoadStatus::Completed => write!(f, "completed"),
        }
    }
}

// ==========================================
// 轮休日组合 (Days Off)
// ==========================================
// 配置格式: "mon-tue"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DaysOff {
    pub first: Weekday,
    pub second: Weekday,
}

impl DaysOff {
    pub fn new(first: Weekday, second: Weekday) -> Self {
        Self { first, second }
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.first == day || self.second == day
    }
}

fn parse_weekday(raw: &str) -> Option<Weekday> {
    match raw.trim().to_lowercase().as_str() {
        "mon" => Some(Weekday::Mon),
        "tue" => Some(Weekday::Tue),
        "wed" => Some(Weekday::Wed),
        "thu" => Some(Weekday::Thu),
        "fri" => Some(Weekday::Fri),
        "sat" => Some(Weekday::Sat),
        "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

fn weekday_code(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "mon",
        Weekday::Tue => "tue",
        Weekday::Wed => "wed",
        Weekday::Thu => "thu",
        Weekday::Fri => "fri",
        Weekday::Sat => "sat",
        Weekday::Sun => "sun",
    }
}

impl FromStr for DaysOff {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_err = || DomainError::Parse {
            field: "days_off".to_string(),
            value: s.to_string(),
        };
        let (a, b) = s.split_once('-').ok_or_else(parse_err)?;
        let first = parse_weekday(a).ok_or_else(parse_err)?;
        let second = parse_weekday(b).ok_or_else(parse_err)?;
        Ok(DaysOff { first, second })
    }
}

impl TryFrom<String> for DaysOff {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DaysOff> for String {
    fn from(value: DaysOff) -> Self {
        value.to_string()
    }
}

impl fmt::Display for DaysOff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", weekday_code(self.first), weekday_code(self.second))
    }
}

// ==========================================
// 轮休排班 (Team Rotation)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRotation {
    /// 当前轮休的队伍
    pub team_off: Team,
    /// 轮休日组合
    pub days_off: DaysOff,
}

impl TeamRotation {
    /// 判断某队伍在某天是否轮休
    pub fn is_off(&self, team: Team, day: Weekday) -> bool {
        if team == Team::Gold {
            return false;
        }
        team == self.team_off && self.days_off.contains(day)
    }
}

impl Default for TeamRotation {
    fn default() -> Self {
        Self {
            team_off: Team::Red,
            days_off: DaysOff::new(Weekday::Mon, Weekday::Tue),
        }
    }
}
