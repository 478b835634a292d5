//! Data models for the wellness tracker
//!
//! Field names serialize in camelCase and identifiers as `_id` so the
//! JSON matches what the web client already consumes.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Log Enumerations
// ============================================================================

/// Self-reported sleep quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SleepQuality {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl SleepQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            SleepQuality::Poor => "poor",
            SleepQuality::Fair => "fair",
            SleepQuality::Good => "good",
            SleepQuality::Excellent => "excellent",
        }
    }
}

impl fmt::Display for SleepQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SleepQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "poor" => Ok(SleepQuality::Poor),
            "fair" => Ok(SleepQuality::Fair),
            "good" => Ok(SleepQuality::Good),
            "excellent" => Ok(SleepQuality::Excellent),
            _ => Err(format!("Unknown sleep quality: {}", s)),
        }
    }
}

/// Daily mood on a five-point scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Terrible,
    Bad,
    Neutral,
    Good,
    Great,
}

impl Mood {
    /// Ordinal used for trend charts and mood averages (terrible=1 .. great=5)
    pub fn ordinal(&self) -> u8 {
        match self {
            Mood::Terrible => 1,
            Mood::Bad => 2,
            Mood::Neutral => 3,
            Mood::Good => 4,
            Mood::Great => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Terrible => "terrible",
            Mood::Bad => "bad",
            Mood::Neutral => "neutral",
            Mood::Good => "good",
            Mood::Great => "great",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "terrible" => Ok(Mood::Terrible),
            "bad" => Ok(Mood::Bad),
            "neutral" => Ok(Mood::Neutral),
            "good" => Ok(Mood::Good),
            "great" => Ok(Mood::Great),
            _ => Err(format!("Unknown mood: {}", s)),
        }
    }
}

/// Self-reported energy level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnergyLevel {
    #[serde(rename = "very low")]
    VeryLow,
    #[serde(rename = "low")]
    Low,
    #[serde(rename = "moderate")]
    Moderate,
    #[serde(rename = "high")]
    High,
    #[serde(rename = "very high")]
    VeryHigh,
}

impl EnergyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnergyLevel::VeryLow => "very low",
            EnergyLevel::Low => "low",
            EnergyLevel::Moderate => "moderate",
            EnergyLevel::High => "high",
            EnergyLevel::VeryHigh => "very high",
        }
    }
}

impl fmt::Display for EnergyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnergyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "very low" => Ok(EnergyLevel::VeryLow),
            "low" => Ok(EnergyLevel::Low),
            "moderate" => Ok(EnergyLevel::Moderate),
            "high" => Ok(EnergyLevel::High),
            "very high" => Ok(EnergyLevel::VeryHigh),
            _ => Err(format!("Unknown energy level: {}", s)),
        }
    }
}

/// Symptom severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SymptomSeverity {
    #[default]
    Mild,
    Moderate,
    Severe,
}

// ============================================================================
// Health Log
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SleepEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<SleepQuality>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaterEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glasses: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseEntry {
    #[serde(default)]
    pub did_exercise: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes: Option<i32>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meals: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub junk_food: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fruits: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vegetables: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symptom {
    pub name: String,
    #[serde(default)]
    pub severity: SymptomSeverity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The user-supplied part of a health log
///
/// Every section is optional; absent sections are skipped by scoring,
/// trends and insight rules rather than read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthLogEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep: Option<SleepEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy: Option<EnergyLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water: Option<WaterEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise: Option<ExerciseEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<NutritionEntry>,
    #[serde(default)]
    pub symptoms: Vec<Symptom>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Decimal places kept when sleep hours are stored
pub const SLEEP_HOURS_SCALE: u32 = 2;

/// Round hours the way the database column stores them
pub fn stored_sleep_hours(hours: f64) -> Option<Decimal> {
    Decimal::from_f64(hours).map(|d| d.round_dp(SLEEP_HOURS_SCALE))
}

impl HealthLogEntry {
    /// The entry with sleep hours at stored precision, so a score computed
    /// from it matches the persisted log
    pub fn at_stored_precision(mut self) -> Self {
        if let Some(hours) = self.sleep.as_mut().and_then(|s| s.hours.as_mut()) {
            if let Some(rounded) = stored_sleep_hours(*hours).and_then(|d| d.to_f64()) {
                *hours = rounded;
            }
        }
        self
    }

    pub fn sleep_hours(&self) -> Option<f64> {
        self.sleep.as_ref().and_then(|s| s.hours)
    }

    pub fn water_glasses(&self) -> Option<i32> {
        self.water.as_ref().and_then(|w| w.glasses)
    }

    pub fn exercise_minutes(&self) -> Option<i32> {
        self.exercise.as_ref().and_then(|e| e.minutes)
    }

    pub fn did_exercise(&self) -> bool {
        self.exercise.as_ref().map(|e| e.did_exercise).unwrap_or(false)
    }
}

/// A stored health log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthLog {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user: Uuid,
    pub date: DateTime<Utc>,
    #[serde(flatten)]
    pub entry: HealthLogEntry,
    pub calculated_score: i32,
}

// ============================================================================
// Insights
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightType {
    Pattern,
    Suggestion,
    Alert,
    Achievement,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightType::Pattern => "pattern",
            InsightType::Suggestion => "suggestion",
            InsightType::Alert => "alert",
            InsightType::Achievement => "achievement",
        }
    }
}

impl fmt::Display for InsightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InsightType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pattern" => Ok(InsightType::Pattern),
            "suggestion" => Ok(InsightType::Suggestion),
            "alert" => Ok(InsightType::Alert),
            "achievement" => Ok(InsightType::Achievement),
            _ => Err(format!("Unknown insight type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightSeverity {
    Low,
    Medium,
    High,
}

impl InsightSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightSeverity::Low => "low",
            InsightSeverity::Medium => "medium",
            InsightSeverity::High => "high",
        }
    }
}

impl fmt::Display for InsightSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InsightSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(InsightSeverity::Low),
            "medium" => Ok(InsightSeverity::Medium),
            "high" => Ok(InsightSeverity::High),
            _ => Err(format!("Unknown insight severity: {}", s)),
        }
    }
}

/// An insight produced by a rule, before it is persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightDraft {
    pub insight_type: InsightType,
    pub title: String,
    pub description: String,
    pub metrics: Vec<String>,
    pub severity: InsightSeverity,
    pub suggested_actions: Vec<String>,
}

/// A stored insight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthInsight {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user: Uuid,
    pub date: DateTime<Utc>,
    pub insight_type: InsightType,
    pub title: String,
    pub description: String,
    pub metrics: Vec<String>,
    pub severity: InsightSeverity,
    pub is_read: bool,
    pub action_taken: bool,
    pub suggested_actions: Vec<String>,
}

// ============================================================================
// User
// ============================================================================

/// Score given to an account before it has any logs
pub const DEFAULT_HEALTH_SCORE: i32 = 50;

/// User account as exposed over the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub health_score: i32,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Image Analysis
// ============================================================================

/// Mood read from a facial expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpressionMood {
    Happy,
    Neutral,
    Sad,
}

impl ExpressionMood {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpressionMood::Happy => "Happy",
            ExpressionMood::Neutral => "Neutral",
            ExpressionMood::Sad => "Sad",
        }
    }
}

impl FromStr for ExpressionMood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Happy" => Ok(ExpressionMood::Happy),
            "Neutral" => Ok(ExpressionMood::Neutral),
            "Sad" => Ok(ExpressionMood::Sad),
            _ => Err(format!("Unknown expression mood: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelaxationLevel {
    High,
    Moderate,
    Low,
}

impl RelaxationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelaxationLevel::High => "High",
            RelaxationLevel::Moderate => "Moderate",
            RelaxationLevel::Low => "Low",
        }
    }
}

impl FromStr for RelaxationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "High" => Ok(RelaxationLevel::High),
            "Moderate" => Ok(RelaxationLevel::Moderate),
            "Low" => Ok(RelaxationLevel::Low),
            _ => Err(format!("Unknown relaxation level: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StressStatus {
    Low,
    Moderate,
    High,
}

impl StressStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StressStatus::Low => "Low",
            StressStatus::Moderate => "Moderate",
            StressStatus::High => "High",
        }
    }
}

impl FromStr for StressStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(StressStatus::Low),
            "Moderate" => Ok(StressStatus::Moderate),
            "High" => Ok(StressStatus::High),
            _ => Err(format!("Unknown stress status: {}", s)),
        }
    }
}

/// Reading of a vital sign against its normal range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VitalStatus {
    Normal,
    High,
    Low,
}

impl VitalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VitalStatus::Normal => "Normal",
            VitalStatus::High => "High",
            VitalStatus::Low => "Low",
        }
    }
}

impl FromStr for VitalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Normal" => Ok(VitalStatus::Normal),
            "High" => Ok(VitalStatus::High),
            "Low" => Ok(VitalStatus::Low),
            _ => Err(format!("Unknown vital status: {}", s)),
        }
    }
}

/// Respiratory rate (breaths/min), heart rate (bpm) and oxygen saturation (%)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VitalSigns {
    pub respiratory_rate: u8,
    pub heart_rate: u8,
    pub oxygen_saturation: u8,
}

/// Result of analysing one image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageHealthMetrics {
    pub stress_level: u8,
    pub mood: ExpressionMood,
    pub relaxation_level: RelaxationLevel,
    pub fatigue_level: u8,
    pub recommendations: Vec<String>,
}

/// A persisted image analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthDataRecord {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub stress_level: u8,
    pub stress_level_status: StressStatus,
    pub mood: ExpressionMood,
    pub relaxation_level: RelaxationLevel,
    pub fatigue_level: u8,
    pub recommendations: Vec<String>,
    pub respiratory_rate: u8,
    pub respiratory_rate_status: VitalStatus,
    pub heart_rate: u8,
    pub heart_rate_status: VitalStatus,
    pub oxygen_saturation: u8,
    pub oxygen_saturation_status: VitalStatus,
}
