//! Input validation functions
//!
//! Validators return `Result<(), String>` for single values and
//! [`ValidationError`] when a whole log entry is checked, so the caller
//! knows which field was rejected.

use crate::errors::ValidationError;
use crate::models::HealthLogEntry;

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }
    if email.len() > 255 {
        return Err("Email too long".to_string());
    }
    let well_formed = regex_lite::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
        .map(|re| re.is_match(email))
        .unwrap_or(false);
    if !well_formed {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }
    if password.len() > 128 {
        return Err("Password too long".to_string());
    }
    Ok(())
}

/// Validate a display name
pub fn validate_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name cannot be empty".to_string());
    }
    if trimmed.chars().count() > 100 {
        return Err("Name too long".to_string());
    }
    Ok(())
}

/// Validate hours slept in one night
pub fn validate_sleep_hours(hours: f64) -> Result<(), String> {
    if hours.is_nan() || hours.is_infinite() {
        return Err("Sleep hours must be a valid number".to_string());
    }
    if !(0.0..=24.0).contains(&hours) {
        return Err("Sleep hours must be between 0 and 24".to_string());
    }
    Ok(())
}

/// Validate a non-negative count (glasses, meals, servings)
pub fn validate_count(value: i32) -> Result<(), String> {
    if value < 0 {
        return Err("Value cannot be negative".to_string());
    }
    Ok(())
}

/// Validate duration in minutes
pub fn validate_duration_minutes(minutes: i32) -> Result<(), String> {
    if minutes < 0 {
        return Err("Duration cannot be negative".to_string());
    }
    if minutes > 1440 {
        return Err("Duration cannot exceed 24 hours".to_string());
    }
    Ok(())
}

/// Check every present field of a log entry, stopping at the first problem
pub fn validate_health_log_entry(entry: &HealthLogEntry) -> Result<(), ValidationError> {
    if let Some(hours) = entry.sleep_hours() {
        validate_sleep_hours(hours).map_err(|m| ValidationError::new("sleep.hours", m))?;
    }

    if let Some(glasses) = entry.water_glasses() {
        validate_count(glasses).map_err(|m| ValidationError::new("water.glasses", m))?;
    }

    if let Some(minutes) = entry.exercise_minutes() {
        validate_duration_minutes(minutes)
            .map_err(|m| ValidationError::new("exercise.minutes", m))?;
    }

    if let Some(nutrition) = &entry.nutrition {
        let counts = [
            ("nutrition.meals", nutrition.meals),
            ("nutrition.junkFood", nutrition.junk_food),
            ("nutrition.fruits", nutrition.fruits),
            ("nutrition.vegetables", nutrition.vegetables),
        ];
        for (field, value) in counts {
            if let Some(v) = value {
                validate_count(v).map_err(|m| ValidationError::new(field, m))?;
            }
        }
    }

    for symptom in &entry.symptoms {
        if symptom.name.trim().is_empty() {
            return Err(ValidationError::new("symptoms.name", "Symptom name is required"));
        }
    }

    Ok(())
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "name" => "Name",
        "email" => "Email",
        "password" => "Password",
        "sleep.hours" => "Sleep Hours",
        "water.glasses" => "Water Intake",
        "exercise.minutes" => "Exercise Duration",
        "nutrition.meals" => "Meals",
        "nutrition.junkFood" => "Junk Food",
        "nutrition.fruits" => "Fruits",
        "nutrition.vegetables" => "Vegetables",
        "symptoms.name" => "Symptom",
        _ => field_name,
    }
}
