//! SofaScore raw wire types: serde shapes for the incidents and shotmap feeds.
//! These map to our clean domain types via the functions in normalize.rs.
//!
//! Every field is kept as a loose `serde_json::Value`. The feed changes shape
//! between versions and a single odd field must never reject the whole item.

use crate::Coordinates;
use serde::Deserialize;
use serde_json::Value;

/// Added-time values at or above this are period sentinels, not minutes.
pub const ADDED_TIME_SENTINEL: i64 = 900;

// ---------------------------------------------------------------------------
// Incidents  (/event/{id}/incidents)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RawIncident {
    pub incident_type: Option<Value>,
    /// Older feed versions use "type" instead of "incidentType".
    #[serde(rename = "type")]
    pub kind: Option<Value>,
    pub incident_class: Option<Value>,
    pub id: Option<Value>,
    pub time: Option<Value>,
    pub added_time: Option<Value>,
    pub time_seconds: Option<Value>,
    pub period_time_seconds: Option<Value>,
    pub is_home: Option<Value>,
    pub team: Option<Value>,
    pub team_id: Option<Value>,
    pub player: Option<Value>,
    pub assist1: Option<Value>,
    pub player_in: Option<Value>,
    pub player_out: Option<Value>,
    pub injury: Option<Value>,
    pub reason: Option<Value>,
    pub rescinded: Option<Value>,
    pub text: Option<Value>,
    pub home_score: Option<Value>,
    pub away_score: Option<Value>,
    pub is_live: Option<Value>,
    pub length: Option<Value>,
    pub confirmed: Option<Value>,
    pub description: Option<Value>,

    // Shot fields: /event/{id}/shotmap items, or "shot" incidents
    pub shot_type: Option<Value>,
    pub goal_type: Option<Value>,
    pub situation: Option<Value>,
    pub body_part: Option<Value>,
    pub goal_mouth_location: Option<Value>,
    pub player_coordinates: Option<Value>,
    pub goal_mouth_coordinates: Option<Value>,
    pub xg: Option<Value>,
    pub xgot: Option<Value>,
}

impl RawIncident {
    /// Decode one feed item. Anything that is not a JSON object is malformed.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        RawIncident::deserialize(value).ok()
    }

    /// "incidentType", falling back to "type", then "unknown".
    pub fn discriminator(&self) -> &str {
        self.incident_type
            .as_ref()
            .and_then(non_empty_str)
            .or_else(|| self.kind.as_ref().and_then(non_empty_str))
            .unwrap_or("unknown")
    }

    pub fn class(&self) -> Option<&str> {
        self.incident_class.as_ref().and_then(non_empty_str)
    }

    pub fn minute(&self) -> Option<i64> {
        self.time.as_ref().and_then(safe_int)
    }

    pub fn added_time(&self) -> Option<i64> {
        added_time_norm(self.added_time.as_ref())
    }

    pub fn incident_id(&self) -> Option<i64> {
        self.id.as_ref().and_then(safe_int)
    }

    pub fn player_id(&self) -> Option<i64> {
        nested_id(self.player.as_ref())
    }

    /// Display label for the player: short name first, then full name.
    pub fn player_name(&self) -> Option<String> {
        let player = self.player.as_ref()?.as_object()?;
        player
            .get("shortName")
            .and_then(non_empty_str)
            .or_else(|| player.get("name").and_then(non_empty_str))
            .map(str::to_owned)
    }

    /// Team id carried explicitly by the item, either as a team object,
    /// a bare integer under "team", or a "teamId" field.
    pub fn explicit_team_id(&self) -> Option<i64> {
        let from_team = match self.team.as_ref() {
            Some(Value::Object(team)) => team.get("id").and_then(safe_int),
            Some(other) if other.is_number() => safe_int(other),
            _ => None,
        };
        from_team.or_else(|| self.team_id.as_ref().and_then(safe_int))
    }

    /// `isHome` only counts when it is a real boolean.
    pub fn home_flag(&self) -> Option<bool> {
        self.is_home.as_ref().and_then(Value::as_bool)
    }
}

// ---------------------------------------------------------------------------
// Lenient value helpers
// ---------------------------------------------------------------------------

/// Integer from a loose feed value. Numbers, numeric strings and booleans are
/// accepted; floats truncate toward zero. Everything else is `None`.
pub fn safe_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

/// Float from a loose feed value. Non-finite results are `None`.
pub fn safe_float(value: &Value) -> Option<f64> {
    let f = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }?;
    f.is_finite().then_some(f)
}

/// Added time with the period sentinel (>= 900) mapped to `None`.
pub fn added_time_norm(value: Option<&Value>) -> Option<i64> {
    value
        .and_then(safe_int)
        .filter(|added| *added < ADDED_TIME_SENTINEL)
}

/// Only a JSON `true` is true.
pub fn flag(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Bool(true)))
}

/// `{"id": ...}` → id.
pub fn nested_id(value: Option<&Value>) -> Option<i64> {
    value?.as_object()?.get("id").and_then(safe_int)
}

pub fn string(value: Option<&Value>) -> Option<String> {
    value.and_then(non_empty_str).map(str::to_owned)
}

pub fn coordinates(value: Option<&Value>) -> Option<Coordinates> {
    let obj = value?.as_object()?;
    Some(Coordinates {
        x: obj.get("x").and_then(safe_float),
        y: obj.get("y").and_then(safe_float),
        z: obj.get("z").and_then(safe_float),
    })
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}
