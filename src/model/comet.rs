use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CometDto {
    pub id: i32,
    /// NASA designation, e.g. `1P/Halley`
    pub designation: String,
    pub name: Option<String>,
    pub flybys: Vec<FlybyDto>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CometSummaryDto {
    pub id: i32,
    pub designation: String,
    pub name: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct FlybyDto {
    pub id: i32,
    /// Perihelion year, possibly fractional; absent when unknown
    pub year: Option<f64>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterCometDto {
    pub designation: String,
    pub name: Option<String>,
    #[serde(default)]
    pub flybys: Vec<NewFlybyDto>,
}

/// A perihelion passage given either as a year or as a Julian Day
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct NewFlybyDto {
    pub year: Option<f64>,
    pub julian_day: Option<f64>,
    pub description: Option<String>,
}
